//! Core identifier and value types for the taste model.
//!
//! The surrounding application validates everything before it reaches this
//! crate, so these are plain aliases rather than checked newtypes.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user account
pub type UserId = u32;

/// Unique identifier for a movie (the upstream catalogue id)
pub type MovieId = u32;

/// Free-form genre label as supplied by the catalogue ("drama", "noir", ...)
pub type GenreLabel = String;

/// Star rating, conventionally 0.5 to 5.0 in half-point steps
pub type StarRating = f64;

/// Integer weight contributed to a genre, and the genre score itself
pub type Priority = i32;

// =============================================================================
// Taste Flags
// =============================================================================

/// Two coarse taste switches the user sets on their profile.
///
/// Defaults match a freshly created account: B-movie lover on, hipster off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteFlags {
    pub is_b_lover: bool,
    pub is_hipster: bool,
}

impl Default for TasteFlags {
    fn default() -> Self {
        Self {
            is_b_lover: true,
            is_hipster: false,
        }
    }
}
