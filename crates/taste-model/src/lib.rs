//! # Taste Model Crate
//!
//! Per-user taste state for the movie-review application: how often each
//! movie was watched and a running affinity score per genre, updated every
//! time the user rates, re-rates, unrates, likes or unlikes a movie.
//!
//! ## Main Components
//!
//! - **types**: Identifier aliases and the taste flags
//! - **weight**: Star rating to integer weight conversion
//! - **watch_ledger**: Multiset of watched movies
//! - **genre_affinity**: Signed score per genre
//! - **user_taste**: The aggregate that owns all of the above
//! - **events**: The user actions that mutate the aggregate
//!
//! ## Example Usage
//!
//! ```
//! use taste_model::{TasteEvent, UserTaste};
//!
//! let taste = UserTaste::new(1).apply(&TasteEvent::ReviewCreated {
//!     movie_id: 42,
//!     genres: vec!["drama".to_string(), "noir".to_string()],
//!     rating: 4.0,
//! });
//!
//! assert_eq!(taste.watched.count(42), 1);
//! assert_eq!(taste.affinity.score("drama"), Some(6));
//! ```
//!
//! Everything here is synchronous and free of I/O. Callers persist the
//! aggregate and are responsible for serializing concurrent writers.

// Public modules
pub mod events;
pub mod genre_affinity;
pub mod types;
pub mod user_taste;
pub mod watch_ledger;
pub mod weight;

// Re-export commonly used types for convenience
pub use events::TasteEvent;
pub use genre_affinity::GenreAffinityModel;
pub use types::{
    // Type aliases
    GenreLabel,
    MovieId,
    Priority,
    StarRating,
    UserId,
    // Core types
    TasteFlags,
};
pub use user_taste::UserTaste;
pub use watch_ledger::WatchLedger;
pub use weight::{compute_weight, linear_weight, BASELINE_WEIGHT};
