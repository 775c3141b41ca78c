//! # Store Crate
//!
//! Caller-side pieces the taste model relies on but does not implement
//! itself:
//!
//! - **repository**: `TasteRepository` with optimistic versioning, and a
//!   retrying read-modify-write helper
//! - **memory** / **json_file**: the two repository implementations
//! - **event_log**: JSON-lines log of user actions
//! - **replay**: parallel per-user replay of a log into a repository
//!
//! ## Example Usage
//!
//! ```
//! use store::{update_with_retry, InMemoryRepository, TasteRepository};
//!
//! let repo = InMemoryRepository::new();
//! update_with_retry(&repo, 1, 3, |taste| taste.rate(42, &["drama"], 4.0))?;
//!
//! let stored = repo.load(1)?;
//! assert_eq!(stored.version, 1);
//! assert_eq!(stored.value.affinity.score("drama"), Some(6));
//! # Ok::<(), store::StoreError>(())
//! ```

pub mod error;
pub mod event_log;
pub mod json_file;
pub mod memory;
pub mod replay;
pub mod repository;

// Re-export commonly used types
pub use error::{Result, StoreError};
pub use event_log::{parse_event_log, read_event_log, write_event_log, LoggedEvent};
pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;
pub use replay::{fold_events, replay_events, ReplaySummary};
pub use repository::{update_with_retry, PendingSave, TasteRepository, Versioned};
