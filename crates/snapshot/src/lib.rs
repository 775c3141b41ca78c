//! # Snapshot Crate
//!
//! Read path of the taste model: turns a user's [`UserTaste`] into the
//! [`TasteSnapshot`] consumed by the recommendation service.
//!
//! ## Example Usage
//!
//! ```
//! use snapshot::TasteSnapshotReader;
//! use taste_model::UserTaste;
//!
//! let taste = UserTaste::new(1).like(42, &["drama"]);
//! let snapshot = TasteSnapshotReader::new().build_with_thread_rng(&taste);
//!
//! assert_eq!(snapshot.liked_movies, vec![42, 42, 42]);
//! ```
//!
//! Building a snapshot never mutates the aggregate, so reads for
//! different users need no coordination.
//!
//! [`UserTaste`]: taste_model::UserTaste

pub mod reader;
pub mod types;

// Re-export commonly used types
pub use reader::{TasteSnapshotReader, DEFAULT_SAMPLE_SIZE};
pub use types::TasteSnapshot;
