//! Per-user multiset of watched movies.
//!
//! A movie counts as watched once for every rating or like the user has
//! on it. The map only ever holds strictly positive counts: decrementing
//! to zero removes the key, so the map stays proportional to the movies
//! that are still relevant. The whole map is serialized on every profile
//! read.

use crate::types::MovieId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Watch counts keyed by movie.
///
/// Serializes as a plain `{"<movie_id>": count}` object. Zero counts found
/// in a stored document are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<MovieId, u32>",
    into = "BTreeMap<MovieId, u32>"
)]
pub struct WatchLedger {
    counts: BTreeMap<MovieId, u32>,
}

impl WatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more watch of `movie_id`, creating the entry at 1.
    ///
    /// Every call accumulates; the caller makes sure it is invoked once per
    /// logical watch event.
    pub fn record_watch(mut self, movie_id: MovieId) -> Self {
        let count = self.counts.entry(movie_id).or_insert(0);
        *count += 1;
        debug!(movie_id, count = *count, "recorded watch");
        self
    }

    /// Take back one watch of `movie_id`.
    ///
    /// Untracked movies are ignored. A count of 1 removes the entry.
    pub fn remove_watch(mut self, movie_id: MovieId) -> Self {
        let Some(count) = self.counts.get_mut(&movie_id) else {
            debug!(movie_id, "remove_watch on untracked movie ignored");
            return self;
        };

        if *count > 1 {
            *count -= 1;
            debug!(movie_id, count = *count, "decremented watch");
        } else {
            self.counts.remove(&movie_id);
            debug!(movie_id, "watch entry removed");
        }
        self
    }

    /// Full map, for snapshotting
    pub fn counts(&self) -> &BTreeMap<MovieId, u32> {
        &self.counts
    }

    /// Watch count for a movie (0 when untracked)
    pub fn count(&self, movie_id: MovieId) -> u32 {
        self.counts.get(&movie_id).copied().unwrap_or(0)
    }

    /// Number of distinct movies currently tracked
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl From<BTreeMap<MovieId, u32>> for WatchLedger {
    fn from(mut counts: BTreeMap<MovieId, u32>) -> Self {
        counts.retain(|_, count| *count > 0);
        Self { counts }
    }
}

impl From<WatchLedger> for BTreeMap<MovieId, u32> {
    fn from(ledger: WatchLedger) -> Self {
        ledger.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_watch_creates_entry() {
        let ledger = WatchLedger::new().record_watch(42);
        assert_eq!(ledger.count(42), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_repeated_watches_accumulate() {
        let ledger = WatchLedger::new()
            .record_watch(42)
            .record_watch(42)
            .record_watch(7);

        assert_eq!(ledger.count(42), 2);
        assert_eq!(ledger.count(7), 1);
    }

    #[test]
    fn test_remove_decrements_then_deletes() {
        let ledger = WatchLedger::new().record_watch(42).record_watch(42);

        let ledger = ledger.remove_watch(42);
        assert_eq!(ledger.count(42), 1);
        assert!(ledger.counts().contains_key(&42));

        let ledger = ledger.remove_watch(42);
        assert!(!ledger.counts().contains_key(&42));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_remove_untracked_is_noop() {
        let before = WatchLedger::new().record_watch(1);
        let after = before.clone().remove_watch(999);
        assert_eq!(before, after);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let ledger = WatchLedger::new().record_watch(42).record_watch(42);
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"42":2}"#);
    }

    #[test]
    fn test_zero_counts_dropped_on_load() {
        let ledger: WatchLedger = serde_json::from_str(r#"{"1":0,"2":3}"#).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.count(2), 3);
    }
}
