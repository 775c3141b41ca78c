//! Running per-genre affinity scores.
//!
//! Scores are relative signals, not probabilities: they are unbounded in
//! both directions and an entry that drifts back to 0 is kept.
//!
//! ## Update paths
//! - [`GenreAffinityModel::apply_genres`] adds a weight to every genre,
//!   creating missing genres. Used with `+w` when a rating or like is added
//!   and `-w` when it is removed.
//! - [`GenreAffinityModel::apply_rating_change`] shifts genres that already
//!   exist by the difference of the two linear weights. It never creates
//!   entries.
//!
//! Removing a rating only restores the earlier scores if the caller passes
//! the same genre list it used when adding it. No reconciliation is done
//! here.

use crate::types::{GenreLabel, Priority, StarRating};
use crate::weight::linear_weight;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Signed score per genre label.
///
/// Serializes as a plain `{"<genre>": score}` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreAffinityModel {
    scores: BTreeMap<GenreLabel, Priority>,
}

impl GenreAffinityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to each genre in `genres`.
    ///
    /// Absent genres start at `weight`. A genre listed twice is applied twice.
    /// Scores saturate at the `i32` bounds.
    pub fn apply_genres<S: AsRef<str>>(mut self, genres: &[S], weight: Priority) -> Self {
        for genre in genres {
            let genre = genre.as_ref();
            match self.scores.get_mut(genre) {
                Some(score) => *score = score.saturating_add(weight),
                None => {
                    self.scores.insert(genre.to_string(), weight);
                }
            }
        }
        debug!(genres = genres.len(), weight, "applied genre weight");
        self
    }

    /// Move every already-present genre by
    /// `linear_weight(updated) - linear_weight(original)`.
    ///
    /// Genres not in the map are skipped. Both weights come from the linear
    /// formula, so editing to or from 2.5 uses 0 rather than the baseline.
    /// The delta and the scores saturate at the `i32` bounds.
    pub fn apply_rating_change<S: AsRef<str>>(
        mut self,
        genres: &[S],
        original_rating: StarRating,
        updated_rating: StarRating,
    ) -> Self {
        let delta = linear_weight(updated_rating).saturating_sub(linear_weight(original_rating));

        for genre in genres {
            if let Some(score) = self.scores.get_mut(genre.as_ref()) {
                *score = score.saturating_add(delta);
            }
        }
        debug!(original_rating, updated_rating, delta, "applied rating change");
        self
    }

    /// Full map, for snapshotting
    pub fn scores(&self) -> &BTreeMap<GenreLabel, Priority> {
        &self.scores
    }

    pub fn score(&self, genre: &str) -> Option<Priority> {
        self.scores.get(genre).copied()
    }

    /// Genres ordered by score, highest first. Ties keep label order.
    pub fn ranked(&self) -> Vec<(&str, Priority)> {
        let mut ranked: Vec<(&str, Priority)> = self
            .scores
            .iter()
            .map(|(genre, score)| (genre.as_str(), *score))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl From<BTreeMap<GenreLabel, Priority>> for GenreAffinityModel {
    fn from(scores: BTreeMap<GenreLabel, Priority>) -> Self {
        Self { scores }
    }
}
