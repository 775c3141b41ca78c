//! Payload handed to the recommendation consumer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use taste_model::{GenreLabel, MovieId, Priority};

/// Read-only bundle of a user's taste state.
///
/// Built fresh for every read and never persisted. Field names are the
/// ones the recommendation consumer expects on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteSnapshot {
    pub is_b_lover: bool,
    pub is_hipster: bool,
    /// Genre affinity scores
    pub genre_preference: BTreeMap<GenreLabel, Priority>,
    /// Watch counts per movie
    pub watched_movies: BTreeMap<MovieId, u32>,
    /// Liked movies drawn with replacement; may contain repeats
    pub liked_movies: Vec<MovieId>,
}

impl TasteSnapshot {
    /// Top `n` genres by score, highest first
    pub fn top_genres(&self, n: usize) -> Vec<&str> {
        let mut genres: Vec<(&GenreLabel, &Priority)> = self.genre_preference.iter().collect();
        genres.sort_by(|a, b| b.1.cmp(a.1));
        genres.into_iter().take(n).map(|(genre, _)| genre.as_str()).collect()
    }
}
