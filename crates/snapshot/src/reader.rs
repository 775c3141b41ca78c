//! TasteSnapshotReader - recommendation-seed projection
//!
//! Packages a user's flags, affinity scores and watch counts together with
//! a small random sample of liked movies.
//!
//! ## Sampling
//! The sample is `sample_size` independent uniform draws from the liked
//! set, i.e. with replacement. A user with a single liked movie gets that
//! id repeated `sample_size` times. A user with no liked movies gets an
//! empty sample.
//!
//! The liked set is iterated in ascending id order before drawing, so a
//! seeded RNG always yields the same sample for the same state.

use crate::types::TasteSnapshot;
use rand::Rng;
use rand::seq::IndexedRandom;
use taste_model::{MovieId, UserTaste};
use tracing::{debug, instrument};

/// Number of liked movies sampled by default
pub const DEFAULT_SAMPLE_SIZE: usize = 3;

/// Builds [`TasteSnapshot`]s. Holds no state besides its configuration.
#[derive(Debug, Clone, Copy)]
pub struct TasteSnapshotReader {
    sample_size: usize,
}

impl TasteSnapshotReader {
    pub fn new() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Configure how many liked movies are drawn (default: 3)
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Project `taste` into a snapshot, drawing liked movies from `rng`
    #[instrument(skip(self, taste, rng), fields(user_id = taste.user_id))]
    pub fn build<R: Rng + ?Sized>(&self, taste: &UserTaste, rng: &mut R) -> TasteSnapshot {
        let liked_movies = self.sample_liked(taste, rng);
        debug!(
            genres = taste.affinity.len(),
            watched = taste.watched.len(),
            sampled = liked_movies.len(),
            "built taste snapshot"
        );

        TasteSnapshot {
            is_b_lover: taste.flags.is_b_lover,
            is_hipster: taste.flags.is_hipster,
            genre_preference: taste.affinity.scores().clone(),
            watched_movies: taste.watched.counts().clone(),
            liked_movies,
        }
    }

    /// [`TasteSnapshotReader::build`] using the thread-local RNG
    pub fn build_with_thread_rng(&self, taste: &UserTaste) -> TasteSnapshot {
        self.build(taste, &mut rand::rng())
    }

    fn sample_liked<R: Rng + ?Sized>(&self, taste: &UserTaste, rng: &mut R) -> Vec<MovieId> {
        let liked: Vec<MovieId> = taste.liked.iter().copied().collect();
        if liked.is_empty() {
            return Vec::new();
        }

        (0..self.sample_size)
            .filter_map(|_| liked.choose(rng).copied())
            .collect()
    }
}

impl Default for TasteSnapshotReader {
    fn default() -> Self {
        Self::new()
    }
}
