//! The per-user taste aggregate.
//!
//! `UserTaste` bundles everything the model tracks for one account: the
//! watch ledger, genre affinity scores, the liked-movie set and the two
//! taste flags. It is a plain value. Every mutator consumes the aggregate
//! and returns the updated one, so the caller decides when (and whether)
//! the new state replaces the stored one.
//!
//! ## Concurrency
//! Nothing here serializes writers. Two concurrent edits for the same
//! user must be resolved where the aggregate is saved, for example with
//! the optimistic version check in the `store` crate.

use crate::events::TasteEvent;
use crate::genre_affinity::GenreAffinityModel;
use crate::types::{MovieId, StarRating, TasteFlags, UserId};
use crate::watch_ledger::WatchLedger;
use crate::weight::compute_weight;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Taste state owned by a single user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTaste {
    pub user_id: UserId,
    #[serde(default)]
    pub flags: TasteFlags,
    #[serde(default)]
    pub watched: WatchLedger,
    #[serde(default)]
    pub affinity: GenreAffinityModel,
    #[serde(default)]
    pub liked: BTreeSet<MovieId>,
}

impl UserTaste {
    /// Fresh aggregate for a new account
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            flags: TasteFlags::default(),
            watched: WatchLedger::new(),
            affinity: GenreAffinityModel::new(),
            liked: BTreeSet::new(),
        }
    }

    /// Set the taste flags (builder style)
    pub fn with_flags(mut self, flags: TasteFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_liked(&self, movie_id: MovieId) -> bool {
        self.liked.contains(&movie_id)
    }

    /// User rated a movie: one watch, `+compute_weight(rating)` per genre
    pub fn rate<S: AsRef<str>>(mut self, movie_id: MovieId, genres: &[S], rating: StarRating) -> Self {
        self.watched = self.watched.record_watch(movie_id);
        self.affinity = self.affinity.apply_genres(genres, compute_weight(Some(rating)));
        self
    }

    /// User edited a rating. Identical ratings leave the state untouched.
    pub fn rerate<S: AsRef<str>>(
        mut self,
        genres: &[S],
        original_rating: StarRating,
        updated_rating: StarRating,
    ) -> Self {
        if original_rating == updated_rating {
            return self;
        }
        self.affinity = self
            .affinity
            .apply_rating_change(genres, original_rating, updated_rating);
        self
    }

    /// User deleted a review rated `rating`: the inverse of [`UserTaste::rate`].
    ///
    /// Negation saturates, so a weight of `i32::MIN` removes `i32::MAX`.
    pub fn unrate<S: AsRef<str>>(mut self, movie_id: MovieId, genres: &[S], rating: StarRating) -> Self {
        self.watched = self.watched.remove_watch(movie_id);
        self.affinity = self.affinity.apply_genres(genres, compute_weight(Some(rating)).saturating_neg());
        self
    }

    /// Like a movie. Already-liked movies are left alone.
    pub fn like<S: AsRef<str>>(mut self, movie_id: MovieId, genres: &[S]) -> Self {
        if !self.liked.insert(movie_id) {
            debug!(movie_id, "movie already liked");
            return self;
        }
        self.watched = self.watched.record_watch(movie_id);
        self.affinity = self.affinity.apply_genres(genres, compute_weight(None));
        self
    }

    /// Unlike a movie. Movies that are not liked are left alone, so the
    /// ledger and affinity scores are untouched.
    pub fn unlike<S: AsRef<str>>(mut self, movie_id: MovieId, genres: &[S]) -> Self {
        if !self.liked.remove(&movie_id) {
            debug!(movie_id, "unlike of a movie that is not liked");
            return self;
        }
        self.watched = self.watched.remove_watch(movie_id);
        self.affinity = self.affinity.apply_genres(genres, compute_weight(None).saturating_neg());
        self
    }

    /// Flip the like state of a movie.
    ///
    /// Returns the new aggregate and whether the movie is liked afterwards.
    pub fn toggle_like<S: AsRef<str>>(self, movie_id: MovieId, genres: &[S]) -> (Self, bool) {
        if self.is_liked(movie_id) {
            (self.unlike(movie_id, genres), false)
        } else {
            (self.like(movie_id, genres), true)
        }
    }

    /// Apply one recorded event
    #[instrument(skip(self, event), fields(user_id = self.user_id, kind = event.kind()))]
    pub fn apply(self, event: &TasteEvent) -> Self {
        match event {
            TasteEvent::ReviewCreated {
                movie_id,
                genres,
                rating,
            } => self.rate(*movie_id, genres.as_slice(), *rating),
            TasteEvent::ReviewEdited {
                genres,
                original_rating,
                updated_rating,
                ..
            } => self.rerate(genres.as_slice(), *original_rating, *updated_rating),
            TasteEvent::ReviewDeleted {
                movie_id,
                genres,
                rating,
            } => self.unrate(*movie_id, genres.as_slice(), *rating),
            TasteEvent::MovieLiked { movie_id, genres } => self.like(*movie_id, genres.as_slice()),
            TasteEvent::MovieUnliked { movie_id, genres } => self.unlike(*movie_id, genres.as_slice()),
            TasteEvent::LikeToggled { movie_id, genres } => self.toggle_like(*movie_id, genres.as_slice()).0,
            TasteEvent::FlagsUpdated {
                is_b_lover,
                is_hipster,
            } => self.with_flags(TasteFlags {
                is_b_lover: *is_b_lover,
                is_hipster: *is_hipster,
            }),
        }
    }

    /// Fold a sequence of events, in order
    pub fn apply_all<'a, I>(self, events: I) -> Self
    where
        I: IntoIterator<Item = &'a TasteEvent>,
    {
        events.into_iter().fold(self, |taste, event| taste.apply(event))
    }
}
