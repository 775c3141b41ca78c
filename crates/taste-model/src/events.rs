//! User actions that touch the taste model.
//!
//! Each variant corresponds to one integration point in the review/like
//! handlers. The handler builds the event from the request it is serving
//! and hands it to [`UserTaste::apply`](crate::UserTaste::apply) before
//! persisting the action itself.

use crate::types::{GenreLabel, MovieId, StarRating};
use serde::{Deserialize, Serialize};

/// A mutating user action, as recorded in the event log.
///
/// Serialized with an internal `type` tag in snake_case, e.g.
/// `{"type":"review_created","movie_id":42,"genres":["drama"],"rating":4.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TasteEvent {
    /// User rated a movie
    ReviewCreated {
        movie_id: MovieId,
        genres: Vec<GenreLabel>,
        rating: StarRating,
    },

    /// User changed the star rating of an existing review
    ReviewEdited {
        movie_id: MovieId,
        genres: Vec<GenreLabel>,
        original_rating: StarRating,
        updated_rating: StarRating,
    },

    /// User deleted a review. `rating` is the rating stored on the review.
    ReviewDeleted {
        movie_id: MovieId,
        genres: Vec<GenreLabel>,
        rating: StarRating,
    },

    /// Like a movie; no-op when it is already liked
    MovieLiked {
        movie_id: MovieId,
        genres: Vec<GenreLabel>,
    },

    /// Unlike a movie; no-op when it is not liked
    MovieUnliked {
        movie_id: MovieId,
        genres: Vec<GenreLabel>,
    },

    /// The like button: unlikes a liked movie, likes any other
    LikeToggled {
        movie_id: MovieId,
        genres: Vec<GenreLabel>,
    },

    /// Profile edit of the taste flags
    FlagsUpdated { is_b_lover: bool, is_hipster: bool },
}

impl TasteEvent {
    /// Movie the event is about, if any
    pub fn movie_id(&self) -> Option<MovieId> {
        match self {
            Self::ReviewCreated { movie_id, .. }
            | Self::ReviewEdited { movie_id, .. }
            | Self::ReviewDeleted { movie_id, .. }
            | Self::MovieLiked { movie_id, .. }
            | Self::MovieUnliked { movie_id, .. }
            | Self::LikeToggled { movie_id, .. } => Some(*movie_id),
            Self::FlagsUpdated { .. } => None,
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReviewCreated { .. } => "review_created",
            Self::ReviewEdited { .. } => "review_edited",
            Self::ReviewDeleted { .. } => "review_deleted",
            Self::MovieLiked { .. } => "movie_liked",
            Self::MovieUnliked { .. } => "movie_unliked",
            Self::LikeToggled { .. } => "like_toggled",
            Self::FlagsUpdated { .. } => "flags_updated",
        }
    }
}
