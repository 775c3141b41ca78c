//! Star rating to genre weight conversion.
//!
//! Two branches exist:
//! - [`compute_weight`] is used when a rating or like is first applied (and
//!   negated when it is removed)
//! - [`linear_weight`] is used when an existing rating is edited
//!
//! They disagree at the neutral rating of 2.5: the first returns the
//! [`BASELINE_WEIGHT`], the second returns 0. Scores already stored were
//! produced with exactly this behaviour, so it is kept as-is.

use crate::types::{Priority, StarRating};

/// Weight of a like (no star rating) and of an exactly-neutral rating
pub const BASELINE_WEIGHT: Priority = 10;

/// Rating treated as "no directional signal"
pub const NEUTRAL_RATING: StarRating = 2.5;

/// Multiplier applied to the distance from the neutral rating
const RATING_SCALE: StarRating = 4.0;

/// Weight for a newly applied rating, or for a like when `rating` is `None`.
///
/// ```
/// use taste_model::weight::compute_weight;
///
/// assert_eq!(compute_weight(None), 10);
/// assert_eq!(compute_weight(Some(2.5)), 10);
/// assert_eq!(compute_weight(Some(3.0)), 2);
/// assert_eq!(compute_weight(Some(1.0)), -6);
/// ```
///
/// NOTE: collapsing 2.5 onto the baseline (instead of 0) looks unintentional.
/// It means re-liking after unrating a neutral review does not restore the
/// original score. Changing it would invalidate stored scores.
pub fn compute_weight(rating: Option<StarRating>) -> Priority {
    match rating {
        None => BASELINE_WEIGHT,
        Some(r) if r == NEUTRAL_RATING => BASELINE_WEIGHT,
        Some(r) => linear_weight(r),
    }
}

/// Weight used when a rating is edited: `(rating - 2.5) * 4`, truncated
/// toward zero.
///
/// No range check is done. Ratings outside 0.5..=5.0 still produce a
/// well-defined value; NaN maps to 0 and infinities saturate at the
/// `i32` bounds, following `as` conversion. Callers combine weights with
/// saturating arithmetic for that reason.
pub fn linear_weight(rating: StarRating) -> Priority {
    ((rating - NEUTRAL_RATING) * RATING_SCALE) as Priority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_for_missing_and_neutral() {
        assert_eq!(compute_weight(None), 10);
        assert_eq!(compute_weight(Some(2.5)), 10);
    }

    #[test]
    fn test_known_ratings() {
        assert_eq!(compute_weight(Some(3.0)), 2);
        assert_eq!(compute_weight(Some(1.0)), -6);
        assert_eq!(compute_weight(Some(4.0)), 6);
        assert_eq!(compute_weight(Some(5.0)), 10);
        assert_eq!(compute_weight(Some(0.5)), -8);
    }

    #[test]
    fn test_truncates_toward_zero() {
        // (2.3 - 2.5) * 4 = -0.8: floor would give -1
        assert_eq!(linear_weight(2.7), 0);
        assert_eq!(linear_weight(2.3), 0);
        assert_eq!(linear_weight(1.2), -5);
    }

    #[test]
    fn test_near_boundary_uses_double_precision() {
        // (3.7499999 - 2.5) * 4 = 4.9999996; single precision would round up to 5
        assert_eq!(linear_weight(3.7499999), 4);
        assert_eq!(linear_weight(3.75), 5);
    }

    #[test]
    fn test_linear_weight_at_neutral_is_zero() {
        assert_eq!(linear_weight(2.5), 0);
        assert_ne!(linear_weight(2.5), compute_weight(Some(2.5)));
    }

    #[test]
    fn test_out_of_range_inputs_are_well_defined() {
        assert_eq!(linear_weight(10.0), 30);
        assert_eq!(linear_weight(-1.0), -14);
        assert_eq!(linear_weight(f64::NAN), 0);
        assert_eq!(linear_weight(f64::INFINITY), i32::MAX);
    }
}
