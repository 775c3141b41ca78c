//! Persistence boundary for user taste aggregates.
//!
//! The taste model does not guard against concurrent writers. Every
//! repository therefore stores a version next to each aggregate and
//! rejects a save whose expected version is stale. Callers re-load and
//! re-apply on conflict; [`update_with_retry`] packages that loop.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use taste_model::{UserId, UserTaste};
use tracing::{debug, warn};

/// An aggregate paired with the number of times it has been saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    #[serde(rename = "taste")]
    pub value: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }
}

/// Storage for `UserTaste` aggregates with optimistic concurrency.
///
/// `Send + Sync` so one repository can be shared by request handlers.
pub trait TasteRepository: Send + Sync {
    /// Load a user's aggregate. Unknown users get a fresh aggregate at
    /// version 0.
    fn load(&self, user_id: UserId) -> Result<Versioned<UserTaste>>;

    /// Store `taste` if the stored version still equals `expected_version`.
    ///
    /// # Returns
    /// * `Ok(version)` - The new version
    /// * `Err(StoreError::VersionConflict)` - Someone else saved first
    fn save(&self, user_id: UserId, expected_version: u64, taste: UserTaste) -> Result<u64>;

    /// Store several aggregates at once, all or nothing.
    ///
    /// Every expected version is checked before anything is written; a
    /// user listed twice must carry the version the first entry produces.
    /// On any error no entry is stored.
    ///
    /// # Returns
    /// * `Ok(versions)` - New versions, in batch order
    fn save_all(&self, batch: Vec<PendingSave>) -> Result<Vec<u64>>;

    /// Ids of every stored user, ascending
    fn user_ids(&self) -> Result<Vec<UserId>>;
}

/// One entry of a batch save: user, expected version, new aggregate
pub type PendingSave = (UserId, u64, UserTaste);

/// Read-modify-write with retry on version conflicts.
///
/// `update` receives the freshly loaded aggregate on every attempt, so it
/// must be a pure function of its input. Other errors are returned
/// immediately; the last conflict is returned once `max_attempts` is used
/// up.
pub fn update_with_retry<R, F>(
    repo: &R,
    user_id: UserId,
    max_attempts: usize,
    update: F,
) -> Result<Versioned<UserTaste>>
where
    R: TasteRepository + ?Sized,
    F: Fn(UserTaste) -> UserTaste,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let current = repo.load(user_id)?;
        let updated = update(current.value);

        match repo.save(user_id, current.version, updated.clone()) {
            Ok(version) => {
                debug!(user_id, version, attempt, "saved taste aggregate");
                return Ok(Versioned::new(version, updated));
            }
            Err(StoreError::VersionConflict { .. }) if attempt < max_attempts => {
                warn!(user_id, attempt, "version conflict, retrying");
            }
            Err(err) => return Err(err),
        }
    }
}

/// Check `expected` against the stored version (0 when absent)
pub(crate) fn check_version(user_id: UserId, expected: u64, stored: Option<u64>) -> Result<()> {
    let actual = stored.unwrap_or(0);
    if actual != expected {
        return Err(StoreError::VersionConflict {
            user_id,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Check a whole batch against `stored` and return the new versions.
///
/// Later entries for the same user are checked against the version the
/// earlier entry produces.
pub(crate) fn check_batch<F>(batch: &[PendingSave], stored: F) -> Result<Vec<u64>>
where
    F: Fn(UserId) -> Option<u64>,
{
    let mut staged: HashMap<UserId, u64> = HashMap::new();
    let mut versions = Vec::with_capacity(batch.len());

    for (user_id, expected, _) in batch {
        let current = staged.get(user_id).copied().or_else(|| stored(*user_id));
        check_version(*user_id, *expected, current)?;
        staged.insert(*user_id, expected + 1);
        versions.push(expected + 1);
    }
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_version() {
        assert!(check_version(1, 0, None).is_ok());
        assert!(check_version(1, 3, Some(3)).is_ok());

        let err = check_version(1, 2, Some(3)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                user_id: 1,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_check_batch_chains_same_user() {
        let batch = vec![
            (1, 0, UserTaste::new(1)),
            (1, 1, UserTaste::new(1)),
            (2, 4, UserTaste::new(2)),
        ];
        let versions = check_batch(&batch, |id| (id == 2).then_some(4)).unwrap();
        assert_eq!(versions, vec![1, 2, 5]);
    }

    #[test]
    fn test_check_batch_rejects_repeated_version() {
        let batch = vec![(1, 0, UserTaste::new(1)), (1, 0, UserTaste::new(1))];
        let err = check_batch(&batch, |_| None).unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { expected: 0, actual: 1, .. }));
    }

    #[test]
    fn test_versioned_json_shape() {
        let doc = Versioned::new(2, UserTaste::new(5));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["version"], 2);
        assert_eq!(json["taste"]["user_id"], 5);
    }
}
