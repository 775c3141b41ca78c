//! File-backed repository.
//!
//! The whole state lives in one JSON document mapping user id to
//! `{"version": n, "taste": {...}}`. It is read once on open and rewritten
//! on every successful save (via a temporary file and rename). A missing
//! file is an empty store; missing parent directories are created on the
//! first write.

use crate::error::{Result, StoreError};
use crate::repository::{check_batch, PendingSave, TasteRepository, Versioned};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use taste_model::{UserId, UserTaste};
use tracing::{debug, info};

type StateDocument = BTreeMap<UserId, Versioned<UserTaste>>;

#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    entries: RwLock<StateDocument>,
}

impl JsonFileRepository {
    /// Open (or start) the state file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries: StateDocument = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), users = entries.len(), "opened taste state");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, entries: &StateDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), users = entries.len(), "wrote taste state");
        Ok(())
    }
}

impl TasteRepository for JsonFileRepository {
    fn load(&self, user_id: UserId) -> Result<Versioned<UserTaste>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Versioned::new(0, UserTaste::new(user_id))))
    }

    fn save(&self, user_id: UserId, expected_version: u64, taste: UserTaste) -> Result<u64> {
        let versions = self.save_all(vec![(user_id, expected_version, taste)])?;
        Ok(versions[0])
    }

    fn save_all(&self, batch: Vec<PendingSave>) -> Result<Vec<u64>> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let versions = check_batch(&batch, |id| entries.get(&id).map(|e| e.version))?;

        // First previous value per user, so a repeated user rolls back fully
        let mut previous: BTreeMap<UserId, Option<Versioned<UserTaste>>> = BTreeMap::new();
        for ((user_id, _, taste), version) in batch.into_iter().zip(&versions) {
            let replaced = entries.insert(user_id, Versioned::new(*version, taste));
            previous.entry(user_id).or_insert(replaced);
        }

        // Keep memory and disk in step when the write fails
        if let Err(err) = self.write_document(&entries) {
            for (user_id, replaced) in previous {
                match replaced {
                    Some(replaced) => entries.insert(user_id, replaced),
                    None => entries.remove(&user_id),
                };
            }
            return Err(err);
        }
        Ok(versions)
    }

    fn user_ids(&self) -> Result<Vec<UserId>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::open(dir.path().join("state.json")).unwrap();
        assert!(repo.user_ids().unwrap().is_empty());
        assert_eq!(repo.load(3).unwrap().version, 0);
    }

    #[test]
    fn test_save_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let taste = UserTaste::new(1)
            .rate(42, &["drama", "noir"], 1.0)
            .like(7, &["comedy"]);
        {
            let repo = JsonFileRepository::open(&path).unwrap();
            repo.save(1, 0, taste.clone()).unwrap();
        }

        let reopened = JsonFileRepository::open(&path).unwrap();
        let loaded = reopened.load(1).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.value, taste);
        assert_eq!(loaded.value.affinity.score("noir"), Some(-6));
    }

    #[test]
    fn test_stale_save_conflicts() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::open(dir.path().join("state.json")).unwrap();

        repo.save(1, 0, UserTaste::new(1)).unwrap();
        let err = repo.save(1, 0, UserTaste::new(1)).unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));
    }

    #[test]
    fn test_first_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("nested").join("state.json");

        let repo = JsonFileRepository::open(&path).unwrap();
        repo.save(1, 0, UserTaste::new(1).like(3, &["war"])).unwrap();

        assert!(path.is_file());
        let reopened = JsonFileRepository::open(&path).unwrap();
        assert!(reopened.load(1).unwrap().value.is_liked(3));
    }

    #[test]
    fn test_failed_write_rolls_back_whole_batch() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        // Parent path is a regular file, so every write fails
        let repo = JsonFileRepository::open(blocker.join("state.json")).unwrap();
        let err = repo
            .save_all(vec![
                (1, 0, UserTaste::new(1).like(5, &["drama"])),
                (1, 1, UserTaste::new(1).like(6, &["drama"])),
                (2, 0, UserTaste::new(2)),
            ])
            .unwrap_err();

        assert!(matches!(err, StoreError::Io(_)));
        assert!(repo.user_ids().unwrap().is_empty());
        assert_eq!(repo.load(1).unwrap().version, 0);
    }

    #[test]
    fn test_failed_write_restores_earlier_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let repo = JsonFileRepository::open(&path).unwrap();
        repo.save(1, 0, UserTaste::new(1).like(5, &["drama"])).unwrap();

        // A directory at the rename target makes the write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = repo.save(1, 1, UserTaste::new(1)).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        let stored = repo.load(1).unwrap();
        assert_eq!(stored.version, 1);
        assert!(stored.value.is_liked(5));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileRepository::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
