//! In-process repository.
//!
//! Backed by a `RwLock<HashMap>`; the version check and the write happen
//! under one write lock, so a save either wins or reports a conflict. A
//! batch is checked in full before any entry is inserted.

use crate::error::{Result, StoreError};
use crate::repository::{check_batch, PendingSave, TasteRepository, Versioned};
use std::collections::HashMap;
use std::sync::RwLock;
use taste_model::{UserId, UserTaste};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    entries: RwLock<HashMap<UserId, Versioned<UserTaste>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users stored
    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl TasteRepository for InMemoryRepository {
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

        for ((user_id, _, taste), version) in batch.into_iter().zip(&versions) {
            entries.insert(user_id, Versioned::new(*version, taste));
        }
        Ok(versions)
    }

    fn user_ids(&self) -> Result<Vec<UserId>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        let mut ids: Vec<UserId> = entries.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
