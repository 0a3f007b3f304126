//! The user's saved cafes.
//!
//! Stored as one ordered JSON array; every operation reads the whole list,
//! modifies it and writes it back.

use sips_core::{JsonStore, StorageError, SAVED_CAFES_KEY};

use crate::cafe::{CafeId, SavedCafe};

/// Outcome of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Added,
    AlreadySaved,
}

#[derive(Debug, Clone)]
pub struct SavedList {
    store: JsonStore,
}

impl SavedList {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// All saved cafes in the order they were saved.
    ///
    /// # Errors
    /// Returns a storage error if the saved list cannot be read.
    pub fn list(&self) -> Result<Vec<SavedCafe>, StorageError> {
        Ok(self.store.read(SAVED_CAFES_KEY)?.unwrap_or_default())
    }

    pub fn contains(&self, id: CafeId) -> Result<bool, StorageError> {
        Ok(self.list()?.iter().any(|c| c.id == id))
    }

    /// Append `cafe` unless a cafe with the same id is already saved.
    ///
    /// # Errors
    /// Returns a storage error if the list cannot be read or written.
    pub fn save(&self, cafe: SavedCafe) -> Result<SaveOutcome, StorageError> {
        let mut saved = self.list()?;

        if saved.iter().any(|c| c.id == cafe.id) {
            tracing::debug!("Cafe {} already saved", cafe.id);
            return Ok(SaveOutcome::AlreadySaved);
        }

        tracing::info!("Saving cafe {} ({})", cafe.id, cafe.name);
        saved.push(cafe);
        self.store.write(SAVED_CAFES_KEY, &saved)?;
        Ok(SaveOutcome::Added)
    }

    /// Remove the cafe with `id`; returns whether anything was removed.
    ///
    /// # Errors
    /// Returns a storage error if the list cannot be read or written.
    pub fn delete(&self, id: CafeId) -> Result<bool, StorageError> {
        let saved = self.list()?;
        let before = saved.len();
        let remaining: Vec<SavedCafe> = saved.into_iter().filter(|c| c.id != id).collect();

        if remaining.len() == before {
            tracing::debug!("Cafe {} not in saved list", id);
            return Ok(false);
        }

        self.store.write(SAVED_CAFES_KEY, &remaining)?;
        tracing::info!("Deleted saved cafe {}", id);
        Ok(true)
    }
}
