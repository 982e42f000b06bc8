//! In-memory snapshot store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Result, SnapshotStore, StoreError};

/// Snapshots kept in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bodies: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.bodies
            .lock()
            .map_err(|_| StoreError::Init("Memory store lock poisoned".into()))
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, deck_id: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(deck_id).cloned())
    }

    fn save(&self, deck_id: &str, body: &str) -> Result<()> {
        self.lock()?.insert(deck_id.to_string(), body.to_string());
        Ok(())
    }

    fn remove(&self, deck_id: &str) -> Result<bool> {
        Ok(self.lock()?.remove(deck_id).is_some())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.lock()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
