use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::errors::{InvoiceError, Result};

use super::DraftStore;

/// In-process store. Clones share the same entries, so a caller can keep
/// a handle after moving one into the controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| InvoiceError::Storage("memory store lock poisoned".into()))
    }
}

impl DraftStore for MemoryDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
