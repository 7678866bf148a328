use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{CartStorage, StorageError};

/// In-memory storage.
///
/// Intended for tests/dev. Clones share the same slots, so a test can keep a
/// handle and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one slot.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.write_slots().insert(key.into(), value.into());
        storage
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read_slots().get(key).cloned()
    }

    fn read_slots(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.slots.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slots(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.slots.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_slots().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write_slots().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_slots() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.save("k", "v").unwrap();
        assert_eq!(handle.load("k").unwrap().as_deref(), Some("v"));

        handle.remove("k").unwrap();
        assert_eq!(storage.load("k").unwrap(), None);
    }
}
