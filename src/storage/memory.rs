use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::traits::KeyValueStore;
use crate::utils::StorageError;

/// In-process store for ephemeral sessions and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("user").await.unwrap(), None);

        store.set("user", "{}").await.unwrap();
        store.set("user", "{\"id\":\"u1\"}").await.unwrap();
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("{\"id\":\"u1\"}"));
        assert_eq!(store.len(), 1);

        store.remove("user").await.unwrap();
        store.remove("user").await.unwrap();
        assert!(store.is_empty());
    }
}
