//! Registry of named storage instances.

use crate::error::{Result, StorageError};
use crate::storage::Storage;
use crate::store::{StoreConfig, VectorStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Named storages. Each instance has its own lock; the catalog lock only
/// covers the name table.
#[derive(Default)]
pub struct StorageCatalog {
    storages: RwLock<HashMap<String, Arc<dyn Storage>>>,
}

impl StorageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list storage under `config.name`.
    pub fn create_list(&self, config: StoreConfig) -> Result<Arc<VectorStore>> {
        let mut storages = self.storages.write();
        if storages.contains_key(&config.name) {
            return Err(StorageError::StorageExists(config.name));
        }

        let name = config.name.clone();
        let store = Arc::new(VectorStore::new(config));
        storages.insert(name.clone(), Arc::clone(&store) as Arc<dyn Storage>);

        debug!(storage = %name, "storage created");
        Ok(store)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Storage>> {
        self.storages.read().get(name).cloned()
    }

    /// Drop a storage from the catalog. Outstanding handles stay usable.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.storages.write().remove(name).is_some();
        if removed {
            debug!(storage = %name, "storage removed");
        }
        removed
    }

    /// Storage names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.storages.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.storages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_create_and_get() {
        let catalog = StorageCatalog::new();
        let store = catalog.create_list(StoreConfig::named("queue")).unwrap();
        store.push_back(Value::Null, 1.into(), Value::Null).unwrap();

        let found = catalog.get("queue").unwrap();
        assert_eq!(found.record_count(), 1);
        assert_eq!(found.storage_type(), "vector");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_name() {
        let catalog = StorageCatalog::new();
        catalog.create_list(StoreConfig::named("a")).unwrap();
        assert!(matches!(
            catalog.create_list(StoreConfig::named("a")),
            Err(StorageError::StorageExists(name)) if name == "a"
        ));
    }

    #[test]
    fn test_remove_and_names() {
        let catalog = StorageCatalog::new();
        catalog.create_list(StoreConfig::named("b")).unwrap();
        catalog.create_list(StoreConfig::named("a")).unwrap();
        assert_eq!(catalog.names(), vec!["a".to_string(), "b".to_string()]);

        assert!(catalog.remove("a"));
        assert!(!catalog.remove("a"));
        assert_eq!(catalog.len(), 1);
    }
}
