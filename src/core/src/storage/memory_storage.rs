use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use log::debug;
use serde_json::Value;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::ClientStore;

/// In-memory [`ClientStore`], one map per instance.
///
/// An optional quota caps the number of entries across all instances, the way a browser caps
/// the size of its local storage.
#[derive(Default)]
pub struct MemoryClientStore {
    instances: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    quota: Option<usize>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    fn entry_count(instances: &HashMap<String, BTreeMap<String, Value>>) -> usize {
        instances.values().map(BTreeMap::len).sum()
    }
}

impl ClientStore for MemoryClientStore {
    fn get(&self, instance: &str, key: &str) -> Result<Option<Value>, StorageError> {
        let instances = self.instances.lock().map_err(|_| StorageError::ReadFailed)?;
        Ok(instances.get(instance).and_then(|m| m.get(key)).cloned())
    }

    fn set(&self, instance: &str, key: &str, value: Value) -> Result<(), StorageError> {
        let mut instances = self.instances.lock().map_err(|_| StorageError::WriteFailed)?;
        let is_new = instances
            .get(instance)
            .map_or(true, |m| !m.contains_key(key));
        if let Some(quota) = self.quota {
            if is_new && Self::entry_count(&instances) >= quota {
                return Err(StorageError::QuotaExceeded(quota));
            }
        }
        debug!("set {}/{}", instance, key);
        instances
            .entry(instance.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, instance: &str, key: &str) -> Result<(), StorageError> {
        let mut instances = self.instances.lock().map_err(|_| StorageError::WriteFailed)?;
        if let Some(map) = instances.get_mut(instance) {
            map.remove(key);
        }
        Ok(())
    }

    fn clear(&self, instance: &str) -> Result<usize, StorageError> {
        let mut instances = self.instances.lock().map_err(|_| StorageError::WriteFailed)?;
        let removed = instances.remove(instance).map_or(0, |m| m.len());
        debug!("cleared {} key(s) from {}", removed, instance);
        Ok(removed)
    }

    fn keys(&self, instance: &str) -> Result<Vec<String>, StorageError> {
        let instances = self.instances.lock().map_err(|_| StorageError::ReadFailed)?;
        Ok(instances
            .get(instance)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instances_are_isolated() {
        let store = MemoryClientStore::new();
        store.set("app1", "x", json!("hello")).unwrap();
        store.set("app2", "x", json!("bye")).unwrap();

        assert_eq!(store.get("app1", "x").unwrap(), Some(json!("hello")));
        assert_eq!(store.get("app2", "x").unwrap(), Some(json!("bye")));
        assert_eq!(store.get("app3", "x").unwrap(), None);

        assert_eq!(store.clear("app1").unwrap(), 1);
        assert_eq!(store.get("app1", "x").unwrap(), None);
        assert_eq!(store.get("app2", "x").unwrap(), Some(json!("bye")));
    }

    #[test]
    fn test_clear_leaves_nested_app_names_alone() {
        let store = MemoryClientStore::new();
        store.set("a", "x", json!(1)).unwrap();
        store.set("a/b", "x", json!(2)).unwrap();

        assert_eq!(store.clear("a").unwrap(), 1);
        assert_eq!(store.get("a/b", "x").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let store = MemoryClientStore::new();
        store.remove("app", "missing").unwrap();
        store.set("app", "a", json!(1)).unwrap();
        store.set("app", "b", json!(2)).unwrap();
        store.remove("app", "a").unwrap();
        assert_eq!(store.keys("app").unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_quota_counts_new_entries_only() {
        let store = MemoryClientStore::with_quota(1);
        store.set("app", "a", json!(1)).unwrap();
        store.set("app", "a", json!(2)).unwrap();
        assert_eq!(
            store.set("app", "b", json!(3)),
            Err(StorageError::QuotaExceeded(1))
        );
        assert_eq!(store.get("app", "a").unwrap(), Some(json!(2)));
    }
}
