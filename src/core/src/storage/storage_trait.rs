//! Storage Trait
//!
//! This module defines the `ClientStore` trait, mirroring the storage library bundled for the
//! browser: every operation is scoped to a named instance, the application name forwarded by
//! `configureXLocalStore`.

use crate::error_handling::types::StorageError;
use serde_json::Value;

/// Instance name used by the client until the session is configured.
pub const DEFAULT_INSTANCE: &str = "xLocalStorage";

/// Namespaced key-value storage as seen by the client shim.
///
/// Keys in different instances never collide; `clear` only empties one instance.
pub trait ClientStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, instance: &str, key: &str) -> Result<Option<Value>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, instance: &str, key: &str, value: Value) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, instance: &str, key: &str) -> Result<(), StorageError>;

    /// Removes every key of `instance`, returning how many were dropped.
    fn clear(&self, instance: &str) -> Result<usize, StorageError>;

    /// Lists the keys of `instance` in lexical order.
    fn keys(&self, instance: &str) -> Result<Vec<String>, StorageError>;
}
