//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value as JsonValue;

use super::KeyValueStore;
use crate::error::{EnhancerError, Result};

/// A `KeyValueStore` backed by a shared `HashMap`.
///
/// Clones share the same map, so a clone handed to a service and one kept by
/// a test observe the same state. Used in tests and for `--ephemeral` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, JsonValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` currently holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| EnhancerError::storage(format!("Failed to lock store: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &JsonValue) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| EnhancerError::storage(format!("Failed to lock store: {}", e)))?;
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| EnhancerError::storage(format!("Failed to lock store: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}
