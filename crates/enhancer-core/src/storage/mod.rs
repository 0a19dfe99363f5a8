//! Key-value storage port.
//!
//! History, the credential table and the current session are persisted as
//! JSON values under fixed keys (see [`keys`]). The trait decouples the
//! application layer from where those values live: a directory of JSON files
//! in the CLI, an in-memory map in tests.

pub mod keys;
mod memory;

pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// An abstract key-value store holding JSON values.
///
/// # Implementation Notes
///
/// - `get` on a missing key returns `Ok(None)`
/// - `remove` on a missing key succeeds
/// - A successful `set` must be visible to a later `get` through any handle
///   onto the same store
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &JsonValue) -> Result<()>;

    /// Removes `key` from the store.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads `key` and deserializes it into `T`.
///
/// # Returns
///
/// - `Ok(Some(T))`: Value present and well formed
/// - `Ok(None)`: Key absent
/// - `Err(_)`: Store failure or a value of the wrong shape
pub fn load_typed<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serializes `value` and stores it under `key`.
pub fn save_typed<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_value(value)?;
    store.set(key, &json)
}
