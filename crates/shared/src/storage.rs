use std::collections::HashMap;

use thiserror::Error;

use crate::models::Pin;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Storage(String),
    #[error("stored pins are corrupt: {0}")]
    Corrupt(String),
    #[error("failed to encode pins: {0}")]
    Encode(String),
}

/// String-keyed durable storage, e.g. the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a single raw entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serialize the whole collection as one JSON array.
pub fn encode_pins(pins: &[Pin]) -> Result<String, StoreError> {
    serde_json::to_string(pins).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Strict decoder: anything but a JSON array of pins is corrupt.
pub fn decode_pins(raw: &str) -> Result<Vec<Pin>, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}
