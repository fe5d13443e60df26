//! In-process storage backend

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::Storage;
use crate::error::StorageError;

/// Volatile key-value store.
///
/// Clones share the same records, so a test can keep a handle and inspect or
/// tamper with what the timer wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record, bypassing the trait
    pub fn get(&self, key: &str) -> Option<String> {
        self.records.lock().ok().and_then(|records| records.get(key).cloned())
    }

    /// Overwrite a raw record, bypassing the trait
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), value.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.insert(key, value);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
        Ok(())
    }
}
