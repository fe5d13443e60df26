//! Durable key-value storage for timer snapshots
//!
//! The timer only needs three string records (`time`, `state`, `settings`),
//! so the backend contract is a minimal string store.

pub mod file;
pub mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// String key-value store the timer persists into
pub trait Storage {
    /// Read the raw record stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous record
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Store several records together. Backends that can should write them in
    /// one step so readers never see a mix of old and new records.
    fn save_all(&mut self, records: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in records {
            self.save(key, value)?;
        }
        Ok(())
    }

    /// Remove every record
    fn clear(&mut self) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn save_all(&mut self, records: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).save_all(records)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        (**self).clear()
    }
}
