//! JSON file storage backend

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::Storage;
use crate::error::StorageError;

const APP_DIR: &str = "pomodoro-timer";
const FILE_NAME: &str = "snapshot.json";

/// Stores every record in a single JSON object file.
///
/// The file is re-read on each access so edits made by other processes are
/// picked up, and rewritten through a temporary file so a crash mid-write
/// never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<platform data dir>/pomodoro-timer/snapshot.json`, or the working
    /// directory when the platform has no data dir.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_records(&self, records: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(records)?;
        fs::write(&tmp, body).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_records()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.save_all(&[(key, value.to_string())])
    }

    fn save_all(&mut self, records: &[(&str, String)]) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every future save.
        let mut stored = self.read_records().unwrap_or_default();
        for (key, value) in records {
            stored.insert(key.to_string(), value.clone());
        }
        self.write_records(&stored)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStorage::new(dir.path().join("none.json"));
        assert_eq!(store.load("time").unwrap(), None);
    }

    #[test]
    fn save_creates_parent_dirs_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStorage::new(dir.path().join("nested/deeper/snapshot.json"));
        store.save("time", "1500").unwrap();
        store.save("state", r#"{"cycle":1,"phase":"work"}"#).unwrap();

        assert_eq!(store.load("time").unwrap().as_deref(), Some("1500"));
        assert_eq!(
            store.load("state").unwrap().as_deref(),
            Some(r#"{"cycle":1,"phase":"work"}"#)
        );
    }

    #[test]
    fn corrupt_file_is_an_error_on_load_and_replaced_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, "not json at all").unwrap();

        let mut store = JsonFileStorage::new(&path);
        assert!(matches!(store.load("time"), Err(StorageError::Json(_))));

        store.save("time", "60").unwrap();
        assert_eq!(store.load("time").unwrap().as_deref(), Some("60"));
    }

    #[test]
    fn save_all_writes_every_record_in_one_file_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let mut store = JsonFileStorage::new(&path);
        store.save("keep", "1").unwrap();

        store
            .save_all(&[("time", "90".to_string()), ("state", "{}".to_string())])
            .unwrap();

        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 3);
        assert_eq!(on_disk["time"], "90");
        assert_eq!(on_disk["state"], "{}");
        assert_eq!(on_disk["keep"], "1");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let mut store = JsonFileStorage::new(&path);
        store.save("time", "5").unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        store.clear().unwrap();
    }
}
