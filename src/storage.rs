//! Durable plant storage
//!
//! Stores hold the whole collection as one JSON array; every save is a full
//! snapshot that replaces the previous content.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;
use crate::plant::PlantRecord;

/// Load/save contract used by the registry
pub trait PlantStore: Send + Sync {
    /// Read every record; any failure is reported, the registry decides the fallback
    fn load(&self) -> Result<Vec<PlantRecord>, StorageError>;

    /// Overwrite the stored snapshot with `records`
    fn save(&self, records: &[PlantRecord]) -> Result<(), StorageError>;
}

/// Pretty-printed JSON file (2-space indent)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlantStore for JsonFileStore {
    fn load(&self) -> Result<Vec<PlantRecord>, StorageError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, records: &[PlantRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory JSON blob, used by tests and ephemeral servers
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from arbitrary (possibly malformed) content
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// Current stored JSON, if anything was written
    pub fn blob(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock still holds the last complete snapshot
        self.blob.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlantStore for MemoryStore {
    fn load(&self) -> Result<Vec<PlantRecord>, StorageError> {
        match self.lock().as_deref() {
            Some(blob) => Ok(serde_json::from_str(blob)?),
            None => Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no plant snapshot stored",
            ))),
        }
    }

    fn save(&self, records: &[PlantRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(records)?;
        *self.lock() = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> PlantRecord {
        PlantRecord {
            id: Some(format!("{}-id", name)),
            owner_id: None,
            name: name.to_string(),
            lat: 1.0,
            lon: 2.0,
            is_user_planted: true,
            photo_url: None,
            address: Some("Somewhere".to_string()),
            landmarks: vec!["Main St".to_string()],
        }
    }

    #[test]
    fn test_memory_store_snapshot_replaces_content() {
        let store = MemoryStore::new();
        assert!(store.load().is_err());

        store.save(&[record("a"), record("b")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);

        store.save(&[record("c")]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![record("c")]);
    }

    #[test]
    fn test_memory_store_malformed_blob() {
        let store = MemoryStore::with_blob("{not json");
        assert!(matches!(store.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_json_file_store_roundtrip_and_indent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested").join("plants.json"));

        assert!(matches!(store.load(), Err(StorageError::Io(_))));

        store.save(&[record("a")]).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert_eq!(store.load().unwrap(), vec![record("a")]);
    }
}
