//! Snapshot storage implementations

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::traits::PersistenceGateway;

/// JSON snapshot file on the local filesystem
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

impl PersistenceGateway for JsonFileStore {
    fn write(&self, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // Atomic replace via rename
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral bots
#[derive(Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes)),
        }
    }
}

impl PersistenceGateway for MemoryStore {
    fn write(&self, bytes: &[u8]) -> Result<(), StorageError> {
        *self.bytes.lock().unwrap_or_else(|p| p.into_inner()) = Some(bytes.to_vec());
        Ok(())
    }

    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.bytes.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("plugbot-store-{}", uuid::Uuid::new_v4()));
        let store = JsonFileStore::new(dir.join("nested").join("buckets.json"));

        assert!(store.read().unwrap().is_none());
        store.write(b"{\"a\":{}}").unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"{\"a\":{}}".to_vec());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        assert!(store.read().unwrap().is_none());
        store.write(b"1").unwrap();
        store.write(b"2").unwrap();
        assert_eq!(store.read().unwrap(), Some(b"2".to_vec()));
    }
}
