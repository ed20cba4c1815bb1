use crate::application::errors::StorageError;

/// Byte-level sink/source for bucket snapshots
pub trait PersistenceGateway: Send + Sync {
    /// Replace the stored snapshot
    fn write(&self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read the stored snapshot, `None` if nothing has been saved yet
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError>;
}
