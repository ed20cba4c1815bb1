//! Snapshot of persistent buckets
//!
//! The on-disk form is one JSON object keyed by bucket id whose values are
//! that bucket's raw entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::application::errors::StorageError;
use crate::application::services::BucketRegistry;
use crate::domain::traits::PersistenceGateway;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub buckets: BTreeMap<String, Map<String, Value>>,
}

impl Snapshot {
    /// Capture every bucket flagged persistent
    pub fn capture(registry: &BucketRegistry) -> Result<Self, StorageError> {
        Ok(Self {
            buckets: registry.persistent_entries()?,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Outcome of [`restore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub buckets_restored: usize,
    pub entries_restored: usize,
    pub buckets_skipped: Vec<String>,
}

/// Write the persistent buckets through `gateway`
pub fn save(registry: &BucketRegistry, gateway: &dyn PersistenceGateway) -> Result<Snapshot, StorageError> {
    let snapshot = Snapshot::capture(registry)?;
    gateway.write(&snapshot.to_bytes()?)?;
    info!("Saved {} persistent bucket(s)", snapshot.buckets.len());
    Ok(snapshot)
}

/// Repopulate persistent buckets from the stored snapshot.
///
/// Restored entries replace in-memory entries under the same key. Buckets
/// that are unknown or not flagged persistent are skipped.
pub fn restore(registry: &BucketRegistry, gateway: &dyn PersistenceGateway) -> Result<RestoreReport, StorageError> {
    let Some(bytes) = gateway.read()? else {
        debug!("No snapshot to restore");
        return Ok(RestoreReport::default());
    };

    let snapshot = Snapshot::from_bytes(&bytes)?;
    let mut report = RestoreReport::default();

    for (bucket_id, entries) in snapshot.buckets {
        match registry.restore_entries(&bucket_id, entries)? {
            Some(count) => {
                report.buckets_restored += 1;
                report.entries_restored += count;
            }
            None => {
                warn!("Snapshot bucket {} is not a registered persistent bucket. (skipped)", bucket_id);
                report.buckets_skipped.push(bucket_id);
            }
        }
    }

    info!(
        "Restored {} entries into {} bucket(s)",
        report.entries_restored, report.buckets_restored
    );
    Ok(report)
}
