//! Bucket registry - owns every bucket and mediates all reads and writes

use std::collections::{BTreeMap, HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::application::errors::RegistryError;
use crate::domain::entities::{Bucket, Entry};

/// Options for [`BucketRegistry::add_entry`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    /// Fail with `UnknownBucket` instead of skipping when the bucket is missing
    pub fail_if_missing: bool,
}

impl AddOptions {
    pub fn strict() -> Self {
        Self { fail_if_missing: true }
    }
}

/// Registry of buckets keyed by unique id
///
/// Buckets are never removed once created. All access goes through one
/// lock; insertion hooks run while it is held and must not call back into
/// the registry. A panicking hook is contained and leaves the lock usable.
#[derive(Default)]
pub struct BucketRegistry {
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl BucketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Bucket>>, RegistryError> {
        self.buckets.read().map_err(|_| RegistryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Bucket>>, RegistryError> {
        self.buckets.write().map_err(|_| RegistryError::LockPoisoned)
    }

    /// Register a bucket
    pub fn create(&self, bucket: Bucket) -> Result<(), RegistryError> {
        let mut buckets = self.write()?;
        if buckets.contains_key(bucket.id()) {
            return Err(RegistryError::DuplicateBucket(bucket.id().to_string()));
        }
        buckets.insert(bucket.id().to_string(), bucket);
        Ok(())
    }

    /// Register a batch of buckets, either all of them or none
    pub fn create_all(&self, batch: Vec<Bucket>) -> Result<(), RegistryError> {
        let mut buckets = self.write()?;
        Self::check_available(&buckets, batch.iter().map(|b| b.id()))?;
        for bucket in batch {
            buckets.insert(bucket.id().to_string(), bucket);
        }
        Ok(())
    }

    /// None of `ids` may be taken, and they must be unique among themselves
    fn check_available<'a>(
        buckets: &HashMap<String, Bucket>,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        for id in ids {
            if buckets.contains_key(id) || !seen.insert(id) {
                return Err(RegistryError::DuplicateBucket(id.to_string()));
            }
        }
        Ok(())
    }

    /// Generic insertion path used for commands and plugin data alike
    ///
    /// A bucket with an insertion hook delegates entirely to it. Otherwise an
    /// existing key is never overwritten.
    pub fn add_entry(
        &self,
        bucket_id: &str,
        key: impl Into<String>,
        entry: impl Into<Entry>,
        options: AddOptions,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        let mut buckets = self.write()?;

        let Some(bucket) = buckets.get_mut(bucket_id) else {
            if options.fail_if_missing {
                return Err(RegistryError::UnknownBucket(bucket_id.to_string()));
            }
            warn!("Could not add data to {}, does not exist. (skipped)", bucket_id);
            return Ok(());
        };

        if let Some(hook) = bucket.insert_hook().cloned() {
            let entries = &mut bucket.entries;
            let entry = entry.into();
            if catch_unwind(AssertUnwindSafe(|| hook(entries, key, entry))).is_err() {
                error!("Insertion hook of {} panicked. (skipped)", bucket_id);
            }
        } else if bucket.entries.contains_key(&key) {
            warn!("Could not add data({}) to {}, duplicate key. (skipped)", key, bucket_id);
        } else {
            bucket.entries.insert(key, entry.into());
        }
        Ok(())
    }

    /// Overwrite (or insert) a data entry, bypassing the insertion hook
    pub fn upsert(&self, bucket_id: &str, key: impl Into<String>, value: Value) -> Result<(), RegistryError> {
        let mut buckets = self.write()?;
        let bucket = buckets
            .get_mut(bucket_id)
            .ok_or_else(|| RegistryError::UnknownBucket(bucket_id.to_string()))?;
        bucket.entries.insert(key.into(), Entry::Data(value));
        Ok(())
    }

    pub fn remove(&self, bucket_id: &str, key: &str) -> Result<Option<Entry>, RegistryError> {
        let mut buckets = self.write()?;
        let bucket = buckets
            .get_mut(bucket_id)
            .ok_or_else(|| RegistryError::UnknownBucket(bucket_id.to_string()))?;
        Ok(bucket.entries.remove(key))
    }

    /// Look up an entry. `None` if either the bucket or the key is missing.
    pub fn get(&self, bucket_id: &str, key: &str) -> Result<Option<Entry>, RegistryError> {
        let buckets = self.read()?;
        Ok(buckets.get(bucket_id).and_then(|b| b.entries.get(key)).cloned())
    }

    /// Sorted keys of a bucket
    pub fn keys(&self, bucket_id: &str) -> Result<Vec<String>, RegistryError> {
        let buckets = self.read()?;
        let bucket = buckets
            .get(bucket_id)
            .ok_or_else(|| RegistryError::UnknownBucket(bucket_id.to_string()))?;
        let mut keys: Vec<String> = bucket.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    pub fn contains_bucket(&self, bucket_id: &str) -> bool {
        self.read().map(|b| b.contains_key(bucket_id)).unwrap_or(false)
    }

    pub fn is_persistent(&self, bucket_id: &str) -> bool {
        self.read()
            .ok()
            .and_then(|b| b.get(bucket_id).map(|bucket| bucket.should_persist()))
            .unwrap_or(false)
    }

    pub fn bucket_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .read()
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Raw entries of every bucket flagged persistent
    pub fn persistent_entries(&self) -> Result<BTreeMap<String, Map<String, Value>>, RegistryError> {
        let buckets = self.read()?;
        Ok(buckets
            .values()
            .filter(|b| b.should_persist())
            .map(|b| {
                let entries: Map<String, Value> = b
                    .entries()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                (b.id().to_string(), entries)
            })
            .collect())
    }

    /// Write restored entries into a persistent bucket, replacing existing keys.
    ///
    /// Returns the number of entries written, or `None` when the bucket is
    /// unknown or not persistent.
    pub fn restore_entries(&self, bucket_id: &str, entries: Map<String, Value>) -> Result<Option<usize>, RegistryError> {
        let mut buckets = self.write()?;
        match buckets.get_mut(bucket_id) {
            Some(bucket) if bucket.should_persist() => {
                let count = entries.len();
                for (key, value) in entries {
                    bucket.entries.insert(key, Entry::Data(value));
                }
                Ok(Some(count))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_rejects_duplicate_id() {
        let registry = BucketRegistry::new();
        registry.create(Bucket::new("settings")).unwrap();

        let err = registry.create(Bucket::new("settings")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateBucket("settings".to_string()));
    }

    #[test]
    fn test_create_all_is_all_or_nothing() {
        let registry = BucketRegistry::new();
        registry.create(Bucket::new("b")).unwrap();

        let err = registry
            .create_all(vec![Bucket::new("a"), Bucket::new("b")])
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateBucket("b".to_string()));
        assert!(!registry.contains_bucket("a"));
    }

    #[test]
    fn test_create_all_rejects_duplicates_within_batch() {
        let registry = BucketRegistry::new();
        let err = registry
            .create_all(vec![Bucket::new("x"), Bucket::new("x")])
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateBucket("x".to_string()));
        assert!(registry.bucket_ids().is_empty());
    }

    #[test]
    fn test_add_entry_to_unknown_bucket() {
        let registry = BucketRegistry::new();

        registry
            .add_entry("missing", "k", json!(1), AddOptions::default())
            .unwrap();
        assert!(registry.bucket_ids().is_empty());

        let err = registry
            .add_entry("missing", "k", json!(1), AddOptions::strict())
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownBucket("missing".to_string()));
    }

    #[test]
    fn test_add_entry_never_overwrites() {
        let registry = BucketRegistry::new();
        registry.create(Bucket::new("data")).unwrap();

        registry.add_entry("data", "k", json!("first"), AddOptions::default()).unwrap();
        registry.add_entry("data", "k", json!("second"), AddOptions::default()).unwrap();

        let entry = registry.get("data", "k").unwrap().unwrap();
        assert_eq!(entry.as_data(), Some(&json!("first")));
    }

    #[test]
    fn test_hook_owns_insertion() {
        let registry = BucketRegistry::new();
        registry
            .create(Bucket::new("upper").with_insert_hook(|entries, key, entry| {
                entries.insert(key.to_uppercase(), entry);
            }))
            .unwrap();

        registry.add_entry("upper", "k", json!(1), AddOptions::default()).unwrap();
        registry.add_entry("upper", "k", json!(2), AddOptions::default()).unwrap();

        assert!(registry.get("upper", "k").unwrap().is_none());
        let entry = registry.get("upper", "K").unwrap().unwrap();
        assert_eq!(entry.as_data(), Some(&json!(2)));
    }

    #[test]
    fn test_panicking_hook_keeps_registry_usable() {
        let registry = BucketRegistry::new();
        registry
            .create(Bucket::new("fragile").with_insert_hook(|_, key, _| {
                panic!("hook rejected {}", key);
            }))
            .unwrap();
        registry.create(Bucket::new("data")).unwrap();

        registry.add_entry("fragile", "k", json!(1), AddOptions::default()).unwrap();

        assert!(registry.get("fragile", "k").unwrap().is_none());
        registry.add_entry("data", "k", json!(2), AddOptions::default()).unwrap();
        assert_eq!(registry.get("data", "k").unwrap().unwrap().as_data(), Some(&json!(2)));
    }

    #[test]
    fn test_upsert_overwrites_and_requires_bucket() {
        let registry = BucketRegistry::new();
        registry.create(Bucket::new("data").with_entry("k", json!(1))).unwrap();

        registry.upsert("data", "k", json!(2)).unwrap();
        assert_eq!(registry.get("data", "k").unwrap().unwrap().as_data(), Some(&json!(2)));

        assert!(registry.upsert("nope", "k", json!(0)).is_err());
    }

    #[test]
    fn test_persistent_entries_only_include_flagged_buckets() {
        let registry = BucketRegistry::new();
        registry.create(Bucket::new("A").persistent().with_entry("x", json!(1))).unwrap();
        registry.create(Bucket::new("B").with_entry("y", json!(2))).unwrap();

        let persisted = registry.persistent_entries().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted["A"]["x"], json!(1));
    }

    #[test]
    fn test_restore_entries_skips_non_persistent() {
        let registry = BucketRegistry::new();
        registry.create(Bucket::new("A").persistent().with_entry("x", json!(1))).unwrap();
        registry.create(Bucket::new("B")).unwrap();

        let mut entries = Map::new();
        entries.insert("x".to_string(), json!(10));

        assert_eq!(registry.restore_entries("A", entries.clone()).unwrap(), Some(1));
        assert_eq!(registry.restore_entries("B", entries.clone()).unwrap(), None);
        assert_eq!(registry.restore_entries("C", entries).unwrap(), None);
        assert_eq!(registry.get("A", "x").unwrap().unwrap().as_data(), Some(&json!(10)));
        assert!(registry.get("B", "x").unwrap().is_none());
    }
}
