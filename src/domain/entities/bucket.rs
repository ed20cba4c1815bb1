use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::Command;

/// A value stored in a bucket
#[derive(Debug, Clone)]
pub enum Entry {
    /// Arbitrary plugin data
    Data(Value),
    /// A command living in the `command` bucket
    Command(Arc<Command>),
}

impl Entry {
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Entry::Data(v) => Some(v),
            Entry::Command(_) => None,
        }
    }

    pub fn as_command(&self) -> Option<&Arc<Command>> {
        match self {
            Entry::Command(c) => Some(c),
            Entry::Data(_) => None,
        }
    }

    /// JSON form written into persistence snapshots
    pub fn to_json(&self) -> Value {
        match self {
            Entry::Data(v) => v.clone(),
            Entry::Command(c) => c.descriptor(),
        }
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Data(value)
    }
}

impl From<Command> for Entry {
    fn from(command: Command) -> Self {
        Entry::Command(Arc::new(command))
    }
}

/// Entries of a single bucket
pub type BucketEntries = HashMap<String, Entry>;

/// Insertion hook. When present it fully owns insertion into the bucket.
pub type InsertHook = Arc<dyn Fn(&mut BucketEntries, String, Entry) + Send + Sync>;

/// A named key/value store, optionally persisted, optionally governed by an
/// insertion hook
///
/// The id, persistence flag and hook are fixed at creation.
#[derive(Clone)]
pub struct Bucket {
    id: String,
    should_persist: bool,
    pub(crate) entries: BucketEntries,
    on_insert: Option<InsertHook>,
}

impl Bucket {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            should_persist: false,
            entries: HashMap::new(),
            on_insert: None,
        }
    }

    pub fn persistent(mut self) -> Self {
        self.should_persist = true;
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.entries.insert(key.into(), entry.into());
        self
    }

    pub fn with_insert_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut BucketEntries, String, Entry) + Send + Sync + 'static,
    {
        self.on_insert = Some(Arc::new(hook));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn should_persist(&self) -> bool {
        self.should_persist
    }

    pub fn entries(&self) -> &BucketEntries {
        &self.entries
    }

    pub fn insert_hook(&self) -> Option<&InsertHook> {
        self.on_insert.as_ref()
    }
}

impl fmt::Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("id", &self.id)
            .field("should_persist", &self.should_persist)
            .field("entries", &self.entries.len())
            .field("has_hook", &self.on_insert.is_some())
            .finish()
    }
}
