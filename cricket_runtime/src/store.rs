//! Key-value persistence for match records.
//!
//! Values are JSON trees. `FileStore` keeps one sealed snapshot file per key
//! and fsyncs every write; `MemoryStore` is the in-process equivalent.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;
use crate::snapshot::{self, Snapshot};

/// Key of the match configuration record.
pub const MATCH_CONFIG_KEY: &str = "cricket_match_config";

/// Key of the innings state record.
pub const INNINGS_STATE_KEY: &str = "cricket_match_state";

/// A flat namespace of JSON records.
pub trait KeyValueStore {
    /// `None` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn save(&mut self, key: &str, value: &Value) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    fn clear(&mut self, key: &str) -> Result<(), StoreError>;
    fn contains(&self, key: &str) -> Result<bool, StoreError>;
}

/// Load and decode a typed record.
pub fn load_record<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.load(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Encode and save a typed record.
pub fn save_record<T, S>(store: &mut S, key: &str, record: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(record)?;
    store.save(key, &value)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.records.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.records.contains_key(key))
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One `<key>.json` snapshot file per record under a single directory.
///
/// Writes go to a temporary file which is synced and then renamed over the
/// old one, so a crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`. Keys are restricted to
    /// `[A-Za-z0-9_-]` so they cannot escape the store directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidRecord(format!("bad store key {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn read_snapshot(&self, key: &str) -> Result<Option<Snapshot>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let snap: Snapshot = serde_json::from_str(&content)?;
        if snap.key != key {
            return Err(StoreError::InvalidRecord(format!(
                "{} holds record {:?}, expected {:?}",
                path.display(),
                snap.key,
                key
            )));
        }
        Ok(Some(snap))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.read_snapshot(key)? {
            Some(snap) => Ok(Some(snapshot::open(&snap)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let snap = snapshot::seal(key, value)?;
        let content = serde_json::to_string(&snap)?;

        let tmp = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        debug!(key, hash = %snap.hash, bytes = content.len(), "record saved");
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.path_for(key)?.exists())
    }
}
