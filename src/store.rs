//! Key-value persistence.
//!
//! Every collection lives under a fixed string key. `FileStore` keeps each
//! key in `<dir>/<key>.json` and writes through a temp file plus rename;
//! `MemoryStore` keeps values in a map and backs the unit tests.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Key holding the task collection.
pub const TASKS_KEY: &str = "projectVoltaTasks";
/// Key holding the literature collection.
pub const LITERATURE_KEY: &str = "project_volta_literature";

/// String-keyed store of serialized values.
pub trait KeyValueStore {
    /// Raw value for `key`, or `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Replace the value for `key` wholesale.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed store, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore { dir: dir.to_path_buf() })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Atomic-ish write via temp + rename.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &path)?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "store write");
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Outcome of reading a typed value from the store.
#[derive(Debug)]
pub enum Loaded<T> {
    Value(T),
    Missing,
    /// The key holds data that does not parse as `T`.
    Malformed(serde_json::Error),
}

/// Read and deserialize the value under `key`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Loaded<T>> {
    match store.get(key)? {
        None => Ok(Loaded::Missing),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(v) => Ok(Loaded::Value(v)),
            Err(e) => Ok(Loaded::Malformed(e)),
        },
    }
}

/// Serialize `value` and replace the entry under `key`.
pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    store.set(key, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        assert!(store.get(TASKS_KEY).unwrap().is_none());

        store.set(TASKS_KEY, "[1,2,3]").unwrap();
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[1,2,3]"));
        assert!(dir.path().join("projectVoltaTasks.json").exists());
        assert!(!dir.path().join("projectVoltaTasks.json.tmp").exists());

        store.set(TASKS_KEY, "[]").unwrap();
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_json_reports_malformed_values() {
        let mut store = MemoryStore::default();
        store.set("k", "{not json").unwrap();
        let loaded: Loaded<Vec<u64>> = load_json(&store, "k").unwrap();
        assert!(matches!(loaded, Loaded::Malformed(_)));

        save_json(&mut store, "k", &vec![4u64, 5]).unwrap();
        match load_json::<Vec<u64>>(&store, "k").unwrap() {
            Loaded::Value(v) => assert_eq!(v, vec![4, 5]),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(load_json::<Vec<u64>>(&store, "missing").unwrap(), Loaded::Missing));
    }
}
