//! Durable key-value memory shared across runs.
//!
//! The whole document is re-read and rewritten on every `save`. Writes go
//! through a temp file in the same directory and are renamed into place.

use crate::error::StateError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub type Document = Map<String, Value>;

enum ReadOutcome {
    Missing,
    Valid(Document),
    Corrupt(String),
}

#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current document; missing or corrupt documents read as empty
    pub fn load(&self) -> Document {
        match read_document(&self.path) {
            ReadOutcome::Valid(doc) => doc,
            ReadOutcome::Missing => Document::new(),
            ReadOutcome::Corrupt(reason) => {
                warn!("State file {:?} is corrupt ({}); reading as empty", self.path, reason);
                Document::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.load().remove(key)
    }

    /// Merge `key = value` into the document and rewrite it atomically
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StateError> {
        let value = serde_json::to_value(value)?;
        let _guard = self.lock.lock().map_err(|_| StateError::Poisoned)?;

        let mut doc = match read_document(&self.path) {
            ReadOutcome::Valid(doc) => doc,
            ReadOutcome::Missing => Document::new(),
            ReadOutcome::Corrupt(reason) => {
                let backup = self.corrupt_backup_path();
                warn!(
                    "State file {:?} is corrupt ({}); moving it to {:?} and starting fresh",
                    self.path, reason, backup
                );
                fs::copy(&self.path, &backup).map_err(|e| StateError::Write {
                    path: backup.clone(),
                    source: e,
                })?;
                Document::new()
            }
        };

        doc.insert(key.to_string(), value);
        self.write_atomic(&doc)?;
        debug!("Saved state key '{}' to {:?}", key, self.path);
        Ok(())
    }

    fn write_atomic(&self, doc: &Document) -> Result<(), StateError> {
        let write_err = |e: std::io::Error| StateError::Write {
            path: self.path.clone(),
            source: e,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(write_err)?;

        let json = serde_json::to_string_pretty(doc)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

fn read_document(path: &Path) -> ReadOutcome {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ReadOutcome::Missing,
        Err(e) => return ReadOutcome::Corrupt(e.to_string()),
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => ReadOutcome::Valid(map),
        Ok(_) => ReadOutcome::Corrupt("top-level value is not an object".to_string()),
        Err(e) => ReadOutcome::Corrupt(e.to_string()),
    }
}
