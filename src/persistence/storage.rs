//! Prefixed local storage over a raw string key/value backend.

use crate::persistence::bridge::PersistenceBridge;
use crate::persistence::error::PersistenceError;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Prefix every application key is stored under.
pub const APP_PREFIX: &str = "ANMS-";

/// Raw string storage, the shape of a browser's `localStorage`.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
    /// Every stored key, in ascending order.
    fn keys(&self) -> Result<Vec<String>, PersistenceError>;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, PersistenceError> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

/// Backend kept as a single JSON object on disk.
///
/// Every operation reads the file and every write rewrites it whole. A
/// missing file reads as empty.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(error.into()),
        };
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
            key: self.path.display().to_string(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        let raw =
            serde_json::to_string_pretty(entries).map_err(|source| PersistenceError::Serialize {
                key: self.path.display().to_string(),
                source,
            })?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, PersistenceError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.into_keys().collect())
    }
}

/// JSON values stored under prefixed keys.
pub struct LocalStorage<B> {
    backend: B,
    prefix: String,
}

impl<B: KeyValueBackend> LocalStorage<B> {
    pub fn new(backend: B) -> Self {
        Self::with_prefix(backend, APP_PREFIX)
    }

    pub fn with_prefix(backend: B, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Rebuild a nested object from every prefixed key.
    ///
    /// `ANMS-EXAMPLES.STOCK-MARKET` lands at `examples.stockMarket`.
    /// Keys without the prefix are ignored.
    pub fn load_initial_state(&self) -> Result<Value, PersistenceError> {
        let mut root = Map::new();
        for storage_key in self.backend.keys()? {
            let Some(key) = storage_key.strip_prefix(&self.prefix) else {
                continue;
            };
            let Some(raw) = self.backend.get(&storage_key)? else {
                continue;
            };
            let value = serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
                key: key.to_string(),
                source,
            })?;
            insert_path(&mut root, &state_path(key), value);
        }
        Ok(Value::Object(root))
    }
}

impl<B: KeyValueBackend> PersistenceBridge for LocalStorage<B> {
    fn get_item(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        match self.backend.get(&self.prefixed(key))? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| PersistenceError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn set_item(&self, key: &str, value: Value) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(&value).map_err(|source| PersistenceError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(&self.prefixed(key), raw)
    }

    fn remove_item(&self, key: &str) -> Result<(), PersistenceError> {
        self.backend.remove(&self.prefixed(key))
    }
}

/// Storage key to state path: lowercase, split on `.`, camelCase each
/// dash-separated segment.
pub fn state_path(key: &str) -> Vec<String> {
    key.to_lowercase().split('.').map(camel_case).collect()
}

fn camel_case(segment: &str) -> String {
    segment
        .split('-')
        .enumerate()
        .map(|(index, token)| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) if index > 0 => first.to_uppercase().chain(chars).collect(),
                _ => token.to_string(),
            }
        })
        .collect()
}

fn insert_path(root: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = root;
    for key in parents {
        let entry = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}
