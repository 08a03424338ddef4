//! The key/value contract effects write through.

use crate::persistence::error::PersistenceError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Durable storage for JSON values keyed by string.
///
/// Implementations are shared between the store's effects and whoever
/// hydrates the initial state, so they must be usable from any thread.
pub trait PersistenceBridge: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<Value>, PersistenceError>;

    fn set_item(&self, key: &str, value: Value) -> Result<(), PersistenceError>;

    fn remove_item(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Typed helpers over any bridge.
pub trait PersistenceExt {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError>;

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistenceError>;
}

impl<B: PersistenceBridge + ?Sized> PersistenceExt for B {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        match self.get_item(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| PersistenceError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(value).map_err(|source| PersistenceError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set_item(key, value)
    }
}
