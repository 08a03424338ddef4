//! Application configuration.

use crate::persistence::{KeyValueBackend, LocalStorage, APP_PREFIX};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_APP_NAME: &str = "Angular NgRx Material Starter";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("Configuration field '{field}' must not be empty")]
    Empty { field: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Suffix of every page title.
    pub app_name: String,
    /// Prefix of every persisted key.
    pub storage_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            storage_prefix: APP_PREFIX.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Storage over `backend` using the configured key prefix.
    pub fn local_storage<B: KeyValueBackend>(&self, backend: B) -> LocalStorage<B> {
        LocalStorage::with_prefix(backend, self.storage_prefix.clone())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::Empty { field: "appName" });
        }
        if self.storage_prefix.is_empty() {
            return Err(ConfigError::Empty {
                field: "storagePrefix",
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn fields_are_camel_case() {
        let config = AppConfig::from_json(r#"{"appName":"Demo","storagePrefix":"DEMO-"}"#).unwrap();
        assert_eq!(config.app_name, "Demo");
        assert_eq!(config.storage_prefix, "DEMO-");
    }

    #[test]
    fn local_storage_uses_configured_prefix() {
        let config = AppConfig::from_json(r#"{"storagePrefix":"DEMO-"}"#).unwrap();
        let storage = config.local_storage(crate::persistence::MemoryBackend::new());
        assert_eq!(storage.prefix(), "DEMO-");
    }

    #[test]
    fn empty_prefix_is_rejected() {
        assert!(matches!(
            AppConfig::from_json(r#"{"storagePrefix":""}"#),
            Err(ConfigError::Empty { field: "storagePrefix" })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(AppConfig::from_json("["), Err(ConfigError::Invalid(_))));
    }
}
