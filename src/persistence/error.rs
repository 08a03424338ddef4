//! Persistence and checkpoint error types.

use thiserror::Error;

/// Errors raised while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be parsed as JSON
    #[error("Stored value for {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("Could not serialize value for {key}: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },

    /// Valid JSON that does not fit the slice it was read into
    #[error("Persisted {slice} has an unexpected shape: {source}")]
    Shape {
        slice: &'static str,
        source: serde_json::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
