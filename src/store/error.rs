//! Store and builder error types.

use crate::core::ReducerError;
use crate::persistence::{CheckpointError, PersistenceError, SnapshotIssue};
use thiserror::Error;

/// Errors returned from `dispatch`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A reducer refused the action. The state was left untouched.
    #[error("Reducer rejected '{tag}': {source}")]
    Reducer {
        tag: String,
        #[source]
        source: ReducerError,
    },

    /// An `Action::Other` carrying a tag that a slice owns.
    #[error("Tag '{tag}' belongs to a slice and cannot be dispatched as an untyped action")]
    MisroutedTag { tag: String },

    #[error("Action could not be parsed: {0}")]
    MalformedAction(#[from] serde_json::Error),
}

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Environment not specified. Call .environment(env) before .build()")]
    MissingEnvironment,

    #[error("Persisted state could not be read: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Checkpoint rejected: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("Initial state failed validation with {} issue(s)", .0.len())]
    InvalidSnapshot(Vec<SnapshotIssue>),
}
