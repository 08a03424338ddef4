//! Durable state: the storage bridge effects write through, initial-state
//! hydration, snapshot validation and checkpoints.

mod bridge;
mod checkpoint;
mod error;
mod hydrate;
mod storage;
mod validation;

pub use bridge::{PersistenceBridge, PersistenceExt};
pub use checkpoint::{Checkpoint, CHECKPOINT_VERSION};
pub use error::{CheckpointError, PersistenceError};
pub use storage::{state_path, FileBackend, KeyValueBackend, LocalStorage, MemoryBackend, APP_PREFIX};
pub use validation::{validate_snapshot, SnapshotIssue};
