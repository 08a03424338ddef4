//! Versioned snapshots of the whole state tree.
//!
//! A checkpoint carries state only. Effects, listeners and the environment
//! are rebuilt by whoever restores it.

use crate::core::RootState;
use crate::persistence::error::CheckpointError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub state: RootState,
}

impl Checkpoint {
    pub fn capture(state: &RootState) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()
    }

    fn check_version(self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{reduce, Action};
    use crate::slices::{AuthAction, Book, BooksAction, StocksAction, TodosAction};
    use std::sync::Arc;

    fn busy_state() -> RootState {
        let actions: Vec<Action> = vec![
            AuthAction::Login.into(),
            TodosAction::AddOne { name: "ship".into() }.into(),
            BooksAction::AddOne {
                book: Book::new("Dune", "Herbert", ""),
            }
            .into(),
            StocksAction::RetrieveError {
                error: "offline".into(),
            }
            .into(),
        ];
        let state = actions
            .iter()
            .try_fold(Arc::new(RootState::default()), |state, action| {
                reduce(&state, action)
            })
            .unwrap();
        RootState::clone(&state)
    }

    #[test]
    fn json_round_trip_keeps_state() {
        let checkpoint = Checkpoint::capture(&busy_state());
        let restored = Checkpoint::from_json(&checkpoint.to_json().unwrap()).unwrap();
        assert_eq!(restored, checkpoint);
    }

    #[test]
    fn binary_round_trip_keeps_state() {
        let checkpoint = Checkpoint::capture(&busy_state());
        let restored = Checkpoint::from_binary(&checkpoint.to_binary().unwrap()).unwrap();
        assert_eq!(restored.state, checkpoint.state);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut checkpoint = Checkpoint::capture(&RootState::default());
        checkpoint.version = CHECKPOINT_VERSION + 1;
        let json = serde_json::to_string(&checkpoint).unwrap();

        let error = Checkpoint::from_json(&json).unwrap_err();
        assert!(matches!(
            error,
            CheckpointError::UnsupportedVersion { found: 2, supported: 1 }
        ));
    }

    #[test]
    fn garbage_fails_to_deserialize() {
        assert!(matches!(
            Checkpoint::from_json("{}"),
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn every_capture_gets_a_fresh_id() {
        let state = RootState::default();
        assert_ne!(Checkpoint::capture(&state).id, Checkpoint::capture(&state).id);
    }
}
