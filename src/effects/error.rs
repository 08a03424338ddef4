//! Effect error types.

use crate::persistence::PersistenceError;
use crate::router::NavigationError;
use thiserror::Error;

/// Errors an effect's side effect can fail with. These never roll back
/// state and never stop sibling effects.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Navigation failed: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Effect failed: {0}")]
    Failed(String),
}

/// What the supervising error handler receives.
#[derive(Debug)]
pub struct EffectFailure {
    /// Name of the registration that failed
    pub effect: String,
    /// Tag of the action that triggered it
    pub tag: String,
    pub error: EffectError,
}
