//! Reducer error types.

use thiserror::Error;

/// A reducer refused an action. This is a programming error: the dispatch
/// that carried the action is abandoned and the state is left as it was.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReducerError {
    #[error("Malformed '{tag}' action: {reason}")]
    MalformedAction { tag: &'static str, reason: String },

    #[error("The {slice} slice has no ids left to hand out")]
    IdsExhausted { slice: &'static str },
}
