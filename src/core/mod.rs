//! Pure core of the state engine.
//!
//! - The root `Action` sum type and the `action_enum!` macro for slices
//! - The `Slice` contract, the `RootState` tree and the root reducer
//! - Memoized selectors
//! - Guard predicates
//!
//! Nothing in this module performs I/O.

mod action;
mod error;
mod guard;
mod macros;
mod selector;
mod state;

pub use action::Action;
pub use error::ReducerError;
pub use guard::Guard;
pub use selector::{create_selector, Memoized, Selector, SliceSelector};
pub use state::{reduce, reduce_slice, replay, RootState, Slice};
