//! The state tree and the slice contract.
//!
//! The tree is never mutated in place. Each dispatch builds a new tree that
//! shares every untouched slice `Arc` with the previous one, so consumers can
//! detect "no change" with `Arc::ptr_eq`.

use super::action::Action;
use super::error::ReducerError;
use crate::slices::{AuthState, BooksState, SettingsState, StocksState, TodosState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// An independently reduced sub-tree of the state.
///
/// # Required Traits
///
/// - `Clone`: reducers copy the slice before changing it
/// - `Serialize` + `DeserializeOwned`: slices are persisted as JSON snapshots
/// - `Default`: the initial value when nothing was persisted
pub trait Slice:
    Clone + PartialEq + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Slice name for display/logging.
    const NAME: &'static str;

    /// The closed set of actions this slice handles.
    type Action;

    /// Pick this slice's action out of the root action, if it owns it.
    fn project(action: &Action) -> Option<&Self::Action>;

    /// Pure transition. Return `Arc::clone(state)` when nothing changes.
    fn reduce(state: &Arc<Self>, action: &Self::Action) -> Result<Arc<Self>, ReducerError>;
}

/// Route a root action to one slice; actions it does not own pass through
/// with the same reference.
pub fn reduce_slice<S: Slice>(state: &Arc<S>, action: &Action) -> Result<Arc<S>, ReducerError> {
    match S::project(action) {
        Some(action) => S::reduce(state, action),
        None => Ok(Arc::clone(state)),
    }
}

/// The full state tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootState {
    pub auth: Arc<AuthState>,
    pub settings: Arc<SettingsState>,
    pub todos: Arc<TodosState>,
    pub stocks: Arc<StocksState>,
    pub books: Arc<BooksState>,
}

impl RootState {
    /// True when every slice is the very same allocation in both trees.
    pub fn shares_slices_with(&self, other: &RootState) -> bool {
        Arc::ptr_eq(&self.auth, &other.auth)
            && Arc::ptr_eq(&self.settings, &other.settings)
            && Arc::ptr_eq(&self.todos, &other.todos)
            && Arc::ptr_eq(&self.stocks, &other.stocks)
            && Arc::ptr_eq(&self.books, &other.books)
    }
}

/// The root reducer.
///
/// Builds the next tree from every slice reducer. If no slice changed the
/// input `Arc` is returned, and if any slice fails nothing is applied.
pub fn reduce(state: &Arc<RootState>, action: &Action) -> Result<Arc<RootState>, ReducerError> {
    let next = RootState {
        auth: reduce_slice(&state.auth, action)?,
        settings: reduce_slice(&state.settings, action)?,
        todos: reduce_slice(&state.todos, action)?,
        stocks: reduce_slice(&state.stocks, action)?,
        books: reduce_slice(&state.books, action)?,
    };

    if next.shares_slices_with(state) {
        Ok(Arc::clone(state))
    } else {
        Ok(Arc::new(next))
    }
}

/// Fold a sequence of actions over a starting tree.
pub fn replay<'a>(
    state: &Arc<RootState>,
    actions: impl IntoIterator<Item = &'a Action>,
) -> Result<Arc<RootState>, ReducerError> {
    actions
        .into_iter()
        .try_fold(Arc::clone(state), |state, action| reduce(&state, action))
}
