//! Todo list slice.
//!
//! `Persist` is a pass-through tag: the reducer ignores it and the todos
//! effect writes its payload to storage.

use crate::core::{create_selector, Action, Memoized, ReducerError, Slice, SliceSelector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the persisted todos snapshot.
pub const TODOS_KEY: &str = "EXAMPLES.TODOS";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodosFilter {
    #[default]
    All,
    Done,
    Pending,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub name: String,
    pub done: bool,
}

crate::action_enum! {
    pub enum TodosAction {
        AddOne { name: String } = "[Todos] Add",
        Toggle { id: u64 } = "[Todos] Toggle",
        RemoveDone = "[Todos] Remove Done",
        Filter { filter: TodosFilter } = "[Todos] Filter",
        Persist { todos: TodosState } = "[Todos] Persist",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TodosState {
    pub items: Vec<Todo>,
    pub filter: TodosFilter,
    /// Id handed to the next added todo. Never reused, even after removals.
    pub next_id: u64,
}

impl Default for TodosState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filter: TodosFilter::All,
            next_id: 1,
        }
    }
}

impl TodosState {
    /// Lowest `next_id` that cannot collide with a stored id. `None` when
    /// an item already holds `u64::MAX`.
    pub fn next_id_floor(&self) -> Option<u64> {
        self.items
            .iter()
            .try_fold(1u64, |floor, t| t.id.checked_add(1).map(|next| floor.max(next)))
    }

    /// Raise `next_id` above every stored id, e.g. after hydrating an older
    /// snapshot that predates the counter.
    pub fn with_repaired_next_id(mut self) -> Option<Self> {
        let floor = self.next_id_floor()?;
        self.next_id = self.next_id.max(floor);
        Some(self)
    }
}

impl Slice for TodosState {
    const NAME: &'static str = "todos";
    type Action = TodosAction;

    fn project(action: &Action) -> Option<&TodosAction> {
        match action {
            Action::Todos(action) => Some(action),
            _ => None,
        }
    }

    fn reduce(state: &Arc<Self>, action: &TodosAction) -> Result<Arc<Self>, ReducerError> {
        let next = match action {
            TodosAction::AddOne { name } => {
                let following = state
                    .next_id
                    .checked_add(1)
                    .ok_or(ReducerError::IdsExhausted { slice: Self::NAME })?;
                let mut next = TodosState::clone(state);
                next.items.push(Todo {
                    id: next.next_id,
                    name: name.clone(),
                    done: false,
                });
                next.next_id = following;
                next
            }
            TodosAction::Toggle { id } => {
                let Some(index) = state.items.iter().position(|t| t.id == *id) else {
                    return Ok(Arc::clone(state));
                };
                let mut next = TodosState::clone(state);
                next.items[index].done = !next.items[index].done;
                next
            }
            TodosAction::RemoveDone => TodosState {
                items: state.items.iter().filter(|t| !t.done).cloned().collect(),
                ..TodosState::clone(state)
            },
            TodosAction::Filter { filter } => TodosState {
                filter: *filter,
                ..TodosState::clone(state)
            },
            TodosAction::Persist { .. } => return Ok(Arc::clone(state)),
        };
        Ok(Arc::new(next))
    }
}

pub fn select_todos() -> SliceSelector<TodosState> {
    SliceSelector::new(TodosState::NAME, |state| &state.todos)
}

/// Items visible under the slice's current filter.
pub fn select_filtered_todos() -> Memoized<SliceSelector<TodosState>, Vec<Todo>> {
    create_selector(select_todos(), |todos: &TodosState| match todos.filter {
        TodosFilter::All => todos.items.clone(),
        TodosFilter::Done => todos.items.iter().filter(|t| t.done).cloned().collect(),
        TodosFilter::Pending => todos.items.iter().filter(|t| !t.done).cloned().collect(),
    })
}
