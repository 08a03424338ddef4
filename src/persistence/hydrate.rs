//! Seeding the state tree from a previously persisted snapshot.

use crate::core::RootState;
use crate::persistence::error::PersistenceError;
use crate::slices::{AuthState, BooksState, SettingsState, StocksState, TodosState};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

impl RootState {
    /// Build a tree from the nested object `LocalStorage::load_initial_state`
    /// produces.
    ///
    /// Missing slices, or missing fields inside a slice, fall back to their
    /// defaults. A slice stored with the wrong shape is an error.
    pub fn hydrate(value: &Value) -> Result<Self, PersistenceError> {
        let examples = value.get("examples");
        let todos = read_slice::<TodosState>("todos", examples.and_then(|e| e.get("todos")))?
            .with_repaired_next_id()
            .ok_or_else(|| PersistenceError::Shape {
                slice: "todos",
                source: serde::de::Error::custom("a todo id leaves no room for another"),
            })?;
        Ok(Self {
            auth: Arc::new(read_slice::<AuthState>("auth", value.get("auth"))?),
            settings: Arc::new(read_slice::<SettingsState>("settings", value.get("settings"))?),
            todos: Arc::new(todos),
            stocks: Arc::new(read_slice::<StocksState>(
                "stocks",
                examples.and_then(|e| e.get("stocks")),
            )?),
            books: Arc::new(read_slice::<BooksState>(
                "books",
                examples.and_then(|e| e.get("books")),
            )?),
        })
    }
}

fn read_slice<T>(slice: &'static str, value: Option<&Value>) -> Result<T, PersistenceError>
where
    T: DeserializeOwned + Default,
{
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|source| PersistenceError::Shape { slice, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::{Todo, TodosFilter, DEFAULT_SYMBOL, DEFAULT_THEME};
    use serde_json::json;

    #[test]
    fn empty_object_hydrates_defaults() {
        let state = RootState::hydrate(&json!({})).unwrap();
        assert_eq!(state, RootState::default());
    }

    #[test]
    fn partial_slices_keep_remaining_defaults() {
        let state = RootState::hydrate(&json!({
            "auth": {"isAuthenticated": true},
            "settings": {"autoNightMode": true},
            "examples": {"stocks": {"symbol": "TSLA"}}
        }))
        .unwrap();

        assert!(state.auth.is_authenticated);
        assert!(state.settings.auto_night_mode);
        assert_eq!(state.settings.theme, DEFAULT_THEME);
        assert_eq!(state.stocks.symbol, "TSLA");
        assert!(!state.stocks.loading);
        assert_ne!(state.stocks.symbol, DEFAULT_SYMBOL);
    }

    #[test]
    fn todos_next_id_is_repaired() {
        let state = RootState::hydrate(&json!({
            "examples": {"todos": {
                "items": [{"id": 7, "name": "old", "done": true}],
                "filter": "DONE"
            }}
        }))
        .unwrap();

        assert_eq!(
            state.todos.items,
            vec![Todo {
                id: 7,
                name: "old".into(),
                done: true
            }]
        );
        assert_eq!(state.todos.filter, TodosFilter::Done);
        assert_eq!(state.todos.next_id, 8);
    }

    #[test]
    fn todo_id_without_successor_is_a_shape_error() {
        let error = RootState::hydrate(&json!({
            "examples": {"todos": {
                "items": [{"id": u64::MAX, "name": "last", "done": false}]
            }}
        }))
        .unwrap_err();

        assert!(matches!(error, PersistenceError::Shape { slice: "todos", .. }));
    }

    #[test]
    fn wrong_shape_names_the_slice() {
        let error = RootState::hydrate(&json!({"settings": {"theme": 42}})).unwrap_err();
        assert!(matches!(error, PersistenceError::Shape { slice: "settings", .. }));
    }
}
