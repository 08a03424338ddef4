//! Builder for constructing stores.

use crate::core::RootState;
use crate::effects::{EffectFailure, EffectRegistration};
use crate::persistence::{validate_snapshot, Checkpoint, KeyValueBackend, LocalStorage};
use crate::slices::TodosState;
use crate::store::error::BuildError;
use crate::store::{EffectErrorHandler, Store};
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::debug;

/// Builder for constructing stores with a fluent API.
pub struct StoreBuilder<Env> {
    env: Option<Env>,
    initial: Option<RootState>,
    effects: Vec<EffectRegistration<Env>>,
    on_effect_error: Option<EffectErrorHandler>,
}

impl<Env: Clone + Send + Sync + 'static> StoreBuilder<Env> {
    pub fn new() -> Self {
        Self {
            env: None,
            initial: None,
            effects: Vec::new(),
            on_effect_error: None,
        }
    }

    /// Set the environment effects run against (required).
    pub fn environment(mut self, env: Env) -> Self {
        self.env = Some(env);
        self
    }

    /// Start from this tree instead of the slice defaults.
    pub fn initial_state(mut self, state: RootState) -> Self {
        self.initial = Some(state);
        self
    }

    /// Start from whatever was persisted under the storage's prefix.
    pub fn hydrate<B: KeyValueBackend>(
        mut self,
        storage: &LocalStorage<B>,
    ) -> Result<Self, BuildError> {
        let persisted = storage.load_initial_state()?;
        self.initial = Some(RootState::hydrate(&persisted)?);
        Ok(self)
    }

    /// Start from a checkpoint's tree.
    pub fn restore(mut self, checkpoint: Checkpoint) -> Self {
        debug!(checkpoint = %checkpoint.id, "restoring checkpoint");
        self.initial = Some(checkpoint.state);
        self
    }

    /// Restore from a JSON checkpoint.
    pub fn restore_json(self, json: &str) -> Result<Self, BuildError> {
        let checkpoint = Checkpoint::from_json(json)?;
        Ok(self.restore(checkpoint))
    }

    /// Add an effect. Effects run in the order they are added.
    pub fn effect(mut self, registration: EffectRegistration<Env>) -> Self {
        self.effects.push(registration);
        self
    }

    /// Add multiple effects at once.
    pub fn effects(mut self, registrations: Vec<EffectRegistration<Env>>) -> Self {
        self.effects.extend(registrations);
        self
    }

    /// Receive every isolated effect failure.
    pub fn on_effect_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&EffectFailure) + Send + Sync + 'static,
    {
        self.on_effect_error = Some(Arc::new(handler));
        self
    }

    /// Build the store.
    /// Returns an error if the environment is missing or the starting tree
    /// is inconsistent. A todo counter that lags behind the stored ids is
    /// raised, whichever way the tree was supplied.
    pub fn build(self) -> Result<Store<Env>, BuildError> {
        let env = self.env.ok_or(BuildError::MissingEnvironment)?;
        let mut initial = self.initial.unwrap_or_default();

        if let Validation::Failure(issues) = validate_snapshot(&initial) {
            return Err(BuildError::InvalidSnapshot(issues.iter().cloned().collect()));
        }

        if let Some(floor) = initial
            .todos
            .next_id_floor()
            .filter(|floor| *floor > initial.todos.next_id)
        {
            debug!(from = initial.todos.next_id, to = floor, "raising stale todo counter");
            initial.todos = Arc::new(TodosState {
                next_id: floor,
                ..TodosState::clone(&initial.todos)
            });
        }

        Ok(Store::from_parts(
            initial,
            env,
            self.effects,
            self.on_effect_error,
        ))
    }
}

impl<Env: Clone + Send + Sync + 'static> Default for StoreBuilder<Env> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryBackend, PersistenceBridge, SnapshotIssue};
    use crate::slices::{Todo, TodosAction};
    use serde_json::json;

    #[test]
    fn builder_requires_environment() {
        let result = StoreBuilder::<()>::new().build();
        assert!(matches!(result, Err(BuildError::MissingEnvironment)));
    }

    #[test]
    fn defaults_when_no_initial_state() {
        let store = StoreBuilder::new().environment(()).build().unwrap();
        assert_eq!(*store.snapshot(), RootState::default());
    }

    #[test]
    fn hydrates_from_local_storage() {
        let storage = LocalStorage::new(MemoryBackend::new());
        storage
            .set_item("AUTH", json!({"isAuthenticated": true}))
            .unwrap();
        storage
            .set_item(
                "EXAMPLES.TODOS",
                json!({"items": [{"id": 3, "name": "kept", "done": false}]}),
            )
            .unwrap();

        let store = StoreBuilder::new()
            .environment(())
            .hydrate(&storage)
            .unwrap()
            .build()
            .unwrap();

        let state = store.snapshot();
        assert!(state.auth.is_authenticated);
        assert_eq!(state.todos.items[0].name, "kept");
        assert_eq!(state.todos.next_id, 4);
    }

    #[test]
    fn corrupt_storage_fails_hydration() {
        let backend = MemoryBackend::new();
        backend.set("ANMS-AUTH", "{".into()).unwrap();
        let storage = LocalStorage::new(backend);

        let result = StoreBuilder::<()>::new().hydrate(&storage);
        assert!(matches!(result, Err(BuildError::Persistence(_))));
    }

    #[test]
    fn inconsistent_initial_state_is_rejected() {
        let todo = Todo {
            id: 1,
            name: "twin".into(),
            done: false,
        };
        let state = RootState {
            todos: Arc::new(TodosState {
                items: vec![todo.clone(), todo],
                ..TodosState::default()
            }),
            ..RootState::default()
        };

        let result = StoreBuilder::new().environment(()).initial_state(state).build();

        match result {
            Err(BuildError::InvalidSnapshot(issues)) => {
                assert_eq!(issues, vec![SnapshotIssue::DuplicateTodoId { id: 1 }]);
            }
            _ => panic!("Expected invalid snapshot"),
        }
    }

    fn single_todo_state(id: u64) -> RootState {
        RootState {
            todos: Arc::new(TodosState {
                items: vec![Todo {
                    id,
                    name: "stored".into(),
                    done: false,
                }],
                ..TodosState::default()
            }),
            ..RootState::default()
        }
    }

    #[test]
    fn stale_todo_counter_is_raised_for_initial_state() {
        let store = StoreBuilder::new()
            .environment(())
            .initial_state(single_todo_state(1))
            .build()
            .unwrap();

        store
            .dispatch(TodosAction::AddOne { name: "fresh".into() })
            .unwrap();

        let ids: Vec<u64> = store.snapshot().todos.items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn stale_todo_counter_is_raised_for_restored_checkpoint() {
        let checkpoint = Checkpoint::capture(&single_todo_state(5));

        let store = StoreBuilder::new()
            .environment(())
            .restore(checkpoint)
            .build()
            .unwrap();

        assert_eq!(store.snapshot().todos.next_id, 6);
    }

    #[test]
    fn exhausted_todo_id_is_rejected() {
        let result = StoreBuilder::new()
            .environment(())
            .initial_state(single_todo_state(u64::MAX))
            .build();

        match result {
            Err(BuildError::InvalidSnapshot(issues)) => {
                assert_eq!(issues, vec![SnapshotIssue::TodoIdExhausted { id: u64::MAX }]);
            }
            _ => panic!("Expected invalid snapshot"),
        }
    }

    #[test]
    fn restores_json_checkpoint() {
        let original = StoreBuilder::new().environment(()).build().unwrap();
        original
            .dispatch(crate::slices::AuthAction::Login)
            .unwrap();
        let json = original.checkpoint().to_json().unwrap();

        let restored = StoreBuilder::new()
            .environment(())
            .restore_json(&json)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(*restored.snapshot(), *original.snapshot());
    }

    #[test]
    fn bad_checkpoint_is_a_build_error() {
        let result = StoreBuilder::<()>::new().restore_json("{}");
        assert!(matches!(result, Err(BuildError::Checkpoint(_))));
    }
}
