//! Todos effect: keep the stored list in step with the slice.

use crate::core::Action;
use crate::effects::env::StorageEnv;
use crate::effects::registration::{persist, EffectRegistration};
use crate::slices::{TodosAction, TODOS_KEY};

pub fn todos_effects<Env>() -> Vec<EffectRegistration<Env>>
where
    Env: StorageEnv + Clone + Send + Sync + 'static,
{
    vec![EffectRegistration::silent(
        "todos.persist",
        TodosAction::TAGS,
        |action, state| match action {
            // Explicit snapshot requested by the caller
            Action::Todos(TodosAction::Persist { todos }) => persist(TODOS_KEY, todos.clone()),
            _ => persist(TODOS_KEY, state.todos.clone()),
        },
    )]
}
