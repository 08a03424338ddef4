use crate::effects::env::StorageEnv;
use crate::effects::registration::{persist, EffectRegistration};
use crate::slices::{BooksAction, BOOKS_KEY};

pub fn books_effects<Env>() -> Vec<EffectRegistration<Env>>
where
    Env: StorageEnv + Clone + Send + Sync + 'static,
{
    vec![EffectRegistration::silent(
        "books.persist",
        BooksAction::TAGS,
        |_, state| persist(BOOKS_KEY, state.books.clone()),
    )]
}
