//! Effect registrations: which tags an effect reacts to and how it runs.

use crate::core::{Action, RootState};
use crate::effects::error::EffectError;
use crate::effects::env::StorageEnv;
use crate::persistence::PersistenceExt;
use serde::Serialize;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

/// Whether an effect may emit follow-up actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Side effects only. Anything it returns is dropped.
    Silent,
    /// May return actions that re-enter `dispatch` once the triggering
    /// action has finished.
    Dispatching,
}

/// Factory for the effect to run for one action.
/// Receives the triggering action and the state after it was reduced.
pub type EffectHandler<Env> =
    Arc<dyn Fn(&Action, &RootState) -> BoxedEffect<Vec<Action>, EffectError, Env> + Send + Sync>;

pub struct EffectRegistration<Env> {
    pub name: String,
    pub tags: Vec<String>,
    pub kind: EffectKind,
    pub handler: EffectHandler<Env>,
}

impl<Env> EffectRegistration<Env> {
    pub fn new<F>(name: impl Into<String>, tags: &[&str], kind: EffectKind, handler: F) -> Self
    where
        F: Fn(&Action, &RootState) -> BoxedEffect<Vec<Action>, EffectError, Env>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            kind,
            handler: Arc::new(handler),
        }
    }

    pub fn silent<F>(name: impl Into<String>, tags: &[&str], handler: F) -> Self
    where
        F: Fn(&Action, &RootState) -> BoxedEffect<Vec<Action>, EffectError, Env>
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, tags, EffectKind::Silent, handler)
    }

    pub fn dispatching<F>(name: impl Into<String>, tags: &[&str], handler: F) -> Self
    where
        F: Fn(&Action, &RootState) -> BoxedEffect<Vec<Action>, EffectError, Env>
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, tags, EffectKind::Dispatching, handler)
    }

    /// Check if this effect reacts to the tag (pure)
    pub fn matches(&self, tag: &str) -> bool {
        self.tags.iter().any(|own| own == tag)
    }
}

impl<Env> Clone for EffectRegistration<Env> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            tags: self.tags.clone(),
            kind: self.kind,
            handler: Arc::clone(&self.handler),
        }
    }
}

/// Effect that writes `value` under `key` and emits nothing.
pub fn persist<Env, T>(key: &'static str, value: T) -> BoxedEffect<Vec<Action>, EffectError, Env>
where
    Env: StorageEnv + Clone + Send + Sync + 'static,
    T: Serialize + Send + Sync + 'static,
{
    from_fn(move |env: &Env| -> Result<Vec<Action>, EffectError> {
        env.storage().save(key, &value)?;
        Ok(Vec::new())
    })
    .boxed()
}
