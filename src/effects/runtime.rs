//! Runs registered effects for each dispatched action.

use crate::core::{Action, RootState};
use crate::effects::error::EffectFailure;
use crate::effects::registration::{EffectKind, EffectRegistration};
use crate::store::{CancelSignal, Subscription};
use parking_lot::RwLock;
use std::sync::Arc;
use stillwater::effect::Effect;
use tracing::{debug, warn};

struct Registered<Env> {
    registration: EffectRegistration<Env>,
    signal: CancelSignal,
}

/// Secondary subscriber to the action stream.
///
/// Effects see the post-reduction state read-only and can only influence
/// the store by returning follow-up actions.
pub struct EffectsRuntime<Env> {
    registered: RwLock<Vec<Arc<Registered<Env>>>>,
}

impl<Env: Clone + Send + Sync + 'static> EffectsRuntime<Env> {
    pub fn new() -> Self {
        Self {
            registered: RwLock::new(Vec::new()),
        }
    }

    /// Add an effect after every existing one. The returned handle tears it
    /// down.
    pub fn register(&self, registration: EffectRegistration<Env>) -> Subscription {
        let signal = CancelSignal::new();
        debug!(effect = %registration.name, tags = ?registration.tags, "effect registered");
        self.registered.write().push(Arc::new(Registered {
            registration,
            signal: signal.clone(),
        }));
        Subscription::new(signal)
    }

    pub fn len(&self) -> usize {
        self.registered
            .read()
            .iter()
            .filter(|r| !r.signal.is_cancelled())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every live effect matching the action's tag, in registration
    /// order, and collect the follow-up actions of dispatching effects.
    ///
    /// A failing effect is reported through `on_failure` and the rest still
    /// run.
    pub fn run(
        &self,
        action: &Action,
        state: &RootState,
        env: &Env,
        on_failure: &dyn Fn(EffectFailure),
    ) -> Vec<Action> {
        if action.is_misrouted() {
            warn!(tag = action.tag(), "untyped action carries a slice tag, effects skipped");
            return Vec::new();
        }

        let registered: Vec<Arc<Registered<Env>>> = {
            let mut registered = self.registered.write();
            registered.retain(|r| !r.signal.is_cancelled());
            registered.clone()
        };

        let tag = action.tag();
        let mut follow_ups = Vec::new();
        for entry in registered {
            let registration = &entry.registration;
            if entry.signal.is_cancelled() || !registration.matches(tag) {
                continue;
            }

            let effect = (registration.handler)(action, state);
            match pollster::block_on(effect.run(env)) {
                Ok(actions) => match registration.kind {
                    EffectKind::Dispatching => {
                        for follow_up in actions {
                            if follow_up.is_misrouted() {
                                warn!(
                                    effect = %registration.name,
                                    tag = follow_up.tag(),
                                    "dropped follow-up carrying a slice tag"
                                );
                            } else {
                                follow_ups.push(follow_up);
                            }
                        }
                    }
                    EffectKind::Silent if !actions.is_empty() => {
                        warn!(
                            effect = %registration.name,
                            dropped = actions.len(),
                            "silent effect returned actions"
                        );
                    }
                    EffectKind::Silent => {}
                },
                Err(error) => {
                    warn!(effect = %registration.name, tag, %error, "effect failed");
                    on_failure(EffectFailure {
                        effect: registration.name.clone(),
                        tag: tag.to_string(),
                        error,
                    });
                }
            }
        }
        follow_ups
    }
}

impl<Env: Clone + Send + Sync + 'static> Default for EffectsRuntime<Env> {
    fn default() -> Self {
        Self::new()
    }
}
