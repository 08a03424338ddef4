//! Auth effects: persist the session flag, leave protected pages on logout.

use crate::core::Action;
use crate::effects::env::{NavigationEnv, StorageEnv};
use crate::effects::error::EffectError;
use crate::effects::registration::EffectRegistration;
use crate::persistence::PersistenceExt;
use crate::slices::{AuthAction, AuthState, AUTH_KEY};
use stillwater::prelude::*;

/// Path the logout effect navigates to.
pub const ROOT_PATH: &str = "";

pub fn auth_effects<Env>() -> Vec<EffectRegistration<Env>>
where
    Env: StorageEnv + NavigationEnv + Clone + Send + Sync + 'static,
{
    vec![
        EffectRegistration::silent("auth.login", &[AuthAction::Login.tag()], |_, _| {
            from_fn(|env: &Env| -> Result<Vec<Action>, EffectError> {
                env.storage().save(
                    AUTH_KEY,
                    &AuthState {
                        is_authenticated: true,
                    },
                )?;
                Ok(Vec::new())
            })
            .boxed()
        }),
        EffectRegistration::silent("auth.logout", &[AuthAction::Logout.tag()], |_, _| {
            from_fn(|env: &Env| -> Result<Vec<Action>, EffectError> {
                // Both steps always run; a failure in one never skips the other.
                let saved = env.storage().save(
                    AUTH_KEY,
                    &AuthState {
                        is_authenticated: false,
                    },
                );
                let navigated = env.navigator().navigate(ROOT_PATH);
                saved?;
                navigated?;
                Ok(Vec::new())
            })
            .boxed()
        }),
    ]
}
