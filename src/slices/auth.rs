//! Authentication slice.

use crate::core::{create_selector, Action, Memoized, ReducerError, Slice, SliceSelector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the persisted auth snapshot.
pub const AUTH_KEY: &str = "AUTH";

crate::action_enum! {
    pub enum AuthAction {
        Login = "[Auth] Login",
        Logout = "[Auth] Logout",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
}

impl Slice for AuthState {
    const NAME: &'static str = "auth";
    type Action = AuthAction;

    fn project(action: &Action) -> Option<&AuthAction> {
        match action {
            Action::Auth(action) => Some(action),
            _ => None,
        }
    }

    fn reduce(state: &Arc<Self>, action: &AuthAction) -> Result<Arc<Self>, ReducerError> {
        let is_authenticated = matches!(action, AuthAction::Login);
        if state.is_authenticated == is_authenticated {
            return Ok(Arc::clone(state));
        }
        Ok(Arc::new(AuthState { is_authenticated }))
    }
}

pub fn select_auth() -> SliceSelector<AuthState> {
    SliceSelector::new(AuthState::NAME, |state| &state.auth)
}

pub fn select_is_authenticated() -> Memoized<SliceSelector<AuthState>, bool> {
    create_selector(select_auth(), |auth: &AuthState| auth.is_authenticated)
}
