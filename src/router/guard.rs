//! Route guards backed by live store state.

use crate::core::{Guard, Selector};
use crate::slices::{select_auth, AuthState};
use crate::store::{Store, Subscription};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Consulted by the router before entering a protected route. A `false`
/// result cancels the navigation; it is not an error.
pub trait CanActivate: Send + Sync {
    fn can_activate(&self) -> bool;
}

/// A pure `Guard` evaluated on the latest value of a live selector
/// subscription.
///
/// Evaluation is a plain read of that value: no I/O and no re-subscribing.
/// Once disposed the guard denies.
pub struct LiveGuard<T: Send + Sync + 'static> {
    name: &'static str,
    latest: Arc<RwLock<Option<Arc<T>>>>,
    guard: Guard<T>,
    subscription: Subscription,
}

impl<T: Send + Sync + 'static> LiveGuard<T> {
    pub fn new<S, Env>(name: &'static str, store: &Store<Env>, selector: S, guard: Guard<T>) -> Self
    where
        S: Selector<Output = T> + 'static,
        Env: Clone + Send + Sync + 'static,
    {
        let latest = Arc::new(RwLock::new(None));
        let sink = Arc::clone(&latest);
        let subscription = store
            .select(selector)
            .subscribe(move |value: &Arc<T>| *sink.write() = Some(Arc::clone(value)));
        Self {
            name,
            latest,
            guard,
            subscription,
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Stop observing the store.
    pub fn dispose(&self) {
        self.subscription.unsubscribe();
    }
}

impl<T: Send + Sync + 'static> CanActivate for LiveGuard<T> {
    fn can_activate(&self) -> bool {
        if !self.subscription.is_active() {
            debug!(guard = self.name, "disposed guard denied activation");
            return false;
        }
        let allowed = self
            .latest
            .read()
            .as_ref()
            .is_some_and(|value| self.guard.check(value));
        if !allowed {
            debug!(guard = self.name, "activation denied");
        }
        allowed
    }
}

/// Allows entry only while the user is signed in.
pub fn auth_guard<Env: Clone + Send + Sync + 'static>(store: &Store<Env>) -> LiveGuard<AuthState> {
    LiveGuard::new(
        "auth",
        store,
        select_auth(),
        Guard::new(|auth: &AuthState| auth.is_authenticated),
    )
}
