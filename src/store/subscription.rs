//! Subscription handles and cancellation.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, checked synchronously before every delivery.
#[derive(Clone, Debug, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to a live listener, selector observer or effect registration.
///
/// Once `unsubscribe` returns, nothing more is delivered on its behalf.
/// Dropping the handle does not cancel it.
#[derive(Clone, Debug)]
pub struct Subscription {
    signal: CancelSignal,
}

impl Subscription {
    pub(crate) fn new(signal: CancelSignal) -> Self {
        Self { signal }
    }

    pub fn unsubscribe(&self) {
        self.signal.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.signal.is_cancelled()
    }
}

/// Owns the subscriptions of one UI scope and cancels them together.
#[derive(Debug, Default)]
pub struct SubscriptionScope {
    subscriptions: Mutex<Vec<Subscription>>,
    disposed: AtomicBool,
}

impl SubscriptionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a subscription. Adding to a disposed scope cancels it at once.
    pub fn add(&self, subscription: Subscription) {
        if self.disposed.load(Ordering::SeqCst) {
            subscription.unsubscribe();
            return;
        }
        self.subscriptions.lock().push(subscription);
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        for subscription in self.subscriptions.lock().drain(..) {
            subscription.unsubscribe();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
