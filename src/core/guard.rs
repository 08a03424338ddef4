//! Guard predicates over selected state.
//!
//! Guards are pure boolean functions. The router layer pairs one with a live
//! selector subscription to decide whether a route may be entered.

use std::marker::PhantomData;

/// Pure predicate over a selected value.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Guard;
/// use statecraft::slices::AuthState;
///
/// let signed_in = Guard::new(|auth: &AuthState| auth.is_authenticated);
///
/// assert!(!signed_in.check(&AuthState::default()));
/// assert!(signed_in.check(&AuthState { is_authenticated: true }));
/// ```
pub struct Guard<T> {
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
    _phantom: PhantomData<fn(&T)>,
}

impl<T> Guard<T> {
    /// Create a guard from a pure, thread-safe predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Evaluate the predicate. No side effects.
    pub fn check(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}
