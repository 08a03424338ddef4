//! Selectors: pure, memoized derivations of the state tree.
//!
//! A slice selector hands back the slice `Arc` itself, so its output identity
//! changes exactly when the slice does. Derived selectors built with
//! [`create_selector`] cache their last output keyed on the identity of their
//! input and return the cached `Arc` until that input is replaced.

use super::state::RootState;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Selector: Send + Sync {
    type Output: Send + Sync + 'static;

    fn select(&self, state: &RootState) -> Arc<Self::Output>;
}

/// Reads one slice out of the tree.
pub struct SliceSelector<T> {
    name: &'static str,
    read: fn(&RootState) -> &Arc<T>,
}

impl<T> SliceSelector<T> {
    pub fn new(name: &'static str, read: fn(&RootState) -> &Arc<T>) -> Self {
        Self { name, read }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for SliceSelector<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            read: self.read,
        }
    }
}

impl<T: Send + Sync + 'static> Selector for SliceSelector<T> {
    type Output = T;

    fn select(&self, state: &RootState) -> Arc<T> {
        Arc::clone((self.read)(state))
    }
}

type Projector<I, T> = Box<dyn Fn(&I) -> T + Send + Sync>;

/// A derived selector with a single-entry memo cache.
pub struct Memoized<P: Selector, T> {
    input: P,
    projector: Projector<P::Output, T>,
    cache: Mutex<Option<(Arc<P::Output>, Arc<T>)>>,
    recomputations: AtomicUsize,
}

/// Compose a selector from an input selector and a pure projector.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{create_selector, RootState, Selector};
/// use statecraft::slices::select_todos;
/// use std::sync::Arc;
///
/// let count = create_selector(select_todos(), |todos| todos.items.len());
/// let state = RootState::default();
///
/// let first = count.select(&state);
/// let second = count.select(&state);
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(count.recomputations(), 1);
/// ```
pub fn create_selector<P, T, F>(input: P, projector: F) -> Memoized<P, T>
where
    P: Selector,
    T: Send + Sync + 'static,
    F: Fn(&P::Output) -> T + Send + Sync + 'static,
{
    Memoized {
        input,
        projector: Box::new(projector),
        cache: Mutex::new(None),
        recomputations: AtomicUsize::new(0),
    }
}

impl<P: Selector, T> Memoized<P, T> {
    /// How many times the projector has actually run.
    pub fn recomputations(&self) -> usize {
        self.recomputations.load(Ordering::Relaxed)
    }
}

impl<P, T> Selector for Memoized<P, T>
where
    P: Selector,
    T: Send + Sync + 'static,
{
    type Output = T;

    fn select(&self, state: &RootState) -> Arc<T> {
        let input = self.input.select(state);
        let mut cache = self.cache.lock();
        if let Some((last_input, last_output)) = cache.as_ref() {
            if Arc::ptr_eq(last_input, &input) {
                return Arc::clone(last_output);
            }
        }

        let output = Arc::new((self.projector)(&input));
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        *cache = Some((input, Arc::clone(&output)));
        output
    }
}

/// Sharing one selector keeps one memo cache across consumers.
impl<S: Selector + ?Sized> Selector for Arc<S> {
    type Output = S::Output;

    fn select(&self, state: &RootState) -> Arc<S::Output> {
        (**self).select(state)
    }
}
