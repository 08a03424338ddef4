//! The store: the single owner of the state tree.
//!
//! `dispatch` reduces an action, notifies listeners in subscription order
//! when the tree changed, then runs matching effects. Dispatches issued
//! while another dispatch is in progress (from a listener, or as an effect
//! follow-up) are queued and processed in order once the current action has
//! finished, so listeners never observe a nested dispatch.
//!
//! # Example
//!
//! ```rust
//! use statecraft::slices::{select_filtered_todos, TodosAction, TodosFilter};
//! use statecraft::store::Store;
//!
//! let store = Store::builder().environment(()).build().unwrap();
//! store.dispatch(TodosAction::AddOne { name: "Buy milk".into() }).unwrap();
//! store.dispatch(TodosAction::Toggle { id: 1 }).unwrap();
//! store.dispatch(TodosAction::Filter { filter: TodosFilter::Done }).unwrap();
//!
//! let done = store.select(select_filtered_todos()).current();
//! assert_eq!(done.len(), 1);
//! assert_eq!(done[0].name, "Buy milk");
//! ```

mod builder;
mod error;
mod subscription;

pub use builder::StoreBuilder;
pub use error::{BuildError, StoreError};
pub use subscription::{CancelSignal, Subscription, SubscriptionScope};

use crate::core::{reduce, Action, RootState, Selector};
use crate::effects::{EffectFailure, EffectRegistration, EffectsRuntime};
use crate::persistence::Checkpoint;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error};

/// Supervising channel for isolated effect failures.
pub type EffectErrorHandler = Arc<dyn Fn(&EffectFailure) + Send + Sync>;

type Callback = Box<dyn FnMut(&Arc<RootState>) + Send>;

struct Listener {
    signal: CancelSignal,
    callback: Mutex<Callback>,
}

impl Listener {
    fn deliver(&self, state: &Arc<RootState>) {
        let mut callback = self.callback.lock();
        // Checked right before the call, so a cancel issued earlier in the
        // same notification pass is honoured. A cancel from another thread
        // does not wait for a delivery that is already running.
        if self.signal.is_cancelled() {
            return;
        }
        (*callback)(state);
    }
}

#[derive(Default)]
struct DispatchQueue {
    pending: VecDeque<Action>,
    draining: bool,
}

/// Releases the queue if draining stops early. Pending actions are
/// discarded along with the failed one.
struct DrainGuard<'a> {
    queue: &'a Mutex<DispatchQueue>,
    finished: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut queue = self.queue.lock();
            queue.pending.clear();
            queue.draining = false;
        }
    }
}

pub struct Store<Env> {
    state: RwLock<Arc<RootState>>,
    listeners: Mutex<Vec<Arc<Listener>>>,
    effects: EffectsRuntime<Env>,
    env: Env,
    queue: Mutex<DispatchQueue>,
    on_effect_error: Option<EffectErrorHandler>,
}

impl<Env: Clone + Send + Sync + 'static> Store<Env> {
    pub fn builder() -> StoreBuilder<Env> {
        StoreBuilder::new()
    }

    pub(crate) fn from_parts(
        initial: RootState,
        env: Env,
        effects: Vec<EffectRegistration<Env>>,
        on_effect_error: Option<EffectErrorHandler>,
    ) -> Self {
        let runtime = EffectsRuntime::new();
        for effect in effects {
            runtime.register(effect);
        }
        Self {
            state: RwLock::new(Arc::new(initial)),
            listeners: Mutex::new(Vec::new()),
            effects: runtime,
            env,
            queue: Mutex::new(DispatchQueue::default()),
            on_effect_error,
        }
    }

    /// Reduce `action` and run its effects.
    ///
    /// Returns once the action and everything queued behind it have been
    /// processed, or immediately when called from inside another dispatch.
    /// On a reducer error the state is left as it was before the failing
    /// action and queued actions are dropped.
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), StoreError> {
        let action = action.into();
        if action.is_misrouted() {
            return Err(StoreError::MisroutedTag {
                tag: action.tag().to_string(),
            });
        }
        {
            let mut queue = self.queue.lock();
            queue.pending.push_back(action);
            if queue.draining {
                return Ok(());
            }
            queue.draining = true;
        }
        self.drain()
    }

    /// Dispatch an action given in its JSON wire form.
    pub fn dispatch_json(&self, json: &str) -> Result<(), StoreError> {
        let action = Action::from_json(json)?;
        self.dispatch(action)
    }

    /// Listen to the raw tree. The listener is called at once with the
    /// current tree, then after every dispatch that changes it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&Arc<RootState>) + Send + 'static,
    {
        let signal = CancelSignal::new();
        let listener = Arc::new(Listener {
            signal: signal.clone(),
            callback: Mutex::new(Box::new(listener)),
        });

        // Hold the queue so dispatches from the first delivery wait until
        // the listener is registered and can observe them.
        let owns_queue = self.begin_exclusive();
        listener.deliver(&self.snapshot());
        self.listeners.lock().push(listener);
        if owns_queue {
            if let Err(err) = self.drain() {
                error!(error = %err, "dispatch from a new subscriber failed");
            }
        }

        Subscription::new(signal)
    }

    /// Derived values of `selector`, delivered only when they change.
    pub fn select<S: Selector + 'static>(&self, selector: S) -> Selection<'_, S, Env> {
        Selection {
            store: self,
            selector: Arc::new(selector),
        }
    }

    /// The current tree, without subscribing.
    pub fn snapshot(&self) -> Arc<RootState> {
        Arc::clone(&self.state.read())
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::capture(&self.snapshot())
    }

    /// Add an effect after the existing ones.
    pub fn register_effect(&self, registration: EffectRegistration<Env>) -> Subscription {
        self.effects.register(registration)
    }

    pub fn environment(&self) -> &Env {
        &self.env
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|l| !l.signal.is_cancelled())
            .count()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    fn begin_exclusive(&self) -> bool {
        let mut queue = self.queue.lock();
        if queue.draining {
            return false;
        }
        queue.draining = true;
        true
    }

    fn drain(&self) -> Result<(), StoreError> {
        let mut guard = DrainGuard {
            queue: &self.queue,
            finished: false,
        };
        loop {
            let action = {
                let mut queue = self.queue.lock();
                match queue.pending.pop_front() {
                    Some(action) => action,
                    None => {
                        queue.draining = false;
                        guard.finished = true;
                        return Ok(());
                    }
                }
            };
            self.process(action)?;
        }
    }

    fn process(&self, action: Action) -> Result<(), StoreError> {
        let current = self.snapshot();
        let next = reduce(&current, &action).map_err(|source| StoreError::Reducer {
            tag: action.tag().to_string(),
            source,
        })?;

        let changed = !Arc::ptr_eq(&current, &next);
        debug!(tag = action.tag(), changed, "action dispatched");
        if changed {
            *self.state.write() = Arc::clone(&next);
            self.notify(&next);
        }

        let follow_ups = self
            .effects
            .run(&action, &next, &self.env, &|failure| self.report(failure));
        if !follow_ups.is_empty() {
            self.queue.lock().pending.extend(follow_ups);
        }
        Ok(())
    }

    fn notify(&self, state: &Arc<RootState>) {
        let listeners: Vec<Arc<Listener>> = {
            let mut listeners = self.listeners.lock();
            listeners.retain(|l| !l.signal.is_cancelled());
            listeners.clone()
        };
        for listener in listeners {
            listener.deliver(state);
        }
    }

    fn report(&self, failure: EffectFailure) {
        match &self.on_effect_error {
            Some(handler) => handler(&failure),
            None => error!(
                effect = %failure.effect,
                tag = %failure.tag,
                error = %failure.error,
                "unhandled effect failure"
            ),
        }
    }
}

/// A lazy, restartable stream of one selector's output.
///
/// Nothing runs until `subscribe`. Each subscription gets the current value
/// at once and then every new value, skipping outputs that are the same
/// allocation as the previous emission.
pub struct Selection<'a, S, Env> {
    store: &'a Store<Env>,
    selector: Arc<S>,
}

impl<S, Env> Selection<'_, S, Env>
where
    S: Selector + 'static,
    Env: Clone + Send + Sync + 'static,
{
    pub fn subscribe<F>(&self, mut observer: F) -> Subscription
    where
        F: FnMut(&Arc<S::Output>) + Send + 'static,
    {
        let selector = Arc::clone(&self.selector);
        let mut last: Option<Arc<S::Output>> = None;
        self.store.subscribe(move |state| {
            let value = selector.select(state);
            if last.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, &value)) {
                return;
            }
            observer(&value);
            last = Some(value);
        })
    }

    /// The selector's value for the current tree.
    pub fn current(&self) -> Arc<S::Output> {
        self.selector.select(&self.store.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::create_selector;
    use crate::effects::EffectError;
    use crate::slices::{
        select_auth, select_filtered_todos, select_settings, select_stocks, select_todos,
        AuthAction, BookChanges, BooksAction, Quote, SettingsAction, StocksAction, TodosAction,
        TodosFilter,
    };
    use stillwater::prelude::*;

    fn store() -> Store<()> {
        Store::builder().environment(()).build().unwrap()
    }

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn dispatch_replaces_tree_and_keeps_untouched_slices() {
        let store = store();
        let before = store.snapshot();

        store.dispatch(AuthAction::Login).unwrap();
        let after = store.snapshot();

        assert!(after.auth.is_authenticated);
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&before.todos, &after.todos));
        assert!(Arc::ptr_eq(&before.settings, &after.settings));
    }

    #[test]
    fn subscribers_get_current_tree_then_changes_in_order() {
        let store = store();
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);
        store.subscribe(move |state| first.lock().push(("first", state.auth.is_authenticated)));
        store.subscribe(move |state| second.lock().push(("second", state.auth.is_authenticated)));

        store.dispatch(AuthAction::Login).unwrap();

        assert_eq!(
            *order.lock(),
            vec![
                ("first", false),
                ("second", false),
                ("first", true),
                ("second", true)
            ]
        );
    }

    #[test]
    fn unchanged_tree_notifies_nobody() {
        let store = store();
        let (seen, sink) = recorder::<bool>();
        store.subscribe(move |state| sink(&state.auth.is_authenticated));

        store.dispatch(Action::other("[Nobody] Listens")).unwrap();
        store.dispatch(TodosAction::Toggle { id: 99 }).unwrap();

        assert_eq!(*seen.lock(), vec![false]);
    }

    #[test]
    fn unsubscribed_listener_receives_nothing_further() {
        let store = store();
        let (seen, sink) = recorder::<bool>();
        let subscription = store.subscribe(move |state| sink(&state.auth.is_authenticated));

        subscription.unsubscribe();
        store.dispatch(AuthAction::Login).unwrap();

        assert_eq!(*seen.lock(), vec![false]);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn listener_can_unsubscribe_a_later_listener_mid_notification() {
        let store = Arc::new(store());
        let (seen, sink) = recorder::<bool>();
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let handle = Arc::clone(&victim);

        store.subscribe(move |state| {
            if state.auth.is_authenticated {
                if let Some(subscription) = handle.lock().as_ref() {
                    subscription.unsubscribe();
                }
            }
        });
        *victim.lock() = Some(store.subscribe(move |state| sink(&state.auth.is_authenticated)));

        store.dispatch(AuthAction::Login).unwrap();

        assert_eq!(*seen.lock(), vec![false]);
    }

    #[test]
    fn cross_thread_unsubscribe_skips_only_later_deliveries() {
        let store = Arc::new(store());
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let subscription = store.subscribe(move |state| {
            *counter.lock() += 1;
            if state.auth.is_authenticated {
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            }
        });

        let worker = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.dispatch(AuthAction::Login))
        };
        entered_rx.recv().unwrap();
        subscription.unsubscribe();
        release_tx.send(()).unwrap();
        worker.join().unwrap().unwrap();

        store.dispatch(AuthAction::Logout).unwrap();
        assert_eq!(*calls.lock(), 2);
    }

    #[test]
    fn dispatch_from_subscriber_is_queued_not_nested() {
        let store = Arc::new(store());
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::clone(&store);
        let first_log = Arc::clone(&log);
        store.subscribe(move |state| {
            first_log.lock().push(format!("first:{}", state.todos.items.len()));
            if state.todos.items.len() == 1 {
                inner.dispatch(TodosAction::AddOne { name: "second".into() }).unwrap();
            }
        });
        let second_log = Arc::clone(&log);
        store.subscribe(move |state| {
            second_log.lock().push(format!("second:{}", state.todos.items.len()));
        });

        store.dispatch(TodosAction::AddOne { name: "first".into() }).unwrap();

        assert_eq!(
            *log.lock(),
            vec!["first:0", "second:0", "first:1", "second:1", "first:2", "second:2"]
        );
    }

    #[test]
    fn reducer_error_leaves_state_untouched() {
        let store = store();
        store.dispatch(TodosAction::AddOne { name: "keep".into() }).unwrap();
        let before = store.snapshot();

        let result = store.dispatch(BooksAction::UpdateOne {
            id: "missing".into(),
            changes: BookChanges {
                title: Some("t".into()),
                ..BookChanges::default()
            },
        });
        assert!(result.is_ok());

        let bad = crate::slices::Book {
            id: "  ".into(),
            ..crate::slices::Book::new("t", "a", "d")
        };
        let error = store.dispatch(BooksAction::AddOne { book: bad }).unwrap_err();

        assert!(matches!(error, StoreError::Reducer { ref tag, .. } if tag == "[Books] Add One"));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));

        // The queue is released after a failure.
        store.dispatch(AuthAction::Login).unwrap();
        assert!(store.snapshot().auth.is_authenticated);
    }

    #[test]
    fn select_skips_duplicate_outputs() {
        let store = store();
        let (seen, sink) = recorder::<TodosFilter>();
        store
            .select(select_todos())
            .subscribe(move |todos| sink(&todos.filter));

        store.dispatch(AuthAction::Login).unwrap();
        store.dispatch(TodosAction::Filter { filter: TodosFilter::Done }).unwrap();
        store.dispatch(SettingsAction::ChangeTheme { theme: "X".into() }).unwrap();

        assert_eq!(*seen.lock(), vec![TodosFilter::All, TodosFilter::Done]);
    }

    #[test]
    fn selection_is_restartable() {
        let store = store();
        let selection = store.select(select_auth());
        let (first, sink) = recorder::<bool>();
        let subscription = selection.subscribe(move |auth| sink(&auth.is_authenticated));
        subscription.unsubscribe();

        store.dispatch(AuthAction::Login).unwrap();

        let (second, sink) = recorder::<bool>();
        selection.subscribe(move |auth| sink(&auth.is_authenticated));

        assert_eq!(*first.lock(), vec![false]);
        assert_eq!(*second.lock(), vec![true]);
    }

    #[test]
    fn memoized_selection_recomputes_only_on_slice_change() {
        let store = store();
        let selector = Arc::new(select_filtered_todos());
        store.select(Arc::clone(&selector)).subscribe(|_| {});

        store.dispatch(AuthAction::Login).unwrap();
        store.dispatch(SettingsAction::ChangeTheme { theme: "X".into() }).unwrap();
        assert_eq!(selector.recomputations(), 1);

        store.dispatch(TodosAction::AddOne { name: "a".into() }).unwrap();
        assert_eq!(selector.recomputations(), 2);
    }

    #[test]
    fn todos_scenario_filters_done_items() {
        let store = store();
        store.dispatch(TodosAction::AddOne { name: "Buy milk".into() }).unwrap();
        let todos = store.select(select_todos()).current();
        assert_eq!(todos.items.len(), 1);
        assert!(!todos.items[0].done);
        assert_eq!(todos.filter, TodosFilter::All);

        store.dispatch(TodosAction::Toggle { id: todos.items[0].id }).unwrap();
        store.dispatch(TodosAction::Filter { filter: TodosFilter::Done }).unwrap();

        let done = store.select(select_filtered_todos()).current();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].name, "Buy milk");
        assert!(done[0].done);
    }

    #[test]
    fn effect_follow_ups_run_after_notifications() {
        let store = store();
        store.register_effect(EffectRegistration::dispatching(
            "stocks.fake",
            &["[Stock] Retrieve"],
            |_, _| {
                pure(vec![StocksAction::RetrieveSuccess {
                    quotes: vec![Quote {
                        time: "t".into(),
                        price: 1.0,
                    }],
                }
                .into()])
                .boxed()
            },
        ));
        let (seen, sink) = recorder::<(bool, usize)>();
        store
            .select(select_stocks())
            .subscribe(move |stocks| sink(&(stocks.loading, stocks.quotes.len())));

        store.dispatch(StocksAction::Retrieve { symbol: "AAPL".into() }).unwrap();

        assert_eq!(*seen.lock(), vec![(false, 0), (true, 0), (false, 1)]);
    }

    #[test]
    fn effect_sees_post_reduction_state() {
        let store = store();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        store.register_effect(EffectRegistration::silent(
            "settings.peek",
            SettingsAction::TAGS,
            move |_, state| {
                *sink.lock() = Some(state.settings.theme.clone());
                pure(Vec::new()).boxed()
            },
        ));

        store.dispatch(SettingsAction::ChangeTheme { theme: "NEW".into() }).unwrap();

        assert_eq!(seen.lock().as_deref(), Some("NEW"));
    }

    #[test]
    fn effect_failure_reaches_handler_and_state_stays() {
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        let store = Store::builder()
            .environment(())
            .effect(EffectRegistration::silent("broken", AuthAction::TAGS, |_, _| {
                fail(EffectError::Failed("nope".into())).boxed()
            }))
            .on_effect_error(move |failure| sink.lock().push(failure.tag.clone()))
            .build()
            .unwrap();

        store.dispatch(AuthAction::Login).unwrap();

        assert!(store.snapshot().auth.is_authenticated);
        assert_eq!(*failures.lock(), vec!["[Auth] Login"]);
    }

    #[test]
    fn cancelled_effect_stops_firing() {
        let store = store();
        let runs = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&runs);
        let subscription = store.register_effect(EffectRegistration::silent(
            "count",
            AuthAction::TAGS,
            move |_, _| {
                *counter.lock() += 1;
                pure(Vec::new()).boxed()
            },
        ));

        store.dispatch(AuthAction::Login).unwrap();
        subscription.unsubscribe();
        store.dispatch(AuthAction::Logout).unwrap();

        assert_eq!(*runs.lock(), 1);
        assert_eq!(store.effect_count(), 0);
    }

    #[test]
    fn dispatch_json_parses_wire_form() {
        let store = store();
        store
            .dispatch_json(r#"{"type":"[Settings] Change Theme","payload":{"theme":"BLACK-THEME"}}"#)
            .unwrap();
        assert_eq!(store.select(select_settings()).current().theme, "BLACK-THEME");

        assert!(matches!(
            store.dispatch_json("not json"),
            Err(StoreError::MalformedAction(_))
        ));
    }

    #[test]
    fn derived_selector_shared_through_arc() {
        let store = store();
        let count = Arc::new(create_selector(select_todos(), |todos| todos.items.len()));
        store.dispatch(TodosAction::AddOne { name: "a".into() }).unwrap();

        let a = store.select(Arc::clone(&count)).current();
        let b = store.select(Arc::clone(&count)).current();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, 1);
    }

    #[test]
    fn checkpoint_captures_current_tree() {
        let store = store();
        store.dispatch(AuthAction::Login).unwrap();
        let checkpoint = store.checkpoint();
        assert_eq!(checkpoint.state, *store.snapshot());
    }

    #[test]
    fn untyped_action_with_slice_tag_is_refused() {
        let store = store();
        let runs = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&runs);
        store.register_effect(EffectRegistration::silent(
            "auth.count",
            AuthAction::TAGS,
            move |_, _| {
                *counter.lock() += 1;
                pure(Vec::new()).boxed()
            },
        ));
        let before = store.snapshot();

        let result = store.dispatch(Action::other("[Auth] Login"));

        assert!(matches!(
            result,
            Err(StoreError::MisroutedTag { ref tag }) if tag == "[Auth] Login"
        ));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(*runs.lock(), 0);

        store.dispatch(Action::other("[App] Init")).unwrap();
        store.dispatch(AuthAction::Login).unwrap();
        assert_eq!(*runs.lock(), 1);
    }
}
