//! Statecraft: a reactive state engine
//!
//! Statecraft follows a "pure core, imperative shell" design. The state
//! tree, reducers and selectors are pure functions over immutable data,
//! while persistence, navigation and quote retrieval are isolated in
//! Stillwater effects run against an injected environment.
//!
//! # Core Concepts
//!
//! - **Store**: owns the single state tree and serializes every dispatch
//! - **Slices**: independently reduced sub-trees with closed action enums
//! - **Selectors**: memoized derivations keyed on slice identity
//! - **Effects**: tag-filtered side effects that may emit follow-up actions
//! - **Router**: guarded navigation plus title, analytics and animation sync
//!
//! # Example
//!
//! ```rust
//! use statecraft::router::{auth_guard, CanActivate};
//! use statecraft::slices::{select_is_authenticated, AuthAction};
//! use statecraft::store::Store;
//!
//! let store = Store::builder().environment(()).build().unwrap();
//! let guard = auth_guard(&store);
//! assert!(!guard.can_activate());
//!
//! store.dispatch(AuthAction::Login).unwrap();
//! assert!(guard.can_activate());
//! assert!(*store.select(select_is_authenticated()).current());
//! ```

pub mod config;
pub mod core;
pub mod effects;
pub mod persistence;
pub mod router;
pub mod slices;
pub mod store;
pub mod theme;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::core::{create_selector, Action, Guard, RootState, Selector};
pub use crate::effects::{app_effects, AppEnv, EffectRegistration};
pub use crate::store::{Store, StoreBuilder, Subscription};
