//! The imperative shell around the reducers.
//!
//! Effects react to dispatched actions after reduction. Handlers are pure
//! factories: given the action and the latest state they build a Stillwater
//! effect, and only running that effect against an environment touches
//! storage, navigation or the quote service.
//!
//! # Key Concepts
//!
//! - **Registrations**: name, the tags an effect listens to, and its kind
//! - **Runtime**: runs matching effects in registration order, isolating failures
//! - **Environment**: capability traits the store's `Env` must implement
//!
//! Following Stillwater 0.11.0 conventions, handlers return `BoxedEffect`
//! (one allocation per run) built with `pure()`, `fail()` and `from_fn()`.

mod auth;
mod books;
mod env;
mod error;
mod registration;
mod runtime;
mod settings;
mod stocks;
mod todos;

pub use auth::{auth_effects, ROOT_PATH};
pub use books::books_effects;
pub use env::{AppEnv, NavigationEnv, StockApiEnv, StorageEnv};
pub use error::{EffectError, EffectFailure};
pub use registration::{persist, EffectHandler, EffectKind, EffectRegistration};
pub use runtime::EffectsRuntime;
pub use settings::settings_effects;
pub use stocks::{stocks_effects, PersistedSymbol, StockApiError, StockMarketApi};
pub use todos::todos_effects;

/// Every built-in effect, in the order they run for a shared tag.
pub fn app_effects<Env>() -> Vec<EffectRegistration<Env>>
where
    Env: StorageEnv + NavigationEnv + StockApiEnv + Clone + Send + Sync + 'static,
{
    let mut effects = auth_effects();
    effects.extend(settings_effects());
    effects.extend(todos_effects());
    effects.extend(books_effects());
    effects.extend(stocks_effects());
    effects
}
