//! Environment capabilities effects run against.
//!
//! Effects never hold collaborators themselves. They describe work over an
//! environment, and the store supplies the environment it was built with, so
//! tests swap in recording fakes without touching effect code.

use crate::effects::stocks::StockMarketApi;
use crate::persistence::PersistenceBridge;
use crate::router::Navigator;
use std::sync::Arc;

pub trait StorageEnv {
    fn storage(&self) -> &dyn PersistenceBridge;
}

pub trait NavigationEnv {
    fn navigator(&self) -> &dyn Navigator;
}

pub trait StockApiEnv {
    fn stock_api(&self) -> &dyn StockMarketApi;
}

/// The production environment: one shared handle per collaborator.
#[derive(Clone)]
pub struct AppEnv {
    storage: Arc<dyn PersistenceBridge>,
    navigator: Arc<dyn Navigator>,
    stock_api: Arc<dyn StockMarketApi>,
}

impl AppEnv {
    pub fn new(
        storage: Arc<dyn PersistenceBridge>,
        navigator: Arc<dyn Navigator>,
        stock_api: Arc<dyn StockMarketApi>,
    ) -> Self {
        Self {
            storage,
            navigator,
            stock_api,
        }
    }
}

impl StorageEnv for AppEnv {
    fn storage(&self) -> &dyn PersistenceBridge {
        self.storage.as_ref()
    }
}

impl NavigationEnv for AppEnv {
    fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }
}

impl StockApiEnv for AppEnv {
    fn stock_api(&self) -> &dyn StockMarketApi {
        self.stock_api.as_ref()
    }
}
