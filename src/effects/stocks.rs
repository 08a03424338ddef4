//! Stock quote retrieval: the one effect that feeds actions back into the
//! store.

use crate::core::Action;
use crate::effects::env::{StockApiEnv, StorageEnv};
use crate::effects::error::EffectError;
use crate::effects::registration::EffectRegistration;
use crate::persistence::PersistenceExt;
use crate::slices::{Quote, StocksAction, STOCKS_KEY};
use serde::{Deserialize, Serialize};
use stillwater::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StockApiError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Quote service unavailable: {0}")]
    Unavailable(String),
}

/// Source of stock quotes.
pub trait StockMarketApi: Send + Sync {
    fn retrieve_stock(&self, symbol: &str) -> Result<Vec<Quote>, StockApiError>;
}

/// What the stocks effect remembers between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSymbol {
    pub symbol: String,
}

pub fn stocks_effects<Env>() -> Vec<EffectRegistration<Env>>
where
    Env: StorageEnv + StockApiEnv + Clone + Send + Sync + 'static,
{
    vec![EffectRegistration::dispatching(
        "stocks.retrieve",
        &[StocksAction::Retrieve {
            symbol: String::new(),
        }
        .tag()],
        |action, _| {
            let symbol = match action {
                Action::Stocks(StocksAction::Retrieve { symbol }) => symbol.clone(),
                _ => return pure(Vec::new()).boxed(),
            };
            from_fn(move |env: &Env| -> Result<Vec<Action>, EffectError> {
                env.storage().save(
                    STOCKS_KEY,
                    &PersistedSymbol {
                        symbol: symbol.clone(),
                    },
                )?;
                let follow_up = match env.stock_api().retrieve_stock(&symbol) {
                    Ok(quotes) => StocksAction::RetrieveSuccess { quotes },
                    Err(error) => StocksAction::RetrieveError {
                        error: error.to_string(),
                    },
                };
                Ok(vec![follow_up.into()])
            })
            .boxed()
        },
    )]
}
