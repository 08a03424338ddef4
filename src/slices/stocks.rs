//! Stock quote slice.

use crate::core::{Action, ReducerError, Slice, SliceSelector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the last requested symbol.
pub const STOCKS_KEY: &str = "EXAMPLES.STOCKS";

pub const DEFAULT_SYMBOL: &str = "GOOGL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub time: String,
    pub price: f64,
}

crate::action_enum! {
    pub enum StocksAction {
        Retrieve { symbol: String } = "[Stock] Retrieve",
        RetrieveSuccess { quotes: Vec<Quote> } = "[Stock] Retrieve Success",
        RetrieveError { error: String } = "[Stock] Retrieve Error",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StocksState {
    pub symbol: String,
    pub loading: bool,
    pub quotes: Vec<Quote>,
    pub error: Option<String>,
}

impl Default for StocksState {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            loading: false,
            quotes: Vec::new(),
            error: None,
        }
    }
}

impl Slice for StocksState {
    const NAME: &'static str = "stocks";
    type Action = StocksAction;

    fn project(action: &Action) -> Option<&StocksAction> {
        match action {
            Action::Stocks(action) => Some(action),
            _ => None,
        }
    }

    fn reduce(state: &Arc<Self>, action: &StocksAction) -> Result<Arc<Self>, ReducerError> {
        let next = match action {
            StocksAction::Retrieve { symbol } => StocksState {
                symbol: symbol.clone(),
                loading: true,
                quotes: Vec::new(),
                error: None,
            },
            StocksAction::RetrieveSuccess { quotes } => StocksState {
                loading: false,
                quotes: quotes.clone(),
                error: None,
                ..StocksState::clone(state)
            },
            StocksAction::RetrieveError { error } => StocksState {
                loading: false,
                error: Some(error.clone()),
                ..StocksState::clone(state)
            },
        };
        Ok(Arc::new(next))
    }
}

pub fn select_stocks() -> SliceSelector<StocksState> {
    SliceSelector::new(StocksState::NAME, |state| &state.stocks)
}
