//! The root action type.

use crate::slices::{AuthAction, BooksAction, SettingsAction, StocksAction, TodosAction};
use serde::{Deserialize, Serialize};

/// Every action the store accepts.
///
/// Slice actions are closed enums, so each reducer matches its tags
/// exhaustively. `Other` carries tags no slice owns; reducers pass it
/// through and only effects may react to it.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Action;
/// use statecraft::slices::TodosAction;
///
/// let action: Action = TodosAction::AddOne { name: "Buy milk".into() }.into();
/// assert_eq!(action.tag(), "[Todos] Add");
/// assert_eq!(Action::other("[App] Init").tag(), "[App] Init");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Auth(AuthAction),
    Settings(SettingsAction),
    Todos(TodosAction),
    Stocks(StocksAction),
    Books(BooksAction),
    Other {
        #[serde(rename = "type")]
        tag: String,
    },
}

impl Action {
    pub fn other(tag: impl Into<String>) -> Self {
        Action::Other { tag: tag.into() }
    }

    /// The action's unique tag.
    pub fn tag(&self) -> &str {
        match self {
            Action::Auth(action) => action.tag(),
            Action::Settings(action) => action.tag(),
            Action::Todos(action) => action.tag(),
            Action::Stocks(action) => action.tag(),
            Action::Books(action) => action.tag(),
            Action::Other { tag } => tag,
        }
    }

    /// Parse the `{"type": ..., "payload": ...}` wire form. Tags owned by no
    /// slice come back as `Action::Other`; a slice tag whose payload does not
    /// fit is an error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let action: Action = serde_json::from_str(json)?;
        match &action {
            Action::Other { tag } if is_slice_tag(tag) => Err(serde::de::Error::custom(format!(
                "malformed payload for '{tag}'"
            ))),
            _ => Ok(action),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// True for an `Other` whose tag belongs to a slice. Such an action
    /// would reach that slice's effects but never its reducer, so the store
    /// refuses it.
    pub fn is_misrouted(&self) -> bool {
        matches!(self, Action::Other { tag } if is_slice_tag(tag))
    }
}

fn is_slice_tag(tag: &str) -> bool {
    [
        AuthAction::TAGS,
        SettingsAction::TAGS,
        TodosAction::TAGS,
        StocksAction::TAGS,
        BooksAction::TAGS,
    ]
    .iter()
    .any(|tags| tags.contains(&tag))
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<SettingsAction> for Action {
    fn from(action: SettingsAction) -> Self {
        Action::Settings(action)
    }
}

impl From<TodosAction> for Action {
    fn from(action: TodosAction) -> Self {
        Action::Todos(action)
    }
}

impl From<StocksAction> for Action {
    fn from(action: StocksAction) -> Self {
        Action::Stocks(action)
    }
}

impl From<BooksAction> for Action {
    fn from(action: BooksAction) -> Self {
        Action::Books(action)
    }
}
