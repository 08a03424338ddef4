//! User settings slice: theme and animation preferences.

use crate::core::{Action, ReducerError, Slice, SliceSelector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the persisted settings snapshot.
pub const SETTINGS_KEY: &str = "SETTINGS";

pub const DEFAULT_THEME: &str = "DEFAULT-THEME";

crate::action_enum! {
    pub enum SettingsAction {
        ChangeTheme { theme: String } = "[Settings] Change Theme",
        ChangeAutoNightMode { auto_night_mode: bool } = "[Settings] Change Auto Night Mode",
        ChangeAnimationsPage { page_animations: bool } = "[Settings] Change Animations Page",
        /// Disabling page animations also switches them off.
        ChangeAnimationsPageDisabled { page_animations_disabled: bool } =
            "[Settings] Change Animations Page Disabled",
        ChangeAnimationsElements { elements_animations: bool } =
            "[Settings] Change Animations Elements",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsState {
    pub theme: String,
    pub auto_night_mode: bool,
    pub page_animations: bool,
    pub page_animations_disabled: bool,
    pub elements_animations: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            auto_night_mode: false,
            page_animations: true,
            page_animations_disabled: false,
            elements_animations: true,
        }
    }
}

impl Slice for SettingsState {
    const NAME: &'static str = "settings";
    type Action = SettingsAction;

    fn project(action: &Action) -> Option<&SettingsAction> {
        match action {
            Action::Settings(action) => Some(action),
            _ => None,
        }
    }

    fn reduce(state: &Arc<Self>, action: &SettingsAction) -> Result<Arc<Self>, ReducerError> {
        let mut next = SettingsState::clone(state);
        match action {
            SettingsAction::ChangeTheme { theme } => next.theme = theme.clone(),
            SettingsAction::ChangeAutoNightMode { auto_night_mode } => {
                next.auto_night_mode = *auto_night_mode
            }
            SettingsAction::ChangeAnimationsPage { page_animations } => {
                next.page_animations = *page_animations
            }
            SettingsAction::ChangeAnimationsPageDisabled {
                page_animations_disabled,
            } => {
                next.page_animations_disabled = *page_animations_disabled;
                if *page_animations_disabled {
                    next.page_animations = false;
                }
            }
            SettingsAction::ChangeAnimationsElements {
                elements_animations,
            } => next.elements_animations = *elements_animations,
        }
        if next == **state {
            return Ok(Arc::clone(state));
        }
        Ok(Arc::new(next))
    }
}

pub fn select_settings() -> SliceSelector<SettingsState> {
    SliceSelector::new(SettingsState::NAME, |state| &state.settings)
}
