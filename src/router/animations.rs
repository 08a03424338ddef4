//! Which route transitions animate, derived from the settings flags.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteAnimationType {
    All,
    Page,
    Elements,
    #[default]
    None,
}

impl RouteAnimationType {
    pub fn from_flags(page_animations: bool, elements_animations: bool) -> Self {
        match (page_animations, elements_animations) {
            (true, true) => Self::All,
            (true, false) => Self::Page,
            (false, true) => Self::Elements,
            (false, false) => Self::None,
        }
    }
}

/// The animation type route transitions currently use. Nothing animates
/// until the first settings value arrives.
#[derive(Debug, Default)]
pub struct RouteAnimations {
    current: RwLock<RouteAnimationType>,
}

impl RouteAnimations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, page_animations: bool, elements_animations: bool) {
        *self.current.write() = RouteAnimationType::from_flags(page_animations, elements_animations);
    }

    pub fn current(&self) -> RouteAnimationType {
        *self.current.read()
    }

    pub fn is(&self, kind: RouteAnimationType) -> bool {
        self.current() == kind
    }
}
