//! Effective theme resolution and its application to the visual root.

use crate::router::RouteAnimations;
use crate::slices::{select_settings, SettingsState};
use crate::store::{Store, Subscription};
use chrono::{Local, Timelike};
use parking_lot::RwLock;
use std::sync::Arc;

/// Theme token forced during night hours when auto night mode is on.
pub const NIGHT_MODE_THEME: &str = "BLACK-THEME";

/// Marker shared by every theme class.
const THEME_CLASS_MARKER: &str = "-theme";

/// Pick the theme to show at `hour` (0-23).
///
/// With auto night mode on, hours from 20 through 6 get the night theme.
/// The result is always lowercased.
///
/// # Example
///
/// ```rust
/// use statecraft::theme::resolve_effective_theme;
///
/// assert_eq!(resolve_effective_theme("Light-Theme", false, 22), "light-theme");
/// assert_eq!(resolve_effective_theme("Light-Theme", true, 22), "black-theme");
/// assert_eq!(resolve_effective_theme("Light-Theme", true, 10), "light-theme");
/// ```
pub fn resolve_effective_theme(theme: &str, auto_night_mode: bool, hour: u32) -> String {
    let is_night = hour >= 20 || hour <= 6;
    if auto_night_mode && is_night {
        NIGHT_MODE_THEME.to_lowercase()
    } else {
        theme.to_lowercase()
    }
}

pub trait Clock: Send + Sync {
    /// Local wall-clock hour, 0-23.
    fn hour(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn hour(&self) -> u32 {
        self.0
    }
}

/// Class list of the overlay container.
#[derive(Debug, Default)]
pub struct OverlayClasses {
    classes: RwLock<Vec<String>>,
}

impl OverlayClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, class: &str) {
        let mut classes = self.classes.write();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    /// Replace every theme class with `theme`, leaving other classes alone.
    pub fn apply_theme(&self, theme: &str) {
        let mut classes = self.classes.write();
        classes.retain(|c| !c.contains(THEME_CLASS_MARKER));
        classes.push(theme.to_string());
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.read().iter().any(|c| c == class)
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.read().clone()
    }
}

/// Applies settings to the visual root whenever they change: the effective
/// theme on the host and overlay, and the route animation type.
pub struct ThemeSync {
    clock: Arc<dyn Clock>,
    overlay: Arc<OverlayClasses>,
    animations: Arc<RouteAnimations>,
    host_class: RwLock<Option<String>>,
}

impl ThemeSync {
    pub fn new(
        clock: Arc<dyn Clock>,
        overlay: Arc<OverlayClasses>,
        animations: Arc<RouteAnimations>,
    ) -> Self {
        Self {
            clock,
            overlay,
            animations,
            host_class: RwLock::new(None),
        }
    }

    /// Subscribe to the settings slice. The current settings apply at once.
    pub fn attach<Env: Clone + Send + Sync + 'static>(
        self: Arc<Self>,
        store: &Store<Env>,
    ) -> Subscription {
        store
            .select(select_settings())
            .subscribe(move |settings| self.apply(settings))
    }

    pub fn apply(&self, settings: &SettingsState) {
        let theme = resolve_effective_theme(
            &settings.theme,
            settings.auto_night_mode,
            self.clock.hour(),
        );
        self.overlay.apply_theme(&theme);
        *self.host_class.write() = Some(theme);
        self.animations
            .update(settings.page_animations, settings.elements_animations);
    }

    /// Class currently set on the application's host element.
    pub fn host_class(&self) -> Option<String> {
        self.host_class.read().clone()
    }
}
