//! Keeps the document title and analytics in step with navigation.

use crate::router::events::{RouteSnapshot, RouterEvent};
use crate::router::routes::Router;
use crate::store::Subscription;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Analytics event sent once per completed navigation.
pub const PAGEVIEW_EVENT: &str = "pageview";

pub trait TitleService: Send + Sync {
    fn set_title(&self, title: &str);
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("Analytics unavailable: {0}")]
    Unavailable(String),

    #[error("Analytics rejected event: {0}")]
    Rejected(String),
}

/// Fire-and-forget event sink.
pub trait Analytics: Send + Sync {
    fn track(&self, event: &str, properties: &BTreeMap<String, String>)
        -> Result<(), AnalyticsError>;
}

/// `"{title} - {app_name}"` for the deepest activated route's title, else
/// just the app name.
pub fn page_title(snapshot: &RouteSnapshot, app_name: &str) -> String {
    match snapshot.deepest().title() {
        Some(title) => format!("{title} - {app_name}"),
        None => app_name.to_string(),
    }
}

pub struct RouteSynchronizer {
    app_name: String,
    titles: Arc<dyn TitleService>,
    analytics: Arc<dyn Analytics>,
}

impl RouteSynchronizer {
    pub fn new(
        app_name: impl Into<String>,
        titles: Arc<dyn TitleService>,
        analytics: Arc<dyn Analytics>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            titles,
            analytics,
        }
    }

    /// Start reacting to `router`'s events.
    pub fn attach(self: Arc<Self>, router: &Router) -> Subscription {
        router.subscribe(move |event| self.handle(event))
    }

    /// Activations set the title (possibly several times per navigation);
    /// only a completed navigation sends a pageview.
    pub fn handle(&self, event: &RouterEvent) {
        match event {
            RouterEvent::ActivationEnd { snapshot } => {
                self.titles.set_title(&page_title(snapshot, &self.app_name));
            }
            RouterEvent::NavigationEnd {
                url_after_redirects,
                ..
            } => {
                let properties =
                    BTreeMap::from([("page".to_string(), url_after_redirects.clone())]);
                if let Err(error) = self.analytics.track(PAGEVIEW_EVENT, &properties) {
                    debug!(%error, "analytics failure ignored");
                }
            }
            RouterEvent::NavigationStart { .. } | RouterEvent::NavigationCancel { .. } => {}
        }
    }
}
