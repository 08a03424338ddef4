//! Routing layer: guards, the route table and navigation driver, and the
//! synchronizer that derives title, analytics and animations from it.

mod animations;
mod events;
mod guard;
mod routes;
mod sync;

pub use animations::{RouteAnimationType, RouteAnimations};
pub use events::{RouteSnapshot, RouterEvent, TITLE_KEY};
pub use guard::{auth_guard, CanActivate, LiveGuard};
pub use routes::{
    app_routes, NavigationError, NavigationOutcome, Navigator, Route, Router, WILDCARD,
};
pub use sync::{page_title, Analytics, AnalyticsError, RouteSynchronizer, TitleService, PAGEVIEW_EVENT};
