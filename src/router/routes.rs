//! Route table and the navigation driver.

use crate::router::events::{RouteSnapshot, RouterEvent, TITLE_KEY};
use crate::router::guard::CanActivate;
use crate::store::{CancelSignal, Subscription};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Redirect hops allowed before a navigation is abandoned.
const MAX_REDIRECTS: usize = 16;

/// Path that matches anything not matched earlier.
pub const WILDCARD: &str = "**";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    #[error("No route matches '{url}'")]
    NoMatch { url: String },

    #[error("Too many redirects while resolving '{url}'")]
    TooManyRedirects { url: String },

    #[error("Navigation failed: {0}")]
    Failed(String),
}

/// Programmatic navigation, as effects see it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str) -> Result<(), NavigationError>;
}

#[derive(Clone, Default)]
pub struct Route {
    pub path: String,
    pub redirect_to: Option<String>,
    pub data: BTreeMap<String, String>,
    pub children: Vec<Route>,
    pub guards: Vec<Arc<dyn CanActivate>>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("redirect_to", &self.redirect_to)
            .field("data", &self.data)
            .field("children", &self.children)
            .field("guards", &self.guards.len())
            .finish()
    }
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// A route that only redirects. An empty `path` redirects only when
    /// nothing is left to match.
    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirect_to: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.data.insert(TITLE_KEY.to_string(), title.into());
        self
    }

    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }

    pub fn guard(mut self, guard: Arc<dyn CanActivate>) -> Self {
        self.guards.push(guard);
        self
    }
}

/// The application's route table. `authenticated` is only reachable while
/// `auth_guard` allows it.
pub fn app_routes(auth_guard: Arc<dyn CanActivate>) -> Vec<Route> {
    vec![
        Route::redirect("", "about"),
        Route::new("about").title("anms.menu.about"),
        Route::new("features").title("anms.menu.features"),
        Route::new("settings").title("anms.menu.settings"),
        Route::new("examples").children(vec![Route::new("").children(vec![
            Route::redirect("", "todos"),
            Route::new("todos").title("anms.examples.menu.todos"),
            Route::new("stock-market").title("anms.examples.menu.stocks"),
            Route::new("theming").title("anms.examples.menu.theming"),
            Route::new("crud").title("anms.examples.menu.crud"),
            Route::new("authenticated")
                .title("anms.examples.menu.auth")
                .guard(auth_guard),
        ])]),
        Route::redirect(WILDCARD, "about"),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Completed { url_after_redirects: String },
    /// A guard refused one of the matched routes.
    Cancelled,
}

enum Matched<'r> {
    Routes(Vec<&'r Route>),
    Redirect(Vec<String>),
    Nothing,
}

fn segments(url: &str) -> Vec<String> {
    url.trim_start_matches('#')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn join(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

fn match_level<'r>(routes: &'r [Route], remaining: &[String], consumed: &[String]) -> Matched<'r> {
    let redirect = |to: &str| {
        let mut target = consumed.to_vec();
        target.extend(segments(to));
        Matched::Redirect(target)
    };

    for route in routes {
        if route.path == WILDCARD {
            return match &route.redirect_to {
                Some(to) => redirect(to),
                None => Matched::Routes(vec![route]),
            };
        }

        let own = segments(&route.path);
        if !remaining.starts_with(&own) {
            continue;
        }
        let rest = &remaining[own.len()..];

        if let Some(to) = &route.redirect_to {
            if rest.is_empty() {
                return redirect(to);
            }
            continue;
        }

        if route.children.is_empty() {
            if rest.is_empty() {
                return Matched::Routes(vec![route]);
            }
            continue;
        }

        let mut deeper = consumed.to_vec();
        deeper.extend(own);
        match match_level(&route.children, rest, &deeper) {
            Matched::Routes(mut chain) => {
                chain.insert(0, route);
                return Matched::Routes(chain);
            }
            Matched::Redirect(target) => return Matched::Redirect(target),
            Matched::Nothing => continue,
        }
    }
    Matched::Nothing
}

/// Snapshot for `chain[index..]`, each level holding the next as its only
/// child.
fn snapshot_of(chain: &[&Route]) -> RouteSnapshot {
    let Some((route, below)) = chain.split_first() else {
        return RouteSnapshot::default();
    };
    RouteSnapshot {
        path: route.path.clone(),
        data: route.data.clone(),
        children: if below.is_empty() {
            Vec::new()
        } else {
            vec![snapshot_of(below)]
        },
    }
}

type RouterObserver = Arc<dyn Fn(&RouterEvent) + Send + Sync>;

/// Resolves URLs against the route table, consults guards and publishes
/// lifecycle events.
pub struct Router {
    routes: Vec<Route>,
    observers: RwLock<Vec<(CancelSignal, RouterObserver)>>,
    next_id: AtomicU64,
    current_url: RwLock<Option<String>>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            current_url: RwLock::new(None),
        }
    }

    /// Observe every lifecycle event from now on.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&RouterEvent) + Send + Sync + 'static,
    {
        let signal = CancelSignal::new();
        self.observers
            .write()
            .push((signal.clone(), Arc::new(observer)));
        Subscription::new(signal)
    }

    /// URL of the last completed navigation.
    pub fn current_url(&self) -> Option<String> {
        self.current_url.read().clone()
    }

    /// Resolve redirects and return the final URL and its route chain.
    pub fn resolve(&self, url: &str) -> Result<(String, Vec<&Route>), NavigationError> {
        let mut target = segments(url);
        for _ in 0..MAX_REDIRECTS {
            match match_level(&self.routes, &target, &[]) {
                Matched::Routes(chain) => return Ok((join(&target), chain)),
                Matched::Redirect(next) => target = next,
                Matched::Nothing => {
                    return Err(NavigationError::NoMatch {
                        url: url.to_string(),
                    })
                }
            }
        }
        Err(NavigationError::TooManyRedirects {
            url: url.to_string(),
        })
    }

    pub fn navigate_by_url(&self, url: &str) -> Result<NavigationOutcome, NavigationError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.emit(&RouterEvent::NavigationStart {
            id,
            url: url.to_string(),
        });

        let (url_after_redirects, chain) = match self.resolve(url) {
            Ok(resolved) => resolved,
            Err(error) => {
                self.emit(&RouterEvent::NavigationCancel {
                    id,
                    url: url.to_string(),
                    reason: error.to_string(),
                });
                return Err(error);
            }
        };

        let denied = chain
            .iter()
            .any(|route| route.guards.iter().any(|guard| !guard.can_activate()));
        if denied {
            debug!(url, "navigation cancelled by guard");
            self.emit(&RouterEvent::NavigationCancel {
                id,
                url: url.to_string(),
                reason: "guard denied activation".to_string(),
            });
            return Ok(NavigationOutcome::Cancelled);
        }

        *self.current_url.write() = Some(url_after_redirects.clone());
        for depth in (0..chain.len()).rev() {
            self.emit(&RouterEvent::ActivationEnd {
                snapshot: snapshot_of(&chain[depth..]),
            });
        }
        self.emit(&RouterEvent::NavigationEnd {
            id,
            url: url.to_string(),
            url_after_redirects: url_after_redirects.clone(),
        });
        Ok(NavigationOutcome::Completed {
            url_after_redirects,
        })
    }

    fn emit(&self, event: &RouterEvent) {
        let observers: Vec<(CancelSignal, RouterObserver)> = {
            let mut observers = self.observers.write();
            observers.retain(|(signal, _)| !signal.is_cancelled());
            observers.clone()
        };
        for (signal, observer) in observers {
            if !signal.is_cancelled() {
                observer(event);
            }
        }
    }
}

impl Navigator for Router {
    fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        self.navigate_by_url(url).map(|_| ())
    }
}
