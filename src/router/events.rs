//! Navigation lifecycle events and activated route snapshots.

use std::collections::BTreeMap;

/// Data key holding a route's title.
pub const TITLE_KEY: &str = "title";

/// One activated route and the routes activated beneath it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteSnapshot {
    pub path: String,
    pub data: BTreeMap<String, String>,
    pub children: Vec<RouteSnapshot>,
}

impl RouteSnapshot {
    /// Follow first children down to the deepest activated route.
    pub fn deepest(&self) -> &RouteSnapshot {
        let mut current = self;
        while let Some(child) = current.children.first() {
            current = child;
        }
        current
    }

    pub fn title(&self) -> Option<&str> {
        self.data.get(TITLE_KEY).map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouterEvent {
    NavigationStart {
        id: u64,
        url: String,
    },
    /// Emitted once per activated route, deepest first.
    ActivationEnd {
        snapshot: RouteSnapshot,
    },
    NavigationEnd {
        id: u64,
        url: String,
        url_after_redirects: String,
    },
    NavigationCancel {
        id: u64,
        url: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(path: &str, title: Option<&str>, children: Vec<RouteSnapshot>) -> RouteSnapshot {
        RouteSnapshot {
            path: path.into(),
            data: title
                .map(|t| BTreeMap::from([(TITLE_KEY.to_string(), t.to_string())]))
                .unwrap_or_default(),
            children,
        }
    }

    #[test]
    fn deepest_follows_first_children() {
        let root = snapshot(
            "examples",
            None,
            vec![
                snapshot("", None, vec![snapshot("todos", Some("Todos"), vec![])]),
                snapshot("ignored", Some("Ignored"), vec![]),
            ],
        );

        assert_eq!(root.deepest().path, "todos");
        assert_eq!(root.deepest().title(), Some("Todos"));
    }

    #[test]
    fn leaf_is_its_own_deepest() {
        let leaf = snapshot("about", Some("About"), vec![]);
        assert_eq!(leaf.deepest(), &leaf);
    }
}
