//! Dashboard routes
//!
//! `/dataset/{id}` is a deep link: it selects the dataset and sends the user
//! back to the root view. Unknown paths also land on the root view.

use std::fmt;

use crate::model::DatasetId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    /// `None` when the id segment is not a positive integer
    Dataset(Option<DatasetId>),
    NotFound(String),
}

impl Route {
    /// Parse a location path. Query strings and fragments are ignored.
    pub fn parse(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "" => Route::Root,
            "/login" => Route::Login,
            _ => match path.strip_prefix("/dataset/") {
                Some(segment) if !segment.contains('/') => {
                    Route::Dataset(parse_dataset_id(segment))
                }
                _ => Route::NotFound(location.to_string()),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dataset(Some(id)) => format!("/dataset/{}", id),
            Route::Dataset(None) => "/".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// What the shell does on arriving at this route
    pub fn resolve(&self) -> Navigation {
        match self {
            Route::Root | Route::Login => Navigation {
                select: None,
                redirect: None,
            },
            Route::Dataset(id) => Navigation {
                select: *id,
                redirect: Some(Route::Root),
            },
            Route::NotFound(_) => Navigation {
                select: None,
                redirect: Some(Route::Root),
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of visiting a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Dataset to make active
    pub select: Option<DatasetId>,
    /// Route to replace the current one with
    pub redirect: Option<Route>,
}

impl Navigation {
    /// Route the user ends up on
    pub fn destination(&self, from: &Route) -> Route {
        self.redirect.clone().unwrap_or_else(|| from.clone())
    }
}

/// Leading decimal digits of a path segment, if they form a positive id.
/// `"12abc"` yields 12; `"abc"`, `"0"` and `"-3"` yield nothing.
pub fn parse_dataset_id(segment: &str) -> Option<DatasetId> {
    let digits: String = segment
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<DatasetId>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/login/?next=/"), Route::Login);
        assert_eq!(Route::parse("/dataset/42"), Route::Dataset(Some(42)));
        assert_eq!(Route::parse("/dataset/42/"), Route::Dataset(Some(42)));
        assert_eq!(Route::parse("/dataset/abc"), Route::Dataset(None));
        assert_eq!(
            Route::parse("/dataset/4/extra"),
            Route::NotFound("/dataset/4/extra".to_string())
        );
        assert_eq!(
            Route::parse("/settings"),
            Route::NotFound("/settings".to_string())
        );
    }

    #[test]
    fn test_dataset_link_selects_and_redirects() {
        let route = Route::parse("/dataset/7");
        let nav = route.resolve();

        assert_eq!(nav.select, Some(7));
        assert_eq!(nav.destination(&route), Route::Root);
    }

    #[test]
    fn test_invalid_dataset_link_only_redirects() {
        let nav = Route::parse("/dataset/0").resolve();
        assert_eq!(nav.select, None);
        assert_eq!(nav.redirect, Some(Route::Root));
    }

    #[test]
    fn test_unknown_route_redirects_to_root() {
        let route = Route::parse("/nope");
        assert_eq!(route.resolve().destination(&route), Route::Root);

        let login = Route::Login;
        assert_eq!(login.resolve().destination(&login), Route::Login);
    }

    #[test]
    fn test_parse_dataset_id() {
        assert_eq!(parse_dataset_id("12abc"), Some(12));
        assert_eq!(parse_dataset_id("-3"), None);
        assert_eq!(parse_dataset_id(""), None);
        assert_eq!(Route::Dataset(Some(5)).path(), "/dataset/5");
    }
}
