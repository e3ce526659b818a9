//! Route table module
//!
//! Maps (method, path pattern) to a wiki action. The table is built once at
//! startup and validated there; lookups never fail in surprising ways.

use hyper::Method;
use percent_encoding::percent_decode_str;
use std::fmt;

use crate::storage::Title;

/// What a matched request should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Save => "save",
        }
    }

    /// Canonical URL path of this action for `title`
    pub fn path(self, title: &Title) -> String {
        format!("/{}/{title}", self.as_str())
    }
}

/// Path pattern of a single route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `/<segment>/<title>`
    Titled(String),
    /// Exact path bound to a fixed title
    Fixed { path: String, title: Title },
}

impl Pattern {
    fn extract(&self, path: &str) -> Option<Title> {
        match self {
            Self::Titled(segment) => {
                let (head, rest) = path.strip_prefix('/')?.split_once('/')?;
                if head == segment {
                    Title::parse(rest)
                } else {
                    None
                }
            }
            Self::Fixed { path: fixed, title } => (path == fixed).then(|| title.clone()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Titled(segment) => write!(f, "/{segment}/<title>"),
            Self::Fixed { path, .. } => f.write_str(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: Pattern,
    pub action: Action,
}

/// Outcome of resolving a request against the table
#[derive(Debug, PartialEq, Eq)]
pub enum RouteMatch {
    Found { action: Action, title: Title },
    /// Path is known but not for this method; carries the `Allow` header value
    MethodNotAllowed { allow: String },
    NotFound,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RouteTableError {
    InvalidSegment(String),
    InvalidPath(String),
    InvalidTitle(String),
    Duplicate(String),
}

impl fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSegment(s) => write!(f, "invalid route segment '{s}'"),
            Self::InvalidPath(p) => write!(f, "invalid route path '{p}'"),
            Self::InvalidTitle(t) => write!(f, "invalid page title '{t}'"),
            Self::Duplicate(r) => write!(f, "duplicate route {r}"),
        }
    }
}

impl std::error::Error for RouteTableError {}

#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    errors: Vec<RouteTableError>,
}

impl RouteTableBuilder {
    /// Add a `/<segment>/<title>` route
    #[must_use]
    pub fn titled(mut self, method: Method, segment: &str, action: Action) -> Self {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_lowercase()) {
            self.errors
                .push(RouteTableError::InvalidSegment(segment.to_string()));
            return self;
        }
        self.routes.push(Route {
            method,
            pattern: Pattern::Titled(segment.to_string()),
            action,
        });
        self
    }

    /// Add an exact-path route that always acts on `title`
    #[must_use]
    pub fn fixed(mut self, method: Method, path: &str, action: Action, title: &str) -> Self {
        if !path.starts_with('/') {
            self.errors
                .push(RouteTableError::InvalidPath(path.to_string()));
            return self;
        }
        let Some(title) = Title::parse(title) else {
            self.errors
                .push(RouteTableError::InvalidTitle(title.to_string()));
            return self;
        };
        self.routes.push(Route {
            method,
            pattern: Pattern::Fixed {
                path: path.to_string(),
                title,
            },
            action,
        });
        self
    }

    pub fn build(mut self) -> Result<RouteTable, RouteTableError> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        for (i, route) in self.routes.iter().enumerate() {
            let clash = self.routes[..i]
                .iter()
                .any(|r| r.method == route.method && r.pattern == route.pattern);
            if clash {
                return Err(RouteTableError::Duplicate(format!(
                    "{} {}",
                    route.method, route.pattern
                )));
            }
        }
        Ok(RouteTable {
            routes: self.routes,
        })
    }
}

#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// The wiki's routes: view/edit/save by title, and the web root showing `front_page`
    pub fn wiki(front_page: &str) -> Result<Self, RouteTableError> {
        Self::builder()
            .titled(Method::GET, Action::View.as_str(), Action::View)
            .titled(Method::GET, Action::Edit.as_str(), Action::Edit)
            .titled(Method::POST, Action::Save.as_str(), Action::Save)
            .fixed(Method::GET, "/", Action::View, front_page)
            .build()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a request; HEAD is served by GET routes
    ///
    /// Matching runs on the percent-decoded path.
    pub fn resolve(&self, method: &Method, path: &str) -> RouteMatch {
        let path = percent_decode_str(path).decode_utf8_lossy();
        let path = path.as_ref();
        let lookup = if *method == Method::HEAD {
            &Method::GET
        } else {
            method
        };

        let mut allowed: Vec<&Method> = Vec::new();
        for route in &self.routes {
            let Some(title) = route.pattern.extract(path) else {
                continue;
            };
            if route.method == *lookup {
                return RouteMatch::Found {
                    action: route.action,
                    title,
                };
            }
            allowed.push(&route.method);
        }

        if allowed.is_empty() {
            return RouteMatch::NotFound;
        }

        let mut allow: Vec<String> = Vec::new();
        for m in allowed {
            allow.push(m.to_string());
            if *m == Method::GET {
                allow.push(Method::HEAD.to_string());
            }
        }
        allow.dedup();
        RouteMatch::MethodNotAllowed {
            allow: allow.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::wiki("FrontPage").expect("valid table")
    }

    fn found(action: Action, title: &str) -> RouteMatch {
        RouteMatch::Found {
            action,
            title: Title::parse(title).unwrap(),
        }
    }

    #[test]
    fn test_resolve_actions() {
        let t = table();
        assert_eq!(t.resolve(&Method::GET, "/view/Home"), found(Action::View, "Home"));
        assert_eq!(t.resolve(&Method::GET, "/edit/Home2"), found(Action::Edit, "Home2"));
        assert_eq!(t.resolve(&Method::POST, "/save/Home"), found(Action::Save, "Home"));
        assert_eq!(t.resolve(&Method::HEAD, "/view/Home"), found(Action::View, "Home"));
    }

    #[test]
    fn test_root_shows_front_page() {
        assert_eq!(
            table().resolve(&Method::GET, "/"),
            found(Action::View, "FrontPage")
        );
    }

    #[test]
    fn test_percent_encoded_path_is_decoded() {
        let t = table();
        assert_eq!(
            t.resolve(&Method::GET, "/view/Front%50age"),
            found(Action::View, "FrontPage")
        );
        assert_eq!(t.resolve(&Method::POST, "/%73ave/Home"), found(Action::Save, "Home"));
        assert_eq!(t.resolve(&Method::GET, "/view/Home%FF"), RouteMatch::NotFound);
    }

    #[test]
    fn test_invalid_paths_not_found() {
        let t = table();
        for path in [
            "/view/bad title!",
            "/view/bad%20title",
            "/view/",
            "/view",
            "/view/a/b",
            "/view/Home/",
            "/delete/Home",
            "/VIEW/Home",
            "//view/Home",
            "/favicon.ico",
            "",
        ] {
            assert_eq!(t.resolve(&Method::GET, path), RouteMatch::NotFound, "{path}");
        }
    }

    #[test]
    fn test_wrong_method() {
        let t = table();
        assert_eq!(
            t.resolve(&Method::GET, "/save/Home"),
            RouteMatch::MethodNotAllowed {
                allow: "POST".to_string()
            }
        );
        assert_eq!(
            t.resolve(&Method::POST, "/view/Home"),
            RouteMatch::MethodNotAllowed {
                allow: "GET, HEAD".to_string()
            }
        );
    }

    #[test]
    fn test_action_path() {
        let title = Title::parse("Rust").unwrap();
        assert_eq!(Action::Edit.path(&title), "/edit/Rust");
        assert_eq!(Action::View.path(&title), "/view/Rust");
    }

    #[test]
    fn test_build_rejects_bad_tables() {
        assert_eq!(
            RouteTable::wiki("Front Page").unwrap_err(),
            RouteTableError::InvalidTitle("Front Page".to_string())
        );
        assert!(matches!(
            RouteTable::builder()
                .titled(Method::GET, "view", Action::View)
                .titled(Method::GET, "view", Action::Edit)
                .build(),
            Err(RouteTableError::Duplicate(_))
        ));
        assert!(matches!(
            RouteTable::builder()
                .titled(Method::GET, "vi/ew", Action::View)
                .build(),
            Err(RouteTableError::InvalidSegment(_))
        ));
        assert!(matches!(
            RouteTable::builder()
                .fixed(Method::GET, "home", Action::View, "Home")
                .build(),
            Err(RouteTableError::InvalidPath(_))
        ));
    }
}
