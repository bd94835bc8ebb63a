//! Named routes
//!
//! axum matches requests by path only. The admin needs to go the other way
//! as well: links, redirects, breadcrumbs and navigation are all built from
//! route names such as `admin:my-model:edit`. The [`RouteRegistry`] keeps
//! that mapping for a built site.
//!
//! # Example
//!
//! ```rust
//! use acton_admin::routing::RouteRegistry;
//!
//! let mut registry = RouteRegistry::new();
//! registry.register("admin:post:edit", "/admin/post/{pk}").unwrap();
//!
//! let url = registry.url_for("admin:post:edit", &[("pk", "hello world")]).unwrap();
//! assert_eq!(url, "/admin/post/hello%20world");
//! ```

mod naming;

pub use naming::{humanize, type_name_to_url_path, url_path_for};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::HashMap;

use crate::error::AdminError;

/// Separator between the segments of a route name
pub const ROUTE_NAME_SEPARATOR: char = ':';

/// Characters escaped when a value is substituted into a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Mapping from route names to path templates
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, String>,
    order: Vec<String>,
}

impl RouteRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route name for a path template
    ///
    /// Path templates use axum's `{param}` and `{*rest}` syntax, one
    /// parameter per segment. A name can only be registered once. A path is
    /// rejected when the router could not tell it apart from a registered
    /// one, which includes the same path with a differently named parameter.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<(), AdminError> {
        let name = name.into();
        let path = path.into();

        if let Some(existing) = self.routes.get(&name) {
            return Err(AdminError::Configuration(format!(
                "route name '{name}' is already registered for '{existing}'"
            )));
        }
        let segments = parse_template(&path)?;
        for owner in &self.order {
            let existing = &self.routes[owner];
            // Registered paths were parsed when they were added
            if parse_template(existing).is_ok_and(|other| overlaps(&segments, &other)) {
                return Err(AdminError::Configuration(format!(
                    "path '{path}' conflicts with '{existing}' of route '{owner}'"
                )));
            }
        }

        tracing::trace!(route = %name, %path, "Route registered");
        self.routes.insert(name.clone(), path);
        self.order.push(name);
        Ok(())
    }

    /// Whether a route name is known
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Path template of a route
    #[must_use]
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(String::as_str)
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no route is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over `(name, path)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.routes[name].as_str()))
    }

    /// Build the URL of a route, substituting path parameters
    ///
    /// Every `{param}` placeholder must be provided; values are
    /// percent-encoded as a single path segment.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String, AdminError> {
        let template = self
            .routes
            .get(name)
            .ok_or_else(|| AdminError::Configuration(format!("unknown route '{name}'")))?;

        let mut url = String::with_capacity(template.len() + 16);
        let mut rest = template.as_str();
        while let Some(start) = rest.find('{') {
            url.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                AdminError::Configuration(format!("unterminated parameter in route '{name}'"))
            })?;
            let key = &after[..end];
            let value = params
                .iter()
                .find_map(|(k, v)| (*k == key).then_some(*v))
                .ok_or_else(|| {
                    AdminError::Configuration(format!(
                        "missing parameter '{key}' for route '{name}'"
                    ))
                })?;
            url.extend(utf8_percent_encode(value, PATH_SEGMENT));
            rest = &after[end + 1..];
        }
        url.push_str(rest);
        Ok(url)
    }
}

/// One segment of a path template
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Static(&'a str),
    Param(&'a str),
    CatchAll(&'a str),
}

fn parse_template(path: &str) -> Result<Vec<Segment<'_>>, AdminError> {
    let invalid =
        |reason: &str| AdminError::Configuration(format!("invalid path '{path}': {reason}"));

    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| invalid("must start with '/'"))?;
    let mut segments = Vec::new();
    let mut params: Vec<&str> = Vec::new();
    for raw in rest.split('/') {
        if matches!(segments.last(), Some(Segment::CatchAll(_))) {
            return Err(invalid("a catch-all parameter must be last"));
        }
        if !raw.contains(['{', '}']) {
            segments.push(Segment::Static(raw));
            continue;
        }
        let inner = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| invalid("a parameter must fill its whole segment"))?;
        let (name, catch_all) = match inner.strip_prefix('*') {
            Some(name) => (name, true),
            None => (inner, false),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("parameter names are letters, digits and '_'"));
        }
        if params.contains(&name) {
            return Err(invalid("parameter names must be unique"));
        }
        params.push(name);
        segments.push(if catch_all {
            Segment::CatchAll(name)
        } else {
            Segment::Param(name)
        });
    }
    Ok(segments)
}

/// Whether two templates would clash in the router
///
/// Static segments may sit next to a parameter, but two parameters at the
/// same position of the same prefix must agree on kind and name.
fn overlaps(a: &[Segment<'_>], b: &[Segment<'_>]) -> bool {
    for (left, right) in a.iter().zip(b) {
        match (left, right) {
            (Segment::Static(x), Segment::Static(y)) if x == y => {}
            (Segment::Param(x), Segment::Param(y)) if x == y => {}
            (Segment::CatchAll(_), Segment::CatchAll(_)) => return true,
            (Segment::Static(_), _) | (_, Segment::Static(_)) => return false,
            _ => return true,
        }
    }
    a.len() == b.len()
}

/// Join a parent route name and a child name
///
/// ```rust
/// use acton_admin::routing::join_route_name;
///
/// assert_eq!(join_route_name("admin", "post"), "admin:post");
/// assert_eq!(join_route_name("", "admin"), "admin");
/// ```
#[must_use]
pub fn join_route_name(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}{ROUTE_NAME_SEPARATOR}{child}")
    }
}

/// Join a path prefix and a relative path
///
/// The result always starts with `/` and never contains `//`. A path of
/// `/` keeps the trailing slash, so list pages live at `/admin/post/`.
///
/// ```rust
/// use acton_admin::routing::join_path;
///
/// assert_eq!(join_path("/admin", "/post"), "/admin/post");
/// assert_eq!(join_path("/admin/post", "/"), "/admin/post/");
/// assert_eq!(join_path("", "/"), "/");
/// assert_eq!(join_path("/admin/", "{pk}"), "/admin/{pk}");
/// ```
#[must_use]
pub fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let mut joined = String::with_capacity(prefix.len() + path.len() + 2);
    if !prefix.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(prefix);
    if !joined.ends_with('/') {
        joined.push('/');
    }
    joined.push_str(path);
    joined
}
