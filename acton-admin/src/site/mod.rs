//! Admin site
//!
//! [`AdminSite`] is the root of the view tree. Building it turns the
//! declared view sets into an axum [`Router`] in two passes:
//!
//! 1. Walk the tree, computing each view's route name, full path and
//!    ancestor chain, and register every view in a [`RouteRegistry`].
//! 2. Freeze the [`SiteState`] and mount every view's handlers at its path.
//!
//! Links between pages are only resolved after the first pass, so a view can
//! link to any other view of the site regardless of declaration order.
//!
//! # Example
//!
//! ```rust
//! use acton_admin::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Tag {
//!     id: String,
//! }
//!
//! # fn main() -> Result<(), AdminError> {
//! let site = AdminSite::new(AdminConfig::default())
//!     .viewset(ModelViewSet::for_model(InMemoryRepository::<Tag>::new("id", Vec::new())));
//!
//! let built = site.build()?;
//! assert_eq!(built.state.url_for("admin:tag:list", &[])?, "/admin/tag/");
//! assert_eq!(built.state.url_for("admin:tag:detail", &[("pk", "rust")])?, "/admin/tag/rust/detail");
//!
//! // Merge into the host application
//! let app: axum::Router = axum::Router::new().merge(built.router);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, MethodRouter};
use axum::Router;
use axum_htmx::AutoVaryLayer;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::routing::{join_path, join_route_name, RouteRegistry, ROUTE_NAME_SEPARATOR};
use crate::template::{HxTemplate, IndexPage};
use crate::viewsets::ViewSet;
use crate::views::{View, ViewContext, ViewKind};

/// Name of the dashboard view
pub const INDEX: &str = "index";

/// Whether route `child` is `ancestor` or lives below it
///
/// ```rust
/// use acton_admin::site::is_nested;
///
/// assert!(is_nested("admin:post:edit", "admin:post"));
/// assert!(is_nested("admin:post", "admin:post"));
/// assert!(!is_nested("admin:posts:edit", "admin:post"));
/// ```
#[must_use]
pub fn is_nested(child: &str, ancestor: &str) -> bool {
    child
        .strip_prefix(ancestor)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(ROUTE_NAME_SEPARATOR))
}

/// Sidebar entry of a top-level view set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// View set title
    pub title: String,
    /// Route name of the view set
    pub route: String,
    /// URL of its index view
    pub url: String,
}

/// What views need to know about a view set after the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSetInfo {
    /// View set title
    pub title: String,
    /// URL of the index view, if the view set has one
    pub index_url: Option<String>,
}

/// Frozen state of a built site, shared by every view
#[derive(Debug)]
pub struct SiteState {
    /// Site configuration
    pub config: AdminConfig,
    /// Every registered route
    pub routes: RouteRegistry,
    /// Sidebar entries, in declaration order
    pub navigation: Vec<NavEntry>,
    /// View sets by route name
    pub viewsets: HashMap<String, ViewSetInfo>,
    /// URL of the dashboard
    pub index_url: String,
}

impl SiteState {
    /// URL of a named route
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for an unknown route or a
    /// missing parameter.
    pub fn url_for(&self, route: &str, params: &[(&str, &str)]) -> Result<String, AdminError> {
        self.routes.url_for(route, params)
    }
}

/// A built site
#[derive(Debug)]
pub struct BuiltSite {
    /// Router serving every admin page; merge it into the host application
    pub router: Router,
    /// State shared by the views, for building links outside the admin
    pub state: Arc<SiteState>,
}

/// Root of the admin
#[derive(Debug)]
pub struct AdminSite {
    config: AdminConfig,
    root: ViewSet,
}

impl AdminSite {
    /// Create a site with a dashboard at the base path
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let root = ViewSet::new(config.site.name.clone())
            .title(config.site.title.clone())
            .prefix(config.site.base_path.clone())
            .view(DashboardView {
                title: config.site.title.clone(),
            })
            .index_view(INDEX);
        Self { config, root }
    }

    /// Create a site from `admin.toml` and the environment
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Config`] if the configuration cannot be loaded.
    pub fn load() -> Result<Self, AdminError> {
        Ok(Self::new(AdminConfig::load()?))
    }

    /// Site configuration
    #[must_use]
    pub const fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Add a top-level view set
    #[must_use]
    pub fn viewset(mut self, viewset: impl Into<ViewSet>) -> Self {
        self.root = self.root.viewset(viewset);
        self
    }

    /// Add a view at the site root
    #[must_use]
    pub fn view(mut self, view: impl View) -> Self {
        self.root = self.root.view(view);
        self
    }

    /// Build the router
    ///
    /// # Errors
    ///
    /// See [`AdminSite::build`].
    pub fn router(&self) -> Result<Router, AdminError> {
        self.build().map(|built| built.router)
    }

    /// Register every view and build the router
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for invalid settings, names
    /// containing the route separator, duplicate route names, malformed or
    /// clashing paths, a missing index view, or an invalid form schema.
    /// Paths are checked while registering, so mounting never panics.
    pub fn build(&self) -> Result<BuiltSite, AdminError> {
        self.config.validate()?;

        // Pass 1: names, paths and registration
        let mut collector = Collector::default();
        collector.walk(&self.root, "", "", &[])?;
        let Collector {
            routes,
            viewsets,
            mounts,
        } = collector;

        let root_route = self.root.name().to_string();
        let navigation = self
            .root
            .children()
            .iter()
            .filter_map(|child| {
                let route = join_route_name(&root_route, child.name());
                let url = viewsets.get(&route)?.index_url.clone()?;
                Some(NavEntry {
                    title: child.display_title().to_string(),
                    route,
                    url,
                })
            })
            .collect();
        let index_url = viewsets
            .get(&root_route)
            .and_then(|info| info.index_url.clone())
            .unwrap_or_else(|| join_path(&self.config.site.base_path, "/"));

        // Pass 2: freeze the state and mount the handlers
        let state = Arc::new(SiteState {
            config: self.config.clone(),
            routes,
            navigation,
            viewsets,
            index_url,
        });

        let mut router = Router::new();
        for mount in mounts {
            tracing::debug!(
                route = %mount.route,
                path = %mount.path,
                kind = ?mount.view.kind(),
                "Mounting view"
            );
            let ctx = ViewContext {
                site: Arc::clone(&state),
                route_name: mount.route,
                viewset_route: mount.viewset_route,
                title: mount.view.title().to_string(),
                viewset_title: mount.viewset_title,
                ancestors: mount.ancestors,
            };
            router = router.route(&mount.path, mount.view.method_router(ctx));
        }

        // `/admin` has no route of its own; send it to `/admin/`
        let base_path = self.config.site.base_path.trim_end_matches('/');
        if !base_path.is_empty()
            && state.index_url == format!("{base_path}/")
            && !state.routes.iter().any(|(_, path)| path == base_path)
        {
            let target = state.index_url.clone();
            router = router.route(
                base_path,
                get(move || async move { Redirect::permanent(&target) }),
            );
        }

        let router = router
            .layer(AutoVaryLayer)
            .layer(TraceLayer::new_for_http());

        tracing::info!(
            routes = state.routes.len(),
            base_path = %self.config.site.base_path,
            "Admin site built"
        );
        Ok(BuiltSite { router, state })
    }
}

/// One view waiting to be mounted
struct Mount {
    route: String,
    path: String,
    view: Arc<dyn View>,
    viewset_route: String,
    viewset_title: String,
    ancestors: Vec<String>,
}

#[derive(Default)]
struct Collector {
    routes: RouteRegistry,
    viewsets: HashMap<String, ViewSetInfo>,
    mounts: Vec<Mount>,
}

impl Collector {
    fn walk(
        &mut self,
        viewset: &ViewSet,
        parent_route: &str,
        parent_path: &str,
        ancestors: &[String],
    ) -> Result<(), AdminError> {
        check_name("view set", viewset.name())?;
        let route = join_route_name(parent_route, viewset.name());
        let path = join_path(parent_path, &viewset.path_prefix());
        if self.viewsets.contains_key(&route) {
            return Err(AdminError::Configuration(format!(
                "view set '{route}' is declared twice"
            )));
        }

        let mut chain = ancestors.to_vec();
        chain.push(route.clone());

        for view in viewset.views() {
            check_name("view", view.name())?;
            view.check()?;
            let view_route = join_route_name(&route, view.name());
            let view_path = join_path(&path, view.path());
            self.routes.register(view_route.clone(), view_path.clone())?;
            self.mounts.push(Mount {
                route: view_route,
                path: view_path,
                view: Arc::clone(view),
                viewset_route: route.clone(),
                viewset_title: viewset.display_title().to_string(),
                ancestors: chain.clone(),
            });
        }

        let index_url = match viewset.index_name() {
            Some(index) if viewset.get_view(index).is_none() => {
                return Err(AdminError::Configuration(format!(
                    "view set '{route}' has no view '{index}' to use as index"
                )));
            }
            Some(index) => Some(
                self.routes
                    .url_for(&join_route_name(&route, index), &[])
                    .map_err(|_| {
                        AdminError::Configuration(format!(
                            "index view '{index}' of '{route}' must not take parameters"
                        ))
                    })?,
            ),
            None => None,
        };
        self.viewsets.insert(
            route.clone(),
            ViewSetInfo {
                title: viewset.display_title().to_string(),
                index_url,
            },
        );

        for child in viewset.children() {
            self.walk(child, &route, &path, &chain)?;
        }
        Ok(())
    }
}

fn check_name(what: &str, name: &str) -> Result<(), AdminError> {
    if name.is_empty() {
        return Err(AdminError::Configuration(format!("{what} name is empty")));
    }
    if name.contains(ROUTE_NAME_SEPARATOR) {
        return Err(AdminError::Configuration(format!(
            "{what} name '{name}' contains '{ROUTE_NAME_SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Dashboard listing the top-level sections
struct DashboardView {
    title: String,
}

impl DashboardView {
    fn render(ctx: &ViewContext) -> Result<Response, AdminError> {
        let sections = ctx
            .navigation()
            .into_iter()
            .map(|mut item| {
                item.active = false;
                item
            })
            .collect();
        let page = IndexPage {
            page: ctx.page(ctx.title.clone(), Vec::new()),
            sections,
        };
        Ok(page.render_html()?.into_response())
    }
}

impl View for DashboardView {
    fn name(&self) -> &str {
        INDEX
    }

    fn path(&self) -> &str {
        "/"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Index
    }

    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter {
        get(move || async move { Self::render(&ctx) })
    }
}
