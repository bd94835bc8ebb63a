//! Admin views
//!
//! A [`View`] is one admin page. Views are declared up front, grouped into
//! [`ViewSet`](crate::viewsets::ViewSet)s, and turned into axum routes when
//! the site is built. At that point every view receives a [`ViewContext`]
//! describing where it lives in the tree: its route name, its view set and
//! the frozen [`SiteState`] used to build links.
//!
//! The model views in [`model`] cover list, detail, create, edit and delete
//! pages for a [`Repository`](crate::repository::Repository). Anything else
//! can be added as a [`CustomView`].

use axum::response::Html;
use axum::routing::MethodRouter;
use std::fmt;
use std::sync::Arc;

use crate::breadcrumbs::{extend_trail, BreadcrumbItem};
use crate::error::AdminError;
use crate::routing::join_route_name;
use crate::site::{is_nested, SiteState};
use crate::template::{ContentPage, HxTemplate, NavItem, PageContext};

pub mod model;

pub use model::{CreateView, DeleteView, DetailView, EditView, ListView};

/// Kind of page a view renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Site dashboard
    Index,
    /// Paginated table of items
    List,
    /// Read-only page of one item
    Detail,
    /// Form creating an item
    Create,
    /// Form changing an item
    Edit,
    /// Delete confirmation
    Delete,
    /// Anything else
    Custom,
}

/// One admin page
///
/// `path` is relative to the view set and uses axum's `{param}` syntax.
/// `method_router` is called once, when the site is built.
pub trait View: Send + Sync + 'static {
    /// Name, unique within the view set
    fn name(&self) -> &str;

    /// Path relative to the view set prefix
    fn path(&self) -> &str;

    /// Page title
    fn title(&self) -> &str;

    /// Kind of page
    fn kind(&self) -> ViewKind {
        ViewKind::Custom
    }

    /// Check the view's own configuration before the site is built
    fn check(&self) -> Result<(), AdminError> {
        Ok(())
    }

    /// Handlers serving this view
    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter;
}

/// Where a view lives in the built site
#[derive(Clone)]
pub struct ViewContext {
    /// Frozen site state shared by every view
    pub site: Arc<SiteState>,
    /// Route name of the view
    pub route_name: String,
    /// Route name of the enclosing view set
    pub viewset_route: String,
    /// Title of the view
    pub title: String,
    /// Title of the enclosing view set
    pub viewset_title: String,
    /// Route names of the enclosing view sets, root first
    pub ancestors: Vec<String>,
}

impl fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewContext")
            .field("route_name", &self.route_name)
            .field("viewset_route", &self.viewset_route)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl ViewContext {
    /// URL of any route of the site
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for an unknown route or a
    /// missing parameter.
    pub fn url_for(&self, route: &str, params: &[(&str, &str)]) -> Result<String, AdminError> {
        self.site.routes.url_for(route, params)
    }

    /// URL of this view
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for a missing parameter.
    pub fn own_url(&self, params: &[(&str, &str)]) -> Result<String, AdminError> {
        self.url_for(&self.route_name, params)
    }

    /// Route name of another view of the same view set
    #[must_use]
    pub fn sibling(&self, view: &str) -> String {
        join_route_name(&self.viewset_route, view)
    }

    /// Whether the view set has a view called `view`
    #[must_use]
    pub fn has_sibling(&self, view: &str) -> bool {
        self.site.routes.contains(&self.sibling(view))
    }

    /// URL of another view of the same view set, `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for a missing parameter.
    pub fn sibling_url(
        &self,
        view: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<String>, AdminError> {
        let route = self.sibling(view);
        if self.site.routes.contains(&route) {
            self.url_for(&route, params).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Sidebar entries, with the section containing this view marked active
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        self.site
            .navigation
            .iter()
            .map(|entry| NavItem {
                title: entry.title.clone(),
                url: entry.url.clone(),
                active: is_nested(&self.route_name, &entry.route),
            })
            .collect()
    }

    /// Breadcrumbs of the enclosing view sets that have an index view
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbItem> {
        self.ancestors
            .iter()
            .filter_map(|route| {
                let info = self.site.viewsets.get(route)?;
                let url = info.index_url.as_ref()?;
                Some(BreadcrumbItem::new(info.title.clone(), url.clone()))
            })
            .collect()
    }

    /// Layout data for a page of this view
    ///
    /// `extra` breadcrumbs are appended to the view set trail; without any,
    /// the page title is appended as the current entry.
    #[must_use]
    pub fn page(&self, title: impl Into<String>, extra: Vec<BreadcrumbItem>) -> PageContext {
        let title = title.into();
        let extra = if extra.is_empty() {
            vec![BreadcrumbItem::current(title.clone())]
        } else {
            extra
        };

        PageContext {
            site_title: self.site.config.site.title.clone(),
            index_url: self.site.index_url.clone(),
            navigation: self.navigation(),
            breadcrumbs: extend_trail(self.breadcrumbs(), extra),
            title,
        }
    }

    /// Render `content` inside the admin layout
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Template`] if rendering fails.
    pub fn render_content(&self, content: impl Into<String>) -> Result<Html<String>, AdminError> {
        ContentPage {
            page: self.page(self.title.clone(), Vec::new()),
            content: content.into(),
        }
        .render_html()
    }
}

type RouterFactory = dyn Fn(ViewContext) -> MethodRouter + Send + Sync;

/// View backed by user-supplied handlers
///
/// # Examples
///
/// ```rust
/// use acton_admin::views::CustomView;
/// use axum::routing::get;
///
/// let view = CustomView::new("stats", "/stats", "Statistics", |ctx| {
///     get(move || {
///         let ctx = ctx.clone();
///         async move { ctx.render_content("<p>All systems nominal.</p>") }
///     })
/// });
/// ```
pub struct CustomView {
    name: String,
    path: String,
    title: String,
    factory: Box<RouterFactory>,
}

impl CustomView {
    /// Create a custom view; `factory` builds its handlers at site build time
    pub fn new<F>(
        name: impl Into<String>,
        path: impl Into<String>,
        title: impl Into<String>,
        factory: F,
    ) -> Self
    where
        F: Fn(ViewContext) -> MethodRouter + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            path: path.into(),
            title: title.into(),
            factory: Box::new(factory),
        }
    }
}

impl fmt::Debug for CustomView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomView")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl View for CustomView {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter {
        (self.factory)(ctx)
    }
}
