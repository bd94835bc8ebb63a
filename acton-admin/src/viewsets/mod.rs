//! View sets
//!
//! A [`ViewSet`] groups views under a common path prefix and route name.
//! View sets nest: a child's route name and path extend its parent's.
//!
//! [`ModelViewSet`] generates the standard pages of one repository and
//! converts into a plain [`ViewSet`].
//!
//! # Example
//!
//! ```rust
//! use acton_admin::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Post {
//!     id: i64,
//!     title: String,
//! }
//!
//! let repository = InMemoryRepository::<Post>::new("id", Vec::new()).with_title_field("title");
//!
//! let posts = ModelViewSet::for_model(repository)
//!     .title("Posts")
//!     .list_fields([Field::new("id").sortable(), Field::new("title").sortable()])
//!     .query_fields(["title"])
//!     .form(FormSchema::new().field(FormField::text("title").required()));
//!
//! let blog = ViewSet::new("blog").viewset(posts);
//! assert_eq!(blog.children()[0].name(), "post");
//! assert!(blog.children()[0].get_index_view().is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::fields::Field;
use crate::forms::FormSchema;
use crate::repository::Repository;
use crate::routing::{humanize, join_path, url_path_for};
use crate::views::model::{self, ModelConfig};
use crate::views::{CreateView, DeleteView, DetailView, EditView, ListView, View};

/// Node of the view tree
pub struct ViewSet {
    name: String,
    title: String,
    prefix: Option<String>,
    views: Vec<Arc<dyn View>>,
    children: Vec<ViewSet>,
    index: Option<String>,
}

impl ViewSet {
    /// Create an empty view set
    ///
    /// The title defaults to the humanized name and the path prefix to
    /// `/{name}`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: humanize(&name),
            name,
            prefix: None,
            views: Vec::new(),
            children: Vec::new(),
            index: None,
        }
    }

    /// Set the title used in navigation and breadcrumbs
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the path prefix
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Add a view
    #[must_use]
    pub fn view(mut self, view: impl View) -> Self {
        self.views.push(Arc::new(view));
        self
    }

    /// Add a child view set
    #[must_use]
    pub fn viewset(mut self, child: impl Into<Self>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Name the view used as the landing page of this view set
    #[must_use]
    pub fn index_view(mut self, name: impl Into<String>) -> Self {
        self.index = Some(name.into());
        self
    }

    /// Name of the view set
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Title of the view set
    #[must_use]
    pub fn display_title(&self) -> &str {
        &self.title
    }

    /// Path prefix, relative to the parent
    #[must_use]
    pub fn path_prefix(&self) -> String {
        self.prefix
            .clone()
            .unwrap_or_else(|| join_path("", &self.name))
    }

    /// Views in declaration order
    #[must_use]
    pub fn views(&self) -> &[Arc<dyn View>] {
        &self.views
    }

    /// Child view sets in declaration order
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Name of the index view, if one was set
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// View by name
    #[must_use]
    pub fn get_view(&self, name: &str) -> Option<&Arc<dyn View>> {
        self.views.iter().find(|view| view.name() == name)
    }

    /// The index view, if one was set and exists
    #[must_use]
    pub fn get_index_view(&self) -> Option<&Arc<dyn View>> {
        self.index.as_deref().and_then(|name| self.get_view(name))
    }
}

impl fmt::Debug for ViewSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSet")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("prefix", &self.path_prefix())
            .field(
                "views",
                &self.views.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .field("children", &self.children)
            .field("index", &self.index)
            .finish()
    }
}

/// View set generating the standard pages of a repository
///
/// | View     | Path           | Generated when          |
/// |----------|----------------|-------------------------|
/// | `list`   | `/`            | always (index view)     |
/// | `create` | `/create`      | a form is configured    |
/// | `edit`   | `/{pk}`        | a form is configured    |
/// | `detail` | `/{pk}/detail` | always                  |
/// | `delete` | `/{pk}/delete` | unless `without_delete` |
pub struct ModelViewSet<R: Repository> {
    name: String,
    title: Option<String>,
    prefix: Option<String>,
    config: ModelConfig<R>,
    delete: bool,
    extra_views: Vec<Arc<dyn View>>,
    children: Vec<ViewSet>,
}

impl<R: Repository> ModelViewSet<R> {
    /// Create a model view set called `name`
    ///
    /// Pass an `Arc` of the repository to keep a handle on it.
    pub fn new(name: impl Into<String>, repository: R) -> Self {
        Self {
            name: name.into(),
            title: None,
            prefix: None,
            config: ModelConfig::new(repository),
            delete: true,
            extra_views: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a model view set named after the model type (`BlogPost` gives
    /// `blog-post`)
    pub fn for_model(repository: R) -> Self {
        Self::new(url_path_for::<R::Model>(), repository)
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the path prefix
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Columns of the list page
    #[must_use]
    pub fn list_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.config.list_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Rows of the detail page; defaults to the list fields
    #[must_use]
    pub fn detail_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.config.detail_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Fields searched by the list page's search box
    #[must_use]
    pub fn query_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.query_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Form used by the create and edit views
    #[must_use]
    pub fn form(mut self, schema: FormSchema) -> Self {
        self.config.form = Some(schema);
        self
    }

    /// Page size of the list view, overriding the site default
    #[must_use]
    pub const fn page_size(mut self, size: u64) -> Self {
        self.config.page_size = Some(size);
        self
    }

    /// Do not generate the delete view
    #[must_use]
    pub const fn without_delete(mut self) -> Self {
        self.delete = false;
        self
    }

    /// Add a custom view
    #[must_use]
    pub fn view(mut self, view: impl View) -> Self {
        self.extra_views.push(Arc::new(view));
        self
    }

    /// Add a child view set
    #[must_use]
    pub fn viewset(mut self, child: impl Into<ViewSet>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl<R: Repository> From<ModelViewSet<R>> for ViewSet {
    fn from(model_viewset: ModelViewSet<R>) -> Self {
        let ModelViewSet {
            name,
            title,
            prefix,
            config,
            delete,
            extra_views,
            children,
        } = model_viewset;

        let title = title.unwrap_or_else(|| humanize(&name));
        let has_form = config.form.is_some();
        let config = Arc::new(config);

        let mut viewset = Self::new(name)
            .title(title.clone())
            .view(ListView::new(Arc::clone(&config), title))
            .index_view(model::LIST);
        if has_form {
            viewset = viewset
                .view(CreateView::new(Arc::clone(&config)))
                .view(EditView::new(Arc::clone(&config)));
        }
        viewset = viewset.view(DetailView::new(Arc::clone(&config)));
        if delete {
            viewset = viewset.view(DeleteView::new(Arc::clone(&config)));
        }
        if let Some(prefix) = prefix {
            viewset = viewset.prefix(prefix);
        }

        viewset.views.extend(extra_views);
        viewset.children.extend(children);
        viewset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use crate::views::ViewKind;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct BlogPost {
        id: String,
        title: String,
    }

    fn repository() -> InMemoryRepository<BlogPost> {
        InMemoryRepository::new("id", Vec::new())
    }

    fn view_names(viewset: &ViewSet) -> Vec<&str> {
        viewset.views().iter().map(|v| v.name()).collect()
    }

    #[test]
    fn test_viewset_defaults() {
        let viewset = ViewSet::new("blog_posts");
        assert_eq!(viewset.display_title(), "Blog posts");
        assert_eq!(viewset.path_prefix(), "/blog_posts");
        assert!(viewset.get_index_view().is_none());
    }

    #[test]
    fn test_model_viewset_is_named_after_model() {
        let viewset: ViewSet = ModelViewSet::for_model(repository()).into();
        assert_eq!(viewset.name(), "blog-post");
        assert_eq!(viewset.path_prefix(), "/blog-post");
    }

    #[test]
    fn test_model_viewset_without_form() {
        let viewset: ViewSet = ModelViewSet::new("post", repository()).into();
        assert_eq!(view_names(&viewset), vec!["list", "detail", "delete"]);
        let index = viewset.get_index_view().unwrap();
        assert_eq!(index.kind(), ViewKind::List);
        assert_eq!(index.path(), "/");
    }

    #[test]
    fn test_model_viewset_with_form() {
        let viewset: ViewSet = ModelViewSet::new("post", repository())
            .form(FormSchema::new())
            .without_delete()
            .into();
        assert_eq!(view_names(&viewset), vec!["list", "create", "edit", "detail"]);
        assert_eq!(viewset.get_view("edit").unwrap().path(), "/{pk}");
        assert_eq!(viewset.get_view("create").unwrap().path(), "/create");
    }

    #[test]
    fn test_model_viewset_title_and_children() {
        let viewset: ViewSet = ModelViewSet::new("post", repository())
            .title("Articles")
            .prefix("/articles")
            .viewset(ViewSet::new("drafts"))
            .into();
        assert_eq!(viewset.display_title(), "Articles");
        assert_eq!(viewset.path_prefix(), "/articles");
        assert_eq!(viewset.children().len(), 1);
        assert_eq!(viewset.get_view("list").unwrap().title(), "Articles");
    }
}
