//! acton-admin: Declarative admin interface for axum applications
//!
//! Describe your data once, as a tree of view sets backed by repositories,
//! and get list, detail, create, edit and delete pages with navigation,
//! breadcrumbs, pagination, sorting and search. The result is a plain
//! [`axum::Router`] that merges into an existing application.
//!
//! # Design Principles
//!
//! 1. **Declarative Views**: Pages are configured, not hand-written
//! 2. **Named Routes**: Every page has a stable route name (`admin:post:edit`)
//! 3. **HTMX-First Lists**: Search, sorting and paging swap only the results
//! 4. **Bring Your Own Data**: A small [`Repository`](repository::Repository) trait
//!    is all the admin needs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_admin::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Post {
//!     id: i64,
//!     title: String,
//!     published: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     acton_admin::observability::init()?;
//!
//!     let posts = InMemoryRepository::new("id", Vec::<Post>::new()).with_title_field("title");
//!
//!     let site = AdminSite::load()?.viewset(
//!         ModelViewSet::for_model(posts)
//!             .list_fields([
//!                 Field::new("id").sortable(),
//!                 Field::new("title").sortable(),
//!                 Field::new("published").boolean(),
//!             ])
//!             .query_fields(["title"])
//!             .form(
//!                 FormSchema::new()
//!                     .field(FormField::number("id").required())
//!                     .field(FormField::text("title").required())
//!                     .field(FormField::checkbox("published")),
//!             ),
//!     );
//!
//!     let app = axum::Router::new().merge(site.router()?);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `sqlite` - [`SqliteRepository`](repository::SqliteRepository) backed by sqlx (default)

// Lint configuration is handled at the workspace level in Cargo.toml
// Additional crate-specific allows:
#![allow(clippy::missing_errors_doc)]

// Public modules (exported in public API)
pub mod breadcrumbs;
pub mod config;
pub mod error;
pub mod fields;
pub mod forms;
pub mod listing;
pub mod observability;
pub mod repository;
pub mod routing;
pub mod site;
pub mod template;
pub mod views;
pub mod viewsets;

#[cfg(test)]
pub mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_admin::prelude::*;
    //! ```

    // Site and view tree
    pub use crate::site::{AdminSite, BuiltSite, SiteState};
    pub use crate::views::{CustomView, View, ViewContext, ViewKind};
    pub use crate::viewsets::{ModelViewSet, ViewSet};

    // Fields and forms
    pub use crate::fields::{Field, FieldFormat};
    pub use crate::forms::{
        FieldError, FormField, FormSchema, InputType, SelectOption, ValidationErrors,
    };

    // Data access
    pub use crate::repository::{
        InMemoryRepository, ListQuery, ListResult, Record, Repository, SortingOrder,
    };
    #[cfg(feature = "sqlite")]
    pub use crate::repository::{SqlTable, SqliteRepository};

    // Template traits
    pub use crate::template::HxTemplate;

    // Configuration and errors
    pub use crate::config::AdminConfig;
    pub use crate::error::{AdminError, RepositoryError};

    // Re-export key dependencies
    pub use askama;
    pub use async_trait::async_trait;
    pub use axum;
}
