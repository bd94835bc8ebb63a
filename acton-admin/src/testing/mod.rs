//! Testing utilities for admin sites
//!
//! This module provides test helpers used across the crate's unit tests:
//! - [`TestServer`] - Wrapper around `axum-test` serving a built admin site
//! - [`create_sqlite_pool`] - In-memory SQLite pool with a schema applied
//! - Assertion helpers for admin responses (redirects, rendered HTML)
//!
//! # Example
//!
//! ```rust,ignore
//! let site = AdminSite::new(AdminConfig::default()).viewset(items);
//! let server = TestServer::from_site(&site).unwrap();
//!
//! let response = server.post_form("/admin/item/create", &[("label", "New")]).await;
//! assert_see_other(&response, "/admin/item/");
//! ```

pub mod assertions;
#[cfg(feature = "sqlite")]
pub mod database;
pub mod server;

// Re-export for convenience
pub use assertions::*;
#[cfg(feature = "sqlite")]
pub use database::create_sqlite_pool;
pub use server::TestServer;
