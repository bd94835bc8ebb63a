//! Askama templates with HTMX support
//!
//! This module provides:
//! - `HxTemplate` trait for full page or fragment rendering
//! - the admin page templates ([`pages`])
//! - partial extraction for HTMX requests ([`extractor`])
//!
//! # Examples
//!
//! ```rust
//! use askama::Template;
//! use acton_admin::template::HxTemplate;
//!
//! #[derive(Template)]
//! #[template(
//!     source = "<h1>Items</h1><!-- HTMX_PARTIAL_START --><p>{{ count }}</p><!-- HTMX_PARTIAL_END -->",
//!     ext = "html"
//! )]
//! struct ItemsTemplate {
//!     count: usize,
//! }
//!
//! let fragment = ItemsTemplate { count: 3 }.render_htmx(true).unwrap();
//! assert_eq!(fragment.0, "<p>3</p>");
//! ```

use askama::Template;
use axum::response::Html;

use crate::error::AdminError;

pub mod extractor;
pub mod pages;

pub use pages::{
    ContentPage, DeletePage, DetailPage, DetailRow, ErrorPage, FormPage, IndexPage, ListPage,
    ListRow, NavItem, PageContext,
};

/// Extension trait for Askama templates with HTMX support
///
/// HTMX requests receive only the marked fragment of the page; regular
/// browser requests receive the full page.
pub trait HxTemplate: Template {
    /// Render the full page, or only the fragment when `is_htmx` is true
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Template`] if rendering fails.
    fn render_htmx(&self, is_htmx: bool) -> Result<Html<String>, AdminError> {
        let html = self.render()?;
        if is_htmx {
            Ok(Html(extractor::extract_partial(&html).into_owned()))
        } else {
            Ok(Html(html))
        }
    }

    /// Render the full page regardless of request type
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Template`] if rendering fails.
    fn render_html(&self) -> Result<Html<String>, AdminError> {
        Ok(Html(self.render()?))
    }
}

// Blanket implementation for all Askama templates
impl<T> HxTemplate for T where T: Template {}

/// Body of an error response
///
/// Falls back to a bare page if the template itself fails, so error
/// responses never fail in turn.
#[must_use]
pub fn render_error_page(status: u16, reason: &str, message: &str) -> String {
    let page = ErrorPage {
        status,
        reason: reason.to_string(),
        message: message.to_string(),
    };
    page.render().unwrap_or_else(|err| {
        tracing::error!(error = %err, "Error page rendering failed");
        format!(
            "<!DOCTYPE html><title>{status} {reason}</title><h1>{status} {reason}</h1>",
            reason = crate::forms::escape_html(reason)
        )
    })
}
