//! Partial content extraction from rendered templates
//!
//! Full pages mark the region HTMX requests swap with
//! [`PARTIAL_START`] / [`PARTIAL_END`] comments; the same template then
//! serves both the page and the fragment.

use std::borrow::Cow;

/// Opening marker of the HTMX fragment
pub const PARTIAL_START: &str = "<!-- HTMX_PARTIAL_START -->";
/// Closing marker of the HTMX fragment
pub const PARTIAL_END: &str = "<!-- HTMX_PARTIAL_END -->";

/// Extract content between HTML comment markers
///
/// Returns the full HTML when the markers are missing.
///
/// # Examples
///
/// ```rust
/// use acton_admin::template::extractor::extract_partial;
///
/// let html = r#"
/// <html>
/// <!-- HTMX_PARTIAL_START -->
/// <table>rows</table>
/// <!-- HTMX_PARTIAL_END -->
/// </html>
/// "#;
///
/// assert_eq!(extract_partial(html), "<table>rows</table>");
/// ```
#[must_use]
pub fn extract_partial(html: &str) -> Cow<'_, str> {
    if let Some(start_pos) = html.find(PARTIAL_START) {
        let content_start = start_pos + PARTIAL_START.len();
        if let Some(end_pos) = html[content_start..].find(PARTIAL_END) {
            let content = &html[content_start..content_start + end_pos];
            return Cow::Borrowed(content.trim());
        }
    }

    Cow::Borrowed(html)
}
