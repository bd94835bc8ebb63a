//! Page templates
//!
//! One askama template per admin page. Every page extends `base.html`,
//! which reads the shared [`PageContext`].
//!
//! URLs are built by the crate (percent-encoded paths, urlencoded query
//! strings) and are emitted unescaped; every other value goes through
//! askama's HTML escaping.

use askama::Template;

use crate::breadcrumbs::BreadcrumbItem;
use crate::listing::ColumnHeader;

/// Navigation entry of the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// View set title
    pub title: String,
    /// URL of the view set's index view
    pub url: String,
    /// Whether the current page belongs to this view set
    pub active: bool,
}

/// Data shared by every page layout
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Site title shown in the header
    pub site_title: String,
    /// URL of the dashboard
    pub index_url: String,
    /// Sidebar entries
    pub navigation: Vec<NavItem>,
    /// Breadcrumb trail, root first
    pub breadcrumbs: Vec<BreadcrumbItem>,
    /// Page heading
    pub title: String,
}

/// Dashboard listing the site's sections
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// Layout data
    pub page: PageContext,
    /// Top-level sections
    pub sections: Vec<NavItem>,
}

/// One table row of a list page
#[derive(Debug, Clone)]
pub struct ListRow {
    /// Link of the first cell, empty when the item has no page
    pub url: String,
    /// Rendered cells, one per list field
    pub cells: Vec<String>,
}

/// List page
#[derive(Template)]
#[template(path = "list.html")]
pub struct ListPage {
    /// Layout data
    pub page: PageContext,
    /// Column headers with sort links
    pub headers: Vec<ColumnHeader>,
    /// Rows of the current page
    pub rows: Vec<ListRow>,
    /// Total number of matching items
    pub total: u64,
    /// 1-based index of the first row
    pub first_item: u64,
    /// 1-based index of the last row
    pub last_item: u64,
    /// Previous page link, empty on the first page
    pub previous_url: String,
    /// Next page link, empty on the last page
    pub next_url: String,
    /// Whether the search box is shown
    pub search_enabled: bool,
    /// Current search text
    pub query: String,
    /// Active sorting, kept when searching; empty when unsorted
    pub sorting: String,
    /// Page size requested in the URL, kept when searching
    pub limit: String,
    /// URL of the list view itself
    pub list_url: String,
    /// Create view link, empty without a create view
    pub create_url: String,
}

/// One label/value row of a detail page
#[derive(Debug, Clone)]
pub struct DetailRow {
    /// Field label
    pub label: String,
    /// Rendered value
    pub value: String,
    /// Whether a copy button is shown
    pub copyable: bool,
}

/// Detail page
#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailPage {
    /// Layout data
    pub page: PageContext,
    /// Field rows
    pub rows: Vec<DetailRow>,
    /// Edit view link, empty without an edit view
    pub edit_url: String,
    /// Delete view link, empty without a delete view
    pub delete_url: String,
    /// List view link
    pub list_url: String,
}

/// Create or edit page
#[derive(Template)]
#[template(path = "form.html")]
pub struct FormPage {
    /// Layout data
    pub page: PageContext,
    /// Pre-rendered form markup
    pub form: String,
    /// Link back to the list
    pub cancel_url: String,
    /// Delete view link, empty when not applicable
    pub delete_url: String,
}

/// Delete confirmation page
#[derive(Template)]
#[template(path = "delete.html")]
pub struct DeletePage {
    /// Layout data
    pub page: PageContext,
    /// Title of the item about to be deleted
    pub item_title: String,
    /// URL the confirmation form posts to
    pub action_url: String,
    /// Link back to the item or list
    pub cancel_url: String,
}

/// Arbitrary markup inside the admin layout, for custom views
#[derive(Template)]
#[template(path = "content.html")]
pub struct ContentPage {
    /// Layout data
    pub page: PageContext,
    /// Markup inserted as-is
    pub content: String,
}

/// Standalone error page
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase
    pub reason: String,
    /// Message shown to the user
    pub message: String,
}
