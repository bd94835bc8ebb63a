//! Breadcrumb trail
//!
//! Built from the view tree: every ancestor view set with an index view
//! contributes an entry, root first. Pages then append their own entries.

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbItem {
    /// Link text
    pub label: String,
    /// Target URL; empty for the current page
    pub url: String,
}

impl BreadcrumbItem {
    /// Create a linked breadcrumb
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Create an unlinked breadcrumb for the current page
    pub fn current(label: impl Into<String>) -> Self {
        Self::new(label, String::new())
    }

    /// Whether the breadcrumb links somewhere
    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Append `extra` to `trail`, dropping a trailing entry that duplicates
/// the first appended one
#[must_use]
pub fn extend_trail(mut trail: Vec<BreadcrumbItem>, extra: Vec<BreadcrumbItem>) -> Vec<BreadcrumbItem> {
    if let (Some(last), Some(first)) = (trail.last(), extra.first()) {
        if last.label == first.label {
            trail.pop();
        }
    }
    trail.extend(extra);
    trail
}
