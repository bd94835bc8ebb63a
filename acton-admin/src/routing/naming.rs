//! Name normalization helpers
//!
//! Turns Rust type names into URL segments and field keys into labels.

/// Turn a type name into a string suitable for a URL path segment
///
/// # Examples
///
/// ```rust
/// use acton_admin::routing::type_name_to_url_path;
///
/// assert_eq!(type_name_to_url_path("MyModel"), "my-model");
/// assert_eq!(type_name_to_url_path("crate::models::BlogPost"), "blog-post");
/// ```
#[must_use]
pub fn type_name_to_url_path(name: &str) -> String {
    let short = name.rsplit("::").next().unwrap_or(name);
    let mut out = String::with_capacity(short.len() + 4);
    for (index, ch) in short.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// URL path segment derived from a type
#[must_use]
pub fn url_path_for<T: ?Sized>() -> String {
    type_name_to_url_path(std::any::type_name::<T>())
}

/// Turn a field key into a human readable label
///
/// Only the last segment of a dotted key is used.
///
/// ```rust
/// use acton_admin::routing::humanize;
///
/// assert_eq!(humanize("created_at"), "Created at");
/// assert_eq!(humanize("author.display_name"), "Display name");
/// ```
#[must_use]
pub fn humanize(key: &str) -> String {
    let last = key.rsplit('.').next().unwrap_or(key);
    let spaced = last.replace(['_', '-'], " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InvoiceLine;

    #[test]
    fn test_type_name_to_url_path() {
        assert_eq!(type_name_to_url_path("MyModel"), "my-model");
        assert_eq!(type_name_to_url_path("User"), "user");
        assert_eq!(type_name_to_url_path("already-lower"), "already-lower");
    }

    #[test]
    fn test_url_path_for_strips_module_path() {
        assert_eq!(url_path_for::<InvoiceLine>(), "invoice-line");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("id"), "Id");
        assert_eq!(humanize("created_at"), "Created at");
        assert_eq!(humanize("owner.first_name"), "First name");
        assert_eq!(humanize(""), "");
    }
}
