//! Query string handling for list pages
//!
//! List pages build many links that differ from the current URL by a single
//! parameter (next page, toggled column, cleared search). [`QueryString`]
//! keeps the parameters in their original order so those links stay stable.

use crate::error::AdminError;

/// Ordered query string parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Parse a raw query string (without the leading `?`)
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::BadRequest`] for malformed percent-encoding.
    pub fn parse(raw: Option<&str>) -> Result<Self, AdminError> {
        let pairs = match raw {
            Some(raw) if !raw.is_empty() => serde_urlencoded::from_str(raw)
                .map_err(|e| AdminError::BadRequest(format!("invalid query string: {e}")))?,
            _ => Vec::new(),
        };
        Ok(Self { pairs })
    }

    /// First value of `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    /// Copy with `key` set to `value`, replacing any previous values
    #[must_use]
    pub fn with(&self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        let mut placed = false;
        for (k, v) in &self.pairs {
            if k == key {
                if !placed {
                    pairs.push((k.clone(), value.clone()));
                    placed = true;
                }
            } else {
                pairs.push((k.clone(), v.clone()));
            }
        }
        if !placed {
            pairs.push((key.to_string(), value));
        }
        Self { pairs }
    }

    /// Copy without any value for `key`
    #[must_use]
    pub fn without(&self, key: &str) -> Self {
        Self {
            pairs: self.pairs.iter().filter(|(k, _)| k != key).cloned().collect(),
        }
    }

    /// Whether there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encoded form, without the leading `?`
    #[must_use]
    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }

    /// `path` with this query string appended
    #[must_use]
    pub fn to_url(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.encode())
        }
    }

    /// Parameters in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_get() {
        let query = QueryString::parse(Some("query=item+1&sorting=-label&offset=10")).unwrap();
        assert_eq!(query.get("query"), Some("item 1"));
        assert_eq!(query.get("sorting"), Some("-label"));
        assert_eq!(query.get("limit"), None);
        assert!(QueryString::parse(None).unwrap().is_empty());
    }

    #[test]
    fn test_with_keeps_position() {
        let query = QueryString::parse(Some("a=1&offset=10&b=2")).unwrap();
        assert_eq!(query.with("offset", "20").encode(), "a=1&offset=20&b=2");
        assert_eq!(query.with("limit", "5").encode(), "a=1&offset=10&b=2&limit=5");
    }

    #[test]
    fn test_without() {
        let query = QueryString::parse(Some("page=2&query=x&page=3")).unwrap();
        assert_eq!(query.without("page").encode(), "query=x");
    }

    #[test]
    fn test_to_url() {
        let empty = QueryString::default();
        assert_eq!(empty.to_url("/admin/post/"), "/admin/post/");

        let query = QueryString::default().with("query", "a&b");
        assert_eq!(query.to_url("/admin/post/"), "/admin/post/?query=a%26b");
    }
}
