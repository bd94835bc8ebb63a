//! Repository contract
//!
//! The admin never talks to a database directly. Every model view set is
//! backed by a [`Repository`] implemented by the host application (or one of
//! the bundled adapters), which lists, loads and mutates items on the
//! admin's behalf.
//!
//! Items travel to the admin as `serde::Serialize` values; field rendering,
//! search and form pre-filling all work on their JSON form. Changes travel
//! back as a [`Record`]: the validated, typed form submission.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::RepositoryError;

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryRepository;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqlTable, SqliteRepository};

/// Field values submitted through a form, keyed by field name
pub type Record = serde_json::Map<String, Value>;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortingOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortingOrder {
    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Ordered list of `(field, direction)` pairs; earlier pairs take precedence
pub type Sorting = Vec<(String, SortingOrder)>;

/// Parameters of a list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Sort keys, most significant first
    pub sorting: Sorting,
    /// Number of matching items to skip
    pub offset: u64,
    /// Maximum number of items to return
    pub limit: u64,
    /// Search text; `None` disables searching
    pub query: Option<String>,
    /// Fields searched by `query`
    pub query_fields: Vec<String>,
}

impl ListQuery {
    /// Create a query for one page without sorting or search
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self {
            sorting: Vec::new(),
            offset,
            limit,
            query: None,
            query_fields: Vec::new(),
        }
    }

    /// Add a sort key
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, order: SortingOrder) -> Self {
        self.sorting.push((field.into(), order));
        self
    }

    /// Search `fields` for `text`
    #[must_use]
    pub fn search<I, S>(mut self, text: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query = Some(text.into());
        self.query_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// The search text, if searching is active
    ///
    /// Searching needs both a non-empty text and at least one field.
    #[must_use]
    pub fn active_search(&self) -> Option<&str> {
        self.query
            .as_deref()
            .filter(|q| !q.is_empty() && !self.query_fields.is_empty())
    }
}

/// One page of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult<M> {
    /// Number of items matching the filter, across all pages
    pub total: u64,
    /// Items of the requested page
    pub items: Vec<M>,
}

impl<M> ListResult<M> {
    /// Create a list result
    #[must_use]
    pub const fn new(total: u64, items: Vec<M>) -> Self {
        Self { total, items }
    }
}

/// Data access used by model views
///
/// # Example
///
/// See [`InMemoryRepository`] for a complete implementation.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Item type managed by the repository
    type Model: Serialize + Send + Sync + 'static;

    /// Primary key of an item, as used in URLs
    fn get_pk(&self, item: &Self::Model) -> String;

    /// Human readable title of an item (breadcrumbs, headings)
    fn get_title(&self, item: &Self::Model) -> String {
        self.get_pk(item)
    }

    /// List one page of items
    async fn list(&self, query: &ListQuery) -> Result<ListResult<Self::Model>, RepositoryError>;

    /// Load an item by primary key
    async fn get_by_pk(&self, pk: &str) -> Result<Option<Self::Model>, RepositoryError>;

    /// Create an item from validated form data
    async fn create(&self, data: Record) -> Result<Self::Model, RepositoryError>;

    /// Apply validated form data to an existing item
    async fn update(&self, pk: &str, data: Record) -> Result<Self::Model, RepositoryError>;

    /// Delete an item
    async fn delete(&self, pk: &str) -> Result<(), RepositoryError>;
}

// A shared repository can back a view set while the host keeps a handle
#[async_trait]
impl<R: Repository> Repository for Arc<R> {
    type Model = R::Model;

    fn get_pk(&self, item: &Self::Model) -> String {
        (**self).get_pk(item)
    }

    fn get_title(&self, item: &Self::Model) -> String {
        (**self).get_title(item)
    }

    async fn list(&self, query: &ListQuery) -> Result<ListResult<Self::Model>, RepositoryError> {
        (**self).list(query).await
    }

    async fn get_by_pk(&self, pk: &str) -> Result<Option<Self::Model>, RepositoryError> {
        (**self).get_by_pk(pk).await
    }

    async fn create(&self, data: Record) -> Result<Self::Model, RepositoryError> {
        (**self).create(data).await
    }

    async fn update(&self, pk: &str, data: Record) -> Result<Self::Model, RepositoryError> {
        (**self).update(pk, data).await
    }

    async fn delete(&self, pk: &str) -> Result<(), RepositoryError> {
        (**self).delete(pk).await
    }
}

/// Look up a dotted key (`author.name`) in a JSON value
#[must_use]
pub fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Plain-text form of a JSON value: strings without quotes, `null` as empty
#[must_use]
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Total order over JSON values used for sorting
///
/// Values of different kinds order as null < bool < number < string <
/// array < object; values of the same kind compare naturally.
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    const fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .unwrap_or(f64::NAN)
                .total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(x, y)| compare_values(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_dotted_keys() {
        let value = json!({"id": 1, "author": {"name": "Ada"}, "tags": ["a", "b"]});
        assert_eq!(lookup(&value, "id"), Some(&json!(1)));
        assert_eq!(lookup(&value, "author.name"), Some(&json!("Ada")));
        assert_eq!(lookup(&value, "tags.1"), Some(&json!("b")));
        assert_eq!(lookup(&value, "author.missing"), None);
        assert_eq!(lookup(&value, "id.deeper"), None);
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!("plain")), "plain");
        assert_eq!(value_to_text(&json!(42)), "42");
        assert_eq!(value_to_text(&json!(true)), "true");
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&json!(null), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!("1"), &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1])), Ordering::Greater);
    }

    #[test]
    fn test_active_search() {
        assert_eq!(ListQuery::new(0, 10).active_search(), None);
        assert_eq!(
            ListQuery::new(0, 10).search("", ["label"]).active_search(),
            None
        );
        let no_fields: [&str; 0] = [];
        assert_eq!(
            ListQuery::new(0, 10).search("x", no_fields).active_search(),
            None
        );
        assert_eq!(
            ListQuery::new(0, 10).search("x", ["label"]).active_search(),
            Some("x")
        );
    }

    #[test]
    fn test_sorting_order_sql() {
        assert_eq!(SortingOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortingOrder::Desc.as_sql(), "DESC");
    }
}
