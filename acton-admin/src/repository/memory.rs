//! In-memory repository
//!
//! Keeps items in a `Vec` behind a lock. Useful for prototypes, demos and
//! tests; every operation goes through the items' JSON form so any
//! `Serialize + DeserializeOwned` type works without extra glue.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{compare_values, lookup, value_to_text, ListQuery, ListResult, Record, Repository};
use crate::error::RepositoryError;

/// Repository backed by a vector
///
/// # Example
///
/// ```rust
/// use acton_admin::repository::{InMemoryRepository, ListQuery, Repository};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Tag { id: String, label: String }
///
/// # async fn example() -> Result<(), acton_admin::error::RepositoryError> {
/// let repository = InMemoryRepository::new("id", vec![
///     Tag { id: "rust".into(), label: "Rust".into() },
/// ])
/// .with_title_field("label");
///
/// let page = repository.list(&ListQuery::new(0, 10)).await?;
/// assert_eq!(page.total, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryRepository<M> {
    items: RwLock<Vec<M>>,
    pk_field: String,
    title_field: Option<String>,
}

impl<M> InMemoryRepository<M>
where
    M: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a repository whose primary key is the field `pk_field`
    pub fn new(pk_field: impl Into<String>, items: impl IntoIterator<Item = M>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().collect()),
            pk_field: pk_field.into(),
            title_field: None,
        }
    }

    /// Use `field` as the item title instead of the primary key
    #[must_use]
    pub fn with_title_field(mut self, field: impl Into<String>) -> Self {
        self.title_field = Some(field.into());
        self
    }

    /// Copy of all items, in storage order
    #[must_use]
    pub fn snapshot(&self) -> Vec<M> {
        self.items.read().clone()
    }

    /// Number of stored items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the repository is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn to_json(item: &M) -> Result<Value, RepositoryError> {
        serde_json::to_value(item).map_err(|e| RepositoryError::Backend(e.to_string()))
    }

    fn field_text(&self, item: &M, field: &str) -> String {
        Self::to_json(item)
            .ok()
            .and_then(|json| lookup(&json, field).map(value_to_text))
            .unwrap_or_default()
    }

    fn position(items: &[M], pk_field: &str, pk: &str) -> Option<usize> {
        items.iter().position(|item| {
            serde_json::to_value(item)
                .ok()
                .and_then(|json| lookup(&json, pk_field).map(value_to_text))
                .is_some_and(|key| key == pk)
        })
    }

    fn matches(json: &Value, needle: &str, fields: &[String]) -> bool {
        fields.iter().any(|field| {
            lookup(json, field)
                .map(value_to_text)
                .is_some_and(|text| text.to_lowercase().contains(needle))
        })
    }
}

#[async_trait]
impl<M> Repository for InMemoryRepository<M>
where
    M: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Model = M;

    fn get_pk(&self, item: &M) -> String {
        self.field_text(item, &self.pk_field)
    }

    fn get_title(&self, item: &M) -> String {
        match &self.title_field {
            Some(field) => self.field_text(item, field),
            None => self.get_pk(item),
        }
    }

    async fn list(&self, query: &ListQuery) -> Result<ListResult<M>, RepositoryError> {
        let snapshot = self.items.read().clone();

        let mut rows = snapshot
            .into_iter()
            .map(|item| Self::to_json(&item).map(|json| (json, item)))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(needle) = query.active_search() {
            let needle = needle.to_lowercase();
            rows.retain(|(json, _)| Self::matches(json, &needle, &query.query_fields));
        }

        // Stable sorts applied least significant key first
        for (field, order) in query.sorting.iter().rev() {
            rows.sort_by(|(a, _), (b, _)| {
                let ordering = compare_values(
                    lookup(a, field).unwrap_or(&Value::Null),
                    lookup(b, field).unwrap_or(&Value::Null),
                );
                match order {
                    super::SortingOrder::Asc => ordering,
                    super::SortingOrder::Desc => ordering.reverse(),
                }
            });
        }

        let total = rows.len() as u64;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let items = rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, item)| item)
            .collect();

        Ok(ListResult::new(total, items))
    }

    async fn get_by_pk(&self, pk: &str) -> Result<Option<M>, RepositoryError> {
        let items = self.items.read();
        Ok(Self::position(&items, &self.pk_field, pk).map(|index| items[index].clone()))
    }

    async fn create(&self, data: Record) -> Result<M, RepositoryError> {
        let item: M = serde_json::from_value(Value::Object(data))
            .map_err(|e| RepositoryError::Invalid(e.to_string()))?;
        let pk = self.get_pk(&item);

        let mut items = self.items.write();
        if Self::position(&items, &self.pk_field, &pk).is_some() {
            return Err(RepositoryError::Conflict(format!(
                "an item with {} '{pk}' already exists",
                self.pk_field
            )));
        }
        items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, pk: &str, data: Record) -> Result<M, RepositoryError> {
        let mut items = self.items.write();
        let index = Self::position(&items, &self.pk_field, pk)
            .ok_or_else(|| RepositoryError::NotFound(pk.to_string()))?;

        let mut json = Self::to_json(&items[index])?;
        let Value::Object(fields) = &mut json else {
            return Err(RepositoryError::Invalid(
                "items must serialize to JSON objects".into(),
            ));
        };
        fields.extend(data);

        let updated: M =
            serde_json::from_value(json).map_err(|e| RepositoryError::Invalid(e.to_string()))?;
        let new_pk = self.get_pk(&updated);
        if new_pk != pk && Self::position(&items, &self.pk_field, &new_pk).is_some() {
            return Err(RepositoryError::Conflict(format!(
                "an item with {} '{new_pk}' already exists",
                self.pk_field
            )));
        }
        items[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, pk: &str) -> Result<(), RepositoryError> {
        let mut items = self.items.write();
        let index = Self::position(&items, &self.pk_field, pk)
            .ok_or_else(|| RepositoryError::NotFound(pk.to_string()))?;
        items.remove(index);
        Ok(())
    }
}
