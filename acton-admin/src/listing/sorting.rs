//! Sorting state of a list page
//!
//! Encoded in the `sorting` query parameter as a comma-separated list of
//! field keys, a leading `-` meaning descending: `sorting=label,-created_at`.

use super::QueryString;
use crate::fields::Field;
use crate::repository::{Sorting, SortingOrder};

/// Query parameter holding the sorting
pub const SORTING_PARAM: &str = "sorting";

/// Ordered field/direction pairs, most significant first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortingState {
    entries: Sorting,
}

impl SortingState {
    /// Parse the `sorting` parameter
    ///
    /// Only keys listed in `allowed` are kept; unknown keys and repeated
    /// keys are dropped.
    #[must_use]
    pub fn parse(raw: Option<&str>, allowed: &[&str]) -> Self {
        let mut entries: Sorting = Vec::new();
        for token in raw.unwrap_or_default().split(',').map(str::trim) {
            let (key, order) = token
                .strip_prefix('-')
                .map_or((token, SortingOrder::Asc), |key| (key, SortingOrder::Desc));
            if key.is_empty()
                || !allowed.contains(&key)
                || entries.iter().any(|(existing, _)| existing == key)
            {
                continue;
            }
            entries.push((key.to_string(), order));
        }
        Self { entries }
    }

    /// Encoded parameter value
    #[must_use]
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(key, order)| match order {
                SortingOrder::Asc => key.clone(),
                SortingOrder::Desc => format!("-{key}"),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether no field is sorted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direction of `key`, if sorted
    #[must_use]
    pub fn order_of(&self, key: &str) -> Option<SortingOrder> {
        self.entries
            .iter()
            .find_map(|(k, order)| (k == key).then_some(*order))
    }

    /// 1-based precedence of `key` among sorted fields
    #[must_use]
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key).map(|i| i + 1)
    }

    /// State after clicking the header of `key`
    ///
    /// Cycles unsorted, ascending, descending, unsorted. Other keys keep
    /// their direction and precedence; a newly sorted key comes last.
    #[must_use]
    pub fn toggled(&self, key: &str) -> Self {
        let mut entries = self.entries.clone();
        match entries.iter().position(|(k, _)| k == key) {
            None => entries.push((key.to_string(), SortingOrder::Asc)),
            Some(index) if entries[index].1 == SortingOrder::Asc => {
                entries[index].1 = SortingOrder::Desc;
            }
            Some(index) => {
                entries.remove(index);
            }
        }
        Self { entries }
    }

    /// Link applying [`toggled`](Self::toggled), back on the first page
    #[must_use]
    pub fn toggle_url(&self, key: &str, path: &str, query: &QueryString) -> String {
        let toggled = self.toggled(key);
        let query = query.without("offset").without("page");
        let query = if toggled.is_empty() {
            query.without(SORTING_PARAM)
        } else {
            query.with(SORTING_PARAM, toggled.encode())
        };
        query.to_url(path)
    }

    /// Sort keys for a repository query
    #[must_use]
    pub fn to_sorting(&self) -> Sorting {
        self.entries.clone()
    }
}

/// Header cell of a list table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Field key
    pub key: String,
    /// Column label
    pub label: String,
    /// Whether the column can be sorted
    pub sortable: bool,
    /// `asc`, `desc` or empty when unsorted
    pub order: String,
    /// Sort precedence shown next to the label, empty when unsorted
    pub position: String,
    /// Link toggling the sort of this column, empty when not sortable
    pub toggle_url: String,
}

impl ColumnHeader {
    /// Build the headers of `fields` for the current sorting
    #[must_use]
    pub fn for_fields(
        fields: &[Field],
        sorting: &SortingState,
        path: &str,
        query: &QueryString,
    ) -> Vec<Self> {
        fields
            .iter()
            .map(|field| {
                let order = sorting.order_of(&field.key);
                Self {
                    key: field.key.clone(),
                    label: field.label.clone(),
                    sortable: field.sortable,
                    order: match order {
                        Some(SortingOrder::Asc) => "asc".into(),
                        Some(SortingOrder::Desc) => "desc".into(),
                        None => String::new(),
                    },
                    position: match sorting.position_of(&field.key) {
                        Some(position) if sorting.entries.len() > 1 => position.to_string(),
                        _ => String::new(),
                    },
                    toggle_url: if field.sortable {
                        sorting.toggle_url(&field.key, path, query)
                    } else {
                        String::new()
                    },
                }
            })
            .collect()
    }
}
