//! List page state
//!
//! Everything a list page derives from its query string: search text,
//! sorting, the requested page and the links built from them.

mod pagination;
mod query;
mod sorting;

pub use pagination::Pagination;
pub use query::QueryString;
pub use sorting::{ColumnHeader, SortingState, SORTING_PARAM};

use crate::error::AdminError;

/// Query parameter holding the search text
pub const QUERY_PARAM: &str = "query";

/// Raw list parameters of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Search text, `None` when absent or blank
    pub query: Option<String>,
    /// Raw `sorting` parameter
    pub sorting: Option<String>,
    /// Items to skip; already derived from `page` when one was given
    pub offset: u64,
    /// Page size, clamped to the configured bounds
    pub limit: u64,
}

impl ListParams {
    /// Read list parameters from a query string
    ///
    /// `limit` defaults to `default_limit` and is clamped to
    /// `[1, max_limit]`. A `page` (1-based) overrides `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::BadRequest`] when `offset`, `limit` or `page`
    /// is not a non-negative integer.
    pub fn from_query(
        query: &QueryString,
        default_limit: u64,
        max_limit: u64,
    ) -> Result<Self, AdminError> {
        let max_limit = max_limit.max(1);
        let limit = parse_number(query, "limit")?
            .unwrap_or(default_limit)
            .clamp(1, max_limit);

        let offset = match parse_number(query, "page")? {
            Some(page) => page.saturating_sub(1).saturating_mul(limit),
            None => parse_number(query, "offset")?.unwrap_or(0),
        };

        Ok(Self {
            query: query
                .get(QUERY_PARAM)
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(ToString::to_string),
            sorting: query
                .get(SORTING_PARAM)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            offset,
            limit,
        })
    }
}

fn parse_number(query: &QueryString, key: &str) -> Result<Option<u64>, AdminError> {
    match query.get(key).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            AdminError::BadRequest(format!("'{key}' must be a non-negative integer, got '{raw}'"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(raw: &str) -> Result<ListParams, AdminError> {
        ListParams::from_query(&QueryString::parse(Some(raw)).unwrap(), 10, 100)
    }

    #[test]
    fn test_defaults() {
        let params = params("").unwrap();
        assert_eq!((params.offset, params.limit), (0, 10));
        assert!(params.query.is_none());
        assert!(params.sorting.is_none());
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params("limit=0").unwrap().limit, 1);
        assert_eq!(params("limit=1000").unwrap().limit, 100);
        assert_eq!(params("limit=25").unwrap().limit, 25);
    }

    #[test]
    fn test_page_overrides_offset() {
        assert_eq!(params("offset=3&page=3&limit=5").unwrap().offset, 10);
        assert_eq!(params("page=0").unwrap().offset, 0);
    }

    #[test]
    fn test_invalid_numbers_are_bad_requests() {
        assert!(matches!(params("offset=abc"), Err(AdminError::BadRequest(_))));
        assert!(matches!(params("limit=-1"), Err(AdminError::BadRequest(_))));
        assert!(matches!(params("page=x"), Err(AdminError::BadRequest(_))));
    }

    #[test]
    fn test_blank_query_is_ignored() {
        assert!(params("query=++").unwrap().query.is_none());
        assert_eq!(params("query=item").unwrap().query.as_deref(), Some("item"));
    }
}
