//! SQLite repository
//!
//! Maps a table to a model type through [`SqlTable`] and `sqlx::FromRow`.
//! Column names used in queries always come from [`SqlTable::COLUMNS`];
//! request input only ever reaches the database as bound parameters.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::{error::ErrorKind, sqlite::SqliteRow, FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::marker::PhantomData;

use super::{lookup, value_to_text, ListQuery, ListResult, Record, Repository};
use crate::error::RepositoryError;

/// Table metadata for a model stored in SQLite
///
/// # Example
///
/// ```rust
/// use acton_admin::repository::SqlTable;
///
/// #[derive(sqlx::FromRow, serde::Serialize)]
/// struct Post { id: i64, title: String }
///
/// impl SqlTable for Post {
///     const TABLE: &'static str = "posts";
///     const PRIMARY_KEY: &'static str = "id";
///     const COLUMNS: &'static [&'static str] = &["id", "title"];
/// }
/// ```
pub trait SqlTable {
    /// Table name
    const TABLE: &'static str;
    /// Primary key column
    const PRIMARY_KEY: &'static str;
    /// Columns that may be searched, sorted or written
    const COLUMNS: &'static [&'static str];
}

/// Repository backed by a SQLite table
#[derive(Debug)]
pub struct SqliteRepository<M> {
    pool: SqlitePool,
    title_column: Option<&'static str>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for SqliteRepository<M> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            title_column: self.title_column,
            _model: PhantomData,
        }
    }
}

impl<M> SqliteRepository<M>
where
    M: SqlTable + for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Sync + Unpin + 'static,
{
    /// Create a repository using `pool`
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            title_column: None,
            _model: PhantomData,
        }
    }

    /// Use `column` as the item title instead of the primary key
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] if `column` is not one of
    /// [`SqlTable::COLUMNS`].
    pub fn with_title_column(mut self, column: &str) -> Result<Self, RepositoryError> {
        self.title_column = Some(Self::column(column)?);
        Ok(self)
    }

    /// Connection pool used by the repository
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn column(name: &str) -> Result<&'static str, RepositoryError> {
        M::COLUMNS
            .iter()
            .copied()
            .find(|column| *column == name)
            .ok_or_else(|| {
                RepositoryError::Invalid(format!("unknown column '{name}' for table {}", M::TABLE))
            })
    }

    fn field_text(item: &M, field: &str) -> String {
        serde_json::to_value(item)
            .ok()
            .and_then(|json| lookup(&json, field).map(value_to_text))
            .unwrap_or_default()
    }

    fn push_filter(
        builder: &mut QueryBuilder<'_, Sqlite>,
        query: &ListQuery,
    ) -> Result<(), RepositoryError> {
        let Some(text) = query.active_search() else {
            return Ok(());
        };
        let pattern = format!("%{}%", escape_like(text));

        builder.push(" WHERE ");
        for (index, field) in query.query_fields.iter().enumerate() {
            let column = Self::column(field)?;
            if index > 0 {
                builder.push(" OR ");
            }
            builder
                .push("CAST(")
                .push(column)
                .push(" AS TEXT) LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        Ok(())
    }

    fn push_sorting(
        builder: &mut QueryBuilder<'_, Sqlite>,
        query: &ListQuery,
    ) -> Result<(), RepositoryError> {
        for (index, (field, order)) in query.sorting.iter().enumerate() {
            let column = Self::column(field)?;
            builder
                .push(if index == 0 { " ORDER BY " } else { ", " })
                .push(column)
                .push(" ")
                .push(order.as_sql());
        }
        Ok(())
    }
}

#[async_trait]
impl<M> Repository for SqliteRepository<M>
where
    M: SqlTable + for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Sync + Unpin + 'static,
{
    type Model = M;

    fn get_pk(&self, item: &M) -> String {
        Self::field_text(item, M::PRIMARY_KEY)
    }

    fn get_title(&self, item: &M) -> String {
        self.title_column.map_or_else(
            || self.get_pk(item),
            |column| Self::field_text(item, column),
        )
    }

    async fn list(&self, query: &ListQuery) -> Result<ListResult<M>, RepositoryError> {
        let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", M::TABLE));
        Self::push_filter(&mut count, query)?;
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {}", M::TABLE));
        Self::push_filter(&mut select, query)?;
        Self::push_sorting(&mut select, query)?;
        select
            .push(" LIMIT ")
            .push_bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset).unwrap_or(i64::MAX));

        let items = select.build_query_as::<M>().fetch_all(&self.pool).await?;

        tracing::debug!(
            table = M::TABLE,
            offset = query.offset,
            limit = query.limit,
            total,
            "SQLite list query"
        );
        Ok(ListResult::new(u64::try_from(total).unwrap_or(0), items))
    }

    async fn get_by_pk(&self, pk: &str) -> Result<Option<M>, RepositoryError> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?", M::TABLE, M::PRIMARY_KEY);
        let item = sqlx::query_as::<_, M>(&sql)
            .bind(pk)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn create(&self, data: Record) -> Result<M, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {}", M::TABLE));

        if data.is_empty() {
            builder.push(" DEFAULT VALUES");
        } else {
            let columns = data
                .keys()
                .map(String::as_str)
                .map(Self::column)
                .collect::<Result<Vec<_>, _>>()?;
            builder.push(" (").push(columns.join(", ")).push(") VALUES (");
            for (index, value) in data.into_iter().map(|(_, value)| value).enumerate() {
                if index > 0 {
                    builder.push(", ");
                }
                push_value(&mut builder, value);
            }
            builder.push(")");
        }
        builder.push(" RETURNING *");

        builder
            .build_query_as::<M>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update(&self, pk: &str, data: Record) -> Result<M, RepositoryError> {
        if data.is_empty() {
            return self
                .get_by_pk(pk)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(pk.to_string()));
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", M::TABLE));
        for (index, (key, value)) in data.into_iter().enumerate() {
            let column = Self::column(&key)?;
            if index > 0 {
                builder.push(", ");
            }
            builder.push(column).push(" = ");
            push_value(&mut builder, value);
        }
        builder
            .push(" WHERE ")
            .push(M::PRIMARY_KEY)
            .push(" = ")
            .push_bind(pk.to_string())
            .push(" RETURNING *");

        builder
            .build_query_as::<M>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| RepositoryError::NotFound(pk.to_string()))
    }

    async fn delete(&self, pk: &str) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", M::TABLE, M::PRIMARY_KEY);
        let result = sqlx::query(&sql).bind(pk).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(pk.to_string()));
        }
        Ok(())
    }
}

/// Bind a JSON value with the closest SQLite type
fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: Value) {
    match value {
        Value::Null => builder.push_bind(Option::<String>::None),
        Value::Bool(flag) => builder.push_bind(flag),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => builder.push_bind(integer),
            None => builder.push_bind(number.as_f64().unwrap_or_default()),
        },
        Value::String(text) => builder.push_bind(text),
        other => builder.push_bind(other.to_string()),
    };
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn map_write_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(db.message().to_string())
        }
        sqlx::Error::Database(db)
            if matches!(db.kind(), ErrorKind::CheckViolation | ErrorKind::NotNullViolation) =>
        {
            RepositoryError::Invalid(db.message().to_string())
        }
        _ => RepositoryError::Database(err),
    }
}
