//! Test database utilities for SQLx
//!
//! Provides in-memory SQLite pools for repository tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Create an in-memory SQLite pool and run `schema` against it
///
/// The pool holds a single connection: every connection to `:memory:` opens
/// its own database.
///
/// # Errors
///
/// Returns an error if the pool cannot be created or a statement fails
pub async fn create_sqlite_pool(schema: &[&str]) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    for statement in schema {
        sqlx::query(statement).execute(&pool).await?;
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_pool() {
        let pool = create_sqlite_pool(&["CREATE TABLE t (id INTEGER PRIMARY KEY)"])
            .await
            .unwrap();

        let result: (i32,) = sqlx::query_as("SELECT COUNT(*) FROM t")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(result.0, 0);
    }
}
