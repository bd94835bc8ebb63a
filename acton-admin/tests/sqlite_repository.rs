//! Admin pages backed by a SQLite table

#![cfg(feature = "sqlite")]

use acton_admin::prelude::*;
use axum_test::TestServer;
use http::StatusCode;
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
struct Note {
    id: i64,
    title: String,
    pinned: bool,
}

impl SqlTable for Note {
    const TABLE: &'static str = "notes";
    const PRIMARY_KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["id", "title", "pinned"];
}

async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query(
        "CREATE TABLE notes (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            pinned BOOLEAN NOT NULL DEFAULT 0
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    for n in 1..=15 {
        sqlx::query("INSERT INTO notes (id, title, pinned) VALUES (?, ?, ?)")
            .bind(n)
            .bind(format!("Note {n:02}"))
            .bind(n % 5 == 0)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}

async fn server() -> (SqlitePool, TestServer) {
    let pool = pool().await;
    let repository = SqliteRepository::<Note>::new(pool.clone())
        .with_title_column("title")
        .unwrap();

    let site = AdminSite::new(AdminConfig::default()).viewset(
        ModelViewSet::new("note", repository)
            .list_fields([
                Field::new("id").sortable(),
                Field::new("title").sortable(),
                Field::new("pinned").boolean(),
            ])
            .query_fields(["title"])
            .form(
                FormSchema::new()
                    .field(FormField::text("title").required())
                    .field(FormField::checkbox("pinned")),
            ),
    );

    (pool, TestServer::new(site.router().unwrap()).unwrap())
}

async fn count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM notes")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_sorted_and_paginated() {
    let (_, server) = server().await;

    let response = server.get("/admin/note/?sorting=-id&offset=10").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("11&ndash;15 of 15"));
    assert!(body.contains("Note 05"));
    assert!(!body.contains("Note 06"));
    assert!(body.contains(r#"href="/admin/note/?sorting=-id""#));
}

#[tokio::test]
async fn test_search_is_bound_not_interpolated() {
    let (pool, server) = server().await;

    let response = server.get("/admin/note/?query=%27%3B%20DROP%20TABLE%20notes%3B%20--").await;
    response.assert_status_ok();
    assert!(response.text().contains("No items found."));
    assert_eq!(count(&pool).await, 15);

    let response = server.get("/admin/note/?query=note%201").await;
    response.assert_status_ok();
    assert!(response.text().contains("1&ndash;6 of 6"));
}

#[tokio::test]
async fn test_create_and_conflict() {
    let (pool, server) = server().await;

    let response = server
        .post("/admin/note/create")
        .form(&[("title", "Brand new"), ("pinned", "on")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(count(&pool).await, 16);

    let response = server
        .post("/admin/note/create")
        .form(&[("title", "Note 01")])
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(count(&pool).await, 16);
}

#[tokio::test]
async fn test_edit_and_delete() {
    let (pool, server) = server().await;

    let response = server.get("/admin/note/7").await;
    response.assert_status_ok();
    assert!(response.text().contains(r#"value="Note 07""#));

    let response = server
        .post("/admin/note/7")
        .form(&[("title", "Edited"), ("pinned", "on")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let (title, pinned): (String, bool) =
        sqlx::query_as("SELECT title, pinned FROM notes WHERE id = 7")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(title, "Edited");
    assert!(pinned);

    let response = server.post("/admin/note/7/delete").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(count(&pool).await, 14);

    let response = server.get("/admin/note/7/detail").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
