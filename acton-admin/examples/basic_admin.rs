//! Basic acton-admin example
//!
//! Demonstrates:
//! - Configuration loading (`admin.toml`, `ACTON_ADMIN_*` variables)
//! - Observability initialization
//! - An in-memory and a SQLite backed model view set
//! - A custom view nested in its own section
//!
//! Run with: `cargo run --example basic_admin`

use acton_admin::{observability, prelude::*};
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;

#[derive(Clone, Serialize, Deserialize)]
struct Tag {
    slug: String,
    name: String,
    featured: bool,
}

#[derive(Clone, Serialize, sqlx::FromRow)]
struct Post {
    id: i64,
    title: String,
    body: String,
    published: bool,
}

impl SqlTable for Post {
    const TABLE: &'static str = "posts";
    const PRIMARY_KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["id", "title", "body", "published"];
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query(
        "CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            body TEXT NOT NULL DEFAULT '',
            published BOOLEAN NOT NULL DEFAULT 0
        )",
    )
    .execute(&pool)
    .await?;
    sqlx::query("INSERT INTO posts (title, body, published) VALUES ('Hello', 'First post', 1)")
        .execute(&pool)
        .await?;

    let tags = InMemoryRepository::new(
        "slug",
        [
            Tag {
                slug: "rust".into(),
                name: "Rust".into(),
                featured: true,
            },
            Tag {
                slug: "htmx".into(),
                name: "HTMX".into(),
                featured: false,
            },
        ],
    )
    .with_title_field("name");

    let posts = SqliteRepository::<Post>::new(pool).with_title_column("title")?;
    let posts = ModelViewSet::for_model(posts)
        .title("Posts")
        .list_fields([
            Field::new("id").sortable(),
            Field::new("title").sortable(),
            Field::new("published").boolean(),
        ])
        .detail_fields([
            Field::new("id").copyable(),
            Field::new("title"),
            Field::new("body"),
            Field::new("published").boolean(),
        ])
        .query_fields(["title", "body"])
        .form(
            FormSchema::new()
                .field(FormField::text("title").required().max_length(120))
                .field(FormField::textarea("body"))
                .field(FormField::checkbox("published")),
        );

    let tags = ModelViewSet::for_model(tags)
        .title("Tags")
        .list_fields([Field::new("slug").sortable(), Field::new("name").sortable()])
        .query_fields(["name"])
        .form(
            FormSchema::new()
                .field(FormField::text("slug").required())
                .field(FormField::text("name").required())
                .field(FormField::checkbox("featured")),
        );

    let system = ViewSet::new("system")
        .view(CustomView::new("status", "/status", "Status", |ctx| {
            get(move || {
                let ctx = ctx.clone();
                async move { ctx.render_content("<p>Everything is running.</p>") }
            })
        }))
        .index_view("status");

    let site = AdminSite::load()?.viewset(posts).viewset(tags).viewset(system);

    let app = Router::new()
        .route("/", get(|| async { "Admin lives at /admin/" }))
        .merge(site.router()?);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Admin listening on http://127.0.0.1:3000/admin/");

    axum::serve(listener, app).await?;

    Ok(())
}
