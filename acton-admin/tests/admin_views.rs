//! Integration tests for a built admin site
//!
//! Drives the public API only: view sets are declared, the site is built,
//! and requests go through the resulting router.

use std::sync::Arc;

use acton_admin::prelude::*;
use axum::routing::get;
use axum::Router;
use axum_test::TestServer;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Article {
    id: u32,
    title: String,
    published: bool,
}

fn articles() -> InMemoryRepository<Article> {
    let items = (1..=12).map(|n| Article {
        id: n,
        title: format!("Article {n:02}"),
        published: n % 3 == 0,
    });
    InMemoryRepository::new("id", items).with_title_field("title")
}

fn stats_view() -> CustomView {
    CustomView::new("stats", "/stats", "Statistics", |ctx| {
        get(move || {
            let ctx = ctx.clone();
            async move { ctx.render_content("<p>All systems nominal.</p>") }
        })
    })
}

/// Site with a top-level model view set and a nested section
fn site(repository: Arc<InMemoryRepository<Article>>) -> AdminSite {
    AdminSite::new(AdminConfig::default())
        .viewset(
            ModelViewSet::new("article", repository)
                .list_fields([
                    Field::new("id").sortable(),
                    Field::new("title").sortable(),
                    Field::new("published").boolean(),
                ])
                .query_fields(["title"])
                .form(
                    FormSchema::new()
                        .field(FormField::number("id").required().min(1.0))
                        .field(FormField::text("title").required())
                        .field(FormField::checkbox("published")),
                ),
        )
        .viewset(
            ViewSet::new("reports")
                .title("Reports")
                .view(stats_view())
                .index_view("stats")
                .viewset(ModelViewSet::new("archive", articles()).without_delete()),
        )
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_list_renders_full_page() {
    let app = site(Arc::new(articles())).router().unwrap();

    let response = app
        .oneshot(
            http::Request::builder()
                .uri("/admin/article/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<html"));
    assert!(body.contains(r#"id="list-results""#));
    assert!(body.contains("1&ndash;10 of 12"));
}

#[tokio::test]
async fn test_list_renders_fragment_for_htmx() {
    let app = site(Arc::new(articles())).router().unwrap();

    let response = app
        .oneshot(
            http::Request::builder()
                .uri("/admin/article/?query=article%201")
                .header("HX-Request", "true")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("<html"));
    assert!(body.trim_start().starts_with("<table"));
    assert!(body.contains("1&ndash;3 of 3"));
}

#[tokio::test]
async fn test_sort_links_toggle_direction() {
    let server = TestServer::new(site(Arc::new(articles())).router().unwrap()).unwrap();

    let response = server.get("/admin/article/").await;
    response.assert_status_ok();
    assert!(response
        .text()
        .contains(r#"href="/admin/article/?sorting=title""#));

    let response = server.get("/admin/article/?sorting=title").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains(r#"aria-sort="ascending""#));
    assert!(body.contains(r#"href="/admin/article/?sorting=-title""#));
}

#[tokio::test]
async fn test_create_edit_delete_flow() {
    let repository = Arc::new(articles());
    let server = TestServer::new(site(Arc::clone(&repository)).router().unwrap()).unwrap();

    let response = server
        .post("/admin/article/create")
        .form(&[("id", "13"), ("title", "Fresh"), ("published", "on")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(repository.len(), 13);

    let response = server.get("/admin/article/13").await;
    response.assert_status_ok();
    assert!(response.text().contains(r#"value="Fresh""#));

    let response = server
        .post("/admin/article/13")
        .form(&[("id", "13"), ("title", "Fresher")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let updated = repository.get_by_pk("13").await.unwrap().unwrap();
    assert_eq!(updated.title, "Fresher");
    assert!(!updated.published);

    let response = server.post("/admin/article/13/delete").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(http::header::LOCATION).unwrap(),
        "/admin/article/"
    );
    assert_eq!(repository.len(), 12);
}

#[tokio::test]
async fn test_number_bounds_are_validated() {
    let repository = Arc::new(articles());
    let server = TestServer::new(site(Arc::clone(&repository)).router().unwrap()).unwrap();

    let response = server
        .post("/admin/article/create")
        .form(&[("id", "0"), ("title", "Zero")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().contains("greater than or equal to 1"));
    assert_eq!(repository.len(), 12);
}

#[tokio::test]
async fn test_bad_query_parameters_are_rejected() {
    let server = TestServer::new(site(Arc::new(articles())).router().unwrap()).unwrap();

    let response = server.get("/admin/article/?offset=abc").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server.get("/admin/article/?limit=-1").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nested_viewsets_and_custom_views() {
    let server = TestServer::new(site(Arc::new(articles())).router().unwrap()).unwrap();

    let response = server.get("/admin/reports/stats").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("All systems nominal."));
    assert!(body.contains("<h1>Statistics</h1>"));

    let response = server.get("/admin/reports/archive/").await;
    response.assert_status_ok();
    let body = response.text();
    // Trail: dashboard, Reports, Archive
    assert!(body.contains(r#"<a href="/admin/reports/stats">Reports</a>"#));
    assert!(body.contains(r#"href="/admin/reports/archive/1/detail""#));

    let response = server.get("/admin/reports/archive/1/delete").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_lists_sections() {
    let server = TestServer::new(site(Arc::new(articles())).router().unwrap()).unwrap();

    let response = server.get("/admin/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains(r#"<a href="/admin/article/">Article</a>"#));
    assert!(body.contains(r#"<a href="/admin/reports/stats">Reports</a>"#));
}

#[tokio::test]
async fn test_navigation_marks_active_section() {
    let server = TestServer::new(site(Arc::new(articles())).router().unwrap()).unwrap();

    let response = server.get("/admin/reports/archive/").await;
    let body = response.text();
    assert!(body.contains(
        r#"<a href="/admin/reports/stats" class="active" aria-current="page">Reports</a>"#
    ));
    assert!(body.contains(r#"<a href="/admin/article/">Article</a>"#));
}

#[test]
fn test_url_for_named_routes() {
    let built = site(Arc::new(articles())).build().unwrap();

    assert_eq!(built.state.url_for("admin:index", &[]).unwrap(), "/admin/");
    assert_eq!(
        built.state.url_for("admin:article:list", &[]).unwrap(),
        "/admin/article/"
    );
    assert_eq!(
        built
            .state
            .url_for("admin:article:edit", &[("pk", "7")])
            .unwrap(),
        "/admin/article/7"
    );
    assert_eq!(
        built
            .state
            .url_for("admin:reports:archive:detail", &[("pk", "3")])
            .unwrap(),
        "/admin/reports/archive/3/detail"
    );
    assert!(built.state.url_for("admin:reports:archive:delete", &[("pk", "3")]).is_err());
    assert!(built.state.url_for("admin:article:edit", &[]).is_err());
}

#[tokio::test]
async fn test_merges_into_host_application() {
    let app = Router::new()
        .route("/", get(|| async { "home" }))
        .merge(site(Arc::new(articles())).router().unwrap());
    let server = TestServer::new(app).unwrap();

    let response = server.get("/").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "home");

    server.get("/admin/").await.assert_status_ok();
}

#[test]
fn test_invalid_tree_fails_to_build() {
    let site = AdminSite::new(AdminConfig::default())
        .viewset(ViewSet::new("empty").view(stats_view()));
    let err = site.build().err().unwrap();
    assert!(matches!(err, AdminError::Configuration(_)));
}
