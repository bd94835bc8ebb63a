//! Test server utilities using axum-test
//!
//! Provides a thin wrapper around `axum-test::TestServer` that serves a built
//! [`AdminSite`].

use axum::Router;

use crate::site::AdminSite;

/// Test server wrapper for admin integration tests
pub struct TestServer {
    inner: axum_test::TestServer,
}

impl TestServer {
    /// Create a new test server from an Axum router
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be started
    pub fn new(app: Router) -> anyhow::Result<Self> {
        let inner = axum_test::TestServer::new(app)?;
        Ok(Self { inner })
    }

    /// Build `site` and serve its router
    ///
    /// # Errors
    ///
    /// Returns an error if the site cannot be built or the server started
    pub fn from_site(site: &AdminSite) -> anyhow::Result<Self> {
        Self::new(site.router()?)
    }

    /// Make a GET request to the server
    pub fn get(&self, path: &str) -> axum_test::TestRequest {
        self.inner.get(path)
    }

    /// Make a POST request to the server
    pub fn post(&self, path: &str) -> axum_test::TestRequest {
        self.inner.post(path)
    }

    /// POST url-encoded `pairs`, as a browser submits a form
    pub async fn post_form(&self, path: &str, pairs: &[(&str, &str)]) -> axum_test::TestResponse {
        self.inner.post(path).form(&pairs).await
    }

    /// Get the inner `axum_test::TestServer` for advanced usage
    #[must_use]
    pub const fn inner(&self) -> &axum_test::TestServer {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::testing::assert_location;

    #[tokio::test]
    async fn test_server_serves_dashboard() {
        let site = AdminSite::new(AdminConfig::default());
        let server = TestServer::from_site(&site).unwrap();

        let response = server.get("/admin/").await;
        response.assert_status_ok();
        assert!(response.text().contains("Acton Admin"));
    }

    #[tokio::test]
    async fn test_base_path_redirects_to_dashboard() {
        let site = AdminSite::new(AdminConfig::default());
        let server = TestServer::from_site(&site).unwrap();

        let response = server.get("/admin").await;
        assert_eq!(response.status_code(), http::StatusCode::PERMANENT_REDIRECT);
        assert_location(&response, "/admin/");
    }
}
