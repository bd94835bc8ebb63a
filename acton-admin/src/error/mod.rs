//! Error types and error handling
//!
//! Repository failures and misconfiguration are surfaced as [`AdminError`],
//! which converts into an HTTP response. Form validation problems are not
//! errors at this level: they are re-rendered into the form instead.

use axum::response::{Html, IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Errors raised by a [`Repository`](crate::repository::Repository)
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The change conflicts with existing data (duplicate key, constraint)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request was rejected by the repository (unknown column, bad value)
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Any other backend failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Database error
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// HTTP status this error maps to
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Admin error type
#[derive(Debug, Error)]
pub enum AdminError {
    /// The declared views cannot be turned into a working site
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not Found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<figment::Error> for AdminError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl AdminError {
    /// HTTP status this error maps to
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(err) => err.status_code(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Admin request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Admin request rejected");
        }

        let reason = status.canonical_reason().unwrap_or("Error");
        let message = if status.is_server_error() {
            // Backend details stay in the logs
            "The server could not complete the request.".to_string()
        } else {
            self.to_string()
        };

        let body = crate::template::render_error_page(status.as_u16(), reason, &message);
        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AdminError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdminError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdminError::from(RepositoryError::NotFound("x".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdminError::from(RepositoryError::Conflict("x".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AdminError::from(RepositoryError::Backend("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AdminError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_error_hides_details() {
        let response =
            AdminError::from(RepositoryError::Backend("secret dsn".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_error_response() {
        let response = AdminError::NotFound("item_42".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
