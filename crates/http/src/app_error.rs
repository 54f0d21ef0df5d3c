//! Typed error for HTTP handlers.
//!
//! Converts service errors into HTML error pages with the right status code.
//! Handlers return `Result<Response, AppError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookshelf_service::ServiceError;

use crate::views;

/// Handler error with HTTP status code and human-readable message.
///
/// `Internal` logs the real error server-side and shows a static message,
/// so no error detail reaches the browser.
#[derive(Debug)]
pub enum AppError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 404 Not Found: requested book doesn't exist.
    NotFound(String),
    /// 503 Service Unavailable: database busy or pool exhausted.
    ServiceUnavailable(String),
    /// 500 Internal Server Error: unexpected failure.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::ServiceUnavailable(err) => {
                tracing::warn!(error = %err, "transient storage failure");
                (StatusCode::SERVICE_UNAVAILABLE, "the catalog is busy, try again".to_owned())
            },
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
        };
        (status, views::error_page(status, &message)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        if err.is_not_found() {
            return Self::NotFound(err.to_string());
        }
        if err.is_transient() {
            return Self::ServiceUnavailable(err.to_string());
        }
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use bookshelf_storage::StorageError;

    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ServiceError::Storage(StorageError::NotFound { entity: "book", id: "9".into() });
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn pool_timeout_maps_to_503() {
        let err = ServiceError::Storage(StorageError::Database(sqlx::Error::PoolTimedOut));
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn duplicate_is_internal_when_unhandled() {
        let err = ServiceError::Storage(StorageError::Duplicate("Dune".into()));
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
