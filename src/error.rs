//! Error types for the LocalLibrary server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Login entry point unauthenticated callers are redirected to.
pub const LOGIN_PATH: &str = "/api/v1/accounts/login";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No identity established. Carries the original destination so the
    /// caller can resume it after logging in.
    #[error("Authentication required")]
    Unauthenticated { next: String },

    /// Credential verification failed at the login endpoint itself
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            // Unauthenticated callers are sent to the login flow with their
            // destination preserved, rather than given a bare status code.
            AppError::Unauthenticated { next } => {
                let location = format!("{}?next={}", LOGIN_PATH, next);
                return (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
            }
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, "authentication", msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_redirects_to_login_with_next() {
        let err = AppError::Unauthenticated {
            next: "/api/v1/catalog/loans/mine".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert_eq!(
            location,
            "/api/v1/accounts/login?next=/api/v1/catalog/loans/mine"
        );
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = AppError::Forbidden("no permission".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound("unknown copy".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
