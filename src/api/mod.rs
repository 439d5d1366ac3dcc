//! API handlers for the LocalLibrary REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod dashboard;
pub mod genres;
pub mod health;
pub mod languages;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Items shown per page on every paginated listing
pub const PAGE_SIZE: i64 = 10;

/// Extractor for authenticated user from JWT token.
///
/// Rejection is a redirect to the login flow carrying the original
/// destination, so an unauthenticated caller can resume where it left off.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // The original path survives router nesting in the OriginalUri extension
        let next = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated { next: next.clone() })?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Unauthenticated { next });
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::Unauthenticated { next })?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Page-number query parameter shared by the list endpoints
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
}

/// LIMIT/OFFSET window for a 1-based page number
pub fn page_window(page: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    (page, PAGE_SIZE, (page - 1) * PAGE_SIZE)
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows of the current page
    pub items: Vec<T>,
    /// Total number of rows across all pages
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
    /// Number of pages
    pub num_pages: i64,
    /// Whether the listing spans more than one page
    pub is_paginated: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let num_pages = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            items,
            total,
            page,
            per_page,
            num_pages,
            is_paginated: total > per_page,
        }
    }
}

/// Validation problem attached to a single form field
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten validator errors into field-level form errors
pub fn form_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut result = Vec::new();
    for (field, problems) in errors.field_errors() {
        for problem in problems {
            let message = problem
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| problem.code.to_string());
            result.push(FieldError::new(field.to_string(), message));
        }
    }
    result
}
