//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorQuery, CreateAuthor},
        book::BookSummary,
    },
};

use super::{form_errors, page_window, AuthenticatedUser, FieldError, Page};

/// Author with their books, for the detail view
#[derive(Serialize, ToSchema)]
pub struct AuthorDetails {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

/// Author create form re-presented with its field errors
#[derive(Serialize, ToSchema)]
pub struct AuthorFormView {
    pub values: CreateAuthor,
    pub errors: Vec<FieldError>,
}

/// List authors, paginated
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Paginated author list", body = Page<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<Page<Author>>> {
    let (page, limit, offset) = page_window(query.page);
    let (authors, total) = state.services.catalog.list_authors(limit, offset).await?;
    Ok(Json(Page::new(authors, total, page, limit)))
}

/// Get author details with their books
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let (author, books) = state.services.catalog.get_author(id).await?;
    Ok(Json(AuthorDetails { author, books }))
}

/// Create a new author.
///
/// Requires the add-author permission. A malformed submission is
/// re-presented with field errors and nothing is persisted; a valid one
/// answers 201 with the new author and its detail location.
#[utoipa::path(
    post,
    path = "/catalog/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 200, description = "Invalid submission, form re-presented", body = AuthorFormView),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing add-author permission")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAuthor>,
) -> AppResult<Response> {
    claims.require_add_author()?;

    if let Err(errors) = request.validate() {
        let form = AuthorFormView {
            errors: form_errors(&errors),
            values: request,
        };
        return Ok((StatusCode::OK, Json(form)).into_response());
    }

    let author = state.services.catalog.create_author(request).await?;
    let location = format!("/api/v1/catalog/authors/{}", author.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(author),
    )
        .into_response())
}
