//! Book and copy endpoints

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
        book::{Book, BookDetails, BookQuery, BookSummary, CreateBook},
        instance::{BookInstance, CreateInstance},
    },
};

use super::{form_errors, page_window, AuthenticatedUser, FieldError, Page};

/// Book create form re-presented with its field errors
#[derive(Serialize, ToSchema)]
pub struct BookFormView {
    pub values: CreateBook,
    pub errors: Vec<FieldError>,
}

/// Copy create form re-presented with its field errors
#[derive(Serialize, ToSchema)]
pub struct InstanceFormView {
    pub values: CreateInstance,
    pub errors: Vec<FieldError>,
}

/// List books with optional title search, paginated
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Paginated book list", body = Page<BookSummary>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Page<BookSummary>>> {
    let (page, limit, offset) = page_window(query.page);
    let (books, total) = state
        .services
        .catalog
        .list_books(query.title.as_deref(), limit, offset)
        .await?;
    Ok(Json(Page::new(books, total, page, limit)))
}

/// Get book details with author, language, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/catalog/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 200, description = "Invalid submission, form re-presented", body = BookFormView),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing add-book permission")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<Response> {
    claims.require_add_book()?;

    if let Err(errors) = request.validate() {
        let form = BookFormView {
            errors: form_errors(&errors),
            values: request,
        };
        return Ok((StatusCode::OK, Json(form)).into_response());
    }

    let book = state.services.catalog.create_book(request).await?;
    let location = format!("/api/v1/catalog/books/{}", book.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(book),
    )
        .into_response())
}

/// Create a copy of a book.
///
/// The copy identifier is assigned server-side. A copy declared on loan
/// must carry a due-back date and a borrower.
#[utoipa::path(
    post,
    path = "/catalog/books/{id}/instances",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 200, description = "Invalid submission, form re-presented", body = InstanceFormView),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing add-book permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(request): Json<CreateInstance>,
) -> AppResult<Response> {
    claims.require_add_book()?;

    let invariant_errors = request.invariant_errors();
    if !invariant_errors.is_empty() {
        let form = InstanceFormView {
            errors: invariant_errors
                .into_iter()
                .map(|(field, message)| FieldError::new(field, message))
                .collect(),
            values: request,
        };
        return Ok((StatusCode::OK, Json(form)).into_response());
    }

    let instance = state
        .services
        .catalog
        .create_instance(book_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(instance)).into_response())
}
