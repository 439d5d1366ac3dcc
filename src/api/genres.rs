//! Genre endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::genre::{CreateGenre, Genre},
};

use super::{form_errors, AuthenticatedUser, FieldError};

/// Genre create form re-presented with its field errors
#[derive(Serialize, ToSchema)]
pub struct GenreFormView {
    pub values: CreateGenre,
    pub errors: Vec<FieldError>,
}

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "All genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Create a new genre
#[utoipa::path(
    post,
    path = "/catalog/genres",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 200, description = "Invalid submission, form re-presented", body = GenreFormView),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing add-book permission")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateGenre>,
) -> AppResult<Response> {
    claims.require_add_book()?;

    if let Err(errors) = request.validate() {
        let form = GenreFormView {
            errors: form_errors(&errors),
            values: request,
        };
        return Ok((StatusCode::OK, Json(form)).into_response());
    }

    match state.services.catalog.create_genre(request.clone()).await {
        Ok(genre) => Ok((StatusCode::CREATED, Json(genre)).into_response()),
        // Duplicate names come back as a field error on the form
        Err(AppError::Conflict(message)) => {
            let form = GenreFormView {
                values: request,
                errors: vec![FieldError::new("name", message)],
            };
            Ok((StatusCode::OK, Json(form)).into_response())
        }
        Err(e) => Err(e),
    }
}
