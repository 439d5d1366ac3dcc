//! Language endpoints

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
    models::language::{CreateLanguage, Language},
};

use super::{form_errors, AuthenticatedUser, FieldError};

/// Language create form re-presented with its field errors
#[derive(Serialize, ToSchema)]
pub struct LanguageFormView {
    pub values: CreateLanguage,
    pub errors: Vec<FieldError>,
}

/// List all languages
#[utoipa::path(
    get,
    path = "/catalog/languages",
    tag = "languages",
    responses(
        (status = 200, description = "All languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

/// Create a new language
#[utoipa::path(
    post,
    path = "/catalog/languages",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 200, description = "Invalid submission, form re-presented", body = LanguageFormView),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing add-book permission")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateLanguage>,
) -> AppResult<Response> {
    claims.require_add_book()?;

    if let Err(errors) = request.validate() {
        let form = LanguageFormView {
            errors: form_errors(&errors),
            values: request,
        };
        return Ok((StatusCode::OK, Json(form)).into_response());
    }

    match state.services.catalog.create_language(request.clone()).await {
        Ok(language) => Ok((StatusCode::CREATED, Json(language)).into_response()),
        // Duplicate names come back as a field error on the form
        Err(AppError::Conflict(message)) => {
            let form = LanguageFormView {
                values: request,
                errors: vec![FieldError::new("name", message)],
            };
            Ok((StatusCode::OK, Json(form)).into_response())
        }
        Err(e) => Err(e),
    }
}
