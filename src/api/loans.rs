//! Borrowed-copy listings and the loan renewal workflow

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::instance::{BorrowedCopy, InstanceDetails},
    services::loans::{default_renewal_date, validate_renewal_date},
};

use super::{page_window, AuthenticatedUser, FieldError, Page, PageQuery};

/// Path the caller is sent to after a successful renewal
const ALL_BORROWED_PATH: &str = "/api/v1/catalog/loans";

/// Renewal form view-model: the copy, the proposed date and any field errors
#[derive(Serialize, ToSchema)]
pub struct RenewalFormView {
    pub instance: InstanceDetails,
    /// Proposed due-back date (the default on first presentation)
    pub due_back: NaiveDate,
    pub errors: Vec<FieldError>,
}

/// Renewal submission
#[derive(Deserialize, ToSchema)]
pub struct RenewRequest {
    /// Proposed due-back date
    pub due_back: NaiveDate,
}

/// Successful renewal outcome
#[derive(Serialize, ToSchema)]
pub struct RenewalOutcome {
    pub id: Uuid,
    /// Committed due-back date
    pub due_back: NaiveDate,
    /// Where the caller should navigate next (the all-borrowed listing)
    pub next: String,
}

/// List the caller's borrowed copies.
///
/// Copies on loan to the authenticated user, ascending by due-back date.
/// Needs no special permission, only a login.
#[utoipa::path(
    get,
    path = "/catalog/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's copies on loan", body = Page<BorrowedCopy>),
        (status = 302, description = "Not authenticated, redirected to login")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BorrowedCopy>>> {
    let (page, limit, offset) = page_window(query.page);
    let (copies, total) = state
        .services
        .loans
        .borrowed_by_user(claims.user_id, limit, offset)
        .await?;
    Ok(Json(Page::new(copies, total, page, limit)))
}

/// List all borrowed copies, any borrower.
///
/// Restricted to holders of the mark-returned permission.
#[utoipa::path(
    get,
    path = "/catalog/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All copies on loan", body = Page<BorrowedCopy>),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing mark-returned permission")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BorrowedCopy>>> {
    claims.require_mark_returned()?;

    let (page, limit, offset) = page_window(query.page);
    let (copies, total) = state.services.loans.borrowed_all(limit, offset).await?;
    Ok(Json(Page::new(copies, total, page, limit)))
}

/// Present the renewal form for a copy.
///
/// The proposed due-back date defaults to three weeks from today,
/// computed now rather than from the copy's state.
#[utoipa::path(
    get,
    path = "/catalog/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy identifier")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewalFormView),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing mark-returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalFormView>> {
    claims.require_mark_returned()?;

    let instance = state.services.loans.get_instance(id).await?;
    let today = Utc::now().date_naive();

    Ok(Json(RenewalFormView {
        instance,
        due_back: default_renewal_date(today),
        errors: Vec::new(),
    }))
}

/// Renew a loan: set the copy's due-back date to the proposed date.
///
/// A permission-holding caller may renew any copy, not only their own.
/// An out-of-range date re-presents the form with the error attached to
/// the due_back field and leaves the copy untouched.
#[utoipa::path(
    post,
    path = "/catalog/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy identifier")
    ),
    request_body = RenewRequest,
    responses(
        (status = 200, description = "Renewed, or invalid date with form re-presented", body = RenewalOutcome),
        (status = 302, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing mark-returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewRequest>,
) -> AppResult<Response> {
    claims.require_mark_returned()?;

    // Existence is checked independently of the date rules
    let instance = state.services.loans.get_instance(id).await?;

    let today = Utc::now().date_naive();
    if let Err(problem) = validate_renewal_date(today, request.due_back) {
        let form = RenewalFormView {
            instance,
            due_back: request.due_back,
            errors: vec![FieldError::new("due_back", problem.message())],
        };
        return Ok((StatusCode::OK, Json(form)).into_response());
    }

    state.services.loans.renew(id, request.due_back).await?;

    Ok(Json(RenewalOutcome {
        id,
        due_back: request.due_back,
        next: ALL_BORROWED_PATH.to_string(),
    })
    .into_response())
}
