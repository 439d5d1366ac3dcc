//! Home dashboard endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Counts shown on the home dashboard
#[derive(Serialize, ToSchema)]
pub struct DashboardCounts {
    /// Total number of books
    pub num_books: i64,
    /// Total number of copies
    pub num_instances: i64,
    /// Copies currently available for borrowing
    pub num_instances_available: i64,
    /// Total number of authors
    pub num_authors: i64,
    /// Word counted in book titles
    pub title_keyword: String,
    /// Books whose title contains the keyword (case-insensitive)
    pub num_books_with_keyword: i64,
    /// Dashboard visits so far, including this one
    pub num_visits: i64,
}

/// Home dashboard with catalog counts.
/// Each request counts as one visit.
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardCounts)
    )
)]
pub async fn index(State(state): State<crate::AppState>) -> AppResult<Json<DashboardCounts>> {
    let counts = state
        .services
        .catalog
        .dashboard(&state.config.catalog.title_keyword)
        .await?;
    Ok(Json(counts))
}
