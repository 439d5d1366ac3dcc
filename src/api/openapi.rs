//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, dashboard, genres, health, languages, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLibrary API",
        version = "0.1.0",
        description = "Library Catalog REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Accounts
        auth::login,
        auth::me,
        // Dashboard
        dashboard::index,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::create_instance,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        // Genres & languages
        genres::list_genres,
        genres::create_genre,
        languages::list_languages,
        languages::create_language,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::renewal_form,
        loans::renew_instance,
    ),
    components(
        schemas(
            // Accounts
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Dashboard
            dashboard::DashboardCounts,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            books::BookFormView,
            books::InstanceFormView,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            authors::AuthorDetails,
            authors::AuthorFormView,
            // Genres & languages
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            genres::GenreFormView,
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            languages::LanguageFormView,
            // Copies
            crate::models::instance::BookInstance,
            crate::models::instance::InstanceDetails,
            crate::models::instance::InstanceStatus,
            crate::models::instance::CreateInstance,
            crate::models::instance::BorrowedCopy,
            // Loans
            loans::RenewalFormView,
            loans::RenewRequest,
            loans::RenewalOutcome,
            // Shared
            crate::api::FieldError,
            crate::api::PageQuery,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "accounts", description = "Authentication"),
        (name = "catalog", description = "Dashboard"),
        (name = "books", description = "Books and copies"),
        (name = "authors", description = "Authors"),
        (name = "genres", description = "Genres"),
        (name = "languages", description = "Languages"),
        (name = "loans", description = "Borrowed copies and renewals"),
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router serving the OpenAPI document
pub fn create_openapi_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
