//! LocalLibrary Server - Library Catalog
//!
//! REST API server for the LocalLibrary catalog.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locallibrary_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "locallibrary_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LocalLibrary Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Accounts
        .route("/accounts/login", post(api::auth::login))
        .route("/accounts/me", get(api::auth::me))
        // Dashboard
        .route("/catalog", get(api::dashboard::index))
        // Books
        .route("/catalog/books", get(api::books::list_books))
        .route("/catalog/books", post(api::books::create_book))
        .route("/catalog/books/:id", get(api::books::get_book))
        .route("/catalog/books/:id/instances", post(api::books::create_instance))
        // Authors
        .route("/catalog/authors", get(api::authors::list_authors))
        .route("/catalog/authors", post(api::authors::create_author))
        .route("/catalog/authors/:id", get(api::authors::get_author))
        // Genres
        .route("/catalog/genres", get(api::genres::list_genres))
        .route("/catalog/genres", post(api::genres::create_genre))
        // Languages
        .route("/catalog/languages", get(api::languages::list_languages))
        .route("/catalog/languages", post(api::languages::create_language))
        // Borrowed copies and renewals
        .route("/catalog/loans", get(api::loans::all_borrowed))
        .route("/catalog/loans/mine", get(api::loans::my_borrowed))
        .route("/catalog/instances/:id/renew", get(api::loans::renewal_form))
        .route("/catalog/instances/:id/renew", post(api::loans::renew_instance))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
