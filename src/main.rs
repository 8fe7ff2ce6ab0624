//! Libretto Server - Library Catalog
//!
//! REST API, server-rendered catalog pages and administrative console
//! over a shared PostgreSQL store.

use axum::{
    response::Redirect,
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

use libretto_server::{admin, api, config::AppConfig, pages, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("libretto_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libretto Server v{}", env!("CARGO_PKG_VERSION"));

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

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Operator command: `libretto-server seed` loads the fixture file and exits
    if std::env::args().nth(1).as_deref() == Some("seed") {
        match services.fixtures.load(&config.fixtures.path).await {
            Ok(report) => println!(
                "Data loaded successfully ({} users, {} authors, {} books)",
                report.users, report.authors, report.books
            ),
            Err(e) => println!("Error loading data: {}", e),
        }
        return Ok(());
    }

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

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

    // REST API
    let api = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Authors
        .route(
            "/authors",
            get(api::authors::list_authors).post(api::authors::create_author),
        )
        .route("/authors/stats", get(api::authors::author_stats))
        .route(
            "/authors/:id",
            get(api::authors::get_author)
                .put(api::authors::update_author)
                .patch(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        .route("/authors/:id/books", get(api::authors::author_books))
        // Books
        .route(
            "/books",
            get(api::books::list_books).post(api::books::create_book),
        )
        .route("/books/available", get(api::books::available_books))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .patch(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .route(
            "/books/:id/toggle_availability",
            post(api::books::toggle_availability),
        );

    // Server-rendered catalog pages
    let site = Router::new()
        .route("/", get(|| async { Redirect::permanent("/books/") }))
        .route("/books/", get(pages::books::book_list))
        .route("/books/:id/", get(pages::books::book_detail))
        .route("/authors/", get(pages::authors::author_list))
        .route("/authors/:id/", get(pages::authors::author_detail));

    // Administrative console
    let admin = Router::new()
        .route("/", get(admin::index))
        .route("/login", get(admin::login_form).post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/authors/", get(admin::authors::list))
        .route("/authors/create", post(admin::authors::create))
        .route(
            "/authors/:id/",
            get(admin::authors::edit_form).post(admin::authors::update),
        )
        .route("/authors/:id/delete", post(admin::authors::delete))
        .route("/books/", get(admin::books::list))
        .route("/books/create", post(admin::books::create))
        .route("/books/bulk", post(admin::books::bulk_action))
        .route(
            "/books/:id/",
            get(admin::books::edit_form).post(admin::books::update),
        )
        .route("/books/:id/delete", post(admin::books::delete));

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(site)
        .nest("/api", api)
        .nest("/admin", admin)
        .with_state(state)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
