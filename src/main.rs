//! SpinCity Server - rental, repair and sales back-office
//!
//! REST API server for the SpinCity admin panel.

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spincity_server::{
    api,
    config::{AppConfig, LoggingConfig, StoreBackend},
    repository::{MemoryStore, PgStore, SharedStore},
    services::{email::EmailService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging)?;

    tracing::info!("Starting SpinCity Server v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;

    let email = Arc::new(EmailService::new(config.email.clone()));
    if !config.email.enabled {
        tracing::info!("Audit emails disabled");
    }

    let services = Services::new(store, &config, email)
        .await
        .context("Failed to create services")?;

    let mut auth_changes = services.sessions.auth_changes();
    tokio::spawn(async move {
        while auth_changes.changed().await.is_ok() {
            let change = auth_changes.borrow_and_update().clone();
            if let Some(change) = change {
                tracing::info!(
                    session = %change.session_id,
                    user = %change.user_id,
                    state = ?change.state,
                    "Authentication state changed"
                );
            }
        }
    });

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global subscriber: console output in the configured format,
/// plus a daily rolling file when a log directory is set
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("spincity_server={},tower_http=debug", config.level).into());

    let (file_layer, guard) = match &config.file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "spincity-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        "journald" => registry
            .with(tracing_journald::layer().context("Failed to connect to journald")?)
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(guard)
}

/// Open the configured document store
async fn open_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    match config.database.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory document store, data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Database migrations completed");

            let store = PgStore::new(pool)
                .await
                .context("Failed to start the change listener")?;
            Ok(Arc::new(store))
        }
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api::router(state))
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
