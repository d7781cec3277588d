//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod settings;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::{AuthAppState, MemoryLoginSessionStore, PgAccountRepository, api_router};
use auth::domain::repository::LoginSessionRepository;
use axum::http::{Method, header};
use kernel::error::app_error::AppError;
use platform::clock::{Clock, SystemClock};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let config = Arc::new(settings.auth);
    let sessions = Arc::new(MemoryLoginSessionStore::new(
        clock.clone(),
        config.session_idle_ttl(),
    ));

    spawn_session_cleanup(sessions.clone(), settings.session_cleanup_interval);

    let state = AuthAppState::new(
        Arc::new(PgAccountRepository::new(pool)),
        sessions,
        clock,
        config,
    );

    let cors = CorsLayer::new()
        .allow_origin(settings.frontend_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    let app = api_router(state)
        .fallback(|| async { AppError::not_found("No such endpoint") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let addr = settings.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Drop expired login sessions periodically
///
/// Failures are logged and retried on the next tick.
fn spawn_session_cleanup(sessions: Arc<MemoryLoginSessionStore>, every: Duration) {
    tokio::spawn(async move {
        // `interval` panics on a zero period
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            match sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(deleted) => {
                    tracing::info!(sessions_deleted = deleted, "Login session cleanup completed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Login session cleanup failed");
                }
            }
        }
    });
}
