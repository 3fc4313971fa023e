//! HTTP server: shared state, router, serve loop

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{LoginRateLimiter, SessionStore};
use crate::config::Config;
use crate::db;
use crate::error::{Error, Result};

use super::routes;

/// Interval for the background sweep of expired sessions and stale
/// rate-limit windows
const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Application state shared across handlers.
///
/// All process-wide resources live here, built once at startup and
/// passed into handlers by handle; nothing is ambient.
pub struct AppState {
    pub config: Config,
    pub db: deadpool_postgres::Pool,
    pub sessions: SessionStore,
    pub rate_limiter: LoginRateLimiter,
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP server until shutdown
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let db = db::connect_pool(&config.database)?;
    let sessions = SessionStore::new(chrono::Duration::hours(config.session.ttl_hours));
    let rate_limiter = LoginRateLimiter::new(
        config.rate_limit.max_attempts,
        Duration::from_secs(config.rate_limit.window_minutes * 60),
    );

    let state = Arc::new(AppState {
        config,
        db,
        sessions,
        rate_limiter,
    });

    // Periodic sweep so abandoned sessions and idle rate-limit windows
    // don't accumulate
    let sweeper = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.sessions.cleanup_expired().await;
            sweeper.rate_limiter.prune();
        }
    });

    let app = create_router(state)?;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // ConnectInfo carries the peer address the rate limiter keys on
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Result<Router> {
    let origin: HeaderValue = state
        .config
        .cors
        .allowed_origin
        .parse()
        .map_err(|_| {
            Error::Config(format!(
                "Invalid CORS origin: {}",
                state.config.cors.allowed_origin
            ))
        })?;

    // Exactly one origin may send credentialed requests; everything else
    // is rejected before reaching the handlers
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/", get(routes::index))
        .route("/login", post(routes::login))
        .route("/check-auth", get(routes::check_auth))
        .route("/logout", post(routes::logout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
