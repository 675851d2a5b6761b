//! # Ordo HTTP API Module
//!
//! This module implements the HTTP JSON API using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Item counts
//! - `GET /items` - All items, active then archived
//! - `POST /items` - Add an item
//! - `GET /items/{id}` - One item (404 if absent)
//! - `DELETE /items/{id}` - Delete an item
//! - `POST /items/{id}/completed` - Set or clear the completed flag
//! - `POST /items/{id}/archive` - Archive an item
//! - `POST /items/move` - Move one active item to a new index
//! - `POST /items/reorder` - Replace the active order
//!
//! ## Security Configuration
//!
//! - `cors_origins` / `ORDO_CORS_ORIGINS`: comma-separated origins, or "*" for all (default: localhost only)
//! - `rate_limit` / `ORDO_RATE_LIMIT`: requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::error_status;
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    AddItemRequest, HealthResponse, ItemResponse, ItemsResponse, MoveRequest, MutationResponse,
    OrderResponse, ReorderRequest, SetCompletedRequest, StatusResponse,
};

use crate::config::{Config, DEFAULT_RATE_LIMIT};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use ordo_core::{Board, OrdoError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Middleware settings for the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Comma-separated origins, "*", or `None` for localhost only.
    pub cors_origins: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
        }
    }
}

impl From<&Config> for ApiSettings {
    fn from(config: &Config) -> Self {
        Self {
            rate_limit: config.rate_limit,
            cors_origins: config.cors_origins.clone(),
        }
    }
}

/// Shared server state containing the board.
///
/// The SQLite connection is not `Sync`, so the board sits behind a mutex and
/// requests are served one at a time.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Mutex<Board>>,
    pub settings: ApiSettings,
}

impl AppState {
    /// Create new app state with default settings.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self::with_settings(board, ApiSettings::default())
    }

    #[must_use]
    pub fn with_settings(board: Board, settings: ApiSettings) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
            settings,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

/// Build the CORS layer.
///
/// - `Some("*")`: allows all origins
/// - `None`: localhost only
/// - otherwise: the comma-separated list, falling back to localhost if none parse
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure outside development!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.settings.cors_origins.as_deref());

    let rate_limit = state.settings.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route(
            "/items",
            get(handlers::list_handler).post(handlers::add_handler),
        )
        .route("/items/move", post(handlers::move_handler))
        .route("/items/reorder", post(handlers::reorder_handler))
        .route(
            "/items/{id}",
            get(handlers::get_handler).delete(handlers::delete_handler),
        )
        .route(
            "/items/{id}/completed",
            post(handlers::set_completed_handler),
        )
        .route("/items/{id}/archive", post(handlers::archive_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, board: Board, settings: ApiSettings) -> Result<(), OrdoError> {
    let router = create_router(AppState::with_settings(board, settings));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| OrdoError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Ordo HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| OrdoError::Io(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
