//! # Gradus HTTP API Module
//!
//! This module implements the HTTP REST admin API using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /learners` - List all tracked learners
//! - `GET /learners/{id}` - Full progress record
//! - `POST /learners/{id}/stamps` - Award a stage stamp
//! - `POST /learners/{id}/capstone` - Record the capstone signal
//! - `POST /learners/{id}/graduate` - Attempt graduation
//! - `GET /learners/{id}/access` - Access-window validity
//! - `POST /learners/{id}/extend` - Extend the access window
//! - `POST /learners/{id}/aptitude` - Run the aptitude assessment
//! - `DELETE /learners/{id}` - Reset a learner
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `GRADUS_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `GRADUS_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `GRADUS_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
pub mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use gradus_core::{GradusError, Ledger};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the progress ledger.
///
/// All mutations funnel through the write half of the lock, so record
/// revisions advance one write at a time.
#[derive(Clone)]
pub struct AppState {
    /// The ledger holding every learner's record.
    pub ledger: Arc<RwLock<Ledger>>,
}

impl AppState {
    /// Create new app state with a ledger.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `GRADUS_CORS_ORIGINS`:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("GRADUS_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (GRADUS_CORS_ORIGINS=*). This is insecure for production!"
            );
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
                tracing::warn!(
                    "CORS: No valid origins in GRADUS_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No GRADUS_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set GRADUS_API_KEY environment variable to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/learners", get(handlers::list_learners_handler))
        .route("/learners/{id}", get(handlers::status_handler))
        .route("/learners/{id}", delete(handlers::reset_handler))
        .route("/learners/{id}/stamps", post(handlers::earn_stamp_handler))
        .route("/learners/{id}/capstone", post(handlers::capstone_handler))
        .route("/learners/{id}/graduate", post(handlers::graduate_handler))
        .route("/learners/{id}/access", get(handlers::access_handler))
        .route("/learners/{id}/extend", post(handlers::extend_handler))
        .route("/learners/{id}/aptitude", post(handlers::aptitude_handler));

    // Authentication runs innermost (last on the request path)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, ledger: Ledger) -> Result<(), GradusError> {
    let state = AppState::new(ledger);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GradusError::Storage(format!("Bind failed: {}", e)))?;

    tracing::info!("Gradus HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| GradusError::Storage(format!("Server error: {}", e)))
}
