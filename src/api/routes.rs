//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    calls_handler, fetch_handler, health_handler, memo_stats_handler, replay_handler,
    retrieve_handler, store_handler, AppState, MAX_BODY_SIZE,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /store` - Store a value under a generated key
/// - `GET /retrieve/:key` - Retrieve a value (`?as=raw|text|int|float`)
/// - `GET /calls/:operation` - Invocation count of an operation
/// - `GET /replay/:operation` - Recorded call trace of an operation
/// - `GET /fetch?url=` - Memoized page fetch
/// - `GET /memo/stats` - Memoizer statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/store", put(store_handler))
        .route("/retrieve/:key", get(retrieve_handler))
        .route("/calls/:operation", get(calls_handler))
        .route("/replay/:operation", get(replay_handler))
        .route("/fetch", get(fetch_handler))
        .route("/memo/stats", get(memo_stats_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
