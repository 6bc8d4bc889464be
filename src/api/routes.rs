//! API Routes
//!
//! Configures the Axum router: admin endpoints plus a fallback into the
//! middleware stack.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, stack_handler, stats_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /stats` - Response cache statistics
/// - `GET /health` - Health check endpoint
/// - anything else - handled by the middleware stack
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(stack_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
