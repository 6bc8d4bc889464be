//! API Handlers
//!
//! Bridges axum requests into the middleware stack and serves the
//! cache statistics and health endpoints.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Json,
};
use tracing::warn;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{MidwareError, Result};
use crate::http::{Request, Response};
use crate::middleware::Handler;
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The middleware stack every non-admin request runs through
    pub app: Arc<dyn Handler>,
    /// The response cache inside `app`, for statistics
    pub cache: SharedCache,
}

impl AppState {
    pub fn new(app: Arc<dyn Handler>, cache: SharedCache) -> Self {
        Self { app, cache }
    }

    /// Builds the demo application stack from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (app, cache) = crate::app::build_app(config)?;
        Ok(Self::new(app, cache))
    }
}

/// Fallback handler: runs the request through the middleware stack.
///
/// A stack that produces no response yields `404 File Not Found`.
pub async fn stack_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<axum::response::Response> {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let mut req = Request::create(method.as_str(), target).with_body(body.to_vec());
    for (name, value) in &headers {
        match value.to_str() {
            Ok(value) => req.headers.add(name.as_str(), value),
            Err(_) => warn!(header = %name, "dropping non-ASCII header"),
        }
    }

    let res = state.app.handle(&mut req).unwrap_or_else(Response::not_found);
    into_http_response(res)
}

fn into_http_response(res: Response) -> Result<axum::response::Response> {
    let status = StatusCode::from_u16(res.code)
        .map_err(|err| MidwareError::Internal(format!("bad status {}: {}", res.code, err)))?;

    let mut builder = axum::http::Response::builder().status(status);
    for (name, value) in res.headers.iter() {
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from(res.body))
        .map_err(|err| MidwareError::Internal(err.to_string()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state
        .cache
        .lock()
        .map_err(|_| MidwareError::Internal("response cache lock poisoned".to_string()))?
        .stats();

    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
