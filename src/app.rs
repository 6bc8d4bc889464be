//! Demo Application
//!
//! The page handlers served by the binary and the stack they run in:
//! `Session(ResponseCache(Dispatch))`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::info;

use crate::cache::{MemoryCache, SharedCache};
use crate::config::Config;
use crate::error::Result;
use crate::http::{Request, Response};
use crate::middleware::{
    handler_fn, Dispatch, Handler, MemorySessionStore, ResponseCache, Route, Session, StaticDir,
};

/// Lifetime of the `/cached/` page.
pub const CACHED_PAGE_LIFETIME: Duration = Duration::from_secs(60);

/// Reports the request as the page saw it and bumps the session counter.
fn main_page(req: &mut Request) -> Option<Response> {
    let count = req.session.get("count").and_then(Value::as_u64).unwrap_or(0);
    info!(path = %req.path, count, "main page");

    let body = json!({
        "page": "main",
        "path": req.path,
        "count": count,
        "match": req.url_match,
        "param": req.url_param,
    });
    req.session.insert("count".to_string(), Value::from(count + 1));
    Some(Response::ok(body.to_string()).with_header("Content-Type", "application/json"))
}

fn cached_page(_req: &mut Request) -> Option<Response> {
    Some(Response::ok("cached").with_cache(CACHED_PAGE_LIFETIME))
}

/// Echoes the request body length.
fn post_page(req: &mut Request) -> Option<Response> {
    info!(len = req.body.len(), "post page");
    Some(Response::ok(req.body.len().to_string()))
}

/// Routing table for the demo pages; `/self/` serves `static_dir`.
pub fn routes(static_dir: &Path) -> Result<Dispatch> {
    let chain = Dispatch::new(vec![
        Route::new("/chain2/", handler_fn(main_page))?.with_param("param2", 2)
    ]);

    Ok(Dispatch::new(vec![
        Route::new("/chain", chain)?.with_param("param1", 1),
        Route::new("/test/", handler_fn(main_page))?.with_param("test param", 2),
        Route::new("/cached/", handler_fn(cached_page))?,
        Route::new("/post/", handler_fn(post_page))?,
        Route::new("/self/", StaticDir::new(static_dir)?)?,
        Route::new("/", handler_fn(main_page))?.with_param("main param", 1),
    ]))
}

/// Builds the full middleware stack and returns it with its response cache.
pub fn build_app(config: &Config) -> Result<(Arc<dyn Handler>, SharedCache)> {
    let cache = MemoryCache::from_config(config)?.into_shared();
    let cached = ResponseCache::new(routes(&config.static_dir)?, cache.clone());
    let app = Session::new(cached, MemorySessionStore::new(), config.session_timeout());
    Ok((Arc::new(app), cache))
}
