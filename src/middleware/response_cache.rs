//! Response Cache Middleware
//!
//! Serves responses from a [`MemoryCache`] keyed by request path. Only
//! responses that declare a cache lifetime and carry a body are stored.
//! Caching is best effort: lock or encoding failures are logged and the
//! request proceeds as if nothing were cached.

use std::sync::MutexGuard;

use tracing::{info, warn};

use crate::cache::{MemoryCache, SharedCache};
use crate::error::{MidwareError, Result};
use crate::http::{Request, Response};
use crate::middleware::Handler;

/// Wraps `inner`, answering repeated paths from the cache.
///
/// A hit never invokes `inner`, so its side effects do not happen on hits.
pub struct ResponseCache<H> {
    inner: H,
    cache: SharedCache,
}

impl<H: Handler> ResponseCache<H> {
    pub fn new(inner: H, cache: SharedCache) -> Self {
        Self { inner, cache }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryCache<String, Vec<u8>>>> {
        self.cache
            .lock()
            .map_err(|_| MidwareError::Internal("response cache lock poisoned".to_string()))
    }

    fn lookup(&self, key: &str) -> Result<Option<Response>> {
        let key = key.to_string();
        let Some(bytes) = self.lock()?.get_data(&key) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn store(&self, key: &str, res: &Response) -> Result<()> {
        let bytes = serde_json::to_vec(res)?;
        self.lock()?.set_data(key.to_string(), bytes, Some(res.cache));
        Ok(())
    }
}

impl<H: Handler> Handler for ResponseCache<H> {
    fn handle(&self, req: &mut Request) -> Option<Response> {
        let key = req.url_path().to_string();

        match self.lookup(&key) {
            Ok(Some(res)) => {
                info!(path = %key, "cache hit");
                return Some(res);
            }
            Ok(None) => {}
            Err(err) => warn!(path = %key, error = %err, "cache lookup skipped"),
        }

        let mut res = self.inner.handle(req)?;
        if !res.cache.is_zero() && !res.body.is_empty() {
            res.headers
                .set("Cache-Control", format!("max-age={}", res.cache.as_secs()));
            if let Err(err) = self.store(&key, &res) {
                warn!(path = %key, error = %err, "cache store skipped");
            }
        }
        Some(res)
    }
}
