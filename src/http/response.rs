//! Response value returned up the middleware stack.

use std::time::Duration;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::Headers;

/// A handler's response.
///
/// `cache` is how long the response cache may serve this response; zero
/// disables caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub code: u16,
    pub phrase: String,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub cache: Duration,
}

impl Response {
    /// Builds a response with the canonical reason phrase for `code`.
    pub fn create(code: u16, body: impl Into<Vec<u8>>) -> Self {
        let phrase = StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            code,
            phrase,
            headers: Headers::new(),
            body: body.into(),
            cache: Duration::ZERO,
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::create(200, body)
    }

    pub fn not_found() -> Self {
        Self::create(404, "File Not Found")
    }

    /// Marks the response cacheable for `lifetime`.
    pub fn with_cache(mut self, lifetime: Duration) -> Self {
        self.cache = lifetime;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
