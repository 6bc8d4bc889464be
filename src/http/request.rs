//! Request value handed down the middleware stack.

use std::collections::BTreeMap;

use serde_json::Value;

use super::Headers;
use crate::middleware::{CookieJar, SessionData};

/// An incoming request as seen by handlers.
///
/// `url_path` is fixed at creation and keys the response cache. `path` starts
/// out equal to it and is shortened by each dispatcher that matches a prefix.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    url_path: String,
    /// Unconsumed remainder of the path
    pub path: String,
    pub query: Option<String>,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// Named regex captures collected by dispatchers
    pub url_match: BTreeMap<String, String>,
    /// Static parameters attached to matched routes
    pub url_param: BTreeMap<String, Value>,
    /// Populated by the session middleware
    pub cookies: CookieJar,
    /// Populated by the session middleware
    pub session: SessionData,
}

impl Request {
    /// Builds a request from a request target such as `/a/b?x=1`.
    pub fn create(method: impl Into<String>, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };

        Self {
            method: method.into(),
            url_path: path.to_string(),
            path: path.to_string(),
            query,
            ..Self::default()
        }
    }

    pub fn get(target: &str) -> Self {
        Self::create("GET", target)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The path as received, before any dispatch consumed it.
    pub fn url_path(&self) -> &str {
        &self.url_path
    }
}
