//! URL Dispatch
//!
//! Routes a request by matching regex patterns against the front of its
//! remaining path. The matched prefix is consumed so a nested dispatcher sees
//! only what is left.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::http::{Request, Response};
use crate::middleware::Handler;

/// A pattern, the handler it selects and parameters attached on match.
pub struct Route {
    pattern: Regex,
    handler: Box<dyn Handler>,
    params: BTreeMap<String, Value>,
}

impl Route {
    /// Compiles `pattern` anchored at the start of the path.
    pub fn new(pattern: &str, handler: impl Handler + 'static) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{})", pattern))?,
            handler: Box::new(handler),
            params: BTreeMap::new(),
        })
    }

    /// Attaches a parameter merged into `url_param` when the route matches.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// First-match router over an ordered list of routes.
pub struct Dispatch {
    routes: Vec<Route>,
}

impl Dispatch {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }
}

impl Handler for Dispatch {
    fn handle(&self, req: &mut Request) -> Option<Response> {
        for route in &self.routes {
            let Some(caps) = route.pattern.captures(&req.path) else {
                continue;
            };

            let consumed = caps.get(0).map_or(0, |m| m.end());
            for name in route.pattern.capture_names().flatten() {
                if let Some(value) = caps.name(name) {
                    req.url_match
                        .insert(name.to_string(), value.as_str().to_string());
                }
            }
            debug!(pattern = route.pattern.as_str(), path = %req.path, "route matched");

            req.path = req.path[consumed..].to_string();
            req.url_param
                .extend(route.params.iter().map(|(k, v)| (k.clone(), v.clone())));
            return route.handler.handle(req);
        }

        Some(Response::not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::handler_fn;

    fn echo_path() -> impl Handler {
        handler_fn(|req: &mut Request| Some(Response::ok(req.path.clone())))
    }

    #[test]
    fn test_first_match_consumes_prefix() {
        let dispatch = Dispatch::new(vec![
            Route::new("/test/", echo_path()).unwrap(),
            Route::new("/", echo_path()).unwrap(),
        ]);

        let mut req = Request::get("/test/testmatch");
        let res = dispatch.handle(&mut req).unwrap();
        assert_eq!(res.body_text(), "testmatch");
        assert_eq!(req.url_path(), "/test/testmatch");
    }

    #[test]
    fn test_match_is_anchored() {
        let dispatch = Dispatch::new(vec![Route::new("/b", echo_path()).unwrap()]);

        let res = dispatch.handle(&mut Request::get("/a/b")).unwrap();
        assert_eq!(res.code, 404);
        assert_eq!(res.body_text(), "File Not Found");
    }

    #[test]
    fn test_named_captures_and_params() {
        let dispatch = Dispatch::new(vec![Route::new(
            r"/user/(?P<id>\d+)",
            handler_fn(|req: &mut Request| {
                Some(Response::ok(format!(
                    "{}|{}|{}",
                    req.url_match["id"],
                    req.url_param["kind"].as_str().unwrap_or_default(),
                    req.path
                )))
            }),
        )
        .unwrap()
        .with_param("kind", "user")]);

        let res = dispatch.handle(&mut Request::get("/user/42/edit")).unwrap();
        assert_eq!(res.body_text(), "42|user|/edit");
    }

    #[test]
    fn test_chained_dispatch() {
        let inner = Dispatch::new(vec![Route::new("/chain2/", echo_path())
            .unwrap()
            .with_param("param2", 2)]);
        let outer = Dispatch::new(vec![Route::new("/chain", inner)
            .unwrap()
            .with_param("param1", "one")]);

        let mut req = Request::get("/chain/chain2/chainmatch");
        let res = outer.handle(&mut req).unwrap();

        assert_eq!(res.body_text(), "chainmatch");
        assert_eq!(req.url_param.len(), 2);
        assert_eq!(req.url_param["param1"], "one");
        assert_eq!(req.url_param["param2"], 2);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(Route::new("(", echo_path()).is_err());
    }
}
