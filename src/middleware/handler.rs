//! The handler interface every middleware consumes and produces.

use std::fmt;
use std::sync::Arc;

use crate::http::{Request, Response};

/// Turns a request into a response, or into nothing.
///
/// Middlewares are handlers that own another handler. Handlers may mutate the
/// request (dispatch consumes `path`, sessions fill `session`).
pub trait Handler: Send + Sync {
    fn handle(&self, req: &mut Request) -> Option<Response>;
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn handle(&self, req: &mut Request) -> Option<Response> {
        (**self).handle(req)
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle(&self, req: &mut Request) -> Option<Response> {
        (**self).handle(req)
    }
}

/// Handler backed by a closure, built with [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut Request) -> Option<Response> + Send + Sync,
{
    fn handle(&self, req: &mut Request) -> Option<Response> {
        (self.f)(req)
    }
}

/// Wraps a closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut Request) -> Option<Response> + Send + Sync,
{
    HandlerFn { f }
}
