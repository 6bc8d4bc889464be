//! Middleware Module
//!
//! Handlers that wrap other handlers: URL dispatch, response caching and
//! cookie-backed sessions. Also a static directory handler to route to.
//!
//! A typical stack, outermost first: `Session` → `ResponseCache` → `Dispatch`.

mod cookie;
mod dispatch;
mod handler;
mod response_cache;
mod session;
mod static_dir;

pub use cookie::CookieJar;
pub use dispatch::{Dispatch, Route};
pub use handler::{handler_fn, Handler, HandlerFn};
pub use response_cache::ResponseCache;
pub use session::{
    new_session_id, MemorySessionStore, Session, SessionData, SessionStore, SESSION_COOKIE,
};
pub use static_dir::StaticDir;
