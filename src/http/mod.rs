//! HTTP value types
//!
//! Plain request and response values passed through the middleware stack.
//! The axum bridge in [`crate::api`] converts to and from them.

mod headers;
mod request;
mod response;

pub use headers::Headers;
pub use request::Request;
pub use response::Response;
