//! API Module
//!
//! Axum front end for the middleware stack.
//!
//! # Endpoints
//! - `GET /stats` - Response cache statistics
//! - `GET /health` - Health check endpoint
//! - any other path - served by the middleware stack

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
