//! Response models for the server's own endpoints
//!
//! DTOs serialized by the `/stats` and `/health` handlers. Application pages
//! use [`crate::http::Response`] instead.

pub mod responses;

pub use responses::{HealthResponse, StatsResponse};
