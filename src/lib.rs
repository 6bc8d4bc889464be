//! Midware - request-handling middleware stack
//!
//! URL dispatch, sessions and response caching over a bounded recency heap
//! with lazily expiring entries.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod models;

pub use api::AppState;
pub use cache::{MemoryCache, RecencyHeap, SharedCache};
pub use config::Config;
pub use error::{MidwareError, Result};
