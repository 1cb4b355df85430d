//! API Module
//!
//! HTTP handlers and routing for the cache admin API and the demo resource.
//!
//! # Endpoints
//! - `GET /items`, `POST /items` - Demo resource behind the response cache
//! - `GET /cache/keys` - List cached keys
//! - `DELETE /cache/keys?key=...` - Invalidate one key
//! - `DELETE /cache?pattern=...` - Invalidate by substring
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, ITEMS_CACHE_TTL};
