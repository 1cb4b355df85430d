//! Response Cache - an in-process TTL cache for axum services
//!
//! Caches GET responses behind a `tower` layer, expires entries lazily on
//! read and with a background sweeper, and supports substring invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheService;
pub use config::Config;
pub use middleware::ResponseCacheLayer;
pub use tasks::{spawn_sweeper, SweeperHandle};
