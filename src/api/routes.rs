//! API Routes
//!
//! Configures the Axum router with the cache admin endpoints and the demo
//! resource.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_item_handler, health_handler, invalidate_key_handler, invalidate_pattern_handler,
    list_items_handler, list_keys_handler, stats_handler, AppState,
};

/// TTL in seconds for cached `/items` listings
pub const ITEMS_CACHE_TTL: u64 = 600;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /items` - Paged item listing, served through the response cache
/// - `POST /items` - Create an item; invalidates cached listings
/// - `GET /cache/keys` - List cached keys
/// - `DELETE /cache/keys?key=...` - Invalidate one key
/// - `DELETE /cache?pattern=...` - Invalidate keys containing a substring
/// - `GET /cache/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Response cache: only on the `/items` routes
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cached = Router::new()
        .route("/items", get(list_items_handler).post(create_item_handler))
        .layer(state.cache.layer(Some(ITEMS_CACHE_TTL)));

    Router::new()
        .route("/cache", delete(invalidate_pattern_handler))
        .route(
            "/cache/keys",
            get(list_keys_handler).delete(invalidate_key_handler),
        )
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .merge(cached)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
