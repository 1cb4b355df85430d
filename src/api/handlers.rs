//! API Handlers
//!
//! Cache administration endpoints plus a small demo resource whose reads go
//! through the response cache.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::cache::CacheService;
use crate::error::{CacheError, Result};
use crate::models::{
    CreateItemRequest, HealthResponse, InvalidateResponse, Item, ItemsPage, ItemsQuery, KeyQuery,
    KeysResponse, PatternQuery, StatsResponse,
};

/// Items returned per page by `GET /items`
pub const ITEMS_PER_PAGE: usize = 10;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared response cache
    pub cache: CacheService,
    /// Demo item collection
    pub items: Arc<RwLock<Vec<Item>>>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: CacheService) -> Self {
        Self {
            cache,
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CacheService::from_config(config))
    }
}

/// Handler for GET /cache/keys
pub async fn list_keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse::new(state.cache.list_keys().await))
}

/// Handler for DELETE /cache/keys?key=...
///
/// Invalidating a key that is not cached still succeeds.
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<InvalidateResponse>> {
    let key = query
        .key
        .ok_or_else(|| CacheError::InvalidArgument("Missing 'key' parameter".to_string()))?;

    let removed = state.cache.invalidate(&key).await?;
    Ok(Json(InvalidateResponse::for_key(&key, removed)))
}

/// Handler for DELETE /cache?pattern=...
///
/// The parameter is required so a bare `DELETE /cache` cannot wipe the cache
/// by accident; `pattern=` clears everything on purpose.
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<InvalidateResponse>> {
    let pattern = query
        .pattern
        .ok_or_else(|| CacheError::InvalidArgument("Missing 'pattern' parameter".to_string()))?;

    let removed = state.cache.invalidate_by_pattern(&pattern).await;
    if pattern.is_empty() {
        info!("Cache cleared by empty pattern ({} entries)", removed);
    }
    Ok(Json(InvalidateResponse::for_pattern(&pattern, removed)))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /items?page=N
///
/// Registered behind the response cache; never touches the cache itself.
pub async fn list_items_handler(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Json<ItemsPage> {
    let page = query.page.unwrap_or(1).max(1);
    let items = state.items.read().await;

    let page_items = items
        .iter()
        .skip((page - 1).saturating_mul(ITEMS_PER_PAGE))
        .take(ITEMS_PER_PAGE)
        .cloned()
        .collect();

    Json(ItemsPage {
        page,
        items: page_items,
        total: items.len(),
    })
}

/// Handler for POST /items
///
/// Invalidates every cached `/items` listing after the insert.
pub async fn create_item_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>)> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    let item = {
        let mut items = state.items.write().await;
        let item = Item {
            id: items.len() as u64 + 1,
            name: req.name,
        };
        items.push(item.clone());
        item
    };

    state.cache.invalidate_by_pattern("/items").await;
    Ok((StatusCode::CREATED, Json(item)))
}
