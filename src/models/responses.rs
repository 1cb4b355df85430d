//! Response DTOs for the admin and demo API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

/// Response body for `GET /cache/keys`
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Stored keys, sorted; may include expired entries not yet swept
    pub keys: Vec<String>,
    /// Number of keys
    pub count: usize,
}

impl KeysResponse {
    /// Creates a KeysResponse with keys in sorted order
    pub fn new(mut keys: Vec<String>) -> Self {
        keys.sort();
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for the invalidation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human readable summary
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    /// Summary for a single-key invalidation
    pub fn for_key(key: &str, removed: bool) -> Self {
        Self {
            message: format!("Key '{}' invalidated", key),
            removed: usize::from(removed),
        }
    }

    /// Summary for a pattern invalidation
    pub fn for_pattern(pattern: &str, removed: usize) -> Self {
        Self {
            message: format!("Invalidated {} entries matching '{}'", removed, pattern),
            removed,
        }
    }
}

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub invalidations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A demo resource served through the response cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

/// Response body for `GET /items`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsPage {
    pub page: usize,
    pub items: Vec<Item>,
    /// Total number of items across all pages
    pub total: usize,
}
