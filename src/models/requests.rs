//! Request DTOs for the admin and demo API
//!
//! Defines query strings and bodies accepted by the HTTP handlers.

use serde::Deserialize;

/// Query for `DELETE /cache/keys`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    /// Exact cache key to invalidate
    pub key: Option<String>,
}

/// Query for `DELETE /cache`
///
/// `pattern` must be present; `pattern=` (empty) is accepted and clears the
/// whole cache.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternQuery {
    /// Substring matched against cache keys
    pub pattern: Option<String>,
}

/// Query for `GET /items`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsQuery {
    /// 1-based page number
    #[serde(default)]
    pub page: Option<usize>,
}

/// Request body for `POST /items`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    /// Display name of the item
    pub name: String,
}

impl CreateItemRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        None
    }
}
