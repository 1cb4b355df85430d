//! Captured Response Module
//!
//! The serializable form of an HTTP response stored by the caching layer.

use axum::{
    body::{Body, Bytes},
    http::{response::Parts, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cached Response ==
/// Status, headers and body of a response, as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// HTTP status code
    pub status: u16,
    /// Header pairs in their original order; repeated names are kept
    pub headers: Vec<(String, String)>,
    /// UTF-8 response body
    pub body: String,
}

impl CachedResponse {
    // == Capture ==
    /// Captures a buffered response.
    ///
    /// Fails when a header value or the body is not valid UTF-8.
    pub fn capture(parts: &Parts, body: &Bytes) -> Result<Self> {
        let mut headers = Vec::with_capacity(parts.headers.len());
        for (name, value) in parts.headers.iter() {
            let value = value.to_str().map_err(|_| {
                CacheError::Uncacheable(format!("header '{}' is not valid UTF-8", name))
            })?;
            headers.push((name.as_str().to_string(), value.to_string()));
        }

        let body = std::str::from_utf8(body)
            .map_err(|_| CacheError::Uncacheable("body is not valid UTF-8".to_string()))?
            .to_string();

        Ok(Self {
            status: parts.status.as_u16(),
            headers,
            body,
        })
    }

    // == Replay ==
    /// Rebuilds the HTTP response.
    ///
    /// Fails if the stored status or a header does not form a valid response,
    /// which only happens for values not produced by `capture`.
    pub fn into_http(self) -> Result<Response> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|_| CacheError::Uncacheable(format!("invalid status {}", self.status)))?;

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| CacheError::Uncacheable(format!("invalid header name '{}'", name)))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|_| CacheError::Uncacheable(format!("invalid value for '{}'", name)))?;
            headers.append(name, value);
        }

        Ok(response)
    }
}
