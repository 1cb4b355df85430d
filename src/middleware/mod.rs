//! Middleware Module
//!
//! Transparent response caching for idempotent read requests.
//!
//! Only `GET` requests are looked up and stored; every other method is
//! forwarded to the inner service untouched.

mod captured;
mod layer;

pub use captured::CachedResponse;
pub use layer::{ResponseCache, ResponseCacheLayer};
