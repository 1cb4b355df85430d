//! Cache Module
//!
//! In-memory response caching with TTL expiration and substring pattern
//! invalidation.

mod clock;
mod entry;
mod service;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use service::CacheService;
pub use stats::CacheStats;
pub use store::EntryStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 2048;

/// Maximum captured response body size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// TTL in seconds applied when a caller does not give one
pub const DEFAULT_TTL_SECS: u64 = 600;
