//! Cache configuration.

use std::time::Duration;

/// Default time-to-live for cached responses (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Configuration for the response cache.
///
/// The cache has no size bound: every successful fetch under a key is kept
/// until it expires or the cache is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for cache entries, measured from insertion.
    /// Reads never extend it.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = duration;
        self
    }
}
