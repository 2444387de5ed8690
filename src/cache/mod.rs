//! Cache module - time-boxed response cache backed by Moka.
//!
//! Responses are stored under a logical resource key (`"joke"`, `"quote"`, ...)
//! together with the time they were stored. An entry is valid only while
//! `now - stored_at < ttl`; anything older is treated as a miss.
//!
//! ## Usage
//!
//! ```rust
//! use api_hub::cache::{CacheConfig, ResponseCache};
//!
//! let cache = ResponseCache::new(CacheConfig::default());
//! cache.insert("joke", serde_json::json!({ "setup": "..", "punchline": ".." }));
//! assert!(cache.get("joke").is_some());
//! ```

mod config;
mod response;

pub use config::{CacheConfig, DEFAULT_TTL};
pub use response::{CacheEntry, CacheSnapshot, ResponseCache};
