//! Configuration module for the API hub.
//!
//! Loads configuration from environment variables (and `.env` if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::coordinator::DEFAULT_MAX_CONCURRENCY;
use crate::resources::{Endpoints, ResourceKind};

/// Moka rejects TTLs longer than 1000 years; cap well below that.
const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of requests executing at once.
    pub max_concurrency: usize,

    /// How long a cached response stays valid.
    pub cache_ttl: Duration,

    /// Interval for periodic quote refresh.
    pub refresh_interval: Duration,

    /// Remote endpoints per resource kind.
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            cache_ttl: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(30),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mut max_concurrency =
            parse_var(&lookup, "API_MAX_CONCURRENCY").unwrap_or(defaults.max_concurrency);
        if max_concurrency == 0 {
            warn!("API_MAX_CONCURRENCY must be at least 1, using 1");
            max_concurrency = 1;
        }

        let cache_ttl = parse_var(&lookup, "API_CACHE_TTL_SECS")
            .map(|secs: u64| Duration::from_secs(secs.min(MAX_CACHE_TTL_SECS)))
            .unwrap_or(defaults.cache_ttl);

        let refresh_interval = parse_var(&lookup, "API_REFRESH_INTERVAL_SECS")
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.refresh_interval);

        let mut endpoints = defaults.endpoints;
        for kind in ResourceKind::ALL {
            if let Some(url) = lookup(kind.env_var()) {
                if let Err(e) = endpoints.set(kind, &url) {
                    warn!("Ignoring {}: {}", kind.env_var(), e);
                }
            }
        }

        Self {
            max_concurrency,
            cache_ttl,
            refresh_interval,
            endpoints,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
