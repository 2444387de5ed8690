//! Request coordinator - bounded-concurrency fetching with response caching.
//!
//! ## Architecture
//!
//! - `RequestQueue` - FIFO queue dispatching at most `limit` operations at once
//! - `ResponseCache` - TTL cache of JSON payloads keyed by resource name
//! - `LoadingIndicator` - busy flag observed by the shell
//!
//! A single `RequestCoordinator` is built at startup and cloned into every
//! caller; clones share the same queue, cache and indicator.

mod error;
mod loading;
mod queue;

use std::future::Future;
use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, CacheSnapshot, ResponseCache};
use crate::config::Config;

pub use error::{CoordinatorError, FetchError};
pub use loading::{LoadingGuard, LoadingIndicator};
pub use queue::{DEFAULT_MAX_CONCURRENCY, RequestQueue, TaskHandle};

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Maximum number of operations executing at once.
    pub max_concurrency: usize,

    /// Response cache settings.
    pub cache: CacheConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            cache: CacheConfig::default(),
        }
    }
}

impl From<&Config> for CoordinatorConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrency: config.max_concurrency,
            cache: CacheConfig::default().ttl(config.cache_ttl),
        }
    }
}

/// Per-request options. Headers here override the JSON defaults.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HeaderMap,
}

impl FetchOptions {
    /// Add or override a request header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// One element of a batch fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub cache_key: Option<String>,
    pub options: FetchOptions,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache_key: None,
            options: FetchOptions::default(),
        }
    }

    #[must_use]
    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }
}

/// Whether a batch element succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Fulfilled,
    Rejected,
}

/// Settled result of one batch element, paired with the request it came from.
#[derive(Debug)]
pub struct Outcome {
    pub request: FetchRequest,
    pub result: Result<Arc<Value>, FetchError>,
}

impl Outcome {
    pub fn status(&self) -> OutcomeStatus {
        match self.result {
            Ok(_) => OutcomeStatus::Fulfilled,
            Err(_) => OutcomeStatus::Rejected,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.result.is_ok()
    }

    pub fn value(&self) -> Option<&Arc<Value>> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.result.as_ref().err()
    }
}

/// Executes fetches under a global concurrency cap and reuses recent results.
#[derive(Clone, Debug)]
pub struct RequestCoordinator {
    client: Client,
    cache: ResponseCache,
    queue: RequestQueue,
    loading: LoadingIndicator,
}

impl RequestCoordinator {
    /// Build a coordinator with a fresh HTTP client.
    pub fn new(config: CoordinatorConfig) -> Result<Self, FetchError> {
        let client = Client::builder().build().map_err(FetchError::Transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a coordinator around an existing HTTP client.
    pub fn with_client(config: CoordinatorConfig, client: Client) -> Self {
        info!(
            "Request coordinator ready (max concurrency {}, cache ttl {:?})",
            config.max_concurrency, config.cache.ttl
        );

        Self {
            client,
            cache: ResponseCache::new(config.cache),
            queue: RequestQueue::new(config.max_concurrency),
            loading: LoadingIndicator::new(),
        }
    }

    /// The loading indicator toggled by network fetches.
    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// The underlying request queue.
    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    /// Fetch JSON from `url`, reusing a valid cached response under `cache_key`.
    ///
    /// A cache hit returns immediately without touching the network or the
    /// loading indicator. Failures are returned to the caller and never cached.
    pub async fn fetch(
        &self,
        url: &str,
        cache_key: Option<&str>,
        options: &FetchOptions,
    ) -> Result<Arc<Value>, FetchError> {
        if let Some(value) = cache_key.and_then(|key| self.cache.get(key)) {
            return Ok(value);
        }

        let _loading = self.loading.begin();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers.clone());

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                warn!("Fetch error for {}: {}", url, e);
                FetchError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetch error for {}: status {}", url, status);
            return Err(FetchError::Status { status });
        }

        let value: Value = response.json().await.map_err(|e| {
            warn!("Fetch error for {}: {}", url, e);
            FetchError::Decode(e)
        })?;

        Ok(match cache_key {
            Some(key) => self.cache.insert(key, value),
            None => Arc::new(value),
        })
    }

    /// Run `operation` under the concurrency cap. See [`RequestQueue::submit`].
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit<F, Fut, T>(&self, operation: F) -> TaskHandle<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.queue.submit(operation)
    }

    /// Fetch every request through the queue and wait for all of them.
    ///
    /// Outcomes come back in input order. A failed request is reported as
    /// rejected and never affects the others; only a coordinator defect
    /// fails the whole call.
    pub async fn fetch_many(
        &self,
        requests: Vec<FetchRequest>,
    ) -> Result<Vec<Outcome>, CoordinatorError> {
        let handles: Vec<_> = requests
            .iter()
            .map(|request| {
                let coordinator = self.clone();
                let request = request.clone();
                self.submit(move || async move {
                    coordinator
                        .fetch(
                            &request.url,
                            request.cache_key.as_deref(),
                            &request.options,
                        )
                        .await
                })
            })
            .collect();

        let settled = futures::future::join_all(handles).await;

        requests
            .into_iter()
            .zip(settled)
            .map(|(request, settled)| settled.map(|result| Outcome { request, result }))
            .collect()
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("Response cache cleared");
    }

    /// Read-only view of the cache.
    pub fn cache_snapshot(&self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    /// Stored time of the entry under `key`, if still valid.
    pub fn cached_at(&self, key: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        self.cache.entry(key).map(|entry| entry.stored_at)
    }
}
