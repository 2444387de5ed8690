//! API Hub - bounded-concurrency API fetching with response caching.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `cache` - TTL response cache backed by Moka
//! - `coordinator` - FIFO request queue, cached fetch and batch fetch
//! - `resources` - Typed payloads, validation and endpoints
//! - `shell` - Presenter interface, demo driver and terminal commands

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod resources;
pub mod shell;

pub use cache::{CacheConfig, CacheSnapshot};
pub use config::Config;
pub use coordinator::{
    CoordinatorConfig, CoordinatorError, FetchError, FetchOptions, FetchRequest, Outcome,
    OutcomeStatus, RequestCoordinator,
};
