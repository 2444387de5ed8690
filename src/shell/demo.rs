//! Demo driver - maps user actions onto coordinator calls.

use std::sync::Arc;

use tracing::{debug, error};

use super::Presenter;
use crate::cache::CacheSnapshot;
use crate::coordinator::{
    CoordinatorError, FetchError, FetchOptions, FetchRequest, RequestCoordinator,
};
use crate::resources::{Endpoints, Resource, ResourceKind, WeatherSimulator};

/// Fetches resources through the coordinator and hands results to a presenter.
///
/// Errors are always shown and returned; no placeholder content is substituted.
#[derive(Clone)]
pub struct ApiDemo {
    coordinator: RequestCoordinator,
    endpoints: Endpoints,
    weather: WeatherSimulator,
    presenter: Arc<dyn Presenter>,
}

impl ApiDemo {
    pub fn new(
        coordinator: RequestCoordinator,
        endpoints: Endpoints,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            coordinator,
            endpoints,
            weather: WeatherSimulator::default(),
            presenter,
        }
    }

    /// Replace the weather source.
    #[must_use]
    pub fn with_weather(mut self, weather: WeatherSimulator) -> Self {
        self.weather = weather;
        self
    }

    pub fn coordinator(&self) -> &RequestCoordinator {
        &self.coordinator
    }

    /// Fetch, decode and present one remote resource.
    pub async fn fetch_resource(&self, kind: ResourceKind) -> Result<Resource, FetchError> {
        let result = self
            .coordinator
            .fetch(
                self.endpoints.url(kind),
                Some(kind.cache_key()),
                &FetchOptions::default(),
            )
            .await
            .and_then(|body| kind.decode(&body));

        self.present(kind.cache_key(), result)
    }

    pub async fn fetch_joke(&self) -> Result<Resource, FetchError> {
        self.fetch_resource(ResourceKind::Joke).await
    }

    pub async fn fetch_quote(&self) -> Result<Resource, FetchError> {
        self.fetch_resource(ResourceKind::Quote).await
    }

    pub async fn fetch_fact(&self) -> Result<Resource, FetchError> {
        self.fetch_resource(ResourceKind::Fact).await
    }

    pub async fn fetch_advice(&self) -> Result<Resource, FetchError> {
        self.fetch_resource(ResourceKind::Advice).await
    }

    /// Simulated weather, run as a queued operation.
    pub async fn fetch_weather(&self) -> Result<Resource, FetchError> {
        let weather = self.weather.clone();
        let result = self
            .coordinator
            .submit(move || async move { weather.fetch().await })
            .await
            .map_err(FetchError::from)
            .and_then(|report| report)
            .map(Resource::Weather);

        self.present("weather", result)
    }

    /// Joke, weather and quote concurrently. Each result is presented on its own.
    pub async fn fetch_all(&self) -> Vec<Result<Resource, FetchError>> {
        let (joke, weather, quote) =
            tokio::join!(self.fetch_joke(), self.fetch_weather(), self.fetch_quote());
        vec![joke, weather, quote]
    }

    /// Fetch several remote resources through the batch API.
    ///
    /// Results are in the order of `kinds`; one failure never hides the others.
    pub async fn fetch_batch(
        &self,
        kinds: &[ResourceKind],
    ) -> Result<Vec<Result<Resource, FetchError>>, CoordinatorError> {
        let requests = kinds
            .iter()
            .map(|kind| FetchRequest::new(self.endpoints.url(*kind)).cache_key(kind.cache_key()))
            .collect();

        let outcomes = self.coordinator.fetch_many(requests).await?;
        debug!("Batch of {} settled", outcomes.len());

        Ok(kinds
            .iter()
            .zip(outcomes)
            .map(|(kind, outcome)| {
                let result = outcome.result.and_then(|body| kind.decode(&body));
                self.present(kind.cache_key(), result)
            })
            .collect())
    }

    /// Keyboard shortcuts: `1` joke, `2` weather, `3` quote.
    pub async fn shortcut(&self, key: char) -> Option<Result<Resource, FetchError>> {
        match key {
            '1' => Some(self.fetch_joke().await),
            '2' => Some(self.fetch_weather().await),
            '3' => Some(self.fetch_quote().await),
            _ => None,
        }
    }

    pub fn cache_info(&self) -> CacheSnapshot {
        let snapshot = self.coordinator.cache_snapshot();
        self.presenter.show_cache_info(&snapshot);
        snapshot
    }

    pub fn clear_cache(&self) {
        self.coordinator.clear_cache();
        self.presenter.show_notice("Cache cleared!");
    }

    fn present(
        &self,
        label: &str,
        result: Result<Resource, FetchError>,
    ) -> Result<Resource, FetchError> {
        match &result {
            Ok(resource) => self.presenter.show_resource(resource),
            Err(e) => {
                error!("Failed to fetch {}: {}", label, e);
                self.presenter.show_error(label, &e.to_string());
            }
        }
        result
    }
}

impl std::fmt::Debug for ApiDemo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiDemo")
            .field("coordinator", &self.coordinator)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
