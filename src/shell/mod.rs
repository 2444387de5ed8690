//! Shell - thin adapter between the coordinator and whatever displays results.
//!
//! - `Presenter` - rendering interface (terminal implementation included)
//! - `ApiDemo` - user actions mapped onto coordinator calls
//! - `RealtimeUpdates` - periodic quote refresh
//! - `Command` - prompt input parsing

mod command;
mod demo;
mod presenter;
mod updates;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::coordinator::LoadingIndicator;

pub use command::{Command, CommandError, HELP};
pub use demo::ApiDemo;
pub use presenter::{Presenter, TerminalPresenter};
pub use updates::RealtimeUpdates;

/// Forward loading-indicator changes to `presenter` until the indicator is dropped.
pub fn forward_loading(loading: &LoadingIndicator, presenter: Arc<dyn Presenter>) -> JoinHandle<()> {
    let mut rx = loading.subscribe();
    tokio::spawn(async move {
        let mut shown = false;
        while rx.changed().await.is_ok() {
            let busy = *rx.borrow_and_update() > 0;
            if busy != shown {
                presenter.show_loading(busy);
                shown = busy;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheSnapshot;
    use crate::coordinator::{CoordinatorConfig, FetchError, RequestCoordinator};
    use crate::resources::{Endpoints, Resource, ResourceKind, WeatherSimulator};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Resource(Resource),
        Error(String),
        CacheInfo(usize),
        Notice(String),
        Loading(bool),
    }

    #[derive(Default)]
    struct RecordingPresenter {
        shown: Mutex<Vec<Shown>>,
    }

    impl RecordingPresenter {
        fn shown(&self) -> Vec<Shown> {
            self.shown.lock().clone()
        }
    }

    impl Presenter for RecordingPresenter {
        fn show_resource(&self, resource: &Resource) {
            self.shown.lock().push(Shown::Resource(resource.clone()));
        }

        fn show_error(&self, label: &str, _message: &str) {
            self.shown.lock().push(Shown::Error(label.to_string()));
        }

        fn show_cache_info(&self, snapshot: &CacheSnapshot) {
            self.shown.lock().push(Shown::CacheInfo(snapshot.count));
        }

        fn show_notice(&self, message: &str) {
            self.shown.lock().push(Shown::Notice(message.to_string()));
        }

        fn show_loading(&self, loading: bool) {
            self.shown.lock().push(Shown::Loading(loading));
        }
    }

    async fn mock_apis() -> MockServer {
        let server = MockServer::start().await;
        let routes = [
            ("/joke", json!({ "setup": "Why?", "punchline": "Because." })),
            ("/quote", json!({ "content": "First, solve the problem.", "author": "John Johnson" })),
            ("/fact", json!({ "text": "Honey never spoils." })),
            ("/advice", json!({ "slip": { "id": 1, "advice": "Sleep more." } })),
        ];
        for (route, body) in routes {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;
        }
        server
    }

    fn demo(server: &MockServer) -> (ApiDemo, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::default());
        let coordinator = RequestCoordinator::new(CoordinatorConfig::default()).unwrap();
        let endpoints = Endpoints::with_base(&server.uri()).unwrap();
        let demo = ApiDemo::new(coordinator, endpoints, presenter.clone())
            .with_weather(WeatherSimulator::new(Duration::ZERO));
        (demo, presenter)
    }

    #[tokio::test]
    async fn test_fetch_joke_presents_payload() {
        let server = mock_apis().await;
        let (demo, presenter) = demo(&server);

        let joke = demo.fetch_joke().await.unwrap();
        assert!(matches!(&joke, Resource::Joke(j) if j.punchline == "Because."));
        assert_eq!(presenter.shown(), vec![Shown::Resource(joke)]);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/joke"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "setup": "only" })))
            .mount(&server)
            .await;
        let (demo, presenter) = demo(&server);

        let err = demo.fetch_joke().await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { kind: "joke", .. }));
        assert_eq!(presenter.shown(), vec![Shown::Error("joke".into())]);
    }

    #[tokio::test]
    async fn test_fetch_all_reports_each_independently() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/joke"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "setup": "Why?", "punchline": "Because." })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let (demo, presenter) = demo(&server);

        let results = demo.fetch_all().await;

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Ok(Resource::Joke(_))));
        assert!(matches!(results[1], Ok(Resource::Weather(_))));
        assert_eq!(
            results[2].as_ref().unwrap_err().status(),
            Some(reqwest::StatusCode::SERVICE_UNAVAILABLE)
        );
        assert!(presenter.shown().contains(&Shown::Error("quote".into())));
    }

    #[tokio::test]
    async fn test_fetch_batch_keeps_order() {
        let server = mock_apis().await;
        let (demo, presenter) = demo(&server);

        let results = demo.fetch_batch(&ResourceKind::ALL).await.unwrap();

        assert!(matches!(results[0], Ok(Resource::Joke(_))));
        assert!(matches!(results[1], Ok(Resource::Quote(_))));
        assert!(matches!(results[2], Ok(Resource::Fact(_))));
        assert!(matches!(&results[3], Ok(Resource::Advice(a)) if a.advice == "Sleep more."));
        assert_eq!(presenter.shown().len(), 4);
        assert_eq!(demo.cache_info().count, 4);
    }

    #[tokio::test]
    async fn test_shortcuts() {
        let server = mock_apis().await;
        let (demo, _presenter) = demo(&server);

        assert!(matches!(demo.shortcut('1').await, Some(Ok(Resource::Joke(_)))));
        assert!(matches!(demo.shortcut('2').await, Some(Ok(Resource::Weather(_)))));
        assert!(matches!(demo.shortcut('3').await, Some(Ok(Resource::Quote(_)))));
        assert!(demo.shortcut('9').await.is_none());
    }

    #[tokio::test]
    async fn test_cache_info_and_clear() {
        let server = mock_apis().await;
        let (demo, presenter) = demo(&server);

        demo.fetch_quote().await.unwrap();
        demo.fetch_fact().await.unwrap();
        assert_eq!(demo.cache_info().keys, vec!["fact".to_string(), "quote".to_string()]);

        demo.clear_cache();
        assert_eq!(demo.cache_info().count, 0);

        let shown = presenter.shown();
        assert!(shown.contains(&Shown::CacheInfo(2)));
        assert!(shown.contains(&Shown::Notice("Cache cleared!".into())));
        assert_eq!(shown.last(), Some(&Shown::CacheInfo(0)));
    }

    #[tokio::test]
    async fn test_realtime_updates_refresh_quote() {
        let server = mock_apis().await;
        let (demo, presenter) = demo(&server);
        let updates = RealtimeUpdates::new();

        assert!(updates.start(demo.clone(), Duration::from_millis(40)));
        assert!(updates.is_running());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(updates.stop());
        assert!(!updates.is_running());
        assert!(!updates.stop());

        let quotes = presenter
            .shown()
            .iter()
            .filter(|s| matches!(s, Shown::Resource(Resource::Quote(_))))
            .count();
        assert!(quotes >= 2, "expected at least two refreshes, got {}", quotes);
    }

    #[tokio::test]
    async fn test_realtime_updates_reject_zero_interval() {
        let server = mock_apis().await;
        let (demo, _presenter) = demo(&server);
        let updates = RealtimeUpdates::new();

        assert!(!updates.start(demo.clone(), Duration::ZERO));
        assert!(!updates.is_running());

        assert!(updates.start(demo.clone(), Duration::from_secs(60)));
        assert!(!updates.start(demo, Duration::ZERO));
        assert!(updates.is_running());
        assert!(updates.stop());
    }

    #[tokio::test]
    async fn test_forward_loading_reports_transitions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/advice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "slip": { "advice": "Wait." } }))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        let (demo, _) = demo(&server);
        let watcher = Arc::new(RecordingPresenter::default());
        let forwarder = forward_loading(demo.coordinator().loading(), watcher.clone());

        demo.fetch_advice().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        forwarder.abort();

        assert_eq!(watcher.shown(), vec![Shown::Loading(true), Shown::Loading(false)]);
    }
}
