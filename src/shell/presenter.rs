//! Presentation interface and the terminal implementation.

use crate::cache::CacheSnapshot;
use crate::resources::Resource;

/// Receives everything the demo wants to show.
///
/// Implementations decide how to render; the demo never formats output.
pub trait Presenter: Send + Sync {
    fn show_resource(&self, resource: &Resource);

    /// `label` names what was being fetched ("joke", "weather", ...).
    fn show_error(&self, label: &str, message: &str);

    fn show_cache_info(&self, snapshot: &CacheSnapshot);

    fn show_notice(&self, message: &str);

    fn show_loading(&self, loading: bool);
}

/// Writes formatted output to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    /// Text block for a resource.
    pub fn render(resource: &Resource) -> String {
        match resource {
            Resource::Joke(joke) => format!("Q: {}\nA: {}", joke.setup, joke.punchline),
            Resource::Quote(quote) => format!("\"{}\"\n  - {}", quote.content, quote.author),
            Resource::Weather(weather) => format!(
                "Location: {}\nTemperature: {}°C\nFeels like: {}°C\nCondition: {}",
                weather.location, weather.temperature, weather.feels_like, weather.condition
            ),
            Resource::Fact(fact) => format!("Did you know? {}", fact.text),
            Resource::Advice(advice) => format!("Advice: {}", advice.advice),
        }
    }

    pub fn render_cache_info(snapshot: &CacheSnapshot) -> String {
        let keys = if snapshot.keys.is_empty() {
            "-".to_string()
        } else {
            snapshot.keys.join(", ")
        };
        format!(
            "Cache Info:\nSize: {} items\nKeys: {}\nTimeout: {}s",
            snapshot.count,
            keys,
            snapshot.ttl.as_secs()
        )
    }
}

impl Presenter for TerminalPresenter {
    fn show_resource(&self, resource: &Resource) {
        println!("\n{}\n", Self::render(resource));
    }

    fn show_error(&self, label: &str, message: &str) {
        println!("\n❌ Failed to fetch {}. Please try again! ({})\n", label, message);
    }

    fn show_cache_info(&self, snapshot: &CacheSnapshot) {
        println!("\n{}\n", Self::render_cache_info(snapshot));
    }

    fn show_notice(&self, message: &str) {
        println!("{}", message);
    }

    fn show_loading(&self, loading: bool) {
        if loading {
            println!("⏳ Loading...");
        }
    }
}
