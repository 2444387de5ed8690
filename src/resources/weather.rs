//! Simulated weather source.
//!
//! No API key is available for a real weather service, so reports are
//! generated locally after a short artificial delay.

use std::time::Duration;

use rand::Rng;
use serde_json::{Value, json};

use super::Weather;
use crate::coordinator::FetchError;

const CITIES: [&str; 6] = ["New York", "London", "Tokyo", "Paris", "Sydney", "Berlin"];
const CONDITIONS: [&str; 5] = ["Sunny", "Cloudy", "Rainy", "Partly Cloudy", "Clear"];

/// Produces random weather reports in the OpenWeather response shape.
#[derive(Debug, Clone)]
pub struct WeatherSimulator {
    delay: Duration,
}

impl Default for WeatherSimulator {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl WeatherSimulator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Wait for the simulated latency, then return a report.
    pub async fn fetch(&self) -> Result<Weather, FetchError> {
        tokio::time::sleep(self.delay).await;
        Weather::from_json(&Self::report())
    }

    /// Random report: temperature 5..=34 °C, feels-like within 2 °C of it.
    fn report() -> Value {
        let mut rng = rand::thread_rng();
        let city = CITIES[rng.gen_range(0..CITIES.len())];
        let condition = CONDITIONS[rng.gen_range(0..CONDITIONS.len())];
        let temp: i32 = rng.gen_range(5..35);
        let feels_like = temp + rng.gen_range(-2..=2);

        json!({
            "name": city,
            "weather": [{ "description": condition }],
            "main": { "temp": temp, "feels_like": feels_like }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_stay_in_range() {
        let simulator = WeatherSimulator::new(Duration::ZERO);
        for _ in 0..50 {
            let weather = simulator.fetch().await.unwrap();
            assert!(CITIES.contains(&weather.location.as_str()));
            assert!(CONDITIONS.contains(&weather.condition.as_str()));
            assert!((5..35).contains(&weather.temperature));
            assert!((weather.feels_like - weather.temperature).abs() <= 2);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_delay() {
        let start = tokio::time::Instant::now();
        WeatherSimulator::default().fetch().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
