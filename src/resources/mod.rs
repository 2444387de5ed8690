//! Typed resource payloads and their remote endpoints.
//!
//! Every payload is validated when it crosses the network boundary. A body
//! with missing or empty fields is a [`FetchError::Malformed`]; nothing is
//! ever replaced with canned content.

mod weather;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::coordinator::FetchError;

pub use weather::WeatherSimulator;

/// Resources served by a remote JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Joke,
    Quote,
    Fact,
    Advice,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [Self::Joke, Self::Quote, Self::Fact, Self::Advice];

    /// Key under which responses of this kind are cached.
    pub fn cache_key(self) -> &'static str {
        match self {
            Self::Joke => "joke",
            Self::Quote => "quote",
            Self::Fact => "fact",
            Self::Advice => "advice",
        }
    }

    /// Environment variable overriding this kind's endpoint.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Joke => "API_JOKE_URL",
            Self::Quote => "API_QUOTE_URL",
            Self::Fact => "API_FACT_URL",
            Self::Advice => "API_ADVICE_URL",
        }
    }

    /// Decode a raw response body into the matching payload.
    pub fn decode(self, body: &Value) -> Result<Resource, FetchError> {
        match self {
            Self::Joke => Joke::from_json(body).map(Resource::Joke),
            Self::Quote => Quote::from_json(body).map(Resource::Quote),
            Self::Fact => Fact::from_json(body).map(Resource::Fact),
            Self::Advice => Advice::from_json(body).map(Resource::Advice),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.cache_key())
    }
}

/// Any payload the shell knows how to present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    Joke(Joke),
    Quote(Quote),
    Weather(Weather),
    Fact(Fact),
    Advice(Advice),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub location: String,
    pub temperature: i32,
    pub feels_like: i32,
    pub condition: String,
}

fn parse<T: DeserializeOwned>(kind: &'static str, body: &Value) -> Result<T, FetchError> {
    T::deserialize(body).map_err(|e| FetchError::malformed(kind, e.to_string()))
}

fn require(kind: &'static str, field: &str, value: &str) -> Result<(), FetchError> {
    if value.trim().is_empty() {
        return Err(FetchError::malformed(kind, format!("empty field `{}`", field)));
    }
    Ok(())
}

impl Joke {
    pub fn from_json(body: &Value) -> Result<Self, FetchError> {
        let joke: Self = parse("joke", body)?;
        require("joke", "setup", &joke.setup)?;
        require("joke", "punchline", &joke.punchline)?;
        Ok(joke)
    }
}

impl Quote {
    pub fn from_json(body: &Value) -> Result<Self, FetchError> {
        let quote: Self = parse("quote", body)?;
        require("quote", "content", &quote.content)?;
        require("quote", "author", &quote.author)?;
        Ok(quote)
    }
}

impl Fact {
    pub fn from_json(body: &Value) -> Result<Self, FetchError> {
        let fact: Self = parse("fact", body)?;
        require("fact", "text", &fact.text)?;
        Ok(fact)
    }
}

/// Advice slips arrive wrapped as `{ "slip": { "advice": ... } }`.
#[derive(Deserialize)]
struct AdviceEnvelope {
    slip: AdviceSlip,
}

#[derive(Deserialize)]
struct AdviceSlip {
    advice: String,
}

impl Advice {
    pub fn from_json(body: &Value) -> Result<Self, FetchError> {
        let envelope: AdviceEnvelope = parse("advice", body)?;
        require("advice", "slip.advice", &envelope.slip.advice)?;
        Ok(Self {
            advice: envelope.slip.advice,
        })
    }
}

/// Weather in the OpenWeather response shape.
#[derive(Deserialize)]
struct WeatherReport {
    name: String,
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
}

#[derive(Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Deserialize)]
struct WeatherMain {
    temp: i32,
    feels_like: i32,
}

impl Weather {
    pub fn from_json(body: &Value) -> Result<Self, FetchError> {
        let report: WeatherReport = parse("weather", body)?;
        require("weather", "name", &report.name)?;

        let condition = report
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| FetchError::malformed("weather", "empty `weather` list"))?;

        Ok(Self {
            location: report.name,
            temperature: report.main.temp,
            feels_like: report.main.feels_like,
            condition,
        })
    }
}

/// Remote endpoint per resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    joke: String,
    quote: String,
    fact: String,
    advice: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            joke: "https://official-joke-api.appspot.com/random_joke".to_string(),
            quote: "https://api.quotable.io/random".to_string(),
            fact: "https://uselessfacts.jsph.pl/random.json?language=en".to_string(),
            advice: "https://api.adviceslip.com/advice".to_string(),
        }
    }
}

impl Endpoints {
    pub fn url(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Joke => &self.joke,
            ResourceKind::Quote => &self.quote,
            ResourceKind::Fact => &self.fact,
            ResourceKind::Advice => &self.advice,
        }
    }

    /// Replace the endpoint for `kind`. The URL must be absolute.
    pub fn set(&mut self, kind: ResourceKind, url: &str) -> Result<(), url::ParseError> {
        let url = Url::parse(url.trim())?.to_string();
        let slot = match kind {
            ResourceKind::Joke => &mut self.joke,
            ResourceKind::Quote => &mut self.quote,
            ResourceKind::Fact => &mut self.fact,
            ResourceKind::Advice => &mut self.advice,
        };
        *slot = url;
        Ok(())
    }

    /// Point every endpoint at `base` + `/<cache key>`.
    pub fn with_base(base: &str) -> Result<Self, url::ParseError> {
        let mut endpoints = Self::default();
        let base = base.trim_end_matches('/');
        for kind in ResourceKind::ALL {
            endpoints.set(kind, &format!("{}/{}", base, kind.cache_key()))?;
        }
        Ok(endpoints)
    }
}
