//! Terminal command parsing.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// A line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Joke,
    Weather,
    Quote,
    Fact,
    Advice,
    /// Joke, weather and quote at once.
    All,
    /// Every remote resource through the batch API.
    Batch,
    CacheInfo,
    ClearCache,
    /// Periodic quote refresh; `None` uses the configured interval.
    Watch(Option<Duration>),
    StopWatch,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("invalid interval '{0}', expected whole seconds > 0")]
    InvalidInterval(String),
}

pub const HELP: &str = "\
Commands:
  joke | 1       fetch a random joke
  weather | 2    show simulated weather
  quote | 3      fetch an inspirational quote
  fact           fetch a random fact
  advice         fetch a piece of advice
  all            joke, weather and quote together
  batch          every remote resource via the batch API
  cache          show cache info
  clear          clear the response cache
  watch [secs]   refresh the quote periodically
  stop           stop periodic refresh
  help           show this help
  quit | exit    leave";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };

        let command = match head.to_lowercase().as_str() {
            "joke" | "1" => Self::Joke,
            "weather" | "2" => Self::Weather,
            "quote" | "3" => Self::Quote,
            "fact" => Self::Fact,
            "advice" => Self::Advice,
            "all" => Self::All,
            "batch" => Self::Batch,
            "cache" => Self::CacheInfo,
            "clear" => Self::ClearCache,
            "watch" => match parts.next() {
                None => Self::Watch(None),
                Some(raw) => match raw.parse::<u64>() {
                    Ok(secs) if secs > 0 => Self::Watch(Some(Duration::from_secs(secs))),
                    _ => return Err(CommandError::InvalidInterval(raw.to_string())),
                },
            },
            "stop" => Self::StopWatch,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}
