//! Error types for the request coordinator.

use thiserror::Error;

/// A single fetch failed.
///
/// Failures are never cached; they are surfaced to the caller of
/// `fetch`/`submit`, or reported as a rejected outcome by `fetch_many`.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Status { status: reqwest::StatusCode },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Body was JSON but not the expected shape for this resource.
    #[error("malformed {kind} payload: {reason}")]
    Malformed { kind: &'static str, reason: String },

    /// The operation could not be delivered by the coordinator.
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

impl FetchError {
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            reason: reason.into(),
        }
    }

    /// HTTP status if the failure was a non-2xx response.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

/// Defect inside the coordinator itself.
///
/// Not part of normal operation: a submitted operation panicked or its
/// result channel was dropped before delivery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("queued task was lost before delivering its result")]
    TaskLost,
}
