//! Error types for weekend data retrieval and prediction.
//!
//! - [`ProviderError`] is anything the telemetry provider can surface: network
//!   failures, undecodable payloads, unknown events or sessions.
//! - [`PredictionError`] is what the prediction pipeline reports to its caller.
//!   Provider errors are logged and folded into `DataUnavailable` before they
//!   get that far.

use thiserror::Error;

/// Failure reported by a [`TelemetrySource`](crate::telemetry::TelemetrySource).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no event matching '{event}' in {year}")]
    EventNotFound { year: i32, event: String },

    #[error("session {session} not found for {event} {year}")]
    SessionNotFound {
        year: i32,
        event: String,
        session: String,
    },
}

impl ProviderError {
    /// True when the event name itself could not be resolved for the season.
    pub fn is_unknown_event(&self) -> bool {
        matches!(self, ProviderError::EventNotFound { .. })
    }
}

/// Fatal conditions of a prediction run.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("{what} data unavailable for {event} {year}")]
    DataUnavailable {
        what: String,
        year: i32,
        event: String,
    },

    #[error("no driver has both practice and qualifying data for {event} {year}")]
    InsufficientOverlap { year: i32, event: String },
}
