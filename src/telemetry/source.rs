//! Data retrieval boundary consumed by the prediction pipeline.

use super::types::{EventInfo, LapRecord, QualifyingResult};
use crate::error::ProviderError;

/// Source of lap and qualifying data for a race weekend.
///
/// Implementations own transport, retries and caching. The pipeline only
/// cares whether data came back or not, so an empty `Vec` and an `Err` are
/// handled the same way by the caller (after the error is logged).
#[async_trait::async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Every lap of one session (`"FP1"`, `"FP2"`, `"Sprint"`, ...).
    async fn fetch_session(
        &self,
        year: i32,
        event: &str,
        session: &str,
    ) -> Result<Vec<LapRecord>, ProviderError>;

    /// Qualifying classification for the event.
    async fn fetch_qualifying(
        &self,
        year: i32,
        event: &str,
    ) -> Result<Vec<QualifyingResult>, ProviderError>;

    /// Events on the season calendar, in date order.
    async fn list_events(&self, year: i32) -> Result<Vec<EventInfo>, ProviderError>;
}
