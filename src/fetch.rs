use tracing::{info, warn};

use crate::analysis::{extract_qualifying, summarize_laps, QualifyingRow, SessionSummary};
use crate::config::WeekendConfig;
use crate::error::PredictionError;
use crate::scoring::{rank_drivers, FinalPrediction, ScoringConfig};
use crate::telemetry::TelemetrySource;

/// Practice and qualifying data gathered for one weekend.
#[derive(Debug, Clone, Default)]
pub struct WeekendData {
    pub practice: Vec<SessionSummary>,
    /// Practice sessions that produced at least one summary row, in load order
    pub sessions_loaded: Vec<String>,
    pub qualifying: Vec<QualifyingRow>,
    /// Set when the provider did not recognise the event name at all
    pub event_not_found: bool,
}

/// A ranked prediction plus the sessions it was based on.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub rankings: Vec<FinalPrediction>,
    pub sessions_used: Vec<String>,
}

/// Fetch every configured practice session in order, then qualifying.
///
/// Never fails: anything the provider cannot deliver shows up as missing
/// sessions or an empty qualifying list.
pub async fn load_weekend(source: &dyn TelemetrySource, weekend: &WeekendConfig) -> WeekendData {
    let mut data = WeekendData::default();

    for session in &weekend.practice_sessions {
        let rows = match source
            .fetch_session(weekend.year, &weekend.event, session)
            .await
        {
            Ok(laps) => summarize_laps(&laps, session),
            Err(e) => {
                data.event_not_found |= e.is_unknown_event();
                warn!("Error loading {}: {}", session, e);
                Vec::new()
            }
        };

        if rows.is_empty() {
            info!("No data available for {}", session);
        } else {
            info!("{}: {} drivers loaded", session, rows.len());
            data.sessions_loaded.push(session.clone());
            data.practice.extend(rows);
        }
    }

    match source.fetch_qualifying(weekend.year, &weekend.event).await {
        Ok(results) => {
            data.qualifying = extract_qualifying(&results);
            info!("Qualifying: {} drivers loaded", data.qualifying.len());
        }
        Err(e) => {
            data.event_not_found |= e.is_unknown_event();
            warn!("Error loading qualifying: {}", e);
        }
    }

    data
}

/// Rank already-loaded weekend data.
///
/// Fails when no practice session or no qualifying data is available, or
/// when no driver appears in both.
pub fn predict_from(
    data: &WeekendData,
    weekend: &WeekendConfig,
    scoring: &ScoringConfig,
) -> Result<Prediction, PredictionError> {
    let unavailable = |what: &str| PredictionError::DataUnavailable {
        what: what.to_string(),
        year: weekend.year,
        event: weekend.event.clone(),
    };

    if data.practice.is_empty() {
        return Err(unavailable("practice"));
    }
    if data.qualifying.is_empty() {
        return Err(unavailable("qualifying"));
    }

    let rankings = rank_drivers(&data.practice, &data.qualifying, scoring);
    if rankings.is_empty() {
        return Err(PredictionError::InsufficientOverlap {
            year: weekend.year,
            event: weekend.event.clone(),
        });
    }

    Ok(Prediction {
        rankings,
        sessions_used: data.sessions_loaded.clone(),
    })
}

/// Load a weekend and rank it.
pub async fn predict_weekend(
    source: &dyn TelemetrySource,
    weekend: &WeekendConfig,
    scoring: &ScoringConfig,
) -> Result<Prediction, PredictionError> {
    let data = load_weekend(source, weekend).await;
    predict_from(&data, weekend, scoring)
}
