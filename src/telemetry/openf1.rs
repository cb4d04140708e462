//! OpenF1 REST client (<https://openf1.org>).
//!
//! Sessions are addressed by `session_key`, which is resolved from the season
//! year, an event name, and a short session name (`FP1`, `Q`, ...). Laps are
//! keyed by car number and mapped back to driver abbreviations through the
//! session's driver list.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, warn};

use super::cache::ResponseCache;
use super::source::TelemetrySource;
use super::types::{EventInfo, LapRecord, QualifyingResult};
use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

/// Create an OpenF1 client for the given base URL
pub fn create_client(base_url: &str, cache: ResponseCache) -> Result<OpenF1Client> {
    let http = reqwest::Client::builder()
        .user_agent(concat!("podium-pick/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    Ok(OpenF1Client {
        http,
        base_url: base_url.trim_end_matches('/').to_string(),
        cache,
    })
}

pub struct OpenF1Client {
    http: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
}

#[derive(Debug, Deserialize)]
struct ApiMeeting {
    meeting_key: u32,
    meeting_name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    circuit_short_name: Option<String>,
    #[serde(default)]
    date_start: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiSession {
    session_key: u32,
    session_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiLap {
    driver_number: u32,
    #[serde(default)]
    lap_duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiDriver {
    driver_number: u32,
    #[serde(default)]
    name_acronym: Option<String>,
}

/// `duration` is a single number for races and a `[Q1, Q2, Q3]` array for
/// qualifying, with nulls for stages the driver did not reach.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultDuration {
    Stages(Vec<Option<f64>>),
    Total(f64),
}

#[derive(Debug, Deserialize)]
struct ApiSessionResult {
    driver_number: u32,
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    duration: Option<ResultDuration>,
}

/// Map a short session name to the names OpenF1 may use for it
///
/// Sprint qualifying was called "Sprint Shootout" in 2023, so both names are
/// tried.
pub fn provider_session_names(session: &str) -> Vec<&str> {
    let names: &[&'static str] = match session.to_ascii_uppercase().as_str() {
        "FP1" => &["Practice 1"],
        "FP2" => &["Practice 2"],
        "FP3" => &["Practice 3"],
        "Q" | "QUALIFYING" => &["Qualifying"],
        "SQ" | "SPRINT QUALIFYING" | "SPRINT SHOOTOUT" => &["Sprint Qualifying", "Sprint Shootout"],
        "S" | "SPRINT" => &["Sprint"],
        "R" | "RACE" => &["Race"],
        _ => return vec![session],
    };
    names.to_vec()
}

/// How closely a meeting matches a lowercased query; lower is better
fn match_rank(meeting: &ApiMeeting, wanted: &str) -> Option<u8> {
    let name = meeting.meeting_name.to_lowercase();
    if name == wanted {
        return Some(0);
    }

    let place_match = [
        &meeting.country_name,
        &meeting.location,
        &meeting.circuit_short_name,
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase() == wanted);
    if place_match {
        return Some(1);
    }

    name.contains(wanted).then_some(2)
}

/// Pick the meeting an event query refers to.
///
/// An exact meeting name beats an exact country, location or circuit, which
/// beats a meeting-name substring. Within the best tier the earliest meeting
/// wins, with a warning naming the others.
fn resolve_meeting(meetings: Vec<ApiMeeting>, event: &str) -> Option<ApiMeeting> {
    let wanted = event.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let best = meetings.iter().filter_map(|m| match_rank(m, &wanted)).min()?;
    let candidates: Vec<ApiMeeting> = meetings
        .into_iter()
        .filter(|m| match_rank(m, &wanted) == Some(best))
        .collect();

    if candidates.len() > 1 {
        let names: Vec<&str> = candidates.iter().map(|m| m.meeting_name.as_str()).collect();
        warn!(
            "'{}' matches {} events ({}); using {}",
            event,
            names.len(),
            names.join(", "),
            names[0]
        );
    }

    candidates.into_iter().next()
}

/// Whether a failed request is worth retrying: transport errors, rate
/// limiting and server errors. Other client errors will not change.
fn is_transient(status: Option<StatusCode>) -> bool {
    status.map_or(true, |s| {
        s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS
    })
}

fn stage(stages: &[Option<f64>], index: usize) -> Option<f64> {
    stages.get(index).copied().flatten()
}

impl OpenF1Client {
    /// GET `{base_url}/{endpoint}?{params}` and decode the JSON body.
    ///
    /// Bodies are served from the response cache when fresh; network fetches
    /// are retried with exponential backoff.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let raw = format!("{}/{}", self.base_url, endpoint);
        let url = Url::parse_with_params(&raw, params).map_err(|e| ProviderError::Decode {
            url: raw.clone(),
            source: serde::de::Error::custom(e),
        })?;
        let key = url.to_string();

        let body = match self.cache.read(&key) {
            Some(body) => body,
            None => {
                let retry_strategy = ExponentialBackoff::from_millis(100)
                    .max_delay(std::time::Duration::from_secs(5))
                    .take(3);

                debug!(url = %key, "Fetching");
                let body = RetryIf::spawn(
                    retry_strategy,
                    || async {
                        self.http
                            .get(url.clone())
                            .send()
                            .await?
                            .error_for_status()?
                            .text()
                            .await
                    },
                    |e: &reqwest::Error| is_transient(e.status()),
                )
                .await
                .map_err(|source| ProviderError::Request {
                    url: key.clone(),
                    source,
                })?;

                if let Err(e) = self.cache.write(&key, &body) {
                    warn!("Failed to cache response: {:#}", e);
                }
                body
            }
        };

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode { url: key, source })
    }

    async fn meetings(&self, year: i32) -> Result<Vec<ApiMeeting>, ProviderError> {
        let mut meetings: Vec<ApiMeeting> =
            self.get_json("meetings", &[("year", year.to_string())]).await?;
        meetings.sort_by_key(|m| m.date_start);
        Ok(meetings)
    }

    async fn find_meeting(&self, year: i32, event: &str) -> Result<ApiMeeting, ProviderError> {
        let meetings = self.meetings(year).await?;
        resolve_meeting(meetings, event).ok_or_else(|| ProviderError::EventNotFound {
                year,
                event: event.to_string(),
            })
    }

    async fn find_session_key(
        &self,
        year: i32,
        event: &str,
        session: &str,
    ) -> Result<u32, ProviderError> {
        let meeting = self.find_meeting(year, event).await?;
        let wanted = provider_session_names(session);

        let sessions: Vec<ApiSession> = self
            .get_json("sessions", &[("meeting_key", meeting.meeting_key.to_string())])
            .await?;

        sessions
            .into_iter()
            .find(|s| wanted.iter().any(|w| s.session_name.eq_ignore_ascii_case(w)))
            .map(|s| s.session_key)
            .ok_or_else(|| ProviderError::SessionNotFound {
                year,
                event: event.to_string(),
                session: session.to_string(),
            })
    }

    /// Car number -> three-letter abbreviation for one session
    async fn driver_abbreviations(
        &self,
        session_key: u32,
    ) -> Result<HashMap<u32, String>, ProviderError> {
        let drivers: Vec<ApiDriver> = self
            .get_json("drivers", &[("session_key", session_key.to_string())])
            .await?;

        Ok(drivers
            .into_iter()
            .filter_map(|d| d.name_acronym.map(|acronym| (d.driver_number, acronym)))
            .collect())
    }
}

fn abbreviation(names: &HashMap<u32, String>, driver_number: u32) -> String {
    names
        .get(&driver_number)
        .cloned()
        .unwrap_or_else(|| driver_number.to_string())
}

#[async_trait::async_trait]
impl TelemetrySource for OpenF1Client {
    async fn fetch_session(
        &self,
        year: i32,
        event: &str,
        session: &str,
    ) -> Result<Vec<LapRecord>, ProviderError> {
        let session_key = self.find_session_key(year, event, session).await?;
        let names = self.driver_abbreviations(session_key).await?;

        let laps: Vec<ApiLap> = self
            .get_json("laps", &[("session_key", session_key.to_string())])
            .await?;

        Ok(laps
            .into_iter()
            .map(|lap| LapRecord {
                driver: abbreviation(&names, lap.driver_number),
                lap_seconds: lap.lap_duration,
                session: session.to_string(),
            })
            .collect())
    }

    async fn fetch_qualifying(
        &self,
        year: i32,
        event: &str,
    ) -> Result<Vec<QualifyingResult>, ProviderError> {
        let session_key = self.find_session_key(year, event, "Q").await?;
        let names = self.driver_abbreviations(session_key).await?;

        let results: Vec<ApiSessionResult> = self
            .get_json("session_result", &[("session_key", session_key.to_string())])
            .await?;

        Ok(results
            .into_iter()
            .map(|r| {
                let stages = match r.duration {
                    Some(ResultDuration::Stages(stages)) => stages,
                    Some(ResultDuration::Total(total)) => vec![Some(total)],
                    None => Vec::new(),
                };
                QualifyingResult {
                    driver: abbreviation(&names, r.driver_number),
                    position: r.position,
                    q1: stage(&stages, 0),
                    q2: stage(&stages, 1),
                    q3: stage(&stages, 2),
                }
            })
            .collect())
    }

    async fn list_events(&self, year: i32) -> Result<Vec<EventInfo>, ProviderError> {
        Ok(self
            .meetings(year)
            .await?
            .into_iter()
            .map(|m| EventInfo {
                name: m.meeting_name,
                location: m.location,
                country: m.country_name,
                date: m.date_start,
            })
            .collect())
    }
}
