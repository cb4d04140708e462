use chrono::{DateTime, Utc};

/// One timed lap as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LapRecord {
    pub driver: String,           // Three-letter abbreviation, e.g. "VER"
    pub lap_seconds: Option<f64>, // None for incomplete or untimed laps
    pub session: String,          // "FP1", "FP2", ...
}

impl LapRecord {
    pub fn new(driver: &str, lap_seconds: Option<f64>, session: &str) -> Self {
        Self {
            driver: driver.to_string(),
            lap_seconds,
            session: session.to_string(),
        }
    }
}

/// One driver's classification in qualifying.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingResult {
    pub driver: String,
    pub position: Option<u32>, // None when unclassified
    pub q1: Option<f64>,
    pub q2: Option<f64>,
    pub q3: Option<f64>,
}

/// An event on the season calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInfo {
    pub name: String,
    pub location: Option<String>,
    pub country: Option<String>,
    pub date: Option<DateTime<Utc>>,
}
