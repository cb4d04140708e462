use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main scoring configuration.
///
/// Every weight and constant used by the aggregator lives here, so scoring is
/// a pure function of its inputs and this struct. Omitted fields take the
/// defaults below.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   session_weights:
///     FP1: 0.15
///     FP2: 0.25
///     FP3: 0.35
///     Sprint: 0.25
///   default_session_weight: 0.2
///   grid_weight: 0.6
///   practice_weight: 0.4
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight of each session's fastest lap in the practice pace average
    pub session_weights: BTreeMap<String, f64>,

    /// Weight for sessions not listed in `session_weights`
    pub default_session_weight: f64,

    /// Consistency (seconds) assumed when no session yields a standard deviation
    pub missing_consistency_penalty: f64,

    /// Penalty points per second of gap to the fastest driver
    pub lap_time_scale: f64,

    /// Penalty points per second of lap-time standard deviation
    pub consistency_scale: f64,

    /// Lap count at which the reliability credit is maxed out
    pub reliability_laps: u32,

    /// Credit points for full reliability
    pub reliability_scale: f64,

    /// Multiplier on qualifying grid position in the final score
    pub grid_weight: f64,

    /// Multiplier on the practice score in the final score
    pub practice_weight: f64,

    /// Divisor bringing the practice score onto the grid position scale
    pub practice_divisor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let session_weights = [("FP1", 0.15), ("FP2", 0.25), ("FP3", 0.35), ("Sprint", 0.25)]
            .into_iter()
            .map(|(name, weight)| (name.to_string(), weight))
            .collect();

        Self {
            session_weights,
            default_session_weight: 0.2,
            missing_consistency_penalty: 10.0,
            lap_time_scale: 1000.0,
            consistency_scale: 100.0,
            reliability_laps: 50,
            reliability_scale: 100.0,
            grid_weight: 0.6,
            practice_weight: 0.4,
            practice_divisor: 100.0,
        }
    }
}

impl ScoringConfig {
    /// Weight for a session by name, falling back to `default_session_weight`
    pub fn session_weight(&self, session: &str) -> f64 {
        self.session_weights
            .get(session)
            .copied()
            .unwrap_or(self.default_session_weight)
    }
}
