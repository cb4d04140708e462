use std::collections::HashMap;

use crate::telemetry::LapRecord;

/// One driver's lap statistics for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub driver: String,
    pub fastest_lap: Option<f64>,  // Seconds
    pub average_lap: Option<f64>,  // Seconds
    pub consistency: Option<f64>,  // Sample standard deviation; None below 2 laps
    pub total_laps: u32,
    pub session: String,
}

/// Sample standard deviation (n - 1 denominator), None for fewer than two values
fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Reduce one session's laps to a summary row per driver.
///
/// Laps without a duration are discarded; drivers left with no timed laps get
/// no row. Rows come out in order of each driver's first timed lap.
pub fn summarize_laps(laps: &[LapRecord], session: &str) -> Vec<SessionSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_driver: HashMap<&str, Vec<f64>> = HashMap::new();

    for lap in laps {
        let Some(seconds) = lap.lap_seconds.filter(|s| s.is_finite()) else {
            continue;
        };
        by_driver
            .entry(lap.driver.as_str())
            .or_insert_with(|| {
                order.push(lap.driver.as_str());
                Vec::new()
            })
            .push(seconds);
    }

    order
        .into_iter()
        .filter_map(|driver| {
            let times = by_driver.get(driver)?;
            if times.is_empty() {
                return None;
            }

            let fastest = times.iter().copied().fold(f64::INFINITY, f64::min);
            let mean = times.iter().sum::<f64>() / times.len() as f64;

            Some(SessionSummary {
                driver: driver.to_string(),
                fastest_lap: Some(fastest),
                average_lap: Some(mean),
                consistency: sample_std_dev(times, mean),
                total_laps: times.len() as u32,
                session: session.to_string(),
            })
        })
        .collect()
}
