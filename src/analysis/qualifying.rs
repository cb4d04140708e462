use tracing::debug;

use crate::telemetry::QualifyingResult;

/// One driver's qualifying outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingRow {
    pub driver: String,
    pub grid_position: u32, // 1 = pole
    pub q1: Option<f64>,
    pub q2: Option<f64>,
    pub q3: Option<f64>,
}

/// Convert provider qualifying results into one row per driver.
///
/// Stage times pass through untouched. Results without a classified position
/// cannot be placed on the grid and are dropped.
pub fn extract_qualifying(results: &[QualifyingResult]) -> Vec<QualifyingRow> {
    results
        .iter()
        .filter_map(|r| match r.position {
            Some(position) => Some(QualifyingRow {
                driver: r.driver.clone(),
                grid_position: position,
                q1: r.q1,
                q2: r.q2,
                q3: r.q3,
            }),
            None => {
                debug!(driver = %r.driver, "Skipping unclassified qualifying result");
                None
            }
        })
        .collect()
}
