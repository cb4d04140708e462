use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::scoring::FinalPrediction;
use crate::telemetry::EventInfo;

/// Score gap between winner and runner-up that maps to full confidence
const CONFIDENCE_GAP: f64 = 10.0;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a lap time in seconds, e.g. "90.123s"
fn format_lap(seconds: f64) -> String {
    if seconds.is_finite() {
        format!("{:.3}s", seconds)
    } else {
        "N/A".to_string()
    }
}

/// Format the top `limit` predictions, one line per driver:
/// ` 1. VER | Qual: P 2 | Avg Fast Lap: 90.000s | Consistency: ±0.200s | Score: 1.12`
pub fn format_prediction_table(
    predictions: &[FinalPrediction],
    limit: usize,
    use_colors: bool,
) -> String {
    if predictions.is_empty() {
        return "No predictions available.".to_string();
    }

    predictions
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, p)| {
            let index_str = format!("{:>2}.", idx + 1);
            let driver = format!("{:<3}", p.driver);
            let score = format!("{:.2}", p.final_score);
            let rest = format!(
                " | Qual: P{:>2} | Avg Fast Lap: {} | Consistency: ±{} | Score: ",
                p.grid_position,
                format_lap(p.avg_fastest_lap),
                format_lap(p.consistency),
            );

            if use_colors {
                format!("{} {}{}{}", index_str.dimmed(), driver.bold(), rest, score.bold())
            } else {
                format!("{} {}{}{}", index_str, driver, rest, score)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Confidence in the predicted winner, as a percentage in [0, 100].
///
/// Grows with the winner's margin over the runner-up and saturates once the
/// margin reaches `CONFIDENCE_GAP`. None when fewer than two drivers are ranked.
pub fn winner_confidence(predictions: &[FinalPrediction]) -> Option<f64> {
    let (first, second) = match predictions {
        [first, second, ..] => (first, second),
        _ => return None,
    };
    let gap = second.final_score - first.final_score;
    Some((gap / CONFIDENCE_GAP).clamp(0.0, 1.0) * 100.0)
}

/// Predicted winner block: driver, starting position, pace, and confidence
pub fn format_winner(predictions: &[FinalPrediction], use_colors: bool) -> String {
    let Some(winner) = predictions.first() else {
        return "No predicted winner.".to_string();
    };

    let header = if use_colors {
        format!("PREDICTED WINNER: {}", winner.driver.bold().green())
    } else {
        format!("PREDICTED WINNER: {}", winner.driver)
    };

    let mut lines = vec![
        header,
        format!("   Starting Position: P{}", winner.grid_position),
        format!("   Average Fastest Lap: {}", format_lap(winner.avg_fastest_lap)),
    ];
    if let Some(confidence) = winner_confidence(predictions) {
        lines.push(format!("   Prediction Confidence: {:.1}%", confidence));
    }
    lines.join("\n")
}

/// Top-three finishers, or None when fewer than three drivers are ranked
pub fn format_podium(predictions: &[FinalPrediction]) -> Option<String> {
    let [first, second, third, ..] = predictions else {
        return None;
    };
    Some(format!(
        "PREDICTED PODIUM:\n   1st: {}\n   2nd: {}\n   3rd: {}",
        first.driver, second.driver, third.driver
    ))
}

/// Summary of what the prediction was built from
pub fn format_analysis_basis(sessions: &[String]) -> String {
    let sessions = if sessions.is_empty() {
        "none".to_string()
    } else {
        sessions.join(", ")
    };
    format!(
        "Analysis based on:\n   - Practice Sessions: {}\n   - Qualifying Results\n   - Lap Time Consistency\n   - Session Reliability",
        sessions
    )
}

/// Compact ranking used for the fallback weekend: "1. VER - Score: 1.23"
pub fn format_reference_table(predictions: &[FinalPrediction], limit: usize) -> String {
    predictions
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, p)| format!("{}. {} - Score: {:.2}", idx + 1, p.driver, p.final_score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Season calendar, one event per line: name, location, start date
pub fn format_schedule(events: &[EventInfo]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }

    let name_width = events.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);

    events
        .iter()
        .map(|e| {
            let location = e
                .location
                .as_deref()
                .or(e.country.as_deref())
                .unwrap_or("-");
            let date = e
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "TBA".to_string());
            format!("{:<width$}  {:<16}  {}", e.name, location, date, width = name_width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
