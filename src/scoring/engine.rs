use std::cmp::Ordering;
use std::collections::HashMap;

use super::config::ScoringConfig;
use crate::analysis::{QualifyingRow, SessionSummary};

/// A driver's practice form across every loaded session.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverPracticeProfile {
    pub driver: String,
    pub avg_fastest_lap: f64, // Session-weighted mean of fastest laps
    pub avg_consistency: f64, // Mean per-session standard deviation
    pub total_laps: u32,
    pub practice_score: f64, // Penalty points, lower is better
}

/// A driver's place in the predicted finishing order.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalPrediction {
    pub driver: String,
    pub grid_position: u32,
    pub practice_score: f64,
    pub final_score: f64,
    pub avg_fastest_lap: f64,
    pub consistency: f64,
}

/// Sum(value * weight) / Sum(weight); plain mean when the weights sum to zero
fn weighted_average(samples: &[(f64, f64)]) -> f64 {
    let weight_sum: f64 = samples.iter().map(|(_, w)| w).sum();
    if weight_sum > 0.0 {
        samples.iter().map(|(v, w)| v * w).sum::<f64>() / weight_sum
    } else {
        samples.iter().map(|(v, _)| v).sum::<f64>() / samples.len() as f64
    }
}

/// Build one practice profile per driver from all session summaries.
///
/// Drivers without a fastest lap in any session get no profile. The returned
/// profiles have `practice_score` set to zero; see [`score_profiles`].
pub fn build_profiles(
    practice: &[SessionSummary],
    config: &ScoringConfig,
) -> Vec<DriverPracticeProfile> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_driver: HashMap<&str, Vec<&SessionSummary>> = HashMap::new();
    for row in practice {
        by_driver
            .entry(row.driver.as_str())
            .or_insert_with(|| {
                order.push(row.driver.as_str());
                Vec::new()
            })
            .push(row);
    }

    order
        .into_iter()
        .filter_map(|driver| {
            let rows = by_driver.get(driver)?;

            let fastest: Vec<(f64, f64)> = rows
                .iter()
                .filter_map(|r| r.fastest_lap.map(|t| (t, config.session_weight(&r.session))))
                .collect();
            if fastest.is_empty() {
                return None;
            }

            let consistencies: Vec<f64> = rows.iter().filter_map(|r| r.consistency).collect();
            let avg_consistency = if consistencies.is_empty() {
                config.missing_consistency_penalty
            } else {
                consistencies.iter().sum::<f64>() / consistencies.len() as f64
            };

            Some(DriverPracticeProfile {
                driver: driver.to_string(),
                avg_fastest_lap: weighted_average(&fastest),
                avg_consistency,
                total_laps: rows.iter().map(|r| r.total_laps).sum(),
                practice_score: 0.0,
            })
        })
        .collect()
}

/// Practice penalty for one profile, relative to the fastest average lap
pub fn practice_score(
    profile: &DriverPracticeProfile,
    fastest_overall: f64,
    config: &ScoringConfig,
) -> f64 {
    let lap_time_score = (profile.avg_fastest_lap - fastest_overall) * config.lap_time_scale;
    let consistency_score = profile.avg_consistency * config.consistency_scale;
    let reliability = if config.reliability_laps > 0 {
        (profile.total_laps as f64 / config.reliability_laps as f64).min(1.0)
    } else {
        1.0
    };

    lap_time_score + consistency_score - reliability * config.reliability_scale
}

/// Fill in `practice_score` for every profile
pub fn score_profiles(profiles: &mut [DriverPracticeProfile], config: &ScoringConfig) {
    let Some(fastest_overall) = profiles
        .iter()
        .map(|p| p.avg_fastest_lap)
        .reduce(f64::min)
    else {
        return;
    };

    for profile in profiles.iter_mut() {
        profile.practice_score = practice_score(profile, fastest_overall, config);
    }
}

/// Blend qualifying position with practice form and sort into a predicted
/// finishing order (lowest final score first).
///
/// Only drivers with both a practice profile and a qualifying row are ranked.
/// Equal final scores are ordered by grid position.
pub fn rank_drivers(
    practice: &[SessionSummary],
    qualifying: &[QualifyingRow],
    config: &ScoringConfig,
) -> Vec<FinalPrediction> {
    let mut profiles = build_profiles(practice, config);
    score_profiles(&mut profiles, config);

    let by_driver: HashMap<&str, &DriverPracticeProfile> =
        profiles.iter().map(|p| (p.driver.as_str(), p)).collect();

    let mut predictions: Vec<FinalPrediction> = qualifying
        .iter()
        .filter_map(|q| {
            let profile = by_driver.get(q.driver.as_str())?;
            let final_score = q.grid_position as f64 * config.grid_weight
                + profile.practice_score * config.practice_weight / config.practice_divisor;

            Some(FinalPrediction {
                driver: q.driver.clone(),
                grid_position: q.grid_position,
                practice_score: profile.practice_score,
                final_score,
                avg_fastest_lap: profile.avg_fastest_lap,
                consistency: profile.avg_consistency,
            })
        })
        .collect();

    predictions.sort_by(|a, b| {
        let score_cmp = a
            .final_score
            .partial_cmp(&b.final_score)
            .unwrap_or(Ordering::Equal);
        if score_cmp != Ordering::Equal {
            return score_cmp;
        }
        a.grid_position.cmp(&b.grid_position)
    });

    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(
        driver: &str,
        session: &str,
        fastest: Option<f64>,
        consistency: Option<f64>,
        laps: u32,
    ) -> SessionSummary {
        SessionSummary {
            driver: driver.to_string(),
            fastest_lap: fastest,
            average_lap: fastest.map(|f| f + 1.0),
            consistency,
            total_laps: laps,
            session: session.to_string(),
        }
    }

    fn grid(driver: &str, position: u32) -> QualifyingRow {
        QualifyingRow {
            driver: driver.to_string(),
            grid_position: position,
            q1: None,
            q2: None,
            q3: None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_weighted_average_across_sessions() {
        let practice = vec![
            summary("NOR", "FP1", Some(91.0), Some(0.5), 20),
            summary("NOR", "FP3", Some(90.0), Some(0.3), 15),
        ];
        let profiles = build_profiles(&practice, &ScoringConfig::default());
        assert_eq!(profiles.len(), 1);

        // (91 * 0.15 + 90 * 0.35) / 0.5 = 90.3
        assert_close(profiles[0].avg_fastest_lap, 90.3);
        assert_close(profiles[0].avg_consistency, 0.4);
        assert_eq!(profiles[0].total_laps, 35);
    }

    #[test]
    fn test_unlisted_session_weight() {
        let practice = vec![
            summary("PIA", "FP2", Some(90.0), Some(0.2), 10),
            summary("PIA", "Sprint Qualifying", Some(89.0), Some(0.2), 5),
        ];
        let profiles = build_profiles(&practice, &ScoringConfig::default());

        // (90 * 0.25 + 89 * 0.2) / 0.45
        assert_close(profiles[0].avg_fastest_lap, (90.0 * 0.25 + 89.0 * 0.2) / 0.45);
    }

    #[test]
    fn test_sessions_without_fastest_lap_ignored_for_pace() {
        let practice = vec![
            summary("HUL", "FP1", None, None, 3),
            summary("HUL", "FP2", Some(92.0), Some(0.6), 12),
        ];
        let profiles = build_profiles(&practice, &ScoringConfig::default());
        assert_close(profiles[0].avg_fastest_lap, 92.0);
        // Undefined consistency is skipped, not averaged in as zero
        assert_close(profiles[0].avg_consistency, 0.6);
        // Lap counts still accumulate from every session
        assert_eq!(profiles[0].total_laps, 15);
    }

    #[test]
    fn test_driver_without_any_fastest_lap_excluded() {
        let practice = vec![
            summary("MAG", "FP1", None, None, 2),
            summary("ALB", "FP1", Some(91.5), Some(0.4), 22),
        ];
        let profiles = build_profiles(&practice, &ScoringConfig::default());
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].driver, "ALB");
    }

    #[test]
    fn test_missing_consistency_uses_penalty() {
        let practice = vec![summary("TSU", "FP1", Some(91.0), None, 1)];
        let profiles = build_profiles(&practice, &ScoringConfig::default());
        assert_close(profiles[0].avg_consistency, 10.0);
    }

    #[test]
    fn test_fastest_in_every_session_keeps_own_time() {
        let practice = vec![
            summary("VER", "FP1", Some(90.0), Some(0.1), 20),
            summary("VER", "FP2", Some(90.0), Some(0.1), 20),
            summary("VER", "FP3", Some(90.0), Some(0.1), 20),
            summary("PER", "FP1", Some(90.4), Some(0.1), 20),
            summary("PER", "FP2", Some(90.9), Some(0.1), 20),
            summary("PER", "FP3", Some(90.2), Some(0.1), 20),
        ];
        let profiles = build_profiles(&practice, &ScoringConfig::default());
        let ver = profiles.iter().find(|p| p.driver == "VER").unwrap();
        assert_close(ver.avg_fastest_lap, 90.0);
    }

    #[test]
    fn test_practice_score_boundary() {
        let profile = DriverPracticeProfile {
            driver: "LEC".to_string(),
            avg_fastest_lap: 89.5,
            avg_consistency: 0.0,
            total_laps: 64,
            practice_score: 0.0,
        };
        // No pace gap, perfect consistency, full reliability credit
        assert_close(practice_score(&profile, 89.5, &ScoringConfig::default()), -100.0);
    }

    #[test]
    fn test_reliability_scales_below_threshold() {
        let profile = DriverPracticeProfile {
            driver: "GAS".to_string(),
            avg_fastest_lap: 90.0,
            avg_consistency: 0.0,
            total_laps: 25,
            practice_score: 0.0,
        };
        assert_close(practice_score(&profile, 90.0, &ScoringConfig::default()), -50.0);
    }

    #[test]
    fn test_score_profiles_empty_is_noop() {
        let mut profiles: Vec<DriverPracticeProfile> = vec![];
        score_profiles(&mut profiles, &ScoringConfig::default());
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_three_driver_example() {
        let practice = vec![
            summary("AAA", "FP2", Some(90.0), Some(0.2), 20),
            summary("BBB", "FP2", Some(90.5), Some(0.3), 20),
            summary("CCC", "FP2", Some(91.0), Some(0.1), 20),
        ];
        let qualifying = vec![grid("BBB", 1), grid("AAA", 2), grid("CCC", 3)];

        let ranking = rank_drivers(&practice, &qualifying, &ScoringConfig::default());
        let order: Vec<_> = ranking.iter().map(|p| p.driver.as_str()).collect();
        assert_eq!(order, vec!["AAA", "BBB", "CCC"]);

        assert_close(ranking[0].practice_score, -20.0);
        assert_close(ranking[1].practice_score, 490.0);
        assert_close(ranking[2].practice_score, 970.0);

        assert_close(ranking[0].final_score, 1.12);
        assert_close(ranking[1].final_score, 2.56);
        assert_close(ranking[2].final_score, 5.68);
    }

    #[test]
    fn test_drivers_missing_either_side_dropped() {
        let practice = vec![
            summary("ONE", "FP1", Some(90.0), Some(0.2), 30),
            summary("TWO", "FP1", Some(90.2), Some(0.2), 30),
        ];
        let qualifying = vec![grid("TWO", 1), grid("SIX", 2)];

        let ranking = rank_drivers(&practice, &qualifying, &ScoringConfig::default());
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].driver, "TWO");
        assert_eq!(ranking[0].grid_position, 1);
    }

    #[test]
    fn test_empty_qualifying_yields_empty_ranking() {
        let practice = vec![summary("ONE", "FP1", Some(90.0), Some(0.2), 30)];
        assert!(rank_drivers(&practice, &[], &ScoringConfig::default()).is_empty());
    }

    #[test]
    fn test_equal_scores_ordered_by_grid() {
        let practice = vec![
            summary("XXX", "FP1", Some(90.0), Some(0.2), 30),
            summary("YYY", "FP1", Some(90.0), Some(0.2), 30),
        ];
        let config = ScoringConfig {
            grid_weight: 0.0,
            ..ScoringConfig::default()
        };
        let qualifying = vec![grid("XXX", 7), grid("YYY", 3)];

        let ranking = rank_drivers(&practice, &qualifying, &config);
        assert_eq!(ranking[0].driver, "YYY");
        assert_eq!(ranking[1].driver, "XXX");
    }

    #[test]
    fn test_custom_weights_change_pace() {
        let practice = vec![
            summary("SAI", "FP1", Some(92.0), Some(0.2), 30),
            summary("SAI", "FP3", Some(90.0), Some(0.2), 30),
        ];
        let mut config = ScoringConfig::default();
        config.session_weights.insert("FP1".to_string(), 0.0);

        let profiles = build_profiles(&practice, &config);
        assert_close(profiles[0].avg_fastest_lap, 90.0);
    }

    #[test]
    fn test_zero_weight_sum_uses_plain_mean() {
        assert_close(weighted_average(&[(90.0, 0.0), (92.0, 0.0)]), 91.0);
    }
}
