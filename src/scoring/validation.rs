use super::config::ScoringConfig;

fn check_non_negative(errors: &mut Vec<String>, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(format!(
            "scoring.{}: must be a non-negative number, got {}",
            field, value
        ));
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (session, weight) in &config.session_weights {
        check_non_negative(&mut errors, &format!("session_weights.{}", session), *weight);
    }
    check_non_negative(&mut errors, "default_session_weight", config.default_session_weight);
    check_non_negative(
        &mut errors,
        "missing_consistency_penalty",
        config.missing_consistency_penalty,
    );
    check_non_negative(&mut errors, "lap_time_scale", config.lap_time_scale);
    check_non_negative(&mut errors, "consistency_scale", config.consistency_scale);
    check_non_negative(&mut errors, "reliability_scale", config.reliability_scale);
    check_non_negative(&mut errors, "grid_weight", config.grid_weight);
    check_non_negative(&mut errors, "practice_weight", config.practice_weight);

    if config.reliability_laps == 0 {
        errors.push("scoring.reliability_laps: must be at least 1".to_string());
    }

    if !config.practice_divisor.is_finite() || config.practice_divisor <= 0.0 {
        errors.push(format!(
            "scoring.practice_divisor: must be positive, got {}",
            config.practice_divisor
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_session_weight() {
        let mut config = ScoringConfig::default();
        config.session_weights.insert("FP2".to_string(), -0.25);

        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("session_weights.FP2"));
    }

    #[test]
    fn test_zero_divisor_and_reliability_laps() {
        let config = ScoringConfig {
            practice_divisor: 0.0,
            reliability_laps: 0,
            ..ScoringConfig::default()
        };

        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("practice_divisor")));
        assert!(errors.iter().any(|e| e.contains("reliability_laps")));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let config = ScoringConfig {
            grid_weight: -1.0,
            practice_weight: f64::NAN,
            default_session_weight: -0.2,
            ..ScoringConfig::default()
        };

        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
