use std::collections::HashMap;

use podium_pick::config::WeekendConfig;
use podium_pick::scoring::ScoringConfig;
use podium_pick::telemetry::{EventInfo, LapRecord, QualifyingResult, TelemetrySource};
use podium_pick::{predict_weekend, PredictionError, ProviderError};

/// Fixed weekend data served from memory
struct StaticSource {
    laps: HashMap<String, Vec<LapRecord>>,
    qualifying: Vec<QualifyingResult>,
}

#[async_trait::async_trait]
impl TelemetrySource for StaticSource {
    async fn fetch_session(
        &self,
        year: i32,
        event: &str,
        session: &str,
    ) -> Result<Vec<LapRecord>, ProviderError> {
        self.laps
            .get(session)
            .cloned()
            .ok_or_else(|| ProviderError::SessionNotFound {
                year,
                event: event.to_string(),
                session: session.to_string(),
            })
    }

    async fn fetch_qualifying(
        &self,
        _year: i32,
        _event: &str,
    ) -> Result<Vec<QualifyingResult>, ProviderError> {
        Ok(self.qualifying.clone())
    }

    async fn list_events(&self, _year: i32) -> Result<Vec<EventInfo>, ProviderError> {
        Ok(vec![])
    }
}

fn laps(session: &str, driver: &str, times: &[Option<f64>]) -> Vec<LapRecord> {
    times
        .iter()
        .map(|t| LapRecord::new(driver, *t, session))
        .collect()
}

fn quali(driver: &str, position: Option<u32>, q1: f64) -> QualifyingResult {
    QualifyingResult {
        driver: driver.to_string(),
        position,
        q1: Some(q1),
        q2: None,
        q3: None,
    }
}

fn weekend() -> WeekendConfig {
    WeekendConfig {
        year: 2024,
        event: "British Grand Prix".to_string(),
        practice_sessions: vec!["FP1".to_string(), "FP2".to_string(), "FP3".to_string()],
    }
}

#[tokio::test]
async fn test_full_weekend_ranking() {
    let mut sessions = HashMap::new();

    let mut fp1 = laps("FP1", "HAM", &[Some(88.0), Some(88.4), None]);
    fp1.extend(laps("FP1", "RUS", &[Some(88.2), Some(88.3)]));
    fp1.extend(laps("FP1", "NOR", &[Some(87.9), Some(88.9)]));
    sessions.insert("FP1".to_string(), fp1);

    let mut fp2 = laps("FP2", "HAM", &[Some(87.6), Some(87.8)]);
    fp2.extend(laps("FP2", "RUS", &[Some(87.9), Some(88.0)]));
    fp2.extend(laps("FP2", "NOR", &[Some(87.5)]));
    fp2.extend(laps("FP2", "STR", &[None, None]));
    sessions.insert("FP2".to_string(), fp2);

    // FP3 washed out: provider has no session

    let source = StaticSource {
        laps: sessions,
        qualifying: vec![
            quali("RUS", Some(1), 86.0),
            quali("HAM", Some(2), 86.1),
            quali("NOR", Some(3), 86.2),
            quali("STR", Some(19), 88.0),
            quali("ALB", None, 88.5),
        ],
    };

    let prediction = predict_weekend(&source, &weekend(), &ScoringConfig::default())
        .await
        .unwrap();

    assert_eq!(prediction.sessions_used, vec!["FP1", "FP2"]);

    // STR never set a timed lap and ALB has no classified position
    let drivers: Vec<_> = prediction.rankings.iter().map(|p| p.driver.as_str()).collect();
    assert_eq!(drivers.len(), 3);
    assert!(!drivers.contains(&"STR"));
    assert!(!drivers.contains(&"ALB"));

    // Sorted ascending by final score
    for pair in prediction.rankings.windows(2) {
        assert!(pair[0].final_score <= pair[1].final_score);
    }

    let rus = prediction.rankings.iter().find(|p| p.driver == "RUS").unwrap();
    assert_eq!(rus.grid_position, 1);
}

#[tokio::test]
async fn test_empty_qualifying_means_no_ranking() {
    let mut sessions = HashMap::new();
    sessions.insert(
        "FP1".to_string(),
        laps("FP1", "LEC", &[Some(89.0), Some(89.5)]),
    );

    let source = StaticSource {
        laps: sessions,
        qualifying: vec![],
    };

    let result = predict_weekend(&source, &weekend(), &ScoringConfig::default()).await;
    assert!(matches!(result, Err(PredictionError::DataUnavailable { .. })));
}

#[tokio::test]
async fn test_three_driver_order() {
    // 20 laps each, alternating between two times so the spread stays small
    let mut fp2 = Vec::new();
    for (driver, fastest, spread) in [("AAA", 90.0, 0.4), ("BBB", 90.5, 0.6), ("CCC", 91.0, 0.2)] {
        for i in 0..20 {
            let t = if i % 2 == 0 { fastest } else { fastest + spread };
            fp2.push(LapRecord::new(driver, Some(t), "FP2"));
        }
    }

    let mut sessions = HashMap::new();
    sessions.insert("FP2".to_string(), fp2);

    let source = StaticSource {
        laps: sessions,
        qualifying: vec![
            quali("AAA", Some(2), 86.0),
            quali("BBB", Some(1), 85.9),
            quali("CCC", Some(3), 86.3),
        ],
    };

    let prediction = predict_weekend(&source, &weekend(), &ScoringConfig::default())
        .await
        .unwrap();
    let order: Vec<_> = prediction.rankings.iter().map(|p| p.driver.as_str()).collect();
    assert_eq!(order, vec!["AAA", "BBB", "CCC"]);
}
