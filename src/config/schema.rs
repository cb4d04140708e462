use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;
use crate::telemetry::{CacheConfig, DEFAULT_BASE_URL};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub weekend: WeekendConfig,
    /// Weekend to analyse instead when the primary one cannot be predicted
    pub fallback: Option<WeekendConfig>,
    pub cache: CacheSettings,
    pub provider: ProviderSettings,
    pub scoring: Option<ScoringConfig>,
}

fn default_practice_sessions() -> Vec<String> {
    vec!["FP1".to_string(), "FP2".to_string(), "FP3".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeekendConfig {
    pub year: i32,
    /// Event name, country, location, or circuit (e.g. "British Grand Prix", "Silverstone")
    pub event: String,
    #[serde(default = "default_practice_sessions")]
    pub practice_sessions: Vec<String>,
}

impl Default for WeekendConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            event: "British Grand Prix".to_string(),
            practice_sessions: default_practice_sessions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    pub enabled: bool,
    /// How long a cached response stays fresh, e.g. "12h", "7d"
    pub ttl: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: "7d".to_string(),
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> Result<CacheConfig> {
        let ttl = humantime::parse_duration(self.ttl.trim())
            .with_context(|| format!("cache.ttl: invalid duration '{}'", self.ttl))?;
        Ok(CacheConfig {
            enabled: self.enabled,
            ttl,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    pub base_url: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// The config written by `init`: defaults plus a prior-season fallback
    pub fn starter() -> Self {
        Self {
            fallback: Some(WeekendConfig {
                year: 2024,
                ..WeekendConfig::default()
            }),
            scoring: Some(ScoringConfig::default()),
            ..Self::default()
        }
    }
}
