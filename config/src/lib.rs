use anyhow::Error;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimilarityConfig {
    pub near_duplicate_threshold: f64,
    pub related_threshold: f64,
    pub resubmission_window_days: i64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            near_duplicate_threshold: 0.8,
            related_threshold: 0.7,
            resubmission_window_days: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManipulationConfig {
    pub burst_votes: usize,
    pub burst_window_minutes: i64,
    pub new_account_ratio: f64,
    pub new_account_age_days: i64,
}

impl Default for ManipulationConfig {
    fn default() -> Self {
        Self {
            burst_votes: 20,
            burst_window_minutes: 60,
            new_account_ratio: 0.8,
            new_account_age_days: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregationConfig {
    pub verified_weight: f64,
    pub helpfulness_boost: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            verified_weight: 2.0,
            helpfulness_boost: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub similarity: SimilarityConfig,
    pub manipulation: ManipulationConfig,
    pub aggregation: AggregationConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&contents)?;
        Ok(parsed)
    }
}
