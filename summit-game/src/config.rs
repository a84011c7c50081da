//! Tunable scoring configuration.
//!
//! Every number the pipeline uses lives in [`ScoringConfig`]. The default
//! values come from [`crate::constants`]; hosts may override any subset via
//! JSON, which is validated before use.
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{
    COMPOSE_CAP, DIVERSITY_TIERS, FALL_ALTITUDE, MAX_COMMENT_CHARS, MAX_INSURANCE, MAX_LABELS,
    MAX_REWRITE_CHARS, NORMAL_CEILING, NORMAL_MULTIPLIER, RISKY_CEILING, RISKY_FALL_PROBABILITY,
    RISKY_MULTIPLIER, ROUNDS_PER_GAME, SAFE_CEILING, SAFE_MULTIPLIER, SHAPING_EXPONENT,
    SUMMIT_ALTITUDE, WEATHER_MULTIPLIER,
};
use crate::route::RouteKind;

/// Errors raised when scoring configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Parse(String),
    #[error("{field} must be greater than {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{route} ceiling {ceiling}m exceeds the summit at {summit}m")]
    CeilingAboveSummit {
        route: RouteKind,
        ceiling: u32,
        summit: u32,
    },
    #[error("diversity tiers must strictly increase in unique-label count and bonus")]
    DiversityTiersUnordered,
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
}

/// One value per route, looked up with [`RouteTable::get`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteTable<T> {
    pub safe: T,
    pub normal: T,
    pub risky: T,
}

impl<T: Copy> RouteTable<T> {
    #[must_use]
    pub const fn get(&self, route: RouteKind) -> T {
        match route {
            RouteKind::Safe => self.safe,
            RouteKind::Normal => self.normal,
            RouteKind::Risky => self.risky,
        }
    }
}

/// Step of the diversity bonus: reaching `min_unique` distinct labels awards `bonus` metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiversityTier {
    pub min_unique: usize,
    pub bonus: u32,
}

/// Complete tuning record for the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub summit_altitude: u32,
    pub shaping_exponent: f64,
    pub ceilings: RouteTable<u32>,
    pub multipliers: RouteTable<f64>,
    pub fall_probability: f64,
    pub fall_altitude: u32,
    pub compose_cap: u32,
    pub weather_multiplier: f64,
    pub diversity_tiers: Vec<DiversityTier>,
    pub max_insurance: u8,
    pub rounds_per_game: usize,
    pub max_labels: usize,
    pub max_comment_chars: usize,
    pub max_rewrite_chars: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            summit_altitude: SUMMIT_ALTITUDE,
            shaping_exponent: SHAPING_EXPONENT,
            ceilings: RouteTable {
                safe: SAFE_CEILING,
                normal: NORMAL_CEILING,
                risky: RISKY_CEILING,
            },
            multipliers: RouteTable {
                safe: SAFE_MULTIPLIER,
                normal: NORMAL_MULTIPLIER,
                risky: RISKY_MULTIPLIER,
            },
            fall_probability: RISKY_FALL_PROBABILITY,
            fall_altitude: FALL_ALTITUDE,
            compose_cap: COMPOSE_CAP,
            weather_multiplier: WEATHER_MULTIPLIER,
            diversity_tiers: DIVERSITY_TIERS
                .iter()
                .map(|&(min_unique, bonus)| DiversityTier { min_unique, bonus })
                .collect(),
            max_insurance: MAX_INSURANCE,
            rounds_per_game: ROUNDS_PER_GAME,
            max_labels: MAX_LABELS,
            max_comment_chars: MAX_COMMENT_CHARS,
            max_rewrite_chars: MAX_REWRITE_CHARS,
        }
    }
}

impl ScoringConfig {
    /// Load a configuration from JSON; omitted fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every tuning invariant the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shaping_exponent.is_nan() || self.shaping_exponent <= 0.0 {
            return Err(ConfigError::MinViolation {
                field: "shaping_exponent",
                min: 0.0,
                value: self.shaping_exponent,
            });
        }
        for route in RouteKind::ALL {
            let ceiling = self.ceilings.get(route);
            if ceiling > self.summit_altitude {
                return Err(ConfigError::CeilingAboveSummit {
                    route,
                    ceiling,
                    summit: self.summit_altitude,
                });
            }
            let multiplier = self.multipliers.get(route);
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(ConfigError::MinViolation {
                    field: "multipliers",
                    min: 0.0,
                    value: multiplier,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.fall_probability) {
            return Err(ConfigError::RangeViolation {
                field: "fall_probability",
                min: 0.0,
                max: 1.0,
                value: self.fall_probability,
            });
        }
        if !self.weather_multiplier.is_finite() || self.weather_multiplier <= 0.0 {
            return Err(ConfigError::MinViolation {
                field: "weather_multiplier",
                min: 0.0,
                value: self.weather_multiplier,
            });
        }
        let ordered = self
            .diversity_tiers
            .windows(2)
            .all(|pair| pair[0].min_unique < pair[1].min_unique && pair[0].bonus < pair[1].bonus);
        if !ordered {
            return Err(ConfigError::DiversityTiersUnordered);
        }
        if self.rounds_per_game == 0 {
            return Err(ConfigError::ZeroLimit("rounds_per_game"));
        }
        if self.max_labels == 0 {
            return Err(ConfigError::ZeroLimit("max_labels"));
        }
        Ok(())
    }
}

/// Process-wide default configuration.
pub fn default_config() -> &'static ScoringConfig {
    static CONFIG: OnceLock<ScoringConfig> = OnceLock::new();
    CONFIG.get_or_init(ScoringConfig::default)
}
