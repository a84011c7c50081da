//! Per-game weather and its label-matched altitude boost.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ScoringConfig, default_config};
use crate::labels::Label;
use crate::numbers::round_f64_to_u32;

/// Weather picked once per game; each binds one core label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weather {
    Sunny,
    Windy,
    Blizzard,
}

impl Weather {
    pub const ALL: [Self; 3] = [Self::Sunny, Self::Windy, Self::Blizzard];

    /// The core label this weather rewards.
    #[must_use]
    pub const fn boosted_label(self) -> Label {
        match self {
            Self::Sunny => Label::Numeric,
            Self::Windy => Label::Comparison,
            Self::Blizzard => Label::Effort,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "SUNNY",
            Self::Windy => "WINDY",
            Self::Blizzard => "BLIZZARD",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking a round against the active weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherBonus {
    pub applied: bool,
    pub multiplier: Option<f64>,
    pub boosted_label: Option<Label>,
    pub altitude: u32,
}

impl WeatherBonus {
    const fn passthrough(altitude: u32, boosted_label: Option<Label>) -> Self {
        Self {
            applied: false,
            multiplier: None,
            boosted_label,
            altitude,
        }
    }
}

/// Apply the weather boost with the default configuration.
#[must_use]
pub fn resolve_weather(
    route_adjusted_altitude: u32,
    weather: Option<Weather>,
    labels: &[Label],
) -> WeatherBonus {
    resolve_weather_with_config(route_adjusted_altitude, weather, labels, default_config())
}

/// Multiply the route-adjusted altitude when the weather's label appears at least once.
#[must_use]
pub fn resolve_weather_with_config(
    route_adjusted_altitude: u32,
    weather: Option<Weather>,
    labels: &[Label],
    cfg: &ScoringConfig,
) -> WeatherBonus {
    let Some(weather) = weather else {
        return WeatherBonus::passthrough(route_adjusted_altitude, None);
    };
    let boosted = weather.boosted_label();
    if !labels.contains(&boosted) {
        return WeatherBonus::passthrough(route_adjusted_altitude, Some(boosted));
    }
    let altitude = round_f64_to_u32(f64::from(route_adjusted_altitude) * cfg.weather_multiplier);
    WeatherBonus {
        applied: true,
        multiplier: Some(cfg.weather_multiplier),
        boosted_label: Some(boosted),
        altitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_weather_boosts_a_core_label() {
        for weather in Weather::ALL {
            assert!(weather.boosted_label().is_core());
        }
    }

    #[test]
    fn no_weather_passes_through() {
        let bonus = resolve_weather(5_000, None, &[Label::Numeric]);
        assert!(!bonus.applied);
        assert_eq!(bonus.altitude, 5_000);
        assert_eq!(bonus.multiplier, None);
        assert_eq!(bonus.boosted_label, None);
    }

    #[test]
    fn matching_label_anywhere_applies_once() {
        let labels = [Label::Sarcasm, Label::Comparison, Label::Comparison];
        let bonus = resolve_weather(4_001, Some(Weather::Windy), &labels);
        assert!(bonus.applied);
        assert_eq!(bonus.altitude, 4_801);
        assert_eq!(bonus.boosted_label, Some(Label::Comparison));
        assert_eq!(bonus.multiplier, Some(1.2));
    }

    #[test]
    fn missing_label_reports_boost_target_without_applying() {
        let bonus = resolve_weather(3_000, Some(Weather::Blizzard), &[Label::Numeric]);
        assert!(!bonus.applied);
        assert_eq!(bonus.altitude, 3_000);
        assert_eq!(bonus.boosted_label, Some(Label::Effort));
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&Weather::Blizzard).unwrap(),
            "\"BLIZZARD\""
        );
        assert_eq!(Weather::Sunny.to_string(), "SUNNY");
    }
}
