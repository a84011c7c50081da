//! Per-round score composition: route → weather → diversity → cap.
use serde::{Deserialize, Serialize};

use crate::config::{ScoringConfig, default_config};
use crate::constants::FALL_REASON;
use crate::diversity::resolve_diversity_with_config;
use crate::labels::Label;
use crate::numbers::round_f64_to_u32;
use crate::rng::RandomSource;
use crate::route::{FallResolution, RouteKind, accrue_insurance, resolve_risk};
use crate::validator::{LabelList, SanitizedJudgment};
use crate::weather::{Weather, resolve_weather_with_config};

/// Everything the composer needs for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub base_altitude: u32,
    pub route: RouteKind,
    /// Explicit route multiplier; `None` uses the composing config's table.
    pub multiplier: Option<f64>,
    pub bonus_altitude: u32,
    pub weather: Option<Weather>,
    pub labels: LabelList,
    pub insurance: Option<u8>,
}

impl ScoreInput {
    /// Input with the route's configured multiplier and no bonus, weather or insurance.
    #[must_use]
    pub fn new(base_altitude: u32, route: RouteKind) -> Self {
        Self {
            base_altitude,
            route,
            multiplier: None,
            bonus_altitude: 0,
            weather: None,
            labels: LabelList::new(),
            insurance: None,
        }
    }

    /// Build the round input straight from a validated judgment.
    ///
    /// The diversity bonus is resolved here from the judgment's labels.
    #[must_use]
    pub fn from_judgment(
        judgment: &SanitizedJudgment,
        route: RouteKind,
        weather: Option<Weather>,
        insurance: u8,
        cfg: &ScoringConfig,
    ) -> Self {
        Self {
            base_altitude: judgment.altitude,
            route,
            multiplier: None,
            bonus_altitude: resolve_diversity_with_config(&judgment.labels, cfg).bonus_altitude,
            weather,
            labels: judgment.labels.clone(),
            insurance: Some(insurance),
        }
    }

    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    #[must_use]
    pub const fn with_bonus(mut self, bonus_altitude: u32) -> Self {
        self.bonus_altitude = bonus_altitude;
        self
    }

    #[must_use]
    pub fn with_weather(mut self, weather: Weather, labels: &[Label]) -> Self {
        self.weather = Some(weather);
        self.labels = labels.iter().copied().collect();
        self
    }

    #[must_use]
    pub const fn with_insurance(mut self, insurance: u8) -> Self {
        self.insurance = Some(insurance);
        self
    }
}

/// Outcome of one composed round. Every flag is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutput {
    pub final_altitude: u32,
    pub did_fall: bool,
    pub fall_reason: Option<String>,
    pub weather_applied: bool,
    pub weather_multiplier: Option<f64>,
    pub boosted_label: Option<Label>,
    pub insurance_used: bool,
    pub insurance_left: u8,
    pub capped: bool,
}

/// Compose a round with the default configuration.
pub fn compose<R: RandomSource + ?Sized>(input: &ScoreInput, rng: &mut R) -> ScoreOutput {
    compose_with_config(input, rng, default_config())
}

/// Compose a round.
///
/// 1. RISKY rolls for a fall; an uninsured fall returns the fallback altitude
///    immediately, an insured one spends a unit and carries on.
/// 2. Route multiplier, rounded.
/// 3. Weather boost on the route-adjusted value.
/// 4. Flat bonus added on top.
/// 5. SAFE/NORMAL clamp to the composition cap; RISKY is never clamped here.
pub fn compose_with_config<R: RandomSource + ?Sized>(
    input: &ScoreInput,
    rng: &mut R,
    cfg: &ScoringConfig,
) -> ScoreOutput {
    let risk = resolve_risk(input.route, input.insurance.unwrap_or(0), rng, cfg);

    if risk.resolution == FallResolution::Fell {
        log::debug!(
            "uninsured fall on {}: altitude forced to {}m",
            input.route,
            cfg.fall_altitude
        );
        return ScoreOutput {
            final_altitude: cfg.fall_altitude,
            did_fall: true,
            fall_reason: Some(FALL_REASON.to_string()),
            weather_applied: false,
            weather_multiplier: None,
            boosted_label: None,
            insurance_used: false,
            insurance_left: risk.insurance_left,
            capped: false,
        };
    }

    let multiplier = input
        .multiplier
        .unwrap_or_else(|| cfg.multipliers.get(input.route));
    let route_adjusted = round_f64_to_u32(f64::from(input.base_altitude) * multiplier);
    let weather = resolve_weather_with_config(route_adjusted, input.weather, &input.labels, cfg);
    let pre_cap = weather.altitude.saturating_add(input.bonus_altitude);

    let capped = input.route.is_capped() && pre_cap > cfg.compose_cap;
    let final_altitude = if capped { cfg.compose_cap } else { pre_cap };
    if capped {
        log::debug!(
            "{} round capped: {pre_cap}m -> {}m",
            input.route,
            cfg.compose_cap
        );
    }

    ScoreOutput {
        final_altitude,
        did_fall: false,
        fall_reason: None,
        weather_applied: weather.applied,
        weather_multiplier: weather.multiplier,
        boosted_label: weather.boosted_label,
        insurance_used: risk.resolution == FallResolution::Rescued,
        insurance_left: accrue_insurance(input.route, risk.insurance_left, cfg),
        capped,
    }
}
