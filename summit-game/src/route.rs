//! Route risk profiles, fall resolution and insurance bookkeeping.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ScoringConfig, default_config};
use crate::rng::RandomSource;

/// Player-chosen risk profile for a round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteKind {
    Safe,
    #[default]
    Normal,
    Risky,
}

impl RouteKind {
    pub const ALL: [Self; 3] = [Self::Safe, Self::Normal, Self::Risky];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Normal => "NORMAL",
            Self::Risky => "RISKY",
        }
    }

    /// Only RISKY rounds can fall.
    #[must_use]
    pub const fn can_fall(self) -> bool {
        matches!(self, Self::Risky)
    }

    /// SAFE rounds earn insurance just by being chosen.
    #[must_use]
    pub const fn accrues_insurance(self) -> bool {
        matches!(self, Self::Safe)
    }

    /// SAFE and NORMAL totals are clamped to the composition cap.
    #[must_use]
    pub const fn is_capped(self) -> bool {
        matches!(self, Self::Safe | Self::Normal)
    }

    /// Resolve the full profile for this route under `cfg`.
    #[must_use]
    pub fn profile(self, cfg: &ScoringConfig) -> RouteProfile {
        RouteProfile {
            route: self,
            multiplier: cfg.multipliers.get(self),
            fall_probability: if self.can_fall() {
                cfg.fall_probability
            } else {
                0.0
            },
            accrues_insurance: self.accrues_insurance(),
            consumes_insurance: self.can_fall(),
            ceiling: cfg.ceilings.get(self),
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a route's risk/reward trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteProfile {
    pub route: RouteKind,
    pub multiplier: f64,
    pub fall_probability: f64,
    pub accrues_insurance: bool,
    pub consumes_insurance: bool,
    pub ceiling: u32,
}

/// How a round's fall check played out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallResolution {
    /// No fall rolled (or the route cannot fall).
    Steady,
    /// A fall rolled but one insurance unit absorbed it.
    Rescued,
    /// A fall rolled with no insurance left.
    Fell,
}

/// Fall resolution plus the insurance count left afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskOutcome {
    pub resolution: FallResolution,
    pub insurance_left: u8,
}

/// Roll for a fall on `route` using the default configuration.
pub fn resolve_fall<R: RandomSource + ?Sized>(route: RouteKind, rng: &mut R) -> bool {
    resolve_fall_with_config(route, rng, default_config())
}

/// Roll for a fall; SAFE and NORMAL never consult `rng`.
pub fn resolve_fall_with_config<R: RandomSource + ?Sized>(
    route: RouteKind,
    rng: &mut R,
    cfg: &ScoringConfig,
) -> bool {
    if !route.can_fall() {
        return false;
    }
    let roll = rng.next_unit();
    let fell = roll < cfg.fall_probability;
    log::trace!("fall roll {roll:.4} on {route} -> fell={fell}");
    fell
}

/// Resolve a fall and apply insurance: an insured fall is cancelled at the cost of one unit.
pub fn resolve_risk<R: RandomSource + ?Sized>(
    route: RouteKind,
    insurance: u8,
    rng: &mut R,
    cfg: &ScoringConfig,
) -> RiskOutcome {
    let insurance = clamp_insurance(insurance, cfg);
    if !resolve_fall_with_config(route, rng, cfg) {
        return RiskOutcome {
            resolution: FallResolution::Steady,
            insurance_left: insurance,
        };
    }
    if insurance >= 1 {
        log::debug!("insurance absorbed a fall on {route} ({insurance} held)");
        RiskOutcome {
            resolution: FallResolution::Rescued,
            insurance_left: insurance - 1,
        }
    } else {
        RiskOutcome {
            resolution: FallResolution::Fell,
            insurance_left: 0,
        }
    }
}

/// Insurance after choosing `route`: SAFE adds one unit, capped at the configured maximum.
#[must_use]
pub fn accrue_insurance(route: RouteKind, insurance: u8, cfg: &ScoringConfig) -> u8 {
    let insurance = clamp_insurance(insurance, cfg);
    if route.accrues_insurance() {
        clamp_insurance(insurance.saturating_add(1), cfg)
    } else {
        insurance
    }
}

/// Clamp an insurance count into `[0, max_insurance]`.
#[must_use]
pub fn clamp_insurance(insurance: u8, cfg: &ScoringConfig) -> u8 {
    insurance.min(cfg.max_insurance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_called() -> f64 {
        panic!("SAFE/NORMAL must not roll")
    }

    #[test]
    fn only_risky_consults_rng() {
        let mut rng = never_called;
        assert!(!resolve_fall(RouteKind::Safe, &mut rng));
        assert!(!resolve_fall(RouteKind::Normal, &mut rng));
    }

    #[test]
    fn risky_falls_below_half() {
        assert!(resolve_fall(RouteKind::Risky, &mut || 0.49));
        assert!(!resolve_fall(RouteKind::Risky, &mut || 0.5));
        assert!(!resolve_fall(RouteKind::Risky, &mut || 0.6));
    }

    #[test]
    fn insurance_absorbs_fall() {
        let cfg = ScoringConfig::default();
        let outcome = resolve_risk(RouteKind::Risky, 1, &mut || 0.1, &cfg);
        assert_eq!(outcome.resolution, FallResolution::Rescued);
        assert_eq!(outcome.insurance_left, 0);

        let outcome = resolve_risk(RouteKind::Risky, 0, &mut || 0.1, &cfg);
        assert_eq!(outcome.resolution, FallResolution::Fell);

        let outcome = resolve_risk(RouteKind::Risky, 1, &mut || 0.9, &cfg);
        assert_eq!(outcome.resolution, FallResolution::Steady);
        assert_eq!(outcome.insurance_left, 1);
    }

    #[test]
    fn insurance_is_clamped_on_every_mutation() {
        let cfg = ScoringConfig::default();
        assert_eq!(accrue_insurance(RouteKind::Safe, 0, &cfg), 1);
        assert_eq!(accrue_insurance(RouteKind::Safe, 1, &cfg), 1);
        assert_eq!(accrue_insurance(RouteKind::Safe, 200, &cfg), 1);
        assert_eq!(accrue_insurance(RouteKind::Normal, 0, &cfg), 0);
        assert_eq!(accrue_insurance(RouteKind::Risky, 7, &cfg), 1);

        let outcome = resolve_risk(RouteKind::Risky, 9, &mut || 0.0, &cfg);
        assert_eq!(outcome.insurance_left, 0);
    }

    #[test]
    fn profiles_match_route_table() {
        let cfg = ScoringConfig::default();
        let safe = RouteKind::Safe.profile(&cfg);
        assert!((safe.multiplier - 0.8).abs() < f64::EPSILON);
        assert!(safe.accrues_insurance);
        assert!(safe.fall_probability.abs() < f64::EPSILON);

        let risky = RouteKind::Risky.profile(&cfg);
        assert!((risky.multiplier - 1.5).abs() < f64::EPSILON);
        assert!((risky.fall_probability - 0.5).abs() < f64::EPSILON);
        assert!(risky.consumes_insurance);
        assert_eq!(risky.ceiling, 8_848);
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&RouteKind::Risky).unwrap(),
            "\"RISKY\""
        );
        assert_eq!(RouteKind::default(), RouteKind::Normal);
    }
}
