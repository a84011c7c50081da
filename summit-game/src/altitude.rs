//! Score → altitude shaping.
use crate::config::{ScoringConfig, default_config};
use crate::numbers::round_f64_to_u32;
use crate::route::RouteKind;

/// Map a `[0, 1]` mount score onto an altitude using the default configuration.
#[must_use]
pub fn shape(score: f64, route: RouteKind) -> u32 {
    shape_with_config(score, route, default_config())
}

/// `round(score^P * summit)`, clamped to the route ceiling.
///
/// An exponent above 1 makes the upper range disproportionately harder to
/// reach. NaN scores shape to 0.
#[must_use]
pub fn shape_with_config(score: f64, route: RouteKind, cfg: &ScoringConfig) -> u32 {
    let curved = score.max(0.0).powf(cfg.shaping_exponent);
    let altitude = round_f64_to_u32(curved * f64::from(cfg.summit_altitude));
    altitude.min(cfg.ceilings.get(route))
}
