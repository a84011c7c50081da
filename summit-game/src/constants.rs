//! Centralized balance and tuning constants for Summit scoring logic.
//!
//! These values seed [`crate::config::ScoringConfig::default`]. Keeping them
//! together means the default balance can only be adjusted through reviewed
//! code changes; runtime overrides go through the config layer.

// Altitude shaping ---------------------------------------------------------
pub(crate) const SUMMIT_ALTITUDE: u32 = 8_848;
pub(crate) const SHAPING_EXPONENT: f64 = 1.5;
pub(crate) const SAFE_CEILING: u32 = 5_500;
pub(crate) const NORMAL_CEILING: u32 = 6_500;
pub(crate) const RISKY_CEILING: u32 = SUMMIT_ALTITUDE;

// Route tuning -------------------------------------------------------------
pub(crate) const SAFE_MULTIPLIER: f64 = 0.8;
pub(crate) const NORMAL_MULTIPLIER: f64 = 1.0;
pub(crate) const RISKY_MULTIPLIER: f64 = 1.5;
pub(crate) const RISKY_FALL_PROBABILITY: f64 = 0.5;
pub(crate) const FALL_ALTITUDE: u32 = 2_000;
pub(crate) const MAX_INSURANCE: u8 = 1;

// Composition --------------------------------------------------------------
pub(crate) const COMPOSE_CAP: u32 = 7_900;
pub(crate) const WEATHER_MULTIPLIER: f64 = 1.2;
pub(crate) const DIVERSITY_TIERS: [(usize, u32); 3] = [(2, 300), (3, 700), (4, 1_200)];

// Game flow ----------------------------------------------------------------
pub(crate) const ROUNDS_PER_GAME: usize = 3;

// Judgment sanitizing ------------------------------------------------------
pub(crate) const MAX_LABELS: usize = 5;
pub(crate) const MAX_COMMENT_CHARS: usize = 80;
pub(crate) const MAX_REWRITE_CHARS: usize = 200;
pub(crate) const PENALTY_KEY: &str = "penalty";

// Player-facing text -------------------------------------------------------
pub(crate) const FALLBACK_TIP: &str = "数字や比較を入れると標高が伸びやすくなります。";
pub(crate) const FALLBACK_COMMENTARY: &str = "審査員は言葉を失っている……。";
pub(crate) const FALL_REASON: &str = "滑落！ リスキールートで足を踏み外した";
pub(crate) const NO_MISSION_TEXT: &str = "ミッションなし";

// Mission targets ----------------------------------------------------------
pub(crate) const MISSION_TOTAL_TARGET: u32 = 15_000;
pub(crate) const MISSION_EVEREST_TARGET: u32 = 8_000;
pub(crate) const MISSION_LABELS_TARGET: usize = 3;

// Achievement thresholds -------------------------------------------------
pub(crate) const ALPS_ALTITUDE: u32 = 3_000;
pub(crate) const SNOW_ALTITUDE: u32 = 6_000;
pub(crate) const EVEREST_ALTITUDE: u32 = 8_000;
pub(crate) const TOTAL_ALTITUDE_GOAL: u32 = 10_000;
pub(crate) const VERSUS_WINS_GOAL: u32 = 3;
pub(crate) const WIN_MARGIN_GOAL: u32 = 3_000;
pub(crate) const WIN_STREAK_GOAL: u32 = 3;

// Seed derivation ----------------------------------------------------------
pub(crate) const FALL_STREAM_TAG: &[u8] = b"summit-fall";

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
