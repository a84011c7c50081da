//! Summit Game Engine
//!
//! Platform-agnostic scoring and progression core for Summit, the
//! boast-to-climb altitude game. An external judge rates a boast; this crate
//! turns that judgment into metres climbed, applies route risk, weather and
//! label-diversity bonuses, tracks per-game missions and derives profile
//! achievements. No I/O, no rendering, no persistence.

pub mod achievements;
pub mod altitude;
pub mod config;
mod constants;
pub mod diversity;
pub mod labels;
pub mod mission;
pub mod numbers;
pub mod rng;
pub mod route;
pub mod score;
pub mod session;
pub mod validator;
pub mod weather;

// Re-export commonly used types
pub use achievements::{
    Achievement, AchievementCategory, AchievementId, AchievementProgress, AchievementStats,
    CATALOG, GameSummary, Seat, StatsDelta, UnlockReport, VersusResult, achievement, merge_stats,
    newly_unlocked, record_stats, unlocked_from,
};
pub use altitude::{shape, shape_with_config};
pub use config::{ConfigError, DiversityTier, RouteTable, ScoringConfig, default_config};
pub use diversity::{DiversityBonus, resolve_diversity, resolve_diversity_with_config};
pub use labels::{Label, UnknownLabel};
pub use mission::{GameProgress, MissionId, MissionProgress, RoundRecord, evaluate};
pub use rng::{RandomSource, SeededSource};
pub use route::{
    FallResolution, RiskOutcome, RouteKind, RouteProfile, accrue_insurance, resolve_fall,
    resolve_fall_with_config, resolve_risk,
};
pub use score::{ScoreInput, ScoreOutput, compose, compose_with_config};
pub use session::{GameSession, HistoryRecord, HistoryStore, RoundOutcome, SessionError};
pub use validator::{
    Breakdown, LabelList, SanitizedJudgment, validate, validate_str, validate_with_config,
};
pub use weather::{Weather, WeatherBonus, resolve_weather, resolve_weather_with_config};
