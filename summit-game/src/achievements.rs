//! Profile-level play statistics and the achievements derived from them.
//!
//! Stats live with the caller. The engine merges partial updates into a new
//! record and recomputes the unlocked set from scratch each time; it keeps no
//! memory of earlier unlocks. Diffing against the previously stored set is
//! what surfaces "new" achievements.
//!
//! Merge semantics are deliberately asymmetric: "highest"/"best" fields take
//! the maximum of old and new, while count fields take the supplied value
//! verbatim. Callers pre-compute running counts, which the
//! [`StatsDelta::after_solo_game`] and [`StatsDelta::after_versus_game`]
//! helpers do for them.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{
    ALPS_ALTITUDE, EVEREST_ALTITUDE, SNOW_ALTITUDE, TOTAL_ALTITUDE_GOAL, VERSUS_WINS_GOAL,
    WIN_MARGIN_GOAL, WIN_STREAK_GOAL,
};

/// Running totals for one user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementStats {
    pub solo_plays: u32,
    pub versus_plays: u32,
    pub versus_wins_p1: u32,
    pub highest_altitude: u32,
    pub highest_total_altitude: u32,
    pub everest_count: u32,
    pub snow_count: u32,
    pub max_win_margin: u32,
    pub win_streak_best: u32,
}

/// Partial update; absent fields leave the current value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsDelta {
    pub solo_plays: Option<u32>,
    pub versus_plays: Option<u32>,
    pub versus_wins_p1: Option<u32>,
    pub highest_altitude: Option<u32>,
    pub highest_total_altitude: Option<u32>,
    pub everest_count: Option<u32>,
    pub snow_count: Option<u32>,
    pub max_win_margin: Option<u32>,
    pub win_streak_best: Option<u32>,
}

/// End-of-game numbers for a solo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSummary {
    pub total_altitude: u32,
    pub best_round_altitude: u32,
    pub everest_rounds: u32,
    pub snow_rounds: u32,
}

impl GameSummary {
    /// Summarize a finished run from its per-round final altitudes.
    #[must_use]
    pub fn from_altitudes(altitudes: &[u32]) -> Self {
        let count_at_least = |threshold: u32| {
            u32::try_from(altitudes.iter().filter(|&&a| a >= threshold).count())
                .unwrap_or(u32::MAX)
        };
        Self {
            total_altitude: altitudes.iter().fold(0u32, |acc, &a| acc.saturating_add(a)),
            best_round_altitude: altitudes.iter().copied().max().unwrap_or(0),
            everest_rounds: count_at_least(EVEREST_ALTITUDE),
            snow_rounds: count_at_least(SNOW_ALTITUDE),
        }
    }
}

/// Which seat won a versus game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    P1,
    P2,
}

/// Outcome of a two-player game from player one's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersusResult {
    pub winner: Option<Seat>,
    pub margin: u32,
    /// Player one's win streak including this game.
    pub streak: u32,
}

impl VersusResult {
    /// Decide a game from both totals; ties have no winner and reset the streak.
    #[must_use]
    pub const fn decide(p1_total: u32, p2_total: u32, prior_streak: u32) -> Self {
        if p1_total > p2_total {
            Self {
                winner: Some(Seat::P1),
                margin: p1_total - p2_total,
                streak: prior_streak.saturating_add(1),
            }
        } else if p2_total > p1_total {
            Self {
                winner: Some(Seat::P2),
                margin: p2_total - p1_total,
                streak: 0,
            }
        } else {
            Self {
                winner: None,
                margin: 0,
                streak: 0,
            }
        }
    }

    #[must_use]
    pub const fn p1_won(&self) -> bool {
        matches!(self.winner, Some(Seat::P1))
    }
}

impl StatsDelta {
    /// Absolute values to merge after a finished solo game.
    #[must_use]
    pub const fn after_solo_game(current: &AchievementStats, summary: &GameSummary) -> Self {
        Self {
            solo_plays: Some(current.solo_plays.saturating_add(1)),
            versus_plays: None,
            versus_wins_p1: None,
            highest_altitude: Some(summary.best_round_altitude),
            highest_total_altitude: Some(summary.total_altitude),
            everest_count: Some(current.everest_count.saturating_add(summary.everest_rounds)),
            snow_count: Some(current.snow_count.saturating_add(summary.snow_rounds)),
            max_win_margin: None,
            win_streak_best: None,
        }
    }

    /// Absolute values to merge after a finished versus game.
    #[must_use]
    pub const fn after_versus_game(current: &AchievementStats, result: &VersusResult) -> Self {
        let won = result.p1_won();
        Self {
            solo_plays: None,
            versus_plays: Some(current.versus_plays.saturating_add(1)),
            versus_wins_p1: Some(if won {
                current.versus_wins_p1.saturating_add(1)
            } else {
                current.versus_wins_p1
            }),
            highest_altitude: None,
            highest_total_altitude: None,
            everest_count: None,
            snow_count: None,
            max_win_margin: if won { Some(result.margin) } else { None },
            win_streak_best: Some(result.streak),
        }
    }
}

/// Merge a partial update: max for "highest"/"best", replacement for counts.
#[must_use]
pub fn merge_stats(current: &AchievementStats, partial: &StatsDelta) -> AchievementStats {
    let max = |old: u32, new: Option<u32>| new.map_or(old, |n| old.max(n));
    let replace = |old: u32, new: Option<u32>| new.unwrap_or(old);
    AchievementStats {
        solo_plays: replace(current.solo_plays, partial.solo_plays),
        versus_plays: replace(current.versus_plays, partial.versus_plays),
        versus_wins_p1: replace(current.versus_wins_p1, partial.versus_wins_p1),
        highest_altitude: max(current.highest_altitude, partial.highest_altitude),
        highest_total_altitude: max(
            current.highest_total_altitude,
            partial.highest_total_altitude,
        ),
        everest_count: replace(current.everest_count, partial.everest_count),
        snow_count: replace(current.snow_count, partial.snow_count),
        max_win_margin: max(current.max_win_margin, partial.max_win_margin),
        win_streak_best: max(current.win_streak_best, partial.win_streak_best),
    }
}

/// Stable achievement identifiers, ordered as in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    #[serde(rename = "first_judgement")]
    FirstJudgement,
    #[serde(rename = "alps_reached")]
    AlpsReached,
    #[serde(rename = "snow_reached")]
    SnowReached,
    #[serde(rename = "everest_reached")]
    EverestReached,
    #[serde(rename = "total_10000m")]
    Total10000m,
    #[serde(rename = "versus_first_play")]
    VersusFirstPlay,
    #[serde(rename = "versus_first_win")]
    VersusFirstWin,
    #[serde(rename = "versus_3wins")]
    Versus3Wins,
    #[serde(rename = "versus_win_by_3000")]
    VersusWinBy3000,
    #[serde(rename = "versus_streak_3")]
    VersusStreak3,
}

impl AchievementId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstJudgement => "first_judgement",
            Self::AlpsReached => "alps_reached",
            Self::SnowReached => "snow_reached",
            Self::EverestReached => "everest_reached",
            Self::Total10000m => "total_10000m",
            Self::VersusFirstPlay => "versus_first_play",
            Self::VersusFirstWin => "versus_first_win",
            Self::Versus3Wins => "versus_3wins",
            Self::VersusWinBy3000 => "versus_win_by_3000",
            Self::VersusStreak3 => "versus_streak_3",
        }
    }

    /// Unlock predicate over the current stats.
    #[must_use]
    pub const fn is_unlocked(self, stats: &AchievementStats) -> bool {
        match self {
            Self::FirstJudgement => stats.solo_plays >= 1 || stats.versus_plays >= 1,
            Self::AlpsReached => stats.highest_altitude >= ALPS_ALTITUDE,
            Self::SnowReached => stats.highest_altitude >= SNOW_ALTITUDE || stats.snow_count >= 1,
            Self::EverestReached => {
                stats.highest_altitude >= EVEREST_ALTITUDE || stats.everest_count >= 1
            }
            Self::Total10000m => stats.highest_total_altitude >= TOTAL_ALTITUDE_GOAL,
            Self::VersusFirstPlay => stats.versus_plays >= 1,
            Self::VersusFirstWin => stats.versus_wins_p1 >= 1,
            Self::Versus3Wins => stats.versus_wins_p1 >= VERSUS_WINS_GOAL,
            Self::VersusWinBy3000 => stats.max_win_margin >= WIN_MARGIN_GOAL,
            Self::VersusStreak3 => stats.win_streak_best >= WIN_STREAK_GOAL,
        }
    }

    /// Stat value the predicate's primary threshold is measured against.
    const fn metric(self, stats: &AchievementStats) -> u32 {
        match self {
            Self::FirstJudgement => stats.solo_plays.saturating_add(stats.versus_plays),
            Self::AlpsReached | Self::SnowReached | Self::EverestReached => stats.highest_altitude,
            Self::Total10000m => stats.highest_total_altitude,
            Self::VersusFirstPlay => stats.versus_plays,
            Self::VersusFirstWin | Self::Versus3Wins => stats.versus_wins_p1,
            Self::VersusWinBy3000 => stats.max_win_margin,
            Self::VersusStreak3 => stats.win_streak_best,
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Solo,
    Versus,
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub order: u8,
    pub required_value: Option<u32>,
}

/// Display progress toward an achievement's required value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementProgress {
    pub current: u32,
    pub required: u32,
    pub unlocked: bool,
}

impl Achievement {
    /// Progress for entries that carry a required value.
    ///
    /// An entry can unlock through a secondary counter (e.g. `snow_count`)
    /// before `current` reaches `required`; `unlocked` reflects the predicate.
    #[must_use]
    pub const fn progress(&self, stats: &AchievementStats) -> Option<AchievementProgress> {
        let Some(required) = self.required_value else {
            return None;
        };
        Some(AchievementProgress {
            current: self.id.metric(stats),
            required,
            unlocked: self.id.is_unlocked(stats),
        })
    }
}

pub const CATALOG: [Achievement; 10] = [
    Achievement {
        id: AchievementId::FirstJudgement,
        title: "はじめての審判",
        description: "初めて判定を受ける",
        category: AchievementCategory::Solo,
        order: 1,
        required_value: None,
    },
    Achievement {
        id: AchievementId::AlpsReached,
        title: "アルプス到達",
        description: "1ラウンドで3000mに到達する",
        category: AchievementCategory::Solo,
        order: 2,
        required_value: Some(ALPS_ALTITUDE),
    },
    Achievement {
        id: AchievementId::SnowReached,
        title: "雪山到達",
        description: "1ラウンドで6000mに到達する",
        category: AchievementCategory::Solo,
        order: 3,
        required_value: Some(SNOW_ALTITUDE),
    },
    Achievement {
        id: AchievementId::EverestReached,
        title: "エベレスト到達",
        description: "1ラウンドで8000mに到達する",
        category: AchievementCategory::Solo,
        order: 4,
        required_value: Some(EVEREST_ALTITUDE),
    },
    Achievement {
        id: AchievementId::Total10000m,
        title: "累計10000m",
        description: "1ゲームの合計で10000mを登る",
        category: AchievementCategory::Solo,
        order: 5,
        required_value: Some(TOTAL_ALTITUDE_GOAL),
    },
    Achievement {
        id: AchievementId::VersusFirstPlay,
        title: "はじめての対戦",
        description: "対戦モードを1回遊ぶ",
        category: AchievementCategory::Versus,
        order: 6,
        required_value: None,
    },
    Achievement {
        id: AchievementId::VersusFirstWin,
        title: "初勝利",
        description: "対戦で1回勝つ",
        category: AchievementCategory::Versus,
        order: 7,
        required_value: Some(1),
    },
    Achievement {
        id: AchievementId::Versus3Wins,
        title: "3勝",
        description: "対戦で通算3回勝つ",
        category: AchievementCategory::Versus,
        order: 8,
        required_value: Some(VERSUS_WINS_GOAL),
    },
    Achievement {
        id: AchievementId::VersusWinBy3000,
        title: "圧勝",
        description: "3000m以上の差をつけて勝つ",
        category: AchievementCategory::Versus,
        order: 9,
        required_value: Some(WIN_MARGIN_GOAL),
    },
    Achievement {
        id: AchievementId::VersusStreak3,
        title: "3連勝",
        description: "対戦で3連勝する",
        category: AchievementCategory::Versus,
        order: 10,
        required_value: Some(WIN_STREAK_GOAL),
    },
];

/// Look up a catalog entry.
#[must_use]
pub fn achievement(id: AchievementId) -> Option<&'static Achievement> {
    CATALOG.iter().find(|entry| entry.id == id)
}

/// Every achievement whose predicate holds for `stats`.
#[must_use]
pub fn unlocked_from(stats: &AchievementStats) -> BTreeSet<AchievementId> {
    CATALOG
        .iter()
        .map(|entry| entry.id)
        .filter(|id| id.is_unlocked(stats))
        .collect()
}

/// Unlocks present for `stats` but missing from `previous`, in catalog order.
#[must_use]
pub fn newly_unlocked(
    previous: &BTreeSet<AchievementId>,
    stats: &AchievementStats,
) -> Vec<AchievementId> {
    let fresh: Vec<AchievementId> = unlocked_from(stats)
        .difference(previous)
        .copied()
        .collect();
    for id in &fresh {
        log::debug!("achievement unlocked: {id}");
    }
    fresh
}

/// Result handed back to the caller after a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockReport {
    pub stats: AchievementStats,
    pub newly_unlocked: Vec<AchievementId>,
}

/// Merge `partial` into `current` and report achievements that were not already in `previous`.
#[must_use]
pub fn record_stats(
    current: &AchievementStats,
    partial: &StatsDelta,
    previous: &BTreeSet<AchievementId>,
) -> UnlockReport {
    let stats = merge_stats(current, partial);
    UnlockReport {
        newly_unlocked: newly_unlocked(previous, &stats),
        stats,
    }
}
