//! Per-game missions evaluated against accumulated round history.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{
    MISSION_EVEREST_TARGET, MISSION_LABELS_TARGET, MISSION_TOTAL_TARGET, NO_MISSION_TEXT,
};
use crate::labels::Label;
use crate::numbers::usize_to_f64;
use crate::validator::LabelList;

/// Objective chosen once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionId {
    #[serde(rename = "TOTAL_15000")]
    Total15000,
    #[serde(rename = "EVEREST_1")]
    Everest1,
    #[serde(rename = "LABELS_3")]
    Labels3,
}

impl MissionId {
    pub const ALL: [Self; 3] = [Self::Total15000, Self::Everest1, Self::Labels3];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Total15000 => "TOTAL_15000",
            Self::Everest1 => "EVEREST_1",
            Self::Labels3 => "LABELS_3",
        }
    }

    /// Numeric goal: metres for altitude missions, distinct labels for `LABELS_3`.
    #[must_use]
    pub fn target(self) -> f64 {
        match self {
            Self::Total15000 => f64::from(MISSION_TOTAL_TARGET),
            Self::Everest1 => f64::from(MISSION_EVEREST_TARGET),
            Self::Labels3 => usize_to_f64(MISSION_LABELS_TARGET),
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Total15000 => "累計15000mを登れ",
            Self::Everest1 => "一度でも8000mを超えろ",
            Self::Labels3 => "3種類のラベルを集めろ",
        }
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One played round as the mission evaluator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Shaped altitude before composition, when known.
    pub altitude: Option<u32>,
    /// Composed altitude, when the round has a result.
    pub final_altitude: Option<u32>,
    pub labels: LabelList,
}

impl RoundRecord {
    /// Best available altitude: composed, then shaped, then 0.
    #[must_use]
    pub fn effective_altitude(&self) -> u32 {
        self.final_altitude.or(self.altitude).unwrap_or(0)
    }
}

/// Read-only game state the mission evaluator runs against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameProgress {
    pub mission: Option<MissionId>,
    pub cumulative_score: u32,
    pub rounds: Vec<RoundRecord>,
}

/// Mission status for display; `ratio` is absent only when no mission is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionProgress {
    pub cleared: bool,
    pub progress_text: String,
    pub ratio: Option<f64>,
}

impl MissionProgress {
    /// Ratio clamped into `[0, 1]` for progress bars; non-finite ratios map to the nearest bound.
    #[must_use]
    pub fn display_ratio(&self) -> f64 {
        match self.ratio {
            Some(r) if r.is_nan() => 0.0,
            Some(r) => r.clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

/// Evaluate the active mission. Pure and idempotent.
///
/// `EVEREST_1` with no rounds yet takes the maximum over an empty set, which
/// is negative infinity, and reports that as the ratio.
#[must_use]
pub fn evaluate(state: &GameProgress) -> MissionProgress {
    let Some(mission) = state.mission else {
        return MissionProgress {
            cleared: false,
            progress_text: NO_MISSION_TEXT.to_string(),
            ratio: None,
        };
    };
    let target = mission.target();
    match mission {
        MissionId::Total15000 => {
            let total = f64::from(state.cumulative_score);
            MissionProgress {
                cleared: total >= target,
                progress_text: progress_line(
                    "累計",
                    &format!("{}m", state.cumulative_score),
                    target,
                    "m",
                ),
                ratio: Some((total / target).min(1.0)),
            }
        }
        MissionId::Everest1 => {
            let best = state
                .rounds
                .iter()
                .map(|round| f64::from(round.effective_altitude()))
                .fold(f64::NEG_INFINITY, f64::max);
            let shown = if best.is_finite() {
                format!("{best}m")
            } else {
                "--".to_string()
            };
            MissionProgress {
                cleared: best >= target,
                progress_text: progress_line("最高", &shown, target, "m"),
                ratio: Some((best / target).min(1.0)),
            }
        }
        MissionId::Labels3 => {
            let unique: BTreeSet<Label> = state
                .rounds
                .iter()
                .flat_map(|round| round.labels.iter().copied())
                .collect();
            let count = usize_to_f64(unique.len());
            MissionProgress {
                cleared: count >= target,
                progress_text: progress_line(
                    "ラベル",
                    &format!("{}種", unique.len()),
                    target,
                    "種",
                ),
                ratio: Some((count / target).min(1.0)),
            }
        }
    }
}

fn progress_line(prefix: &str, current: &str, target: f64, unit: &str) -> String {
    format!("{prefix} {current} / {target}{unit}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;

    fn round(final_altitude: Option<u32>, altitude: Option<u32>, labels: &[Label]) -> RoundRecord {
        RoundRecord {
            altitude,
            final_altitude,
            labels: labels.iter().copied().collect(),
        }
    }

    fn progress(
        mission: MissionId,
        cumulative_score: u32,
        rounds: Vec<RoundRecord>,
    ) -> GameProgress {
        GameProgress {
            mission: Some(mission),
            cumulative_score,
            rounds,
        }
    }

    #[test]
    fn no_mission_sentinel() {
        let out = evaluate(&GameProgress::default());
        assert!(!out.cleared);
        assert_eq!(out.ratio, None);
        assert_eq!(out.progress_text, "ミッションなし");
    }

    #[test]
    fn titles_are_distinct_and_name_the_goal() {
        assert_eq!(MissionId::Total15000.title(), "累計15000mを登れ");
        assert_eq!(MissionId::Everest1.title(), "一度でも8000mを超えろ");
        assert_eq!(MissionId::Labels3.title(), "3種類のラベルを集めろ");
        let titles: std::collections::BTreeSet<_> =
            MissionId::ALL.iter().map(|m| m.title()).collect();
        assert_eq!(titles.len(), MissionId::ALL.len());
    }

    #[test]
    fn total_clears_exactly_at_target() {
        let out = evaluate(&progress(MissionId::Total15000, 15_000, vec![]));
        assert!(out.cleared);
        assert_eq!(out.ratio, Some(1.0));
        assert_eq!(out.progress_text, "累計 15000m / 15000m");

        let out = evaluate(&progress(MissionId::Total15000, 7_500, vec![]));
        assert!(!out.cleared);
        assert!((out.ratio.unwrap() - 0.5).abs() < FLOAT_EPSILON);

        let out = evaluate(&progress(MissionId::Total15000, 30_000, vec![]));
        assert_eq!(out.ratio, Some(1.0));
    }

    #[test]
    fn everest_uses_best_available_altitude() {
        let rounds = vec![
            round(Some(5_000), Some(7_000), &[]),
            round(None, Some(6_000), &[]),
            round(None, None, &[]),
        ];
        let out = evaluate(&progress(MissionId::Everest1, 11_000, rounds));
        assert!(!out.cleared);
        assert!((out.ratio.unwrap() - 0.75).abs() < FLOAT_EPSILON);

        let rounds = vec![round(Some(8_000), None, &[])];
        let out = evaluate(&progress(MissionId::Everest1, 8_000, rounds));
        assert!(out.cleared);
        assert_eq!(out.ratio, Some(1.0));
    }

    #[test]
    fn everest_without_rounds_reports_negative_infinity() {
        let out = evaluate(&progress(MissionId::Everest1, 0, vec![]));
        assert!(!out.cleared);
        assert_eq!(out.ratio, Some(f64::NEG_INFINITY));
        assert!(out.display_ratio().abs() < FLOAT_EPSILON);
        assert_eq!(out.progress_text, "最高 -- / 8000m");
    }

    #[test]
    fn labels_count_distinct_across_rounds() {
        let rounds = vec![
            round(Some(1), None, &[Label::Numeric, Label::Numeric]),
            round(Some(1), None, &[Label::Numeric, Label::Sarcasm]),
        ];
        let out = evaluate(&progress(MissionId::Labels3, 2, rounds.clone()));
        assert!(!out.cleared);
        assert!((out.ratio.unwrap() - 2.0 / 3.0).abs() < FLOAT_EPSILON);

        let mut more = rounds;
        more.push(round(Some(1), None, &[Label::Gatekeep, Label::Effort]));
        let out = evaluate(&progress(MissionId::Labels3, 3, more));
        assert!(out.cleared);
        assert_eq!(out.ratio, Some(1.0));
        assert_eq!(out.progress_text, "ラベル 4種 / 3種");
    }

    #[test]
    fn evaluation_is_idempotent() {
        let state = progress(
            MissionId::Labels3,
            100,
            vec![round(Some(100), None, &[Label::Effort])],
        );
        assert_eq!(evaluate(&state), evaluate(&state));
    }

    #[test]
    fn mission_ids_use_wire_names() {
        for mission in MissionId::ALL {
            let json = serde_json::to_string(&mission).unwrap();
            assert_eq!(json, format!("\"{}\"", mission.as_str()));
        }
    }
}
