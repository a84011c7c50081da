//! Flat altitude bonus for label breadth within a single round.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::{DiversityTier, ScoringConfig, default_config};
use crate::labels::Label;

/// Diversity bonus awarded for a round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiversityBonus {
    pub bonus_altitude: u32,
    pub reasons: Vec<String>,
}

/// Number of distinct labels in a round.
#[must_use]
pub fn unique_label_count(labels: &[Label]) -> usize {
    labels.iter().collect::<BTreeSet<_>>().len()
}

/// Resolve the diversity bonus with the default configuration.
#[must_use]
pub fn resolve_diversity(labels: &[Label]) -> DiversityBonus {
    resolve_diversity_with_config(labels, default_config())
}

/// Step-function bonus on unique label count; the highest reached tier wins.
#[must_use]
pub fn resolve_diversity_with_config(labels: &[Label], cfg: &ScoringConfig) -> DiversityBonus {
    let unique = unique_label_count(labels);
    let tiers = &cfg.diversity_tiers;
    let Some((index, tier)) = tiers
        .iter()
        .enumerate()
        .rev()
        .find(|(_, tier)| unique >= tier.min_unique)
    else {
        return DiversityBonus::default();
    };
    let open_ended = index + 1 == tiers.len();
    DiversityBonus {
        bonus_altitude: tier.bonus,
        reasons: vec![tier_reason(tier, open_ended)],
    }
}

fn tier_reason(tier: &DiversityTier, open_ended: bool) -> String {
    let suffix = if open_ended { "以上" } else { "" };
    format!(
        "{}種{suffix}複合ボーナス +{}m",
        tier.min_unique, tier.bonus
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Label::{Authority, Comparison, Effort, Numeric, Sarcasm};

    #[test]
    fn tiers_step_at_two_three_four() {
        assert_eq!(resolve_diversity(&[]).bonus_altitude, 0);
        assert_eq!(resolve_diversity(&[Numeric]).bonus_altitude, 0);
        assert_eq!(resolve_diversity(&[Numeric, Effort]).bonus_altitude, 300);
        assert_eq!(
            resolve_diversity(&[Numeric, Effort, Comparison]).bonus_altitude,
            700
        );
        assert_eq!(
            resolve_diversity(&[Numeric, Effort, Comparison, Sarcasm]).bonus_altitude,
            1_200
        );
        assert_eq!(
            resolve_diversity(&[Numeric, Effort, Comparison, Sarcasm, Authority]).bonus_altitude,
            1_200
        );
    }

    #[test]
    fn three_labels_name_the_tier() {
        let bonus = resolve_diversity(&[Numeric, Comparison, Effort]);
        assert_eq!(bonus.bonus_altitude, 700);
        assert_eq!(bonus.reasons, vec!["3種複合ボーナス +700m".to_string()]);

        let top = resolve_diversity(&[Numeric, Comparison, Effort, Sarcasm, Authority]);
        assert_eq!(top.reasons, vec!["4種以上複合ボーナス +1200m".to_string()]);
    }

    #[test]
    fn no_bonus_means_no_reasons() {
        assert!(resolve_diversity(&[Sarcasm, Sarcasm]).reasons.is_empty());
    }

    #[test]
    fn order_and_duplicates_do_not_matter() {
        let a = resolve_diversity(&[Numeric, Comparison]);
        let b = resolve_diversity(&[Comparison, Numeric]);
        let c = resolve_diversity(&[Numeric, Numeric, Comparison]);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(unique_label_count(&[Effort, Effort, Effort]), 1);
    }
}
