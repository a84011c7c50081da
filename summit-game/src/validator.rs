//! Sanitizing boundary for judgment payloads.
//!
//! The judgment provider returns loosely shaped JSON. [`validate`] turns any
//! value, including garbage, into a [`SanitizedJudgment`] that the rest of
//! the pipeline trusts without re-checking. It never fails: anything
//! malformed, absent or out of range is replaced by a default.
//!
//! Numbers are coerced with loose script-style rules (numeric strings parse,
//! booleans become 1/0, `null` becomes 0). Values that cannot be read as a
//! number become NaN and stay NaN through clamping, so a broken provider is
//! visible in `mount_score` rather than masked as 0. The shaped altitude of a
//! NaN score is 0.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::altitude::shape_with_config;
use crate::config::{ScoringConfig, default_config};
use crate::constants::{FALLBACK_COMMENTARY, FALLBACK_TIP, PENALTY_KEY};
use crate::labels::Label;
use crate::numbers::clamp_preserving_nan;
use crate::route::RouteKind;

/// Labels attached to one round; at most five survive validation.
pub type LabelList = SmallVec<[Label; 5]>;

/// Per-label sub-scores plus the optional penalty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub scores: BTreeMap<Label, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<f64>,
}

/// Trusted, bounded counterpart of a judgment payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedJudgment {
    pub mount_score: f64,
    pub altitude: u32,
    pub labels: LabelList,
    pub breakdown: Breakdown,
    pub tip: String,
    pub commentary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<String>,
}

/// Validate a parsed payload with the default configuration.
#[must_use]
pub fn validate(raw: &Value, route: RouteKind) -> SanitizedJudgment {
    validate_with_config(raw, route, default_config())
}

/// Validate raw provider text; unparseable text is treated like an empty payload.
#[must_use]
pub fn validate_str(raw: &str, route: RouteKind) -> SanitizedJudgment {
    let value = serde_json::from_str(raw).unwrap_or_else(|e| {
        log::debug!("judgment payload is not JSON ({e}); using defaults");
        Value::Null
    });
    validate(&value, route)
}

/// Validate a parsed payload.
#[must_use]
pub fn validate_with_config(
    raw: &Value,
    route: RouteKind,
    cfg: &ScoringConfig,
) -> SanitizedJudgment {
    let field = |name: &str| raw.as_object().and_then(|obj| obj.get(name));

    let mount_score = clamp_preserving_nan(coerce_number(field("mountScore")), 0.0, 1.0);
    let altitude = shape_with_config(mount_score, route, cfg);

    SanitizedJudgment {
        mount_score,
        altitude,
        labels: sanitize_labels(field("labels"), cfg.max_labels),
        breakdown: sanitize_breakdown(field("breakdown").and_then(Value::as_object)),
        tip: sanitize_text(field("tip"), cfg.max_comment_chars, FALLBACK_TIP),
        commentary: sanitize_text(
            field("commentary"),
            cfg.max_comment_chars,
            FALLBACK_COMMENTARY,
        ),
        rewrite: field("rewrite")
            .and_then(Value::as_str)
            .map(|text| truncate_chars(text.trim(), cfg.max_rewrite_chars)),
    }
}

/// Loose number coercion; absent and non-numeric values become NaN.
fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => parse_numeric_text(text),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single @ (Value::Number(_) | Value::String(_) | Value::Null)] => {
                coerce_number(Some(single))
            }
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed
            .chars()
            .any(|c| c.is_alphabetic() && !matches!(c, 'e' | 'E')) =>
        {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

fn sanitize_labels(value: Option<&Value>, max_labels: usize) -> LabelList {
    let Some(items) = value.and_then(Value::as_array) else {
        return LabelList::new();
    };
    let known: LabelList = items
        .iter()
        .filter_map(Value::as_str)
        .filter_map(Label::parse)
        .take(max_labels)
        .collect();
    if let Some(dropped) = dropped_labels(items.len(), known.len()) {
        log::debug!("dropped {dropped} unknown or surplus labels");
    }
    known
}

fn dropped_labels(received: usize, kept: usize) -> Option<usize> {
    received.checked_sub(kept).filter(|&dropped| dropped > 0)
}

fn sanitize_breakdown(value: Option<&Map<String, Value>>) -> Breakdown {
    let mut breakdown = Breakdown::default();
    let Some(entries) = value else {
        return breakdown;
    };
    for (key, raw) in entries {
        let number = coerce_number(Some(raw));
        if key == PENALTY_KEY {
            breakdown.penalty = Some(clamp_preserving_nan(number, -1.0, 0.0));
        } else if let Some(label) = Label::parse(key) {
            breakdown
                .scores
                .insert(label, clamp_preserving_nan(number, 0.0, 1.0));
        }
    }
    breakdown
}

fn sanitize_text(value: Option<&Value>, limit: usize, fallback: &str) -> String {
    let text = value
        .and_then(Value::as_str)
        .map(|text| truncate_chars(text.trim(), limit))
        .unwrap_or_default();
    if text.is_empty() {
        log::debug!("judgment text missing or blank; using fallback");
        fallback.to_string()
    } else {
        text
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;
    use serde_json::json;

    #[test]
    fn negative_score_clamps_to_ground() {
        let judged = validate(&json!({ "mountScore": -0.5 }), RouteKind::Normal);
        assert!(judged.mount_score.abs() < FLOAT_EPSILON);
        assert_eq!(judged.altitude, 0);
    }

    #[test]
    fn score_above_one_clamps_and_respects_route_ceiling() {
        let judged = validate(&json!({ "mountScore": 3 }), RouteKind::Safe);
        assert!((judged.mount_score - 1.0).abs() < FLOAT_EPSILON);
        assert_eq!(judged.altitude, 5_500);
    }

    #[test]
    fn numeric_strings_and_booleans_coerce() {
        let judged = validate(&json!({ "mountScore": " 0.5 " }), RouteKind::Risky);
        assert!((judged.mount_score - 0.5).abs() < FLOAT_EPSILON);
        assert_eq!(judged.altitude, 3_128);

        let judged = validate(&json!({ "mountScore": true }), RouteKind::Risky);
        assert_eq!(judged.altitude, 8_848);

        let judged = validate(&json!({ "mountScore": null }), RouteKind::Risky);
        assert!(judged.mount_score.abs() < FLOAT_EPSILON);
    }

    #[test]
    fn unreadable_score_stays_nan() {
        for raw in [
            json!({ "mountScore": "very boastful" }),
            json!({ "mountScore": { "value": 1 } }),
            json!({}),
            json!("not an object"),
        ] {
            let judged = validate(&raw, RouteKind::Normal);
            assert!(judged.mount_score.is_nan(), "{raw}");
            assert_eq!(judged.altitude, 0);
        }
    }

    #[test]
    fn labels_are_filtered_truncated_and_keep_duplicates() {
        let raw = json!({
            "mountScore": 0.4,
            "labels": ["NUMERIC", "bogus", 7, "NUMERIC", "EFFORT", "SARCASM", "GATEKEEP", "AUTHORITY"]
        });
        let judged = validate(&raw, RouteKind::Normal);
        assert_eq!(
            judged.labels.as_slice(),
            &[
                Label::Numeric,
                Label::Numeric,
                Label::Effort,
                Label::Sarcasm,
                Label::Gatekeep
            ]
        );
    }

    #[test]
    fn surplus_known_labels_count_as_dropped() {
        let raw = json!({
            "labels": ["NUMERIC", "EFFORT", "SARCASM", "GATEKEEP", "AUTHORITY", "COMPARISON", "EFFORT"]
        });
        let judged = validate(&raw, RouteKind::Normal);
        assert_eq!(judged.labels.len(), 5);
        assert_eq!(dropped_labels(7, judged.labels.len()), Some(2));
        assert_eq!(dropped_labels(3, 3), None);
        assert_eq!(dropped_labels(0, 0), None);
    }

    #[test]
    fn labels_must_be_an_array() {
        let judged = validate(&json!({ "labels": "NUMERIC" }), RouteKind::Normal);
        assert!(judged.labels.is_empty());
    }

    #[test]
    fn breakdown_keeps_known_keys_with_clamps() {
        let raw = json!({
            "breakdown": {
                "NUMERIC": 1.4,
                "EFFORT": "0.3",
                "COMPARISON": -2,
                "penalty": 0.5,
                "mystery": 0.9
            }
        });
        let judged = validate(&raw, RouteKind::Normal);
        let scores = &judged.breakdown.scores;
        assert_eq!(scores.len(), 3);
        assert!((scores[&Label::Numeric] - 1.0).abs() < FLOAT_EPSILON);
        assert!((scores[&Label::Effort] - 0.3).abs() < FLOAT_EPSILON);
        assert!(scores[&Label::Comparison].abs() < FLOAT_EPSILON);
        assert_eq!(judged.breakdown.penalty, Some(0.0));

        let raw = json!({ "breakdown": { "penalty": -4 } });
        let judged = validate(&raw, RouteKind::Normal);
        assert_eq!(judged.breakdown.penalty, Some(-1.0));
    }

    #[test]
    fn blank_texts_fall_back_and_long_texts_truncate() {
        let long = "あ".repeat(120);
        let raw = json!({ "tip": "   ", "commentary": long });
        let judged = validate(&raw, RouteKind::Normal);
        assert_eq!(judged.tip, FALLBACK_TIP);
        assert_eq!(judged.commentary.chars().count(), 80);

        let judged = validate(&json!({ "tip": 12 }), RouteKind::Normal);
        assert_eq!(judged.tip, FALLBACK_TIP);
        assert_eq!(judged.commentary, FALLBACK_COMMENTARY);

        let judged = validate(&json!({ "tip": "  数字が効いている  " }), RouteKind::Normal);
        assert_eq!(judged.tip, "数字が効いている");
    }

    #[test]
    fn rewrite_keeps_empty_strings_but_drops_non_strings() {
        let judged = validate(&json!({ "rewrite": "   " }), RouteKind::Normal);
        assert_eq!(judged.rewrite, Some(String::new()));

        let judged = validate(&json!({ "rewrite": 42 }), RouteKind::Normal);
        assert_eq!(judged.rewrite, None);

        let judged = validate(&json!({ "rewrite": "x".repeat(300) }), RouteKind::Normal);
        assert_eq!(judged.rewrite.map(|r| r.len()), Some(200));
    }

    #[test]
    fn raw_text_that_is_not_json_still_validates() {
        let judged = validate_str("<html>rate limited</html>", RouteKind::Risky);
        assert!(judged.mount_score.is_nan());
        assert!(judged.labels.is_empty());
        assert_eq!(judged.tip, FALLBACK_TIP);

        let judged = validate_str(r#"{"mountScore":0.5,"labels":["EFFORT"]}"#, RouteKind::Risky);
        assert_eq!(judged.altitude, 3_128);
        assert_eq!(judged.labels.as_slice(), &[Label::Effort]);
    }

    #[test]
    fn text_coercion_rejects_words() {
        assert!(parse_numeric_text("inf").is_nan());
        assert!(parse_numeric_text("NaN").is_nan());
        assert!((parse_numeric_text("1e-1") - 0.1).abs() < FLOAT_EPSILON);
        assert!(parse_numeric_text("Infinity").is_infinite());
    }
}
