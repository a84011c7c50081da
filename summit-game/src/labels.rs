//! Closed set of rhetorical labels the judgment provider may attach to a text.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rhetorical quality detected in the player's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Numeric,
    Comparison,
    Effort,
    Authority,
    Sarcasm,
    Condescending,
    Backhanded,
    Gatekeep,
}

impl Label {
    pub const ALL: [Self; 8] = [
        Self::Numeric,
        Self::Comparison,
        Self::Effort,
        Self::Authority,
        Self::Sarcasm,
        Self::Condescending,
        Self::Backhanded,
        Self::Gatekeep,
    ];

    /// Wire identifier used by the judgment provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::Comparison => "COMPARISON",
            Self::Effort => "EFFORT",
            Self::Authority => "AUTHORITY",
            Self::Sarcasm => "SARCASM",
            Self::Condescending => "CONDESCENDING",
            Self::Backhanded => "BACKHANDED",
            Self::Gatekeep => "GATEKEEP",
        }
    }

    /// Core labels are the only ones weather can boost.
    #[must_use]
    pub const fn is_core(self) -> bool {
        matches!(self, Self::Numeric | Self::Comparison | Self::Effort)
    }

    /// Exact, case-sensitive lookup of a wire identifier.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == raw)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known label identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label identifier: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip_through_parse() {
        for label in Label::ALL {
            assert_eq!(Label::parse(label.as_str()), Some(label));
            assert_eq!(label.to_string(), label.as_str());
        }
    }

    #[test]
    fn parse_is_case_sensitive_and_closed() {
        assert_eq!(Label::parse("numeric"), None);
        assert_eq!(Label::parse("HUMBLEBRAG"), None);
        assert_eq!(
            "BRAG".parse::<Label>(),
            Err(UnknownLabel("BRAG".to_string()))
        );
    }

    #[test]
    fn only_three_core_labels() {
        let core: Vec<Label> = Label::ALL.into_iter().filter(|l| l.is_core()).collect();
        assert_eq!(core, vec![Label::Numeric, Label::Comparison, Label::Effort]);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Label::Gatekeep).unwrap();
        assert_eq!(json, "\"GATEKEEP\"");
        let parsed: Label = serde_json::from_str("\"BACKHANDED\"").unwrap();
        assert_eq!(parsed, Label::Backhanded);
    }
}
