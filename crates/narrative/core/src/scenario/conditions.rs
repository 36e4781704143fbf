//! The closed condition vocabulary used by ending archetypes.
//!
//! Conditions are data, not code: each variant names a state observation and
//! a threshold, and the ending evaluator interprets them. Keeping the set
//! closed means authored content can never smuggle in arbitrary predicates.
use serde::{Deserialize, Serialize};

/// One testable condition inside an ending archetype.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// A stat compared against a fixed threshold.
    Stat {
        stat: String,
        cmp: Comparator,
        value: i64,
    },
    /// A flag that must be set: boolean true, or a count above zero.
    Flag { flag: String },
    /// The number of living survivors compared against a threshold.
    Survivors { cmp: Comparator, value: i64 },
}

/// Threshold comparison used by [`Condition`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    AtLeast,
    AtMost,
    Equal,
}

impl Comparator {
    /// Tests `observed` against `threshold`.
    #[inline]
    pub fn holds(self, observed: i64, threshold: i64) -> bool {
        match self {
            Comparator::AtLeast => observed >= threshold,
            Comparator::AtMost => observed <= threshold,
            Comparator::Equal => observed == threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparators_hold_at_their_boundary() {
        assert!(Comparator::AtLeast.holds(60, 60));
        assert!(!Comparator::AtLeast.holds(59, 60));
        assert!(Comparator::AtMost.holds(0, 0));
        assert!(!Comparator::AtMost.holds(1, 0));
        assert!(Comparator::Equal.holds(3, 3));
        assert!(!Comparator::Equal.holds(4, 3));
    }

    #[test]
    fn comparator_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(Comparator::from_str("at_least"), Ok(Comparator::AtLeast));
        assert_eq!(Comparator::from_str("AT_MOST"), Ok(Comparator::AtMost));
        assert_eq!(Comparator::AtLeast.to_string(), "at_least");
    }
}
