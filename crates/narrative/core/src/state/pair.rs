//! Unordered name pairs for relationship storage.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Alias the generator may use for the player character.
pub const LEADER_LABEL: &str = "리더";

/// Folds the generic leader label onto the scenario's canonical player name.
/// Any other name passes through unchanged.
pub fn canonical_name<'a>(name: &'a str, player_name: &'a str) -> &'a str {
    if name == LEADER_LABEL {
        player_name
    } else {
        name
    }
}

/// Key for a pairwise relationship score.
///
/// Construction sorts the two names, so `(a, b)` and `(b, a)` address the
/// same entry. Fields stay private to keep that invariant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                first: a.to_owned(),
                second: b.to_owned(),
            }
        } else {
            Self {
                first: b.to_owned(),
                second: a.to_owned(),
            }
        }
    }

    pub fn members(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}
