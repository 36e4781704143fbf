//! Static scenario definitions.
//!
//! A [`Scenario`] is authored content: the stat schema, flag schema, survivor
//! roster, ending archetypes, and end condition for one playthrough. It never
//! changes at runtime; the engine reads it to interpret and bound generator
//! output. Loaders validate definitions with [`Scenario::validate`] before
//! they reach the engine, so unknown references inside authored endings are
//! authoring errors rather than runtime surprises.
mod conditions;

pub use conditions::{Comparator, Condition};

use serde::{Deserialize, Serialize};

/// Complete authored definition of one playable scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    /// Canonical in-fiction name of the player character. Generator output
    /// that says "리더" is folded onto this name.
    pub player_name: String,
    /// Names of the starting survivors. All begin alive.
    #[serde(default)]
    pub survivors: Vec<String>,
    pub stats: Vec<StatDef>,
    #[serde(default)]
    pub flags: Vec<FlagDef>,
    #[serde(default)]
    pub endings: Vec<EndingDef>,
    pub end_condition: EndCondition,
}

impl Scenario {
    /// Looks up a stat definition by id.
    pub fn stat(&self, id: &str) -> Option<&StatDef> {
        self.stats.iter().find(|s| s.id == id)
    }

    /// Looks up a flag definition by name.
    pub fn flag(&self, name: &str) -> Option<&FlagDef> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Checks internal consistency of the authored definition.
    ///
    /// Every condition inside an ending archetype must reference a defined
    /// stat or flag; ranges must be non-empty and contain their initial
    /// values. Loaders call this before handing the scenario to the engine.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.player_name.trim().is_empty() {
            return Err(ScenarioError::EmptyPlayerName);
        }

        for (i, stat) in self.stats.iter().enumerate() {
            if self.stats[..i].iter().any(|s| s.id == stat.id) {
                return Err(ScenarioError::DuplicateStat(stat.id.clone()));
            }
            if stat.min >= stat.max {
                return Err(ScenarioError::InvalidStatRange {
                    id: stat.id.clone(),
                    min: stat.min,
                    max: stat.max,
                });
            }
            if stat.initial < stat.min || stat.initial > stat.max {
                return Err(ScenarioError::InitialOutOfRange {
                    id: stat.id.clone(),
                    initial: stat.initial,
                });
            }
        }

        for (i, flag) in self.flags.iter().enumerate() {
            if self.flags[..i].iter().any(|f| f.name == flag.name) {
                return Err(ScenarioError::DuplicateFlag(flag.name.clone()));
            }
        }

        for (i, name) in self.survivors.iter().enumerate() {
            if self.survivors[..i].iter().any(|n| n == name) {
                return Err(ScenarioError::DuplicateSurvivor(name.clone()));
            }
        }

        for (i, ending) in self.endings.iter().enumerate() {
            if self.endings[..i].iter().any(|e| e.id == ending.id) {
                return Err(ScenarioError::DuplicateEnding(ending.id.clone()));
            }
            for condition in &ending.conditions {
                match condition {
                    Condition::Stat { stat, .. } if self.stat(stat).is_none() => {
                        return Err(ScenarioError::UnknownStatRef {
                            ending: ending.id.clone(),
                            stat: stat.clone(),
                        });
                    }
                    Condition::Flag { flag } if self.flag(flag).is_none() => {
                        return Err(ScenarioError::UnknownFlagRef {
                            ending: ending.id.clone(),
                            flag: flag.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }

        if let EndCondition::TimeLimit { value: 0, .. } = self.end_condition {
            return Err(ScenarioError::ZeroTimeLimit);
        }

        Ok(())
    }
}

/// One bounded integer stat tracked per playthrough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDef {
    pub id: String,
    /// Display name shown to the player and the generator.
    pub name: String,
    pub min: i64,
    pub max: i64,
    pub initial: i64,
    #[serde(default)]
    pub polarity: StatPolarity,
}

impl StatDef {
    /// Position of `value` inside the stat range, as a percentage.
    ///
    /// The range is guaranteed non-empty by [`Scenario::validate`].
    pub fn range_pct(&self, value: i64) -> f64 {
        (value - self.min) as f64 / (self.max - self.min) as f64 * 100.0
    }
}

/// Whether a higher value of the stat is desirable.
///
/// Polarity never changes arithmetic; it tells rendering and the generator
/// which direction is "good".
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum StatPolarity {
    #[default]
    HigherBetter,
    HigherWorse,
}

/// One named flag the generator may acquire for the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDef {
    pub name: String,
    pub kind: FlagKind,
    /// Nonzero seeds the flag at state creation. Boolean flags seed as set,
    /// count flags seed at this value. Zero leaves the flag absent until the
    /// generator acquires it.
    #[serde(default)]
    pub initial: i64,
}

/// Value shape of a flag, fixed at authoring time.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum FlagKind {
    #[default]
    Boolean,
    Count,
}

/// An authored ending with the conditions that trigger it.
///
/// Archetypes are evaluated in declaration order; an archetype with no
/// conditions documents an ending that only external logic can trigger and is
/// never fired automatically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndingDef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// How a playthrough is allowed to end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndCondition {
    /// The playthrough is over once a fixed amount of time has elapsed.
    TimeLimit { value: u32, unit: TimeUnit },
    /// The playthrough ends by reaching an authored goal ending.
    Goal,
    /// The playthrough ends only through condition-driven endings.
    #[serde(rename = "condition")]
    Conditional,
}

/// Unit for a time-limited scenario.
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
pub enum TimeUnit {
    Days,
    Hours,
}

/// Authoring errors surfaced by [`Scenario::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("player name must not be empty")]
    EmptyPlayerName,
    #[error("duplicate stat id `{0}`")]
    DuplicateStat(String),
    #[error("stat `{id}` has an empty range ({min}..{max})")]
    InvalidStatRange { id: String, min: i64, max: i64 },
    #[error("stat `{id}` starts at {initial}, outside its range")]
    InitialOutOfRange { id: String, initial: i64 },
    #[error("duplicate flag `{0}`")]
    DuplicateFlag(String),
    #[error("duplicate survivor `{0}`")]
    DuplicateSurvivor(String),
    #[error("duplicate ending id `{0}`")]
    DuplicateEnding(String),
    #[error("ending `{ending}` references unknown stat `{stat}`")]
    UnknownStatRef { ending: String, stat: String },
    #[error("ending `{ending}` references unknown flag `{flag}`")]
    UnknownFlagRef { ending: String, flag: String },
    #[error("time limit must be at least 1")]
    ZeroTimeLimit,
}
