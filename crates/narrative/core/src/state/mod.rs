//! Mutable playthrough state.
//!
//! [`GameState`] is everything that survives between turns: stats, flags,
//! relationships, the survivor roster, the clock, and the narrative log. It
//! is created once from a [`Scenario`] and afterwards only the turn engine
//! writes to it. All collections are ordered so that serialization and
//! iteration are deterministic.
mod pair;

pub use pair::{LEADER_LABEL, PairKey, canonical_name};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routes::ActionTag;
use crate::scenario::{EndCondition, FlagKind, Scenario, TimeUnit};

/// Full persistent state of one playthrough.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current stat values, keyed by stat id. Every defined stat is present.
    pub stats: BTreeMap<String, i64>,
    /// Acquired flags. Absent means never acquired.
    pub flags: BTreeMap<String, FlagValue>,
    /// Pairwise relationship scores keyed by unordered name pair.
    pub relationships: BTreeMap<PairKey, i64>,
    /// Survivor roster in authored order.
    pub survivors: Vec<Survivor>,
    pub clock: Clock,
    /// Append-only narrative transcript.
    pub log: Vec<LogEntry>,
    /// The prompt currently shown to the player.
    pub prompt: PromptState,
    /// Tagged record of every action the player has taken.
    pub action_history: Vec<ActionRecord>,
}

impl GameState {
    /// Creates the initial state for a scenario.
    ///
    /// Stats start at their authored initial values, flags with a nonzero
    /// initial are pre-seeded, survivors all start alive, and the clock is
    /// derived from the scenario's end condition.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let stats = scenario
            .stats
            .iter()
            .map(|def| (def.id.clone(), def.initial))
            .collect();

        let mut flags = BTreeMap::new();
        for def in &scenario.flags {
            if def.initial != 0 {
                let value = match def.kind {
                    FlagKind::Boolean => FlagValue::Bool(true),
                    FlagKind::Count => FlagValue::Count(def.initial),
                };
                flags.insert(def.name.clone(), value);
            }
        }

        let survivors = scenario
            .survivors
            .iter()
            .map(|name| Survivor {
                name: name.clone(),
                status: SurvivorStatus::Alive,
            })
            .collect();

        let clock = match scenario.end_condition {
            EndCondition::TimeLimit {
                value,
                unit: TimeUnit::Hours,
            } => Clock::Hours {
                remaining: i64::from(value),
                initial: i64::from(value),
            },
            _ => Clock::Days { day: 1 },
        };

        Self {
            stats,
            flags,
            relationships: BTreeMap::new(),
            survivors,
            clock,
            log: Vec::new(),
            prompt: PromptState::default(),
            action_history: Vec::new(),
        }
    }

    /// Current in-fiction day, regardless of clock mode.
    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    /// Number of survivors who still count as alive (alive or injured).
    pub fn living_survivors(&self) -> usize {
        self.survivors
            .iter()
            .filter(|s| s.status.counts_as_alive())
            .count()
    }

    /// Mutable lookup of a survivor by exact name.
    pub fn survivor_mut(&mut self, name: &str) -> Option<&mut Survivor> {
        self.survivors.iter_mut().find(|s| s.name == name)
    }

    /// The most recent narrative entry, if any.
    pub fn latest_narrative(&self) -> Option<&str> {
        self.log
            .iter()
            .rev()
            .find(|e| e.kind == LogKind::Narrative)
            .map(|e| e.text.as_str())
    }
}

/// Scenario clock. Day-limited scenarios count days upward; hour-limited
/// scenarios count a fixed budget downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clock {
    Days { day: u32 },
    Hours { remaining: i64, initial: i64 },
}

impl Clock {
    /// Effective day number. Hour mode derives it from elapsed hours, so a
    /// fresh 72-hour scenario is day 1 and becomes day 2 after 24 hours.
    pub fn day(&self) -> u32 {
        match *self {
            Clock::Days { day } => day,
            Clock::Hours { remaining, initial } => {
                let elapsed = (initial - remaining).max(0);
                (elapsed / 24) as u32 + 1
            }
        }
    }
}

/// Value of an acquired flag. The shape is fixed by the flag's definition
/// and never changes once the entry exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagValue {
    Bool(bool),
    Count(i64),
}

impl FlagValue {
    /// True for a set boolean or a positive count.
    pub fn is_set(&self) -> bool {
        match *self {
            FlagValue::Bool(b) => b,
            FlagValue::Count(n) => n > 0,
        }
    }
}

/// One entry of the narrative transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
    /// Day the entry was written.
    pub day: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Prose produced by the generator.
    Narrative,
    /// Synthetic marker inserted when a new day begins.
    DayBreak,
}

/// The prompt the player currently faces: situation text and two choices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptState {
    pub text: String,
    pub choice_a: String,
    pub choice_b: String,
}

/// One member of the survivor roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survivor {
    pub name: String,
    pub status: SurvivorStatus,
}

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
pub enum SurvivorStatus {
    #[default]
    Alive,
    Injured,
    Missing,
    Dead,
}

impl SurvivorStatus {
    /// Whether this status still counts toward the living-survivor total.
    pub fn counts_as_alive(self) -> bool {
        matches!(self, SurvivorStatus::Alive | SurvivorStatus::Injured)
    }
}

/// One tagged action the player has taken, kept for route scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub tag: ActionTag,
    pub day: u32,
}

/// Free-form action text submitted by the player for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub text: String,
}

impl PlayerAction {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
