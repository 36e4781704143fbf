//! Ending evaluation.
//!
//! Archetypes are tested in declaration order and the first fully satisfied
//! one wins the turn; evaluation happens only on committed state. Unknown
//! references inside conditions are unsatisfiable, never fatal. On top of the
//! general pass sits a time-limit short-circuit: once the scenario's budget
//! is exhausted the time-expired ending fires regardless of anything else.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::scenario::{Condition, EndCondition, EndingDef, Scenario, TimeUnit};
use crate::state::{Clock, GameState};

/// Id of the synthesized ending used when a scenario's time runs out and no
/// authored ending covers it.
pub const TIME_EXPIRED_ENDING_ID: &str = "timeout";
/// Marker that designates an authored ending as the time-expired one.
pub const TIME_EXPIRED_MARKER: &str = "시간";
const TIME_EXPIRED_TITLE: &str = "시간 초과";

/// A concrete ending reached by a playthrough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub id: String,
    pub title: String,
}

impl Ending {
    fn from_def(def: &EndingDef) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
        }
    }
}

/// How close one archetype is to triggering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingProgress {
    pub id: String,
    pub title: String,
    pub met: usize,
    pub total: usize,
}

impl EndingProgress {
    pub fn ratio(&self) -> f64 {
        // total is never zero: zero-condition archetypes are not reported
        self.met as f64 / self.total as f64
    }
}

/// Result of one evaluation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct EndingReport {
    pub triggered: Option<Ending>,
    pub progress: Vec<EndingProgress>,
}

/// Evaluates all archetypes against the state.
pub fn evaluate(scenario: &Scenario, state: &GameState) -> EndingReport {
    let mut triggered = scenario
        .endings
        .iter()
        .find(|def| {
            !def.conditions.is_empty() && def.conditions.iter().all(|c| condition_met(c, state))
        })
        .map(Ending::from_def);

    if time_expired(scenario, state) {
        triggered = Some(time_expired_ending(scenario));
    }

    EndingReport {
        triggered,
        progress: progress(scenario, state),
    }
}

/// Progress toward every conditioned archetype, most complete first.
/// Archetypes without conditions are omitted; they can never auto-trigger.
pub fn progress(scenario: &Scenario, state: &GameState) -> Vec<EndingProgress> {
    let mut rows: Vec<EndingProgress> = scenario
        .endings
        .iter()
        .filter(|def| !def.conditions.is_empty())
        .map(|def| EndingProgress {
            id: def.id.clone(),
            title: def.title.clone(),
            met: def
                .conditions
                .iter()
                .filter(|c| condition_met(c, state))
                .count(),
            total: def.conditions.len(),
        })
        .collect();
    // stable sort keeps declaration order between equals
    rows.sort_by(|a, b| {
        b.ratio()
            .partial_cmp(&a.ratio())
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// True once the scenario's time budget is exhausted.
pub fn time_expired(scenario: &Scenario, state: &GameState) -> bool {
    match scenario.end_condition {
        EndCondition::TimeLimit {
            value,
            unit: TimeUnit::Days,
        } => state.day() > value,
        EndCondition::TimeLimit {
            unit: TimeUnit::Hours,
            ..
        } => matches!(state.clock, Clock::Hours { remaining, .. } if remaining <= 0),
        _ => false,
    }
}

/// The ending to fire on timeout: the first authored ending whose title
/// carries the time marker, or a synthesized fallback.
fn time_expired_ending(scenario: &Scenario) -> Ending {
    scenario
        .endings
        .iter()
        .find(|def| def.title.contains(TIME_EXPIRED_MARKER))
        .map(Ending::from_def)
        .unwrap_or_else(|| Ending {
            id: TIME_EXPIRED_ENDING_ID.to_owned(),
            title: TIME_EXPIRED_TITLE.to_owned(),
        })
}

fn condition_met(condition: &Condition, state: &GameState) -> bool {
    match condition {
        Condition::Stat { stat, cmp, value } => state
            .stats
            .get(stat)
            .is_some_and(|observed| cmp.holds(*observed, *value)),
        Condition::Flag { flag } => state.flags.get(flag).is_some_and(|v| v.is_set()),
        Condition::Survivors { cmp, value } => {
            cmp.holds(state.living_survivors() as i64, *value)
        }
    }
}
