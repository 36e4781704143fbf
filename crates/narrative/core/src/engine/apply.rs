//! The ordered commit steps of one turn.
//!
//! Runs against the engine's working copy, after screening. Steps always
//! execute in the same order: transcript, stats, survivor statuses,
//! relationships, flags, time. References that only the present state can
//! resolve (survivor names, flag definitions, unknown stats) are settled
//! here rather than during screening.
use std::collections::btree_map::Entry;

use crate::routes::tag_action;
use crate::scenario::{FlagKind, Scenario};
use crate::state::{ActionRecord, Clock, FlagValue, GameState, LogEntry, LogKind, PlayerAction};
use crate::stats;
use crate::update::{CheckedUpdate, QualityIssue};

use super::AppliedStat;

pub(super) struct ApplyOutcome {
    pub applied: Vec<AppliedStat>,
    pub day_advanced: bool,
}

pub(super) fn apply_update(
    scenario: &Scenario,
    state: &mut GameState,
    action: &PlayerAction,
    update: &CheckedUpdate,
    issues: &mut Vec<QualityIssue>,
) -> ApplyOutcome {
    let day_before = state.day();

    // 1. transcript and prompt
    state.action_history.push(ActionRecord {
        tag: tag_action(&action.text),
        day: day_before,
    });
    if !update.narrative.is_empty() {
        state.log.push(LogEntry {
            kind: LogKind::Narrative,
            text: update.narrative.clone(),
            day: day_before,
        });
    }
    state.prompt = update.prompt.clone();

    // 2. stat deltas, amplified against the current value
    let mut applied = Vec::with_capacity(update.stat_deltas.len());
    for (stat, requested) in &update.stat_deltas {
        match scenario.stat(stat) {
            Some(def) => {
                let current = state.stats.get(stat).copied().unwrap_or(def.initial);
                let delta = stats::amplify(def, current, *requested);
                let value = current + delta;
                state.stats.insert(stat.clone(), value);
                applied.push(AppliedStat {
                    stat: stat.clone(),
                    requested: *requested,
                    applied: delta,
                    value,
                });
            }
            None => {
                // No definition, no range: flat fallback on a synthesized
                // entry, reported as an issue.
                let delta = stats::amplify_unknown(*requested);
                let entry = state.stats.entry(stat.clone()).or_insert(0);
                *entry = entry.saturating_add(delta);
                let value = *entry;
                issues.push(QualityIssue::UnknownStat { stat: stat.clone() });
                applied.push(AppliedStat {
                    stat: stat.clone(),
                    requested: *requested,
                    applied: delta,
                    value,
                });
            }
        }
    }

    // 3. survivor statuses; names not on the roster are ignored
    for change in &update.status_changes {
        if let Some(survivor) = state.survivor_mut(&change.name) {
            survivor.status = change.status;
        }
    }

    // 4. relationships; adds saturate at the i64 bounds
    for rel in &update.relationship_deltas {
        let entry = state.relationships.entry(rel.key.clone()).or_insert(0);
        *entry = entry.saturating_add(rel.delta);
    }

    // 5. flags; names without a definition are dropped
    for name in &update.flags_acquired {
        let Some(def) = scenario.flag(name) else {
            continue;
        };
        match state.flags.entry(name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(match def.kind {
                    FlagKind::Boolean => FlagValue::Bool(true),
                    FlagKind::Count => FlagValue::Count(1),
                });
            }
            Entry::Occupied(mut slot) => {
                if let FlagValue::Count(n) = slot.get_mut() {
                    *n += 1;
                }
                // an already-set boolean stays set
            }
        }
    }

    // 6. time
    match &mut state.clock {
        Clock::Hours { remaining, .. } => {
            // hour budgets burn down every turn, held or not
            *remaining -= 1;
        }
        Clock::Days { day } => {
            if update.advance_time {
                *day += 1;
            }
        }
    }
    let day_after = state.day();
    let day_advanced = day_after > day_before;
    if day_advanced {
        state.log.push(LogEntry {
            kind: LogKind::DayBreak,
            text: format!("{day_after}일차 아침이 밝았다."),
            day: day_after,
        });
    }

    ApplyOutcome {
        applied,
        day_advanced,
    }
}
