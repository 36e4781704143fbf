//! Screening of a parsed update against a scenario and engine config.
//!
//! This is the only constructor of [`CheckedUpdate`]. Field by field it
//! repairs what it can, records a [`QualityIssue`] for everything it repairs
//! or drops, and fails only on the hard conformance floor.
use serde_json::Value;

use crate::config::EngineConfig;
use crate::scenario::Scenario;
use crate::state::{PairKey, PromptState, SurvivorStatus, canonical_name};
use crate::stats;

use super::choice::{ChoiceSlot, check_choice, fallback_choices};
use super::sanitize::{conformance, sanitize_text};
use super::{
    CheckedUpdate, ProposedPrompt, ProposedRelationship, ProposedUpdate, QualityIssue,
    RelationshipDelta, StatusChange, TextField, UpdateError,
};

/// Screens a [`ProposedUpdate`] into a [`CheckedUpdate`] plus the issues
/// found along the way.
pub fn check_update(
    proposed: ProposedUpdate,
    scenario: &Scenario,
    config: &EngineConfig,
) -> Result<(CheckedUpdate, Vec<QualityIssue>), UpdateError> {
    let mut issues = Vec::new();

    let narrative = sanitize_field(
        proposed.narrative.unwrap_or_default(),
        TextField::Narrative,
        config,
        &mut issues,
    );
    screen_conformance(&narrative, config, &mut issues)?;

    let prompt = check_prompt(
        proposed.next_prompt.unwrap_or_default(),
        config,
        &mut issues,
    );

    let mut stat_deltas = Vec::new();
    for (stat, value) in proposed.stat_deltas.unwrap_or_default() {
        let Some(requested) = as_integer(&value) else {
            issues.push(QualityIssue::NonNumericDelta { stat });
            continue;
        };
        let clamped = stats::clamp_raw(requested);
        if clamped != requested {
            issues.push(QualityIssue::DeltaClamped {
                stat: stat.clone(),
                requested,
                clamped,
            });
        }
        stat_deltas.push((stat, clamped));
    }

    let mut status_changes = Vec::new();
    for change in proposed.survivor_status_changes.unwrap_or_default() {
        // A change without a usable name cannot refer to anyone; drop it.
        let Some(name) = nonempty(change.name) else {
            continue;
        };
        let raw_status = change.new_status.unwrap_or_default();
        match raw_status.trim().parse::<SurvivorStatus>() {
            Ok(status) => status_changes.push(StatusChange { name, status }),
            Err(_) => issues.push(QualityIssue::UnknownStatus {
                survivor: name,
                status: raw_status,
            }),
        }
    }

    let mut relationship_deltas = Vec::new();
    for rel in proposed.relationship_deltas.unwrap_or_default() {
        match check_relationship(rel, &scenario.player_name) {
            Ok(delta) => relationship_deltas.push(delta),
            Err(detail) => issues.push(QualityIssue::DegenerateRelationship { detail }),
        }
    }

    let flags_acquired = proposed
        .flags_acquired
        .unwrap_or_default()
        .into_iter()
        .filter_map(|name| nonempty(Some(name)))
        .collect();

    // Only a literal `false` suppresses day advancement.
    let advance_time = !matches!(proposed.should_advance_time, Some(Value::Bool(false)));

    Ok((
        CheckedUpdate {
            narrative,
            prompt,
            stat_deltas,
            status_changes,
            relationship_deltas,
            flags_acquired,
            advance_time,
        },
        issues,
    ))
}

fn sanitize_field(
    raw: String,
    field: TextField,
    config: &EngineConfig,
    issues: &mut Vec<QualityIssue>,
) -> String {
    let outcome = sanitize_text(&raw, &config.script_policy);
    if outcome.removed > 0 {
        issues.push(QualityIssue::ForeignScriptStripped {
            field,
            removed: outcome.removed,
        });
    }
    outcome.text
}

fn screen_conformance(
    narrative: &str,
    config: &EngineConfig,
    issues: &mut Vec<QualityIssue>,
) -> Result<(), UpdateError> {
    if narrative.is_empty() {
        issues.push(QualityIssue::EmptyNarrative);
        return Ok(());
    }
    let ratio = conformance(narrative, &config.script_policy);
    if ratio < config.hard_conformance_floor {
        return Err(UpdateError::ContentRejected {
            ratio,
            floor: config.hard_conformance_floor,
        });
    }
    if ratio < config.soft_conformance_floor {
        issues.push(QualityIssue::LowConformance { ratio });
    }
    Ok(())
}

fn check_prompt(
    proposed: ProposedPrompt,
    config: &EngineConfig,
    issues: &mut Vec<QualityIssue>,
) -> PromptState {
    let text = sanitize_field(
        proposed.text.unwrap_or_default(),
        TextField::PromptText,
        config,
        issues,
    );
    let (fallback_a, fallback_b) = fallback_choices();
    let choice_a = check_slot(
        proposed.choice_a,
        ChoiceSlot::ChoiceA,
        TextField::ChoiceA,
        fallback_a,
        config,
        issues,
    );
    let choice_b = check_slot(
        proposed.choice_b,
        ChoiceSlot::ChoiceB,
        TextField::ChoiceB,
        fallback_b,
        config,
        issues,
    );
    PromptState {
        text,
        choice_a,
        choice_b,
    }
}

fn check_slot(
    raw: Option<String>,
    slot: ChoiceSlot,
    field: TextField,
    fallback: String,
    config: &EngineConfig,
    issues: &mut Vec<QualityIssue>,
) -> String {
    let sanitized = sanitize_field(raw.unwrap_or_default(), field, config, issues);
    let faults = check_choice(&sanitized, &config.script_policy);
    if faults.is_empty() {
        sanitized
    } else {
        issues.push(QualityIssue::ChoiceSubstituted { slot, faults });
        fallback
    }
}

fn check_relationship(
    rel: ProposedRelationship,
    player_name: &str,
) -> Result<RelationshipDelta, String> {
    let a = rel.a.as_deref().map(str::trim).unwrap_or("");
    let b = rel.b.as_deref().map(str::trim).unwrap_or("");
    if a.is_empty() || b.is_empty() {
        return Err("missing participant name".to_owned());
    }
    // Canonicalize before the self-pair check, so `리더` paired with the
    // player's own name is caught.
    let a = canonical_name(a, player_name);
    let b = canonical_name(b, player_name);
    if a == b {
        return Err(format!("self-pair `{a}`"));
    }
    let delta = rel
        .delta
        .as_ref()
        .and_then(as_integer)
        .ok_or_else(|| format!("non-numeric delta for `{a}`/`{b}`"))?;
    Ok(RelationshipDelta {
        key: PairKey::new(a, b),
        delta,
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
}

fn nonempty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
