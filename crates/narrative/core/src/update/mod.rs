//! The untrusted-update pipeline.
//!
//! Generator output arrives as raw text and crosses three representations:
//!
//! 1. raw text -> [`ProposedUpdate`] via [`parse_update`] (shape recovery)
//! 2. [`ProposedUpdate`] -> [`CheckedUpdate`] via [`check_update`]
//!    (sanitization, choice validation, clamping, tuple screening)
//! 3. [`CheckedUpdate`] -> state mutation, done by the engine
//!
//! No field of a [`ProposedUpdate`] carries any guarantee; every one of them
//! is either repaired, replaced, or dropped on the way to [`CheckedUpdate`].
//! Anything recoverable becomes a [`QualityIssue`] instead of an error, so a
//! turn only fails on the conditions in [`UpdateError`].
mod check;
mod choice;
mod parse;
mod sanitize;

pub use check::check_update;
pub use choice::{CHOICE_SUFFIXES, ChoiceFault, ChoiceSlot, check_choice, fallback_choices};
pub use parse::parse_update;
pub use sanitize::{SanitizedText, ScriptPolicy, conformance, sanitize_text};

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::state::{PairKey, PromptState, SurvivorStatus};

/// Update payload exactly as the generator proposed it.
///
/// Every field is optional: absent and `null` both deserialize to `None` and
/// are later substituted with safe defaults. Numeric-ish fields stay as raw
/// JSON values so that a single bad entry never fails the whole parse.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposedUpdate {
    pub narrative: Option<String>,
    pub next_prompt: Option<ProposedPrompt>,
    pub stat_deltas: Option<BTreeMap<String, Value>>,
    pub survivor_status_changes: Option<Vec<ProposedStatusChange>>,
    pub relationship_deltas: Option<Vec<ProposedRelationship>>,
    pub flags_acquired: Option<Vec<String>>,
    pub should_advance_time: Option<Value>,
}

/// Proposed next prompt: situation text plus two choices.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposedPrompt {
    pub text: Option<String>,
    pub choice_a: Option<String>,
    pub choice_b: Option<String>,
}

/// Proposed status change for one survivor.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposedStatusChange {
    pub name: Option<String>,
    pub new_status: Option<String>,
}

/// Proposed relationship adjustment between two named characters.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProposedRelationship {
    pub a: Option<String>,
    pub b: Option<String>,
    pub delta: Option<Value>,
}

/// Fully screened update the engine is allowed to commit.
///
/// Text fields are sanitized, choices validated or substituted, deltas
/// clamped, names canonicalized, and degenerate entries already dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckedUpdate {
    pub narrative: String,
    pub prompt: PromptState,
    /// Clamped raw deltas in stat-id order. Amplification happens at apply
    /// time because it depends on the current value.
    pub stat_deltas: Vec<(String, i64)>,
    pub status_changes: Vec<StatusChange>,
    pub relationship_deltas: Vec<RelationshipDelta>,
    pub flags_acquired: Vec<String>,
    pub advance_time: bool,
}

/// A parsed survivor status change. The name is matched against the roster
/// only at apply time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub name: String,
    pub status: SurvivorStatus,
}

/// A screened relationship adjustment with its canonical unordered key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipDelta {
    pub key: PairKey,
    pub delta: i64,
}

/// Text field of an update, for issue reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TextField {
    Narrative,
    PromptText,
    ChoiceA,
    ChoiceB,
}

/// Recoverable defect found while screening an update.
///
/// Issues never fail a turn; they are reported alongside the resolution so
/// callers can log or display generator quality.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum QualityIssue {
    #[error("stripped {removed} foreign-script chars from {field}")]
    ForeignScriptStripped { field: TextField, removed: usize },
    #[error("narrative conformance {ratio:.2} below soft floor")]
    LowConformance { ratio: f64 },
    #[error("narrative was empty after sanitization")]
    EmptyNarrative,
    #[error("{slot} replaced with a fallback choice: {faults:?}")]
    ChoiceSubstituted {
        slot: ChoiceSlot,
        faults: Vec<ChoiceFault>,
    },
    #[error("delta for `{stat}` clamped from {requested} to {clamped}")]
    DeltaClamped {
        stat: String,
        requested: i64,
        clamped: i64,
    },
    #[error("delta for `{stat}` is not numeric")]
    NonNumericDelta { stat: String },
    #[error("delta references unknown stat `{stat}`")]
    UnknownStat { stat: String },
    #[error("survivor `{survivor}` given unknown status `{status}`")]
    UnknownStatus { survivor: String, status: String },
    #[error("dropped relationship delta: {detail}")]
    DegenerateRelationship { detail: String },
}

/// Fatal update failures. Only these reject a turn; the state is untouched
/// when any of them is returned.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// No JSON object could be recovered from the raw response.
    #[error("no JSON object found in generator response")]
    MissingObject,
    /// The recovered object does not deserialize as an update.
    #[error("malformed update payload: {0}")]
    Shape(#[from] serde_json::Error),
    /// The narrative fell below the hard conformance floor.
    #[error("narrative conformance {ratio:.2} below hard floor {floor:.2}")]
    ContentRejected { ratio: f64, floor: f64 },
}
