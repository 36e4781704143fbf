//! Route tagging and scoring.
//!
//! Every player action gets a categorical tag by keyword matching, and
//! accumulated tags plus current stats are folded into a score per authored
//! route. A route only becomes dominant once enough days have passed and its
//! score clears the floor; before that the playthrough reads as undetermined.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// Categorical tag assigned to a player action. The set is fixed; routes
/// weight the tags rather than defining their own.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    Combat,
    Diplomacy,
    Exploration,
    Construction,
    Resource,
    Medical,
    #[default]
    General,
}

/// Keyword tables in match order; the first table containing a hit wins.
const TAG_KEYWORDS: [(ActionTag, &[&str]); 6] = [
    (
        ActionTag::Combat,
        &["공격", "싸우", "전투", "습격", "사격", "무기", "매복"],
    ),
    (
        ActionTag::Diplomacy,
        &["협상", "설득", "대화", "동맹", "화해", "거래"],
    ),
    (
        ActionTag::Exploration,
        &["탐색", "정찰", "수색", "조사", "탐험", "살피"],
    ),
    (
        ActionTag::Construction,
        &["건설", "수리", "보강", "방벽", "바리케이드", "울타리"],
    ),
    (
        ActionTag::Resource,
        &["채집", "식량", "물자", "보급", "자원", "사냥", "수확"],
    ),
    (
        ActionTag::Medical,
        &["치료", "약품", "간호", "부상", "붕대", "의료"],
    ),
];

/// Tags an action by keyword matching. Anything unmatched is [`ActionTag::General`].
pub fn tag_action(text: &str) -> ActionTag {
    for (tag, keywords) in TAG_KEYWORDS {
        if keywords.iter().any(|k| text.contains(k)) {
            return tag;
        }
    }
    ActionTag::General
}

/// Route definitions plus the gates that keep early assessments quiet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Day before which no route is ever dominant.
    pub activation_day: u32,
    /// Minimum score the top route needs to be called dominant.
    pub score_floor: f64,
    pub routes: Vec<RouteDef>,
}

impl RouteConfig {
    pub const DEFAULT_ACTIVATION_DAY: u32 = 3;
    pub const DEFAULT_SCORE_FLOOR: f64 = 20.0;

    /// The standard escape/defense/negotiation triple. Scenario-independent:
    /// only tags are weighted, no stat terms.
    pub fn standard() -> Self {
        Self {
            activation_day: Self::DEFAULT_ACTIVATION_DAY,
            score_floor: Self::DEFAULT_SCORE_FLOOR,
            routes: vec![
                RouteDef {
                    id: "escape".into(),
                    name: "탈출".into(),
                    tag_weights: [
                        (ActionTag::Exploration, 10.0),
                        (ActionTag::Resource, 6.0),
                        (ActionTag::Medical, 2.0),
                        (ActionTag::General, 1.0),
                    ]
                    .into(),
                    stat_weights: BTreeMap::new(),
                },
                RouteDef {
                    id: "defense".into(),
                    name: "방어".into(),
                    tag_weights: [
                        (ActionTag::Combat, 10.0),
                        (ActionTag::Construction, 8.0),
                        (ActionTag::Resource, 3.0),
                        (ActionTag::General, 1.0),
                    ]
                    .into(),
                    stat_weights: BTreeMap::new(),
                },
                RouteDef {
                    id: "negotiation".into(),
                    name: "협상".into(),
                    tag_weights: [
                        (ActionTag::Diplomacy, 12.0),
                        (ActionTag::Medical, 3.0),
                        (ActionTag::General, 1.0),
                    ]
                    .into(),
                    stat_weights: BTreeMap::new(),
                },
            ],
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// One scoreable route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteDef {
    pub id: String,
    pub name: String,
    /// Score contribution per occurrence of a tag in the action history.
    #[serde(default)]
    pub tag_weights: BTreeMap<ActionTag, f64>,
    /// Score contribution per point of a current stat value.
    #[serde(default)]
    pub stat_weights: BTreeMap<String, f64>,
}

/// Outcome of a route assessment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteAssessment {
    /// Too early, no routes configured, or no score clears the floor.
    Undetermined,
    Dominant { route: String, score: f64 },
}

/// Raw score per route id, with no gating applied.
pub fn scores(state: &GameState, config: &RouteConfig) -> BTreeMap<String, f64> {
    config
        .routes
        .iter()
        .map(|route| {
            let from_tags: f64 = state
                .action_history
                .iter()
                .filter_map(|record| route.tag_weights.get(&record.tag))
                .sum();
            let from_stats: f64 = route
                .stat_weights
                .iter()
                .map(|(stat, weight)| {
                    weight * state.stats.get(stat).copied().unwrap_or(0) as f64
                })
                .sum();
            (route.id.clone(), from_tags + from_stats)
        })
        .collect()
}

/// Gated assessment: dominant route or undetermined.
///
/// Ties are broken by route id order, which is stable because scores
/// iterate in id order and only a strictly greater score replaces the
/// leader.
pub fn assess(state: &GameState, config: &RouteConfig) -> RouteAssessment {
    if state.day() < config.activation_day {
        return RouteAssessment::Undetermined;
    }
    let mut best: Option<(String, f64)> = None;
    for (route, score) in scores(state, config) {
        let beats = best.as_ref().is_none_or(|(_, top)| score > *top);
        if beats {
            best = Some((route, score));
        }
    }
    match best {
        Some((route, score)) if score >= config.score_floor => {
            RouteAssessment::Dominant { route, score }
        }
        _ => RouteAssessment::Undetermined,
    }
}
