//! The authoritative turn reducer.
//!
//! [`TurnEngine`] is the only path by which generator output reaches
//! [`GameState`]. A turn either commits every mutation or none: the engine
//! works on a copy and returns the new state, so a rejected update can never
//! leave a half-applied playthrough behind.
mod apply;

use crate::config::EngineConfig;
use crate::endings::{self, Ending};
use crate::routes::{self, RouteAssessment};
use crate::scenario::Scenario;
use crate::state::{GameState, PlayerAction};
use crate::update::{ProposedUpdate, QualityIssue, UpdateError, check_update, parse_update};

/// Stateless reducer bound to one scenario and config.
pub struct TurnEngine<'a> {
    scenario: &'a Scenario,
    config: &'a EngineConfig,
}

/// Everything one committed turn produced.
#[derive(Clone, Debug)]
pub struct TurnResolution {
    /// The new state. The caller's previous state is untouched.
    pub state: GameState,
    /// Per-stat application record, including amplification.
    pub applied: Vec<AppliedStat>,
    /// Recoverable defects found while screening and applying.
    pub issues: Vec<QualityIssue>,
    /// Whether the in-fiction day changed this turn.
    pub day_advanced: bool,
    /// Ending triggered by the new state, if any.
    pub ending: Option<Ending>,
    /// Route assessment over the new state.
    pub route: RouteAssessment,
}

/// How one stat delta landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedStat {
    pub stat: String,
    /// Clamped delta the generator asked for.
    pub requested: i64,
    /// Delta actually added after amplification and range clamping.
    pub applied: i64,
    /// Resulting stat value.
    pub value: i64,
}

impl<'a> TurnEngine<'a> {
    pub fn new(scenario: &'a Scenario, config: &'a EngineConfig) -> Self {
        Self { scenario, config }
    }

    /// Resolves one turn from the raw generator response.
    pub fn resolve(
        &self,
        state: &GameState,
        action: &PlayerAction,
        raw: &str,
    ) -> Result<TurnResolution, UpdateError> {
        let proposed = parse_update(raw)?;
        self.resolve_proposed(state, action, proposed)
    }

    /// Resolves one turn from an already parsed update.
    pub fn resolve_proposed(
        &self,
        state: &GameState,
        action: &PlayerAction,
        proposed: ProposedUpdate,
    ) -> Result<TurnResolution, UpdateError> {
        let (update, mut issues) = check_update(proposed, self.scenario, self.config)?;

        let mut next = state.clone();
        let outcome = apply::apply_update(self.scenario, &mut next, action, &update, &mut issues);
        self.check_stat_bounds(&next);

        let ending = endings::evaluate(self.scenario, &next).triggered;
        let route = routes::assess(&next, &self.config.routes);

        Ok(TurnResolution {
            state: next,
            applied: outcome.applied,
            issues,
            day_advanced: outcome.day_advanced,
            ending,
            route,
        })
    }

    /// Post-commit invariant: every defined stat stays inside its range.
    fn check_stat_bounds(&self, state: &GameState) {
        for def in &self.scenario.stats {
            if let Some(&value) = state.stats.get(&def.id) {
                debug_assert!(
                    value >= def.min && value <= def.max,
                    "stat `{}` left its range: {value}",
                    def.id
                );
            }
        }
    }
}
