//! Turn worker that owns the authoritative [`narrative_core::GameState`].
//!
//! Receives commands from [`crate::api::RuntimeHandle`], drives the
//! generator round-trip, resolves updates through
//! [`narrative_core::TurnEngine`], and publishes events. The worker is the
//! single writer: state changes nowhere else.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use narrative_core::{
    AppliedStat, Ending, EndingProgress, EngineConfig, GameState, LogKind, PlayerAction,
    PromptState, QualityIssue, RouteAssessment, Scenario, TurnEngine, endings, routes,
};

use crate::api::providers::UpdateGenerator;
use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, NarrativeEvent, TurnEvent};
use crate::generator::TurnRequest;
use crate::repository::StateRepository;
use crate::session::SessionStats;

/// Commands that can be sent to the turn worker
pub(crate) enum Command {
    /// Run one full turn for the given player action.
    SubmitAction {
        action: PlayerAction,
        reply: oneshot::Sender<Result<TurnReport>>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Progress toward each conditioned ending.
    EndingProgress {
        reply: oneshot::Sender<Vec<EndingProgress>>,
    },
    /// Route assessment over the current state.
    DominantRoute {
        reply: oneshot::Sender<RouteAssessment>,
    },
    /// Session counters so far.
    QueryStats { reply: oneshot::Sender<SessionStats> },
}

/// Everything the caller gets back from one committed turn.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// Turn number this report belongs to (1-based).
    pub turn: u64,
    /// In-fiction day after the turn.
    pub day: u32,
    /// Narrative prose committed this turn. Empty if the generator sent
    /// nothing usable and the turn still went through.
    pub narrative: String,
    /// The prompt now facing the player.
    pub prompt: PromptState,
    /// Per-stat application record.
    pub applied: Vec<AppliedStat>,
    /// Soft quality issues collected while resolving.
    pub issues: Vec<QualityIssue>,
    /// Ending triggered by this turn, if any.
    pub ending: Option<Ending>,
    /// Route assessment over the new state.
    pub route: RouteAssessment,
}

/// Background task that processes session commands.
pub(crate) struct TurnWorker {
    scenario: Scenario,
    config: EngineConfig,
    instructions: String,
    state: GameState,
    /// Number of the last committed turn. Saves are keyed by it.
    turn: u64,
    stats: SessionStats,
    generator: Arc<dyn UpdateGenerator>,
    repository: Arc<dyn StateRepository>,
    command_rx: mpsc::Receiver<Command>,
    events: EventBus,
}

impl TurnWorker {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        scenario: Scenario,
        config: EngineConfig,
        instructions: String,
        state: GameState,
        turn: u64,
        generator: Arc<dyn UpdateGenerator>,
        repository: Arc<dyn StateRepository>,
        command_rx: mpsc::Receiver<Command>,
        events: EventBus,
    ) -> Self {
        Self {
            scenario,
            config,
            instructions,
            state,
            turn,
            stats: SessionStats::default(),
            generator,
            repository,
            command_rx,
            events,
        }
    }

    /// Main worker loop. Ends when every handle is dropped.
    pub(crate) async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SubmitAction { action, reply } => {
                let result = self.submit_action(action).await;
                let _ = reply.send(result);
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::EndingProgress { reply } => {
                let _ = reply.send(endings::progress(&self.scenario, &self.state));
            }
            Command::DominantRoute { reply } => {
                let _ = reply.send(routes::assess(&self.state, &self.config.routes));
            }
            Command::QueryStats { reply } => {
                let _ = reply.send(self.stats);
            }
        }
    }

    /// One full turn: request, validate, persist, commit, publish.
    ///
    /// The generator call is the only suspension point. Any failure before
    /// the commit leaves `self.state` and `self.turn` exactly as they were,
    /// so the caller may simply retry the same action.
    async fn submit_action(&mut self, action: PlayerAction) -> Result<TurnReport> {
        let next_turn = self.turn + 1;

        let request = TurnRequest::render(&self.instructions, &self.scenario, &self.state, &action);
        self.stats.generator_calls += 1;
        let raw = self.generator.generate(&request).await?;

        let engine = TurnEngine::new(&self.scenario, &self.config);
        let resolution = match engine.resolve(&self.state, &action, &raw) {
            Ok(resolution) => resolution,
            Err(error) => {
                self.stats.turns_rejected += 1;
                warn!(
                    target: "runtime::worker",
                    turn = next_turn,
                    error = %error,
                    "Update rejected; state unchanged"
                );
                self.events.publish(Event::Turn(TurnEvent::Rejected {
                    turn: next_turn,
                    reason: error.to_string(),
                }));
                return Err(RuntimeError::MalformedUpdate(error));
            }
        };

        // Persist before committing: a failed save keeps the old state live.
        self.repository.save(next_turn, &resolution.state)?;

        let log_watermark = self.state.log.len();
        self.state = resolution.state;
        self.turn = next_turn;
        self.stats.turns_resolved += 1;
        self.stats.quality_issues += resolution.issues.len() as u64;

        for issue in &resolution.issues {
            warn!(
                target: "runtime::worker",
                turn = next_turn,
                issue = %issue,
                "Quality issue recorded"
            );
        }

        let day = self.state.day();
        self.events.publish(Event::Turn(TurnEvent::Resolved {
            turn: next_turn,
            day,
            issues: resolution.issues.len(),
        }));

        let new_entries = &self.state.log[log_watermark..];
        for entry in new_entries {
            self.events.publish(Event::Narrative(NarrativeEvent::Entry {
                entry: entry.clone(),
            }));
        }
        if resolution.day_advanced {
            self.events
                .publish(Event::Narrative(NarrativeEvent::DayAdvanced { day }));
        }
        if let Some(ending) = &resolution.ending {
            self.events
                .publish(Event::Narrative(NarrativeEvent::EndingTriggered {
                    ending: ending.clone(),
                }));
        }

        let narrative = new_entries
            .iter()
            .find(|e| e.kind == LogKind::Narrative)
            .map(|e| e.text.clone())
            .unwrap_or_default();

        Ok(TurnReport {
            turn: next_turn,
            day,
            narrative,
            prompt: self.state.prompt.clone(),
            applied: resolution.applied,
            issues: resolution.issues,
            ending: resolution.ending,
            route: resolution.route,
        })
    }
}
