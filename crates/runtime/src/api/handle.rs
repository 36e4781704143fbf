//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! playing turns or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use narrative_core::{EndingProgress, GameState, PlayerAction, RouteAssessment};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::session::SessionStats;
use crate::worker::{Command, TurnReport};

/// Client-facing handle to interact with a running session
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Play one turn: send the player's action through the full pipeline
    /// and wait for the committed report.
    ///
    /// On `Err` the session state is unchanged and the same action may be
    /// resubmitted.
    pub async fn submit_action(&self, action: PlayerAction) -> Result<TurnReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::SubmitAction {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Progress toward each conditioned ending, most complete first
    pub async fn ending_progress(&self) -> Result<Vec<EndingProgress>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::EndingProgress { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Route assessment over the current state
    pub async fn dominant_route(&self) -> Result<RouteAssessment> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::DominantRoute { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Session counters accumulated so far
    pub async fn session_stats(&self) -> Result<SessionStats> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryStats { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Turn` - Turn commits and rejections
    /// - `Topic::Narrative` - Transcript entries, day changes, endings
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
