//! High-level runtime orchestrator.
//!
//! The runtime owns the background turn worker, wires up command/event
//! channels, and exposes a builder-based API for starting or resuming a
//! playthrough.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use narrative_core::{EngineConfig, GameState, Scenario};

use crate::api::{Result, RuntimeError, RuntimeHandle, UpdateGenerator};
use crate::events::{Event, EventBus, Topic};
use crate::generator::default_instructions;
use crate::repository::{InMemoryStateRepo, StateRepository};
use crate::worker::{Command, TurnWorker};

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Instruction document sent with every generator request.
    pub instructions: String,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::new(),
            instructions: default_instructions(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime for one playthrough
///
/// Design: Runtime owns the worker and coordinates its lifecycle.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Background worker
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to drain its command queue and exit. Any handle
    /// still held elsewhere keeps the worker alive until it is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    scenario: Option<Scenario>,
    state: Option<GameState>,
    turn: u64,
    generator: Option<Arc<dyn UpdateGenerator>>,
    repository: Option<Arc<dyn StateRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            scenario: None,
            state: None,
            turn: 0,
            generator: None,
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the scenario this session plays (required)
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Provide an initial game state instead of deriving one from the
    /// scenario
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Resume a saved session from a snapshot and the turn that produced it
    ///
    /// The next committed turn will be saved as `turn + 1`.
    pub fn resume(mut self, turn: u64, state: GameState) -> Self {
        self.turn = turn;
        self.state = Some(state);
        self
    }

    /// Set the update generator (required)
    pub fn generator(mut self, generator: impl UpdateGenerator + 'static) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Set the state repository (defaults to in-memory)
    pub fn repository(mut self, repository: impl StateRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let scenario = self.scenario.ok_or(RuntimeError::MissingScenario)?;
        scenario.validate().map_err(RuntimeError::InvalidScenario)?;
        let generator = self.generator.ok_or(RuntimeError::MissingGenerator)?;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryStateRepo::new()));
        let state = self
            .state
            .unwrap_or_else(|| GameState::from_scenario(&scenario));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let events = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, events.clone());

        let worker = TurnWorker::new(
            scenario,
            self.config.engine,
            self.config.instructions,
            state,
            self.turn,
            generator,
            repository,
            command_rx,
            events,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
