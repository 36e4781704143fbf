//! Session orchestration for generator-driven narrative play.
//!
//! This crate wires the generator abstraction, state repositories, and the
//! background turn worker into a cohesive runtime API. Consumers embed
//! [`Runtime`] to play turns, subscribe to events, and read session state
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides a topic-based event bus for flexible routing
//! - [`generator`] renders per-turn requests for the update generator
//! - [`repository`] persists per-turn state snapshots
//! - [`session`] tracks per-session counters
pub mod api;
pub mod events;
pub mod generator;
pub mod repository;
pub mod runtime;
pub mod session;

mod worker;

pub use api::{
    GeneratorError, Result, RuntimeError, RuntimeHandle, ScriptedGenerator, UpdateGenerator,
};
pub use events::{Event, EventBus, NarrativeEvent, Topic, TurnEvent};
pub use generator::{TurnRequest, default_instructions};
pub use repository::{FileStateRepo, InMemoryStateRepo, RepositoryError, StateRepository};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::SessionStats;
pub use worker::TurnReport;
