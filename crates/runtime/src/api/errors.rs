//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and the update
//! generator so clients can bubble them up with consistent context. Soft
//! quality problems never appear here; they travel inside the turn report.
use thiserror::Error;
use tokio::sync::oneshot;

use narrative_core::{ScenarioError, UpdateError};

use super::providers::GeneratorError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a scenario before building")]
    MissingScenario,

    #[error("runtime requires an update generator before building")]
    MissingGenerator,

    #[error("invalid scenario definition")]
    InvalidScenario(#[source] ScenarioError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// The generator's response could not be turned into a valid update.
    /// State is unchanged; the caller decides whether to retry.
    #[error("generator produced an unusable update: {0}")]
    MalformedUpdate(#[from] UpdateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("turn worker command channel closed")]
    CommandChannelClosed,

    #[error("turn worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("turn worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
