//! Asynchronous abstraction for sourcing generator output.
//!
//! Runtime users plug in an [`UpdateGenerator`] so turns can run against a
//! remote text-generation service, a local model, or scripted fixtures. The
//! runtime treats whatever comes back as untrusted text; validation happens
//! downstream in the engine.
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::generator::TurnRequest;

/// Errors raised while obtaining a generator response.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator transport failed: {0}")]
    Transport(String),

    #[error("scripted generator response queue exhausted")]
    Exhausted,
}

/// Trait for producing one raw update per turn.
///
/// Implementations handle the specifics of the text-generation backend. The
/// returned string is the generator's verbatim output; the engine strips
/// wrappers and validates it.
#[async_trait]
pub trait UpdateGenerator: Send + Sync {
    /// Produce the raw response for one turn request.
    async fn generate(&self, request: &TurnRequest) -> Result<String, GeneratorError>;
}

/// A generator that pops canned responses from a queue.
///
/// Useful for tests, replays, and offline runs. Once the queue runs dry every
/// call fails with [`GeneratorError::Exhausted`].
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }

    /// Appends another canned response to the queue.
    pub fn push(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response.into());
    }
}

#[async_trait]
impl UpdateGenerator for ScriptedGenerator {
    async fn generate(&self, _request: &TurnRequest) -> Result<String, GeneratorError> {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or(GeneratorError::Exhausted)
    }
}
