//! In-memory StateRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use narrative_core::GameState;

use super::error::{RepositoryError, Result};
use super::traits::StateRepository;

/// In-memory implementation of StateRepository.
///
/// Stores states indexed by turn for testing and local development.
pub struct InMemoryStateRepo {
    states: RwLock<HashMap<u64, GameState>>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStateRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, turn: u64, state: &GameState) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.insert(turn, state.clone());
        Ok(())
    }

    fn load(&self, turn: u64) -> Result<Option<GameState>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.get(&turn).cloned())
    }

    fn exists(&self, turn: u64) -> bool {
        self.states
            .read()
            .map(|states| states.contains_key(&turn))
            .unwrap_or(false)
    }

    fn delete(&self, turn: u64) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.remove(&turn);
        Ok(())
    }

    fn list_turns(&self) -> Result<Vec<u64>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut turns: Vec<u64> = states.keys().copied().collect();
        turns.sort_unstable();
        Ok(turns)
    }
}
