//! Repository contract for saving and loading session state.

use narrative_core::GameState;

use super::error::Result;

/// Persistence for per-turn state snapshots.
///
/// The worker saves the complete state after every committed turn, keyed by
/// the turn number that produced it. Whole-state replace keeps recovery
/// trivial: loading any saved turn yields a playable session with no replay.
pub trait StateRepository: Send + Sync {
    /// Save a game state indexed by turn number
    fn save(&self, turn: u64, state: &GameState) -> Result<()>;

    /// Load a game state by turn number
    fn load(&self, turn: u64) -> Result<Option<GameState>>;

    /// Check if a state exists
    fn exists(&self, turn: u64) -> bool;

    /// Delete a state
    fn delete(&self, turn: u64) -> Result<()>;

    /// List all saved turn numbers in ascending order
    fn list_turns(&self) -> Result<Vec<u64>>;

    /// Load the most recent save, if any
    fn latest(&self) -> Result<Option<(u64, GameState)>> {
        let turns = self.list_turns()?;
        match turns.last() {
            Some(&turn) => Ok(self.load(turn)?.map(|state| (turn, state))),
            None => Ok(None),
        }
    }
}
