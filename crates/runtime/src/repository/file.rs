//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use narrative_core::GameState;

use super::error::{RepositoryError, Result};
use super::traits::StateRepository;

/// File-based implementation of StateRepository.
///
/// Stores game states as individual bincode files indexed by turn.
///
/// # File Format
///
/// States are stored as `state_{turn}.bin` in bincode format. Writes go
/// through a temp file and an atomic rename, so a crash mid-save leaves the
/// previous snapshot intact.
pub struct FileStateRepo {
    base_dir: PathBuf,
}

impl FileStateRepo {
    /// Create a new file-based state repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    /// Get the path to a state file.
    fn state_path(&self, turn: u64) -> PathBuf {
        self.base_dir.join(format!("state_{}.bin", turn))
    }
}

impl StateRepository for FileStateRepo {
    fn save(&self, turn: u64, state: &GameState) -> Result<()> {
        let path = self.state_path(turn);
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        // Write to temp file, then atomic rename
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved state[{}] to {}", turn, path.display());

        Ok(())
    }

    fn load(&self, turn: u64) -> Result<Option<GameState>> {
        let path = self.state_path(turn);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let state: GameState = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded state[{}] from {}", turn, path.display());

        Ok(Some(state))
    }

    fn exists(&self, turn: u64) -> bool {
        self.state_path(turn).exists()
    }

    fn delete(&self, turn: u64) -> Result<()> {
        let path = self.state_path(turn);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted state[{}]", turn);
        }

        Ok(())
    }

    fn list_turns(&self) -> Result<Vec<u64>> {
        let mut turns = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(turn_str) = filename
                    .strip_prefix("state_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(turn) = turn_str.parse::<u64>()
            {
                turns.push(turn);
            }
        }

        turns.sort_unstable();
        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrative_core::{Clock, FlagValue, PairKey, PromptState};

    fn sample_state() -> GameState {
        let mut state = GameState {
            stats: Default::default(),
            flags: Default::default(),
            relationships: Default::default(),
            survivors: Vec::new(),
            clock: Clock::Days { day: 3 },
            log: Vec::new(),
            prompt: PromptState {
                text: "밤이 깊었다.".into(),
                choice_a: "망을 본다".into(),
                choice_b: "잠을 청한다".into(),
            },
            action_history: Vec::new(),
        };
        state.stats.insert("morale".into(), 62);
        state.flags.insert("radio_fixed".into(), FlagValue::Bool(true));
        state.relationships.insert(PairKey::new("수진", "민준"), -2);
        state
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepo::new(dir.path()).unwrap();

        repo.save(7, &sample_state()).unwrap();
        let loaded = repo.load(7).unwrap().unwrap();

        assert_eq!(loaded, sample_state());
        assert!(repo.exists(7));
        assert!(repo.load(8).unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepo::new(dir.path()).unwrap();

        repo.save(1, &sample_state()).unwrap();
        let mut changed = sample_state();
        changed.stats.insert("morale".into(), 10);
        repo.save(1, &changed).unwrap();

        let loaded = repo.load(1).unwrap().unwrap();
        assert_eq!(loaded.stats["morale"], 10);
    }

    #[test]
    fn list_turns_ignores_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepo::new(dir.path()).unwrap();

        repo.save(2, &sample_state()).unwrap();
        repo.save(10, &sample_state()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"memo").unwrap();
        std::fs::write(dir.path().join("state_x.bin"), b"junk").unwrap();

        assert_eq!(repo.list_turns().unwrap(), vec![2, 10]);
    }

    #[test]
    fn latest_survives_process_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let repo = FileStateRepo::new(dir.path()).unwrap();
            repo.save(3, &sample_state()).unwrap();
        }
        let reopened = FileStateRepo::new(dir.path()).unwrap();
        let (turn, state) = reopened.latest().unwrap().unwrap();
        assert_eq!(turn, 3);
        assert_eq!(state.day(), 3);
    }
}
