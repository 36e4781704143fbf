//! Repository layer for dynamic session data
//!
//! Repositories handle data that CHANGES during play: the per-turn state
//! snapshots used for save/load and crash recovery. Static content
//! (scenarios, route tables) is loaded by `narrative-content`, not here.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepo;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
