//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Publishing is best-effort: a turn never fails
//! because nobody is listening.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{NarrativeEvent, TurnEvent};
