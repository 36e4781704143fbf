//! Event payloads for each topic.

use narrative_core::{Ending, LogEntry};
use serde::{Deserialize, Serialize};

/// Events about turn resolution outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A turn passed validation and its update was committed.
    Resolved {
        turn: u64,
        day: u32,
        /// Soft quality issues recorded while committing.
        issues: usize,
    },

    /// A turn was rejected before any state changed.
    Rejected { turn: u64, reason: String },
}

/// Events carrying narrative progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NarrativeEvent {
    /// A transcript entry was appended.
    Entry { entry: LogEntry },

    /// The in-fiction day advanced.
    DayAdvanced { day: u32 },

    /// An ending fired. The runtime keeps accepting turns; closing the
    /// session is the caller's call.
    EndingTriggered { ending: Ending },
}
