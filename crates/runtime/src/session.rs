//! Per-session bookkeeping.

use serde::{Deserialize, Serialize};

/// Counters accumulated over a session's lifetime.
///
/// `generator_calls` counts every request sent, including ones whose
/// response was later rejected, so `turns_resolved + turns_rejected` can be
/// compared against it to spot retry loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Turns whose update was committed.
    pub turns_resolved: u64,
    /// Turns rejected by validation before any state changed.
    pub turns_rejected: u64,
    /// Requests sent to the update generator.
    pub generator_calls: u64,
    /// Soft quality issues recorded across all committed turns.
    pub quality_issues: u64,
}
