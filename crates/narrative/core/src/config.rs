use serde::{Deserialize, Serialize};

use crate::routes::RouteConfig;
use crate::update::ScriptPolicy;

/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Script ranges the sanitizer strips and the conformance measure counts.
    pub script_policy: ScriptPolicy,
    /// Conformance ratio below which the narrative is flagged as degraded.
    pub soft_conformance_floor: f64,
    /// Conformance ratio below which the whole update is rejected.
    pub hard_conformance_floor: f64,
    /// Route definitions and gating used by the route scorer.
    #[serde(default)]
    pub routes: RouteConfig,
}

impl EngineConfig {
    // ===== fixed rule constants =====
    /// Symmetric clamp bound for a single raw stat delta.
    pub const MAX_RAW_DELTA: i64 = 40;
    /// Multiplier applied when the current value sits near either bound.
    pub const EDGE_MULTIPLIER: f64 = 1.5;
    /// Multiplier applied in the middle of the stat range.
    pub const MID_MULTIPLIER: f64 = 3.0;
    /// Flat multiplier for deltas that reference no defined stat.
    pub const FALLBACK_MULTIPLIER: f64 = 2.0;
    /// Range position (percent) at or below which the low edge band starts.
    pub const LOW_BAND_PCT: f64 = 25.0;
    /// Range position (percent) at or above which the high edge band starts.
    pub const HIGH_BAND_PCT: f64 = 75.0;

    /// Inclusive character-count bounds for a player choice.
    pub const CHOICE_MIN_CHARS: usize = 15;
    pub const CHOICE_MAX_CHARS: usize = 80;
    /// Minimum sanctioned-script characters a choice must contain.
    pub const CHOICE_MIN_SCRIPT_CHARS: usize = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SOFT_FLOOR: f64 = 0.50;
    pub const DEFAULT_HARD_FLOOR: f64 = 0.15;

    pub fn new() -> Self {
        Self {
            script_policy: ScriptPolicy::korean(),
            soft_conformance_floor: Self::DEFAULT_SOFT_FLOOR,
            hard_conformance_floor: Self::DEFAULT_HARD_FLOOR,
            routes: RouteConfig::standard(),
        }
    }

    pub fn with_floors(soft: f64, hard: f64) -> Self {
        Self {
            soft_conformance_floor: soft,
            hard_conformance_floor: hard,
            ..Self::new()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
