//! Deterministic narrative rules shared across the runtime and offline tools.
//!
//! `narrative-core` validates untrusted generator output and applies it to
//! persistent game state. Raw text enters through [`update::parse_update`],
//! becomes a [`CheckedUpdate`] via [`update::check_update`], and is committed
//! by [`engine::TurnEngine`]; nothing else is allowed to mutate [`GameState`].
//! All APIs are pure: no I/O, no clocks, no randomness.
pub mod config;
pub mod endings;
pub mod engine;
pub mod routes;
pub mod scenario;
pub mod state;
pub mod stats;
pub mod update;

pub use config::EngineConfig;
pub use endings::{Ending, EndingProgress, EndingReport, TIME_EXPIRED_ENDING_ID};
pub use engine::{AppliedStat, TurnEngine, TurnResolution};
pub use routes::{ActionTag, RouteAssessment, RouteConfig, RouteDef};
pub use scenario::{
    Comparator, Condition, EndCondition, EndingDef, FlagDef, FlagKind, Scenario, ScenarioError,
    StatDef, StatPolarity, TimeUnit,
};
pub use state::{
    ActionRecord, Clock, FlagValue, GameState, LogEntry, LogKind, PairKey, PlayerAction,
    PromptState, Survivor, SurvivorStatus,
};
pub use update::{
    CheckedUpdate, ChoiceFault, ProposedUpdate, QualityIssue, RelationshipDelta, ScriptPolicy,
    StatusChange, UpdateError, check_update, parse_update,
};
