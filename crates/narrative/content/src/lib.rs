//! Authored-content loaders.
//!
//! This crate reads the TOML documents a playthrough is built from:
//! - Scenario definitions (stats, flags, survivors, endings, end condition)
//! - Engine configuration overrides (conformance floors, route config)
//! - Route definitions (tag weights, stat weights, gating)
//!
//! Every loader validates what it reads before handing it to the engine, so
//! authoring mistakes fail at load time with a path and a reason instead of
//! surfacing mid-playthrough.

pub mod loaders;

pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, RouteConfigLoader, ScenarioLoader,
    default_route_config,
};
