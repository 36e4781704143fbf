//! Content factory for loading a playthrough's documents from one directory.

use std::path::{Path, PathBuf};

use narrative_core::{EngineConfig, RouteConfig, Scenario};

use crate::loaders::{ConfigLoader, LoadResult, RouteConfigLoader, ScenarioLoader};

/// Loads all authored content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── scenario.toml
/// ├── engine.toml      (optional overrides)
/// └── routes.toml      (optional, replaces the built-in route set)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the scenario definition from `scenario.toml`.
    pub fn load_scenario(&self) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenario.toml");
        ScenarioLoader::load(&path)
    }

    /// Load engine configuration from `engine.toml`, then route overrides
    /// from `routes.toml`. Either file may be absent; defaults fill in.
    pub fn load_engine_config(&self) -> LoadResult<EngineConfig> {
        let engine_path = self.data_dir.join("engine.toml");
        let mut config = if engine_path.exists() {
            ConfigLoader::load(&engine_path)?
        } else {
            EngineConfig::new()
        };
        if let Some(routes) = self.load_routes()? {
            config.routes = routes;
        }
        Ok(config)
    }

    /// Load route configuration from `routes.toml`, if present.
    pub fn load_routes(&self) -> LoadResult<Option<RouteConfig>> {
        let path = self.data_dir.join("routes.toml");
        if !path.exists() {
            return Ok(None);
        }
        RouteConfigLoader::load(&path).map(Some)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
