//! Scenario definition loader.

use std::path::Path;

use narrative_core::Scenario;

use crate::loaders::{LoadResult, read_file};

/// Loader for scenario definitions from TOML files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario definition from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing the scenario
    ///
    /// # Returns
    ///
    /// Returns a validated [`Scenario`]. Authoring errors (duplicate ids,
    /// empty ranges, dangling condition references) fail here.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))
    }

    /// Parse and validate a scenario definition from TOML text.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario TOML: {}", e))?;
        scenario
            .validate()
            .map_err(|e| anyhow::anyhow!("Scenario validation failed: {}", e))?;
        Ok(scenario)
    }
}
