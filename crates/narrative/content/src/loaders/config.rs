//! Engine configuration loader.
//!
//! Config files are overrides: every field is optional and missing fields
//! keep their [`EngineConfig`] defaults, so a deployment only writes down
//! what it changes.

use std::path::Path;

use narrative_core::{EngineConfig, RouteConfig};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Config file structure. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EngineConfigToml {
    soft_conformance_floor: Option<f64>,
    hard_conformance_floor: Option<f64>,
    routes: Option<RouteConfig>,
}

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load engine configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing overrides
    ///
    /// # Returns
    ///
    /// Returns an [`EngineConfig`] with defaults where the file is silent.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid engine config {}: {}", path.display(), e))
    }

    /// Parse engine configuration overrides from TOML text.
    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let overrides: EngineConfigToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let mut config = EngineConfig::new();
        if let Some(soft) = overrides.soft_conformance_floor {
            config.soft_conformance_floor = soft;
        }
        if let Some(hard) = overrides.hard_conformance_floor {
            config.hard_conformance_floor = hard;
        }
        if let Some(routes) = overrides.routes {
            config.routes = routes;
        }

        for (name, floor) in [
            ("soft_conformance_floor", config.soft_conformance_floor),
            ("hard_conformance_floor", config.hard_conformance_floor),
        ] {
            if !(0.0..=1.0).contains(&floor) {
                anyhow::bail!("{} must be within 0.0..=1.0, got {}", name, floor);
            }
        }
        if config.hard_conformance_floor > config.soft_conformance_floor {
            anyhow::bail!(
                "hard_conformance_floor ({}) must not exceed soft_conformance_floor ({})",
                config.hard_conformance_floor,
                config.soft_conformance_floor
            );
        }

        Ok(config)
    }
}
