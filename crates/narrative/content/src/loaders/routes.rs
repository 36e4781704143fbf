//! Route configuration loader.

use std::path::Path;

use narrative_core::{RouteConfig, RouteDef};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// The built-in route set: escape, defense, and negotiation.
pub fn default_route_config() -> RouteConfig {
    RouteConfig::standard()
}

/// Route config file structure. Gating fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RouteConfigToml {
    activation_day: Option<u32>,
    score_floor: Option<f64>,
    routes: Vec<RouteDef>,
}

/// Loader for route configuration from TOML files.
pub struct RouteConfigLoader;

impl RouteConfigLoader {
    /// Load route configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing route definitions
    ///
    /// # Returns
    ///
    /// Returns a well-formed [`RouteConfig`]; gating fields default when the
    /// file leaves them out.
    pub fn load(path: &Path) -> LoadResult<RouteConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid route config {}: {}", path.display(), e))
    }

    /// Parse and validate route configuration from TOML text.
    pub fn parse(content: &str) -> LoadResult<RouteConfig> {
        let raw: RouteConfigToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse route config TOML: {}", e))?;

        let config = RouteConfig {
            activation_day: raw
                .activation_day
                .unwrap_or(RouteConfig::DEFAULT_ACTIVATION_DAY),
            score_floor: raw.score_floor.unwrap_or(RouteConfig::DEFAULT_SCORE_FLOOR),
            routes: raw.routes,
        };

        if config.activation_day == 0 {
            anyhow::bail!("activation_day must be at least 1");
        }
        if !config.score_floor.is_finite() || config.score_floor < 0.0 {
            anyhow::bail!("score_floor must be finite and non-negative");
        }
        for (i, route) in config.routes.iter().enumerate() {
            if route.id.trim().is_empty() {
                anyhow::bail!("route #{} has an empty id", i);
            }
            if config.routes[..i].iter().any(|r| r.id == route.id) {
                anyhow::bail!("duplicate route id `{}`", route.id);
            }
            let weights = route
                .tag_weights
                .values()
                .chain(route.stat_weights.values());
            for &w in weights {
                if !w.is_finite() || w < 0.0 {
                    anyhow::bail!("route `{}` has a negative or non-finite weight", route.id);
                }
            }
        }

        Ok(config)
    }
}
