//! Loaders for reading authored documents from TOML files.

pub mod config;
pub mod factory;
pub mod routes;
pub mod scenario;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use routes::{RouteConfigLoader, default_route_config};
pub use scenario::ScenarioLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
