//! Status catalog loader.

use std::path::Path;

use battle_core::StatusDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_STATUSES: &str = include_str!("../../data/statuses.ron");

/// Status catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusDefinition>,
}

/// Loader for status catalogs from RON files.
pub struct StatusLoader;

impl StatusLoader {
    /// Load a status catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<StatusDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<StatusDefinition>> {
        let catalog: StatusCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;

        Ok(catalog.statuses)
    }

    /// The status catalog shipped with the crate.
    pub fn embedded() -> LoadResult<Vec<StatusDefinition>> {
        Self::parse(EMBEDDED_STATUSES)
    }
}
