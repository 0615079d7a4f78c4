//! Content factory for assembling battle content from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{AbilityDefinition, BattleConfig, Catalog, StatusDefinition};

use crate::loaders::{
    AbilityLoader, ConfigLoader, LoadResult, RosterLoader, StatusLoader, UnitTemplate,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── statuses.ron
/// ├── abilities.ron
/// └── units.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle rules from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load status definitions from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<Vec<StatusDefinition>> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    /// Load ability definitions from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityDefinition>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load unit templates from `units.ron`.
    pub fn load_roster(&self) -> LoadResult<Vec<UnitTemplate>> {
        RosterLoader::load(&self.data_dir.join("units.ron"))
    }

    /// Load and cross-check statuses and abilities into a [`Catalog`].
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let catalog = Catalog::from_definitions(self.load_statuses()?, self.load_abilities()?)?;
        Ok(catalog)
    }

    /// Catalog built from the content embedded in this crate.
    pub fn embedded_catalog() -> LoadResult<Catalog> {
        let catalog =
            Catalog::from_definitions(StatusLoader::embedded()?, AbilityLoader::embedded()?)?;
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
