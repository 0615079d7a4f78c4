//! Data-driven battle content and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Status catalogs (RON)
//! - Ability catalogs (RON)
//! - Unit rosters (RON)
//! - Battle rules configuration (TOML)
//!
//! Default content is embedded at compile time so a battle can be assembled
//! without touching the filesystem. All loaders use battle-core types directly
//! with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, ContentFactory, LoadResult, RosterLoader, StatusLoader,
    UnitTemplate,
};
