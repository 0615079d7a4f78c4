//! Deterministic combat rules for hex-grid tactical battles.
//!
//! `battle-core` owns the data model (units, stats, statuses, abilities), the
//! pure combat resolver, and the per-unit status engine. It never awaits,
//! never logs and never touches I/O; the async sequencing of actions and
//! turns lives in `battle-runtime`, which drives the types re-exported here.
pub mod ability;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;
pub mod stats;
pub mod status;

pub use ability::{
    AbilityContext, AbilityDefinition, AbilityId, ItemId, ItemRef, StatusApplication,
};
pub use catalog::Catalog;
pub use combat::{
    CombatResult, DamageBreakdown, DamageConfig, ScalingMatrix, calculate_damage,
    calculate_hit_chance, check_hit, resolve, resolve_with_rules,
};
pub use config::{BattleConfig, CombatRules};
pub use error::{BattleError, CatalogError, ErrorSeverity};
pub use rng::{PcgRandom, RandomSource, RngSource, ScriptedRandom};
pub use state::{DamageTaken, HexCell, TeamId, Unit, UnitId};
pub use stats::{AttributeBonuses, CombatantSnapshot, CoreAttributes, DerivedAttributes};
pub use status::{
    ApplyOutcome, MarkerTag, RuntimeStatus, StatusDefinition, StatusEffect, StatusEngine,
    SCAR_VULNERABILITY, StatusId, StatusKind, StatusTick, TickReport,
};
