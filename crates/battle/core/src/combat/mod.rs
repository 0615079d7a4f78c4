//! Combat resolution system.
//!
//! Pure functions computing a single attack's outcome from two frozen
//! combatant snapshots. Nothing here mutates a unit; callers apply the
//! resulting damage through [`crate::Unit::take_damage`].
//!
//! # Core Functions
//!
//! - `resolve`: complete attack resolution (hit, critical, variance, damage)
//! - `calculate_hit_chance`: accuracy vs evasion
//! - `calculate_damage`: physical and magical channels with mitigation

pub mod damage;
pub mod hit;
pub mod result;
pub mod scaling;

pub use damage::{DamageBreakdown, DamageConfig, calculate_damage, mitigation};
pub use hit::{calculate_hit_chance, check_hit};
pub use result::{CombatResult, resolve, resolve_with_rules};
pub use scaling::ScalingMatrix;
