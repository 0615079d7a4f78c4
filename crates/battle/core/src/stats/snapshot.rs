//! Combatant snapshot - stats locked at the moment an attack is resolved.

use super::core::CoreAttributes;
use super::derived::{AttributeBonuses, DerivedAttributes};

/// Frozen view of one combatant used by the combat resolver.
///
/// Snapshots are taken once per attack so the resolver never observes a
/// half-applied mutation (e.g. a status ticking between two targets).
#[derive(Clone, Debug, PartialEq)]
pub struct CombatantSnapshot {
    pub core: CoreAttributes,
    pub derived: DerivedAttributes,
}

impl CombatantSnapshot {
    pub fn new(core: CoreAttributes, derived: DerivedAttributes) -> Self {
        Self { core, derived }
    }

    /// Snapshot a stat block, computing derived attributes from `bonuses`.
    pub fn capture(core: &CoreAttributes, bonuses: &AttributeBonuses) -> Self {
        Self {
            derived: DerivedAttributes::compute(core, bonuses),
            core: core.clone(),
        }
    }
}
