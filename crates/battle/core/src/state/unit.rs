//! Unit aggregate.

use std::sync::Arc;

use crate::ability::AbilityId;
use crate::state::{HexCell, TeamId, UnitId};
use crate::stats::{AttributeBonuses, CombatantSnapshot, CoreAttributes, DerivedAttributes};
use crate::status::{ApplyOutcome, MarkerTag, StatusDefinition, StatusEngine, TickReport};

/// Damage routed through [`Unit::take_damage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageTaken {
    /// Incoming damage after status modifiers.
    pub modified: u32,
    /// Health actually removed (clamped at zero health).
    pub dealt: u32,
    /// True when this hit took the unit from alive to dead.
    pub defeated: bool,
}

/// One combatant: stat block, statuses, position and per-turn resources.
///
/// # Invariants
///
/// - `core` is the single source of truth for health and stride
/// - all external damage goes through [`Unit::take_damage`] so status
///   modifiers always apply
/// - `charges <= max_charges` except while a Haste marker is active
#[derive(Clone, Debug)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: TeamId,
    pub cell: HexCell,
    pub core: CoreAttributes,
    pub bonuses: AttributeBonuses,
    statuses: StatusEngine,
    /// Abilities this unit knows, in preference order.
    pub abilities: Vec<AbilityId>,
    /// Ability uses left this turn.
    pub charges: u32,
    pub max_charges: u32,
}

impl Unit {
    pub const DEFAULT_CHARGES: u32 = 1;

    pub fn new(id: UnitId, name: impl Into<String>, team: TeamId, core: CoreAttributes) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            cell: HexCell::ORIGIN,
            core,
            bonuses: AttributeBonuses::default(),
            statuses: StatusEngine::new(),
            abilities: Vec::new(),
            charges: Self::DEFAULT_CHARGES,
            max_charges: Self::DEFAULT_CHARGES,
        }
    }

    pub fn at(mut self, cell: HexCell) -> Self {
        self.cell = cell;
        self
    }

    pub fn with_bonuses(mut self, bonuses: AttributeBonuses) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn knows(&self, ability: &AbilityId) -> bool {
        self.abilities.contains(ability)
    }

    pub fn with_charges(mut self, max_charges: u32) -> Self {
        self.charges = max_charges;
        self.max_charges = max_charges;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.core.is_alive()
    }

    pub fn derived(&self) -> DerivedAttributes {
        DerivedAttributes::compute(&self.core, &self.bonuses)
    }

    /// Freeze current stats for combat resolution.
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot::capture(&self.core, &self.bonuses)
    }

    // ========================================================================
    // Damage / heal entry points
    // ========================================================================

    /// Apply incoming damage after folding every status modifier.
    pub fn take_damage(&mut self, raw: u32, attacker: Option<UnitId>) -> DamageTaken {
        let was_alive = self.is_alive();
        let modified = self.statuses.modify_incoming_damage(raw, attacker);
        let dealt = self.core.lose_health(modified);
        DamageTaken {
            modified,
            dealt,
            defeated: was_alive && !self.is_alive(),
        }
    }

    /// Restore health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        self.core.restore_health(amount)
    }

    // ========================================================================
    // Statuses
    // ========================================================================

    pub fn apply_status(
        &mut self,
        definition: Arc<StatusDefinition>,
        stacks: u32,
        source: Option<UnitId>,
    ) -> ApplyOutcome {
        if !self.is_alive() {
            return ApplyOutcome::Rejected;
        }
        self.statuses.apply(definition, stacks, source)
    }

    pub fn statuses(&self) -> &StatusEngine {
        &self.statuses
    }

    pub fn has_marker(&self, tag: MarkerTag) -> bool {
        self.statuses.has_marker(tag)
    }

    // ========================================================================
    // Turn boundaries
    // ========================================================================

    /// Tick turn-start statuses, then refill stride and ability charges.
    pub fn begin_turn(&mut self) -> TickReport {
        let report = self.statuses.tick_turn_start(&mut self.core);
        self.core.refill_stride();
        self.charges = self.max_charges;
        if self.has_marker(MarkerTag::Haste) {
            self.charges += 1;
        }
        report
    }

    /// Tick turn-end statuses, then drain whatever stride and charges remain.
    pub fn end_turn(&mut self) -> TickReport {
        let report = self.statuses.tick_turn_end(&mut self.core);
        self.core.drain_stride();
        self.charges = 0;
        report
    }

    // ========================================================================
    // Movement / ability resources
    // ========================================================================

    /// Sprinting units move without spending stride.
    pub fn can_step(&self) -> bool {
        self.is_alive() && (self.core.stride >= 1 || self.has_marker(MarkerTag::Sprint))
    }

    /// Commit a finished move: relocate and pay `steps` stride (saturating).
    pub fn complete_move(&mut self, destination: HexCell, steps: u32) {
        self.cell = destination;
        if !self.has_marker(MarkerTag::Sprint) {
            self.core.spend_stride(steps);
        }
    }

    pub fn has_charge(&self) -> bool {
        self.charges > 0
    }

    /// Spend one ability charge. Returns false when none are left.
    pub fn spend_charge(&mut self) -> bool {
        if self.charges == 0 {
            return false;
        }
        self.charges -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusEffect;

    fn unit() -> Unit {
        Unit::new(UnitId(1), "vanguard", TeamId(0), CoreAttributes::default())
    }

    #[test]
    fn scar_amplifies_damage_taken() {
        let mut unit = unit();
        unit.apply_status(
            Arc::new(StatusDefinition::new("scar", StatusEffect::scar(0.02))),
            2,
            Some(UnitId(9)),
        );

        let taken = unit.take_damage(10, Some(UnitId(9)));
        assert_eq!(taken.modified, 12);
        assert_eq!(taken.dealt, 12);
        assert_eq!(unit.core.health, 88);
    }

    #[test]
    fn lethal_damage_reports_defeat_once() {
        let mut unit = unit();
        let first = unit.take_damage(150, None);
        assert_eq!(first.dealt, 100);
        assert!(first.defeated);

        let second = unit.take_damage(5, None);
        assert_eq!(second.dealt, 0);
        assert!(!second.defeated);
        assert_eq!(unit.heal(20), 0);
    }

    #[test]
    fn turn_boundaries_manage_resources() {
        let mut unit = unit().with_charges(2);
        unit.complete_move(HexCell::new(1, 0), 2);
        assert!(unit.spend_charge());
        assert_eq!(unit.core.stride, 1);

        unit.end_turn();
        assert_eq!(unit.core.stride, 0);
        assert!(!unit.has_charge());
        assert!(!unit.can_step());

        unit.begin_turn();
        assert_eq!(unit.core.stride, CoreAttributes::DEFAULT_STRIDE);
        assert_eq!(unit.charges, 2);
    }

    #[test]
    fn markers_unlock_sprint_and_haste() {
        let mut unit = unit();
        unit.apply_status(
            Arc::new(StatusDefinition::new(
                "sprint",
                StatusEffect::Marker {
                    tag: MarkerTag::Sprint,
                },
            )),
            1,
            None,
        );
        unit.apply_status(
            Arc::new(StatusDefinition::new(
                "haste",
                StatusEffect::Marker {
                    tag: MarkerTag::Haste,
                },
            )),
            1,
            None,
        );

        unit.end_turn();
        assert!(unit.can_step());
        unit.complete_move(HexCell::new(0, 1), 1);
        assert_eq!(unit.core.stride, 0);

        unit.begin_turn();
        assert_eq!(unit.charges, Unit::DEFAULT_CHARGES + 1);
    }

    #[test]
    fn begin_turn_ticks_before_refill() {
        let mut unit = unit();
        unit.apply_status(
            Arc::new(
                StatusDefinition::new("erosion", StatusEffect::Erosion).decaying_at_start(true),
            ),
            3,
            None,
        );
        let report = unit.begin_turn();
        assert_eq!(report.total_damage(), 3);
        assert_eq!(unit.core.health, 97);
        assert_eq!(unit.statuses().stacks_of(&"erosion".into()), 2);
    }
}
