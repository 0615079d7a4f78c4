//! Per-unit status collection with turn-boundary ticking.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::UnitId;
use crate::stats::CoreAttributes;

use super::definition::{MarkerTag, StatusDefinition, StatusId, StatusKind};
use super::runtime::RuntimeStatus;

/// Result of [`StatusEngine::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new instance was appended.
    Inserted,
    /// An existing instance of the same definition absorbed the application.
    Refreshed,
    /// Nothing changed (zero stacks or the engine is full).
    Rejected,
}

/// One status's contribution to a tick pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusTick {
    pub id: StatusId,
    pub kind: StatusKind,
    /// Health actually removed from the bearer.
    pub damage: u32,
    pub stacks_after: u32,
}

/// Everything that happened during one tick pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub ticks: Vec<StatusTick>,
    /// Statuses purged at the end of the pass, in insertion order.
    pub expired: Vec<StatusId>,
}

impl TickReport {
    pub fn total_damage(&self) -> u32 {
        self.ticks.iter().map(|tick| tick.damage).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty() && self.expired.is_empty()
    }
}

/// Insertion-ordered set of active statuses on one unit, keyed by definition id.
///
/// # Tick order
///
/// ```text
/// turn start: damage hook → decay (decrease_stack_at_start) → purge
/// turn end:   decay (!decrease_stack_at_start) → duration −1 → purge
/// ```
///
/// Tick damage is removed from health directly and never passes through
/// [`StatusEngine::modify_incoming_damage`].
#[derive(Clone, Debug, Default)]
pub struct StatusEngine {
    statuses: ArrayVec<RuntimeStatus, { BattleConfig::MAX_STATUSES }>,
}

impl StatusEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a status or refresh the existing instance of its definition.
    pub fn apply(
        &mut self,
        definition: Arc<StatusDefinition>,
        stacks: u32,
        source: Option<UnitId>,
    ) -> ApplyOutcome {
        if stacks == 0 || definition.max_stacks == 0 {
            return ApplyOutcome::Rejected;
        }

        if let Some(existing) = self
            .statuses
            .iter_mut()
            .find(|status| status.id() == &definition.id)
        {
            existing.refresh(stacks, source);
            return ApplyOutcome::Refreshed;
        }

        match self
            .statuses
            .try_push(RuntimeStatus::new(definition, stacks, source))
        {
            Ok(()) => ApplyOutcome::Inserted,
            Err(_) => ApplyOutcome::Rejected,
        }
    }

    /// Run every turn-start hook in insertion order, then purge.
    pub fn tick_turn_start(&mut self, vitals: &mut CoreAttributes) -> TickReport {
        let mut report = TickReport::default();

        for status in self.statuses.iter_mut() {
            let effect = &status.definition().effect;
            if !effect.decays() {
                continue;
            }

            let raw =
                effect.turn_start_damage(status.stacks, vitals.health, vitals.missing_health());
            let damage = vitals.lose_health(raw);

            if status.definition().decrease_stack_at_start {
                status.decay();
            }

            report.ticks.push(StatusTick {
                id: status.id().clone(),
                kind: status.kind(),
                damage,
                stacks_after: status.stacks,
            });
        }

        self.purge(&mut report);
        report
    }

    /// Run every turn-end hook in insertion order, then purge.
    ///
    /// Turn-end hooks deal no damage; `vitals` is accepted so every pass has
    /// the same shape.
    pub fn tick_turn_end(&mut self, _vitals: &mut CoreAttributes) -> TickReport {
        let mut report = TickReport::default();

        for status in self.statuses.iter_mut() {
            let decays = status.definition().effect.decays();
            if decays && !status.definition().decrease_stack_at_start {
                status.decay();
            }
            status.tick_duration();

            if decays {
                report.ticks.push(StatusTick {
                    id: status.id().clone(),
                    kind: status.kind(),
                    damage: 0,
                    stacks_after: status.stacks,
                });
            }
        }

        self.purge(&mut report);
        report
    }

    /// Fold every damage-modifier hook over `raw` in insertion order.
    ///
    /// No current variant reads the attacker's identity.
    pub fn modify_incoming_damage(&self, raw: u32, _attacker: Option<UnitId>) -> u32 {
        self.statuses
            .iter()
            .fold(raw, |damage, status| status.definition().effect.modify_incoming(damage))
    }

    fn purge(&mut self, report: &mut TickReport) {
        self.statuses.retain(|status| {
            if status.is_spent() {
                report.expired.push(status.id().clone());
                false
            } else {
                true
            }
        });
    }

    pub fn has_kind(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|status| status.kind() == kind)
    }

    pub fn has_marker(&self, tag: MarkerTag) -> bool {
        self.statuses
            .iter()
            .any(|status| status.definition().effect.marker() == Some(tag))
    }

    /// Stack count of a status, or 0 when absent.
    pub fn stacks_of(&self, id: &StatusId) -> u32 {
        self.get(id).map_or(0, |status| status.stacks)
    }

    pub fn get(&self, id: &StatusId) -> Option<&RuntimeStatus> {
        self.statuses.iter().find(|status| status.id() == id)
    }

    /// Removes a status immediately. Returns it if it was present.
    pub fn remove(&mut self, id: &StatusId) -> Option<RuntimeStatus> {
        let index = self.statuses.iter().position(|status| status.id() == id)?;
        Some(self.statuses.remove(index))
    }

    pub fn clear(&mut self) {
        self.statuses.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuntimeStatus> {
        self.statuses.iter()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
