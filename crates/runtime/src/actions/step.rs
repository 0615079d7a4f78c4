use async_trait::async_trait;
use tracing::warn;

use battle_core::{HexCell, UnitId};

use super::BattleAction;
use crate::api::{ActionError, Collaborator, Completion};
use crate::context::BattleContext;
use crate::events::BattleEvent;

/// Move one cell to an adjacent hex.
///
/// Valid when the mover is idle, the destination is adjacent to the unit's
/// current cell, and the unit can still step this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepAction {
    pub unit: UnitId,
    pub destination: HexCell,
}

impl StepAction {
    pub fn new(unit: UnitId, destination: HexCell) -> Self {
        Self { unit, destination }
    }
}

#[async_trait]
impl BattleAction for StepAction {
    fn name(&self) -> &'static str {
        "step"
    }

    fn actor(&self) -> UnitId {
        self.unit
    }

    fn is_valid(&self, battle: &BattleContext) -> bool {
        let Some(mover) = battle.services().mover.as_ref() else {
            return false;
        };
        let Some(handle) = battle.unit(self.unit) else {
            return false;
        };
        !mover.is_moving(self.unit)
            && handle.read(|unit| unit.can_step() && unit.cell.is_adjacent(self.destination))
    }

    async fn execute(&self, battle: &BattleContext) -> Result<(), ActionError> {
        let mover = battle
            .services()
            .mover
            .clone()
            .ok_or(ActionError::MissingCollaborator(Collaborator::Mover))?;
        let handle = battle
            .unit(self.unit)
            .ok_or(ActionError::UnknownUnit(self.unit))?;

        let from = handle.cell();
        let (on_complete, done) = Completion::pair();
        if !mover.try_step_to(self.unit, self.destination, on_complete) {
            warn!(
                target: "runtime::action",
                unit = %self.unit,
                destination = %self.destination,
                "Mover refused to start step"
            );
            return Ok(());
        }
        done.wait(self.name()).await?;

        handle.write(|unit| unit.complete_move(self.destination, 1));
        battle.publish(BattleEvent::UnitMoved {
            unit: self.unit,
            from,
            to: self.destination,
        });
        Ok(())
    }
}
