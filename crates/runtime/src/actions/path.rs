use async_trait::async_trait;

use battle_core::{HexCell, UnitId};

use super::BattleAction;
use crate::api::{ActionError, Collaborator, Completion};
use crate::context::BattleContext;
use crate::events::BattleEvent;

/// Move along a precomputed path (start cell excluded).
///
/// On completion the unit stands on the last path cell and has spent one
/// stride per path cell, saturating at zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathAction {
    pub unit: UnitId,
    pub path: Vec<HexCell>,
}

impl PathAction {
    pub fn new(unit: UnitId, path: Vec<HexCell>) -> Self {
        Self { unit, path }
    }
}

#[async_trait]
impl BattleAction for PathAction {
    fn name(&self) -> &'static str {
        "path"
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
        !self.path.is_empty() && !mover.is_moving(self.unit) && handle.is_alive()
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
        let Some(&destination) = self.path.last() else {
            return Ok(());
        };

        let from = handle.cell();
        let (on_complete, done) = Completion::pair();
        mover.follow_path(self.unit, &self.path, on_complete);
        done.wait(self.name()).await?;

        let steps = u32::try_from(self.path.len()).unwrap_or(u32::MAX);
        handle.write(|unit| unit.complete_move(destination, steps));
        battle.publish(BattleEvent::UnitMoved {
            unit: self.unit,
            from,
            to: destination,
        });
        Ok(())
    }
}
