//! Narrow interfaces to the systems the combat core does not own.
//!
//! Movement kinematics, inventory storage, area targeting, path search and AI
//! decision making all live outside the runtime. Each is reached through one
//! of the traits below and plugged in at build time, so the same battle can
//! run against a game engine, a headless simulator, or test fakes.
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use battle_core::{AbilityContext, AbilityDefinition, AbilityId, HexCell, ItemId, UnitId};

use super::errors::ActionError;
use crate::context::BattleContext;

/// One-shot completion callback handed to a collaborator.
///
/// The collaborator calls [`Completion::complete`] once the effect it started
/// has finished. Dropping it without completing is reported to the waiting
/// action as [`ActionError::CompletionDropped`].
#[derive(Debug)]
pub struct Completion(oneshot::Sender<()>);

impl Completion {
    /// Creates a completion callback and the signal the caller awaits.
    pub fn pair() -> (Completion, CompletionSignal) {
        let (tx, rx) = oneshot::channel();
        (Completion(tx), CompletionSignal(rx))
    }

    pub fn complete(self) {
        // The waiting action may have been dropped; nothing to notify then.
        let _ = self.0.send(());
    }
}

/// Awaitable side of a [`Completion`].
#[derive(Debug)]
pub struct CompletionSignal(oneshot::Receiver<()>);

impl CompletionSignal {
    /// Suspends until the paired completion fires.
    pub async fn wait(self, action: &'static str) -> Result<(), ActionError> {
        self.0
            .await
            .map_err(|_| ActionError::CompletionDropped { action })
    }
}

/// Drives movement kinematics for units.
pub trait MoverService: Send + Sync {
    /// Starts a one-cell step. Returns false if the step cannot start; the
    /// completion is then dropped unfired.
    fn try_step_to(&self, unit: UnitId, cell: HexCell, on_complete: Completion) -> bool;

    /// Starts moving along `path` (excluding the start cell).
    fn follow_path(&self, unit: UnitId, path: &[HexCell], on_complete: Completion);

    fn is_moving(&self, unit: UnitId) -> bool;
}

/// Plays out an ability's effect sequence.
#[async_trait]
pub trait AbilityRunner: Send + Sync {
    /// Completes once every effect of the ability has been applied.
    async fn run(
        &self,
        ability: &AbilityDefinition,
        invocation: &AbilityContext,
        battle: &BattleContext,
    ) -> Result<(), ActionError>;
}

/// Owns item storage.
pub trait InventoryService: Send + Sync {
    /// Removes `count` of `item` from `owner`. Returns false if nothing was consumed.
    fn consume_item(&self, owner: UnitId, item: ItemId, count: u32) -> bool;
}

/// Expands an aimed cell into the cells an ability affects.
pub trait TargetingService: Send + Sync {
    fn affected_cells(&self, ability: &AbilityDefinition, target: HexCell) -> Vec<HexCell>;
}

/// Constraints for a path search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathRules {
    /// Longest acceptable path in steps; `None` is unbounded.
    pub max_steps: Option<u32>,
    /// Cells the path must not enter.
    pub blocked: Vec<HexCell>,
}

/// Grid path search.
pub trait Pathfinder: Send + Sync {
    /// Path from `start` (excluded) to `goal` (included), each cell adjacent
    /// to the previous one. `None` if no path satisfies `rules`.
    fn find_path(&self, start: HexCell, goal: HexCell, rules: &PathRules) -> Option<Vec<HexCell>>;
}

/// Decision produced by an [`AiPlanner`] for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    pub is_valid: bool,
    pub move_destination: Option<HexCell>,
    pub target_cell: Option<HexCell>,
    pub target_unit: Option<UnitId>,
    pub ability: Option<AbilityId>,
}

impl Plan {
    /// A plan that does nothing this turn.
    pub fn pass() -> Self {
        Self::default()
    }
}

/// AI decision making.
#[async_trait]
pub trait AiPlanner: Send + Sync {
    async fn plan(&self, unit: UnitId, battle: &BattleContext) -> Plan;
}

/// Collaborators plugged into a battle. Any may be absent; actions that need a
/// missing collaborator report themselves invalid.
#[derive(Clone, Default)]
pub struct Services {
    pub mover: Option<Arc<dyn MoverService>>,
    pub abilities: Option<Arc<dyn AbilityRunner>>,
    pub inventory: Option<Arc<dyn InventoryService>>,
    pub targeting: Option<Arc<dyn TargetingService>>,
    pub pathfinder: Option<Arc<dyn Pathfinder>>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("mover", &self.mover.is_some())
            .field("abilities", &self.abilities.is_some())
            .field("inventory", &self.inventory.is_some())
            .field("targeting", &self.targeting.is_some())
            .field("pathfinder", &self.pathfinder.is_some())
            .finish()
    }
}
