//! Action model.
//!
//! Every action validates its preconditions without side effects
//! ([`BattleAction::is_valid`]) and then runs to completion
//! ([`BattleAction::execute`]), suspending on collaborator completions. The
//! mechanics themselves (kinematics, effect playback) belong to collaborators.
mod ability;
mod path;
mod step;

pub use ability::AbilityAction;
pub use path::PathAction;
pub use step::StepAction;

use async_trait::async_trait;

use battle_core::UnitId;

use crate::api::ActionError;
use crate::context::BattleContext;

#[async_trait]
pub trait BattleAction: Send + Sync {
    /// Stable label used in logs and events.
    fn name(&self) -> &'static str;

    /// Unit performing the action.
    fn actor(&self) -> UnitId;

    /// Side-effect free precondition check, evaluated when the action is
    /// popped from the queue.
    fn is_valid(&self, battle: &BattleContext) -> bool;

    async fn execute(&self, battle: &BattleContext) -> Result<(), ActionError>;
}
