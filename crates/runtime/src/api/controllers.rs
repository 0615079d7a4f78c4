//! Asynchronous abstraction for sourcing a unit's intent each turn.
//!
//! Runtime users plug in [`TurnController`] implementations so a battle can
//! run with human input, AI planners, or scripted fixtures.
use async_trait::async_trait;

use battle_core::UnitId;

use super::errors::Result;
use crate::context::BattleContext;

/// Decides what a unit does during its acting phase.
///
/// Implementations enqueue actions on [`BattleContext::queue`]; the turn
/// actor drains the queue once `take_turn` returns.
#[async_trait]
pub trait TurnController: Send + Sync {
    async fn take_turn(&self, unit: UnitId, battle: &BattleContext) -> Result<()>;
}

/// A controller that never acts. Useful for testing or as a fallback.
pub struct PassController;

#[async_trait]
impl TurnController for PassController {
    async fn take_turn(&self, _unit: UnitId, _battle: &BattleContext) -> Result<()> {
        Ok(())
    }
}
