//! Turn controllers shipped with the runtime.
//!
//! - [`PlannerController`] turns an [`AiPlanner`] decision into a path move
//!   followed by an aimed ability.
//! - [`ChannelController`] is the player-input enqueue point: actions arrive
//!   over an mpsc channel and run as they come until the player ends the turn.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use battle_core::{MarkerTag, UnitId};

use crate::actions::{AbilityAction, BattleAction, PathAction};
use crate::api::{AiPlanner, PathRules, Plan, Result, RuntimeError, TurnController};
use crate::context::BattleContext;

/// Drives a unit from an [`AiPlanner`].
///
/// When `intent_delay` is non-zero the controller pauses between planning and
/// committing, so a front end can show the planned intent.
pub struct PlannerController {
    planner: Arc<dyn AiPlanner>,
    intent_delay: Duration,
}

impl PlannerController {
    pub fn new(planner: Arc<dyn AiPlanner>) -> Self {
        Self {
            planner,
            intent_delay: Duration::ZERO,
        }
    }

    pub fn with_intent_delay(mut self, delay: Duration) -> Self {
        self.intent_delay = delay;
        self
    }

    fn enqueue_move(&self, unit: UnitId, plan: &Plan, battle: &BattleContext) {
        let Some(destination) = plan.move_destination else {
            return;
        };
        let Some(handle) = battle.unit(unit) else {
            return;
        };
        let (start, stride, sprinting) = handle.read(|unit| {
            (
                unit.cell,
                unit.core.stride,
                unit.has_marker(MarkerTag::Sprint),
            )
        });
        if start == destination {
            return;
        }

        let Some(pathfinder) = battle.services().pathfinder.as_ref() else {
            warn!(
                target: "runtime::controller",
                unit = %unit,
                "Plan asks for a move but no pathfinder is configured"
            );
            return;
        };
        let rules = PathRules {
            max_steps: (!sprinting).then_some(stride),
            blocked: battle.occupied_cells(unit),
        };
        match pathfinder.find_path(start, destination, &rules) {
            Some(path) if !path.is_empty() => {
                battle.queue().enqueue(PathAction::new(unit, path));
            }
            _ => debug!(
                target: "runtime::controller",
                unit = %unit,
                destination = %destination,
                "No path to planned destination"
            ),
        }
    }

    fn enqueue_ability(&self, unit: UnitId, plan: &Plan, battle: &BattleContext) {
        let Some(ability) = plan.ability.clone() else {
            return;
        };
        let target = plan.target_cell.or_else(|| {
            plan.target_unit
                .and_then(|target| battle.unit(target))
                .map(|handle| handle.cell())
        });
        match target {
            Some(cell) => battle
                .queue()
                .enqueue(AbilityAction::aimed(unit, ability, cell)),
            None => debug!(
                target: "runtime::controller",
                unit = %unit,
                ability = %ability,
                "Plan names an ability without a target"
            ),
        }
    }
}

#[async_trait]
impl TurnController for PlannerController {
    async fn take_turn(&self, unit: UnitId, battle: &BattleContext) -> Result<()> {
        let plan = self.planner.plan(unit, battle).await;
        if !plan.is_valid {
            debug!(target: "runtime::controller", unit = %unit, "Planner passed");
            return Ok(());
        }

        if !self.intent_delay.is_zero() {
            tokio::time::sleep(self.intent_delay).await;
        }

        self.enqueue_move(unit, &plan, battle);
        self.enqueue_ability(unit, &plan, battle);
        Ok(())
    }
}

/// Input from a player-facing front end.
pub enum PlayerInput {
    Act(Box<dyn BattleAction>),
    EndTurn,
}

impl std::fmt::Debug for PlayerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Act(action) => f
                .debug_struct("Act")
                .field("action", &action.name())
                .field("unit", &action.actor())
                .finish(),
            Self::EndTurn => f.write_str("EndTurn"),
        }
    }
}

/// Sending half handed to the front end.
#[derive(Clone, Debug)]
pub struct InputSender {
    tx: mpsc::Sender<PlayerInput>,
}

impl InputSender {
    pub async fn act(&self, action: impl BattleAction + 'static) -> Result<()> {
        self.send(PlayerInput::Act(Box::new(action))).await
    }

    pub async fn end_turn(&self) -> Result<()> {
        self.send(PlayerInput::EndTurn).await
    }

    pub async fn send(&self, input: PlayerInput) -> Result<()> {
        self.tx
            .send(input)
            .await
            .map_err(|_| RuntimeError::InputChannelClosed)
    }
}

/// Runs player actions one at a time until [`PlayerInput::EndTurn`].
///
/// Actions submitted for a unit other than the acting one are dropped.
#[derive(Debug)]
pub struct ChannelController {
    rx: Mutex<mpsc::Receiver<PlayerInput>>,
}

impl ChannelController {
    pub const DEFAULT_BUFFER: usize = 16;

    pub fn new() -> (Self, InputSender) {
        Self::with_buffer(Self::DEFAULT_BUFFER)
    }

    pub fn with_buffer(buffer: usize) -> (Self, InputSender) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            Self { rx: Mutex::new(rx) },
            InputSender { tx },
        )
    }
}

#[async_trait]
impl TurnController for ChannelController {
    async fn take_turn(&self, unit: UnitId, battle: &BattleContext) -> Result<()> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.recv().await {
                Some(PlayerInput::Act(action)) => {
                    if action.actor() != unit {
                        warn!(
                            target: "runtime::controller",
                            unit = %unit,
                            actor = %action.actor(),
                            action = action.name(),
                            "Dropping input for a unit that is not acting"
                        );
                        continue;
                    }
                    battle.queue().enqueue_boxed(action);
                    battle.queue().run_all(battle).await?;
                }
                Some(PlayerInput::EndTurn) => return Ok(()),
                None => return Err(RuntimeError::InputChannelClosed),
            }
        }
    }
}
