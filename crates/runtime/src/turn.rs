//! Per-unit turn lifecycle.
//!
//! A [`TurnActor`] walks one unit through `Idle → Acting → Idle`:
//!
//! 1. [`TurnActor::on_turn_start`] ticks turn-start statuses and refills stride
//!    and ability charges.
//! 2. [`TurnActor::act`] lets a [`TurnController`] enqueue actions, then drains
//!    the battle queue.
//! 3. [`TurnActor::on_turn_end`] ticks turn-end statuses and drains whatever
//!    resources are left.
use tracing::{debug, info, warn};

use battle_core::{TickReport, UnitId};

use crate::api::{Result, RuntimeError, TurnController};
use crate::context::{BattleContext, UnitHandle};
use crate::events::BattleEvent;
use crate::queue::QueueReport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Idle,
    Acting,
}

#[derive(Clone, Debug)]
pub struct TurnActor {
    unit: UnitId,
    phase: TurnPhase,
}

impl TurnActor {
    pub fn new(unit: UnitId) -> Self {
        Self {
            unit,
            phase: TurnPhase::Idle,
        }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    fn expect_phase(&self, expected: TurnPhase, operation: &'static str) -> Result<()> {
        if self.phase != expected {
            return Err(RuntimeError::InvalidPhase {
                unit: self.unit,
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn handle<'a>(&self, battle: &'a BattleContext) -> Result<&'a UnitHandle> {
        battle
            .unit(self.unit)
            .ok_or(RuntimeError::UnknownUnit(self.unit))
    }

    /// Opens the turn. A unit killed by its own turn-start ticks still moves
    /// to [`TurnPhase::Acting`]; [`TurnActor::act`] then does nothing.
    pub fn on_turn_start(&mut self, battle: &BattleContext, round: u32) -> Result<TickReport> {
        self.expect_phase(TurnPhase::Idle, "start a turn")?;
        let handle = self.handle(battle)?;

        let (report, was_alive, alive) = handle.write(|unit| {
            let was_alive = unit.is_alive();
            let report = unit.begin_turn();
            (report, was_alive, unit.is_alive())
        });

        info!(target: "runtime::turn", unit = %self.unit, round, "Turn started");
        battle.publish(BattleEvent::TurnStarted {
            unit: self.unit,
            round,
        });
        battle.publish_ticks(self.unit, &report);
        if was_alive && !alive {
            info!(target: "runtime::turn", unit = %self.unit, "Unit succumbed to its statuses");
            battle.publish(BattleEvent::UnitDefeated { unit: self.unit });
        }

        self.phase = TurnPhase::Acting;
        Ok(report)
    }

    /// Lets `controller` enqueue this turn's actions, then runs the queue dry.
    pub async fn act(
        &mut self,
        battle: &BattleContext,
        controller: &dyn TurnController,
    ) -> Result<QueueReport> {
        self.expect_phase(TurnPhase::Acting, "act")?;
        if !self.handle(battle)?.is_alive() {
            debug!(target: "runtime::turn", unit = %self.unit, "Dead unit skips its acting phase");
            return Ok(QueueReport::default());
        }

        if let Err(error) = controller.take_turn(self.unit, battle).await {
            let dropped = battle.queue().clear();
            if dropped > 0 {
                warn!(
                    target: "runtime::turn",
                    unit = %self.unit,
                    dropped,
                    "Controller failed; discarding its queued actions"
                );
            }
            return Err(error);
        }
        let report = battle.queue().run_all(battle).await?;

        debug!(
            target: "runtime::turn",
            unit = %self.unit,
            executed = report.executed,
            skipped = report.skipped,
            failed = report.failed,
            "Acting phase finished"
        );
        Ok(report)
    }

    pub fn on_turn_end(&mut self, battle: &BattleContext) -> Result<TickReport> {
        self.expect_phase(TurnPhase::Acting, "end a turn")?;
        let handle = self.handle(battle)?;

        let report = handle.write(|unit| unit.end_turn());
        battle.publish_ticks(self.unit, &report);
        battle.publish(BattleEvent::TurnEnded { unit: self.unit });
        info!(target: "runtime::turn", unit = %self.unit, "Turn ended");

        self.phase = TurnPhase::Idle;
        Ok(report)
    }

    /// Runs a whole turn: start, act, end.
    pub async fn run_turn(
        &mut self,
        battle: &BattleContext,
        controller: &dyn TurnController,
        round: u32,
    ) -> Result<QueueReport> {
        self.on_turn_start(battle, round)?;
        let report = match self.act(battle, controller).await {
            Ok(report) => report,
            Err(error) => {
                // Close the turn so the unit is not left mid-phase.
                self.on_turn_end(battle)?;
                return Err(error);
            }
        };
        self.on_turn_end(battle)?;
        Ok(report)
    }
}
