//! Battle log written from the event stream.
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use battle_runtime::BattleEvent;

/// Logs every event until the bus closes. Returns the number of events seen.
pub fn spawn_battle_log(mut rx: broadcast::Receiver<BattleEvent>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut seen = 0;
        loop {
            match rx.recv().await {
                Ok(event) => {
                    seen += 1;
                    log_event(&event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(target: "sim::log", skipped, "Battle log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        seen
    })
}

fn log_event(event: &BattleEvent) {
    match event {
        BattleEvent::RoundStarted { round } => info!(target: "sim::log", "=== Round {round} ==="),
        BattleEvent::UnitMoved { unit, from, to } => {
            info!(target: "sim::log", "{unit} moves {from} -> {to}")
        }
        BattleEvent::AttackResolved {
            attacker,
            defender,
            ability,
            result,
        } if !result.is_hit => {
            info!(target: "sim::log", "{attacker} uses {ability} on {defender}: miss")
        }
        BattleEvent::AttackResolved {
            attacker,
            defender,
            ability,
            result,
        } => info!(
            target: "sim::log",
            critical = result.is_critical,
            "{attacker} uses {ability} on {defender}: {} damage",
            result.final_damage
        ),
        BattleEvent::UnitDamaged {
            unit,
            amount,
            remaining,
            ..
        } => debug!(target: "sim::log", "{unit} loses {amount} health ({remaining} left)"),
        BattleEvent::StatusApplied {
            unit,
            status,
            stacks,
            outcome,
            ..
        } => info!(target: "sim::log", ?outcome, "{unit} gains {stacks} {status}"),
        BattleEvent::StatusTicked {
            unit,
            status,
            damage,
            stacks_after,
            ..
        } if *damage > 0 => info!(
            target: "sim::log",
            "{unit} suffers {damage} from {status} ({stacks_after} stacks left)"
        ),
        BattleEvent::StatusExpired { unit, status } => {
            info!(target: "sim::log", "{status} fades from {unit}")
        }
        BattleEvent::UnitDefeated { unit } => info!(target: "sim::log", "{unit} is defeated"),
        BattleEvent::ActionFailed {
            unit,
            action,
            error,
        } => warn!(target: "sim::log", "{unit} {action} failed: {error}"),
        BattleEvent::BattleOver { outcome } => info!(target: "sim::log", "Battle over: {outcome}"),
        other => debug!(target: "sim::log", event = ?other),
    }
}
