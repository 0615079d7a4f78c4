//! Battle event types.

use battle_core::{
    AbilityId, ApplyOutcome, CombatResult, HexCell, ItemId, StatusId, StatusKind, UnitId,
};

use crate::session::BattleOutcome;

/// Everything observable that happens during a battle, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
    },

    TurnStarted {
        unit: UnitId,
        round: u32,
    },

    TurnEnded {
        unit: UnitId,
    },

    /// A status hook ran at a turn boundary.
    StatusTicked {
        unit: UnitId,
        status: StatusId,
        kind: StatusKind,
        damage: u32,
        stacks_after: u32,
    },

    StatusExpired {
        unit: UnitId,
        status: StatusId,
    },

    StatusApplied {
        unit: UnitId,
        status: StatusId,
        stacks: u32,
        outcome: ApplyOutcome,
        source: Option<UnitId>,
    },

    /// A queued action failed its validity check when popped.
    ActionSkipped {
        unit: UnitId,
        action: &'static str,
    },

    ActionCompleted {
        unit: UnitId,
        action: &'static str,
    },

    ActionFailed {
        unit: UnitId,
        action: &'static str,
        error: String,
    },

    UnitMoved {
        unit: UnitId,
        from: HexCell,
        to: HexCell,
    },

    AttackResolved {
        attacker: UnitId,
        defender: UnitId,
        ability: AbilityId,
        result: CombatResult,
    },

    UnitDamaged {
        unit: UnitId,
        amount: u32,
        remaining: u32,
        source: Option<UnitId>,
    },

    UnitDefeated {
        unit: UnitId,
    },

    ItemConsumed {
        owner: UnitId,
        item: ItemId,
    },

    BattleOver {
        outcome: BattleOutcome,
    },
}
