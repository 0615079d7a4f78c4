//! Unified error types surfaced by the runtime API.
//!
//! [`ActionError`] is produced by a single action and never escapes the
//! queue: the queue logs it, counts the action as failed and moves on.
//! [`RuntimeError`] is what session and turn APIs return to the caller.
use thiserror::Error;

use battle_core::{AbilityId, BattleError, CatalogError, ErrorSeverity, TeamId, UnitId};

use crate::session::BattleOutcome;
use crate::turn::TurnPhase;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// External collaborator an action may depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Collaborator {
    Mover,
    AbilityRunner,
    Inventory,
    Targeting,
    Pathfinder,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{action} completion signal was dropped before it fired")]
    CompletionDropped { action: &'static str },

    #[error("{0} collaborator is not configured")]
    MissingCollaborator(Collaborator),

    #[error("ability `{ability}` failed: {reason}")]
    AbilityFailed { ability: AbilityId, reason: String },

    #[error("unit {0} is not part of this battle")]
    UnknownUnit(UnitId),

    #[error("unit {0} has no ability charges left")]
    NoCharges(UnitId),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl BattleError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CompletionDropped { .. } | Self::AbilityFailed { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownUnit(_) | Self::NoCharges(_) | Self::Catalog(_) => {
                ErrorSeverity::Validation
            }
            Self::MissingCollaborator(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CompletionDropped { .. } => "ACTION_COMPLETION_DROPPED",
            Self::MissingCollaborator(_) => "ACTION_MISSING_COLLABORATOR",
            Self::AbilityFailed { .. } => "ACTION_ABILITY_FAILED",
            Self::UnknownUnit(_) => "ACTION_UNKNOWN_UNIT",
            Self::NoCharges(_) => "ACTION_NO_CHARGES",
            Self::Catalog(err) => err.error_code(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("action queue is already running")]
    AlreadyRunning,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("no turn controller registered for {team} (unit {unit})")]
    NoController { unit: UnitId, team: TeamId },

    #[error("battle roster is empty")]
    EmptyRoster,

    #[error("unit {0} appears twice in the roster")]
    DuplicateUnit(UnitId),

    #[error("unit {0} is not part of this battle")]
    UnknownUnit(UnitId),

    #[error("unit {unit} cannot {operation} while {phase}")]
    InvalidPhase {
        unit: UnitId,
        operation: &'static str,
        phase: TurnPhase,
    },

    #[error("player input channel closed")]
    InputChannelClosed,

    #[error("battle is already over: {0}")]
    BattleOver(BattleOutcome),
}

impl BattleError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Queue(_) | Self::InvalidPhase { .. } => ErrorSeverity::Internal,
            Self::NoController { .. }
            | Self::EmptyRoster
            | Self::DuplicateUnit(_)
            | Self::UnknownUnit(_)
            | Self::BattleOver(_) => ErrorSeverity::Validation,
            Self::InputChannelClosed => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Queue(_) => "RUNTIME_QUEUE_BUSY",
            Self::NoController { .. } => "RUNTIME_NO_CONTROLLER",
            Self::EmptyRoster => "RUNTIME_EMPTY_ROSTER",
            Self::DuplicateUnit(_) => "RUNTIME_DUPLICATE_UNIT",
            Self::UnknownUnit(_) => "RUNTIME_UNKNOWN_UNIT",
            Self::InvalidPhase { .. } => "RUNTIME_INVALID_PHASE",
            Self::InputChannelClosed => "RUNTIME_INPUT_CLOSED",
            Self::BattleOver(_) => "RUNTIME_BATTLE_OVER",
        }
    }
}
