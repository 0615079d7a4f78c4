//! Common error infrastructure for battle-core.
//!
//! Combat resolution and status ticking never fail; the only fallible
//! operations in this crate are catalog lookups over authored content. The
//! shared [`ErrorSeverity`] and [`BattleError`] trait are reused by the runtime
//! so every error in the workspace can be classified the same way.

use crate::ability::AbilityId;
use crate::status::StatusId;

/// Severity level of an error, used for logging priority and recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The turn can continue; the failing step is skipped.
    ///
    /// Examples: a collaborator dropped its completion signal
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: unknown status id, action submitted for a missing unit
    Validation,

    /// Unexpected state inconsistency that should be investigated.
    Internal,

    /// The battle cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Lookup failures against a [`crate::Catalog`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("status definition `{0}` is not registered")]
    UnknownStatus(StatusId),

    #[error("ability `{0}` is not registered")]
    UnknownAbility(AbilityId),

    #[error("status definition `{0}` is registered twice")]
    DuplicateStatus(StatusId),

    #[error("ability `{0}` is registered twice")]
    DuplicateAbility(AbilityId),
}

impl BattleError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStatus(_) => "CATALOG_UNKNOWN_STATUS",
            Self::UnknownAbility(_) => "CATALOG_UNKNOWN_ABILITY",
            Self::DuplicateStatus(_) => "CATALOG_DUPLICATE_STATUS",
            Self::DuplicateAbility(_) => "CATALOG_DUPLICATE_ABILITY",
        }
    }
}
