//! Status effect system.
//!
//! - [`StatusDefinition`]: authored, immutable, shared behind `Arc`
//! - [`RuntimeStatus`]: stacks, duration and source of one live instance
//! - [`StatusEngine`]: per-unit collection ticked on turn boundaries

pub mod definition;
pub mod engine;
pub mod runtime;

pub use definition::{
    MarkerTag, SCAR_VULNERABILITY, StatusDefinition, StatusEffect, StatusId, StatusKind,
};
pub use engine::{ApplyOutcome, StatusEngine, StatusTick, TickReport};
pub use runtime::RuntimeStatus;
