//! Public API surface for runtime consumers.
//!
//! Re-exports the error types, collaborator interfaces and controller trait
//! that integrators implement or match on.
pub mod controllers;
pub mod errors;
pub mod services;

pub use controllers::{PassController, TurnController};
pub use errors::{ActionError, Collaborator, QueueError, Result, RuntimeError};
pub use services::{
    AbilityRunner, AiPlanner, Completion, CompletionSignal, InventoryService, MoverService,
    PathRules, Pathfinder, Plan, Services, TargetingService,
};
