//! Async sequencing for hex-grid battles.
//!
//! This crate drives the pure rules in `battle-core` through time: actions
//! suspend on collaborator completions, run one at a time through the
//! [`ActionQueue`], and are grouped into unit turns by the [`TurnActor`].
//! Consumers embed a [`BattleSession`] to play a battle and subscribe to its
//! [`BattleEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the errors, collaborator traits and controller trait
//! - [`actions`] holds the step, path and ability actions
//! - [`queue`] is the sequential action queue
//! - [`turn`] implements the per-unit turn lifecycle
//! - [`session`] owns turn order and the end condition
//! - [`events`] broadcasts what happened to observers
pub mod abilities;
pub mod actions;
pub mod api;
pub mod config;
pub mod context;
pub mod controllers;
pub mod events;
pub mod queue;
pub mod session;
pub mod turn;

pub use abilities::StandardAbilityRunner;
pub use actions::{AbilityAction, BattleAction, PathAction, StepAction};
pub use api::{
    AbilityRunner, ActionError, AiPlanner, Collaborator, Completion, CompletionSignal,
    InventoryService, MoverService, PassController, PathRules, Pathfinder, Plan, QueueError,
    Result, RuntimeError, Services, TargetingService, TurnController,
};
pub use config::RuntimeConfig;
pub use context::{BattleContext, BattleContextBuilder, UnitHandle};
pub use controllers::{ChannelController, InputSender, PlannerController, PlayerInput};
pub use events::{BattleEvent, EventBus};
pub use queue::{ActionQueue, QueueReport};
pub use session::{BattleOutcome, BattleSession, BattleSessionBuilder};
pub use turn::{TurnActor, TurnPhase};
