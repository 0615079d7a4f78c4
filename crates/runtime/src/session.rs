//! Battle session: turn order, controllers and the end condition.
//!
//! [`BattleSession`] owns the [`BattleContext`] and walks the roster in order,
//! one [`TurnActor`] turn per living unit, until one team is left standing or
//! the round limit is reached.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use battle_core::{Catalog, RandomSource, TeamId, Unit, UnitId};

use crate::api::{
    AbilityRunner, InventoryService, MoverService, Pathfinder, Result, RuntimeError,
    TargetingService, TurnController,
};
use crate::config::RuntimeConfig;
use crate::context::{BattleContext, BattleContextBuilder, UnitHandle};
use crate::events::BattleEvent;
use crate::queue::QueueReport;
use crate::turn::TurnActor;

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory(TeamId),
    /// Every unit is down.
    Draw,
    RoundLimit { rounds: u32 },
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory(team) => write!(f, "{team} wins"),
            Self::Draw => f.write_str("draw"),
            Self::RoundLimit { rounds } => write!(f, "round limit reached after {rounds} rounds"),
        }
    }
}

pub struct BattleSession {
    context: Arc<BattleContext>,
    controllers: BTreeMap<TeamId, Arc<dyn TurnController>>,
    default_controller: Option<Arc<dyn TurnController>>,
    config: RuntimeConfig,
    round: u32,
    outcome: Option<BattleOutcome>,
}

impl BattleSession {
    pub fn builder() -> BattleSessionBuilder {
        BattleSessionBuilder::new()
    }

    pub fn context(&self) -> &Arc<BattleContext> {
        &self.context
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Last round started; 0 before the first.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.context.events().subscribe()
    }

    fn controller_for(&self, unit: UnitId) -> Result<Arc<dyn TurnController>> {
        let handle = self
            .context
            .unit(unit)
            .ok_or(RuntimeError::UnknownUnit(unit))?;
        let team = handle.team();
        self.controllers
            .get(&team)
            .or(self.default_controller.as_ref())
            .cloned()
            .ok_or(RuntimeError::NoController { unit, team })
    }

    fn ensure_running(&self) -> Result<()> {
        match self.outcome {
            Some(outcome) => Err(RuntimeError::BattleOver(outcome)),
            None => Ok(()),
        }
    }

    /// Plays one full turn for `unit`. Dead units are skipped.
    pub async fn take_turn(&mut self, unit: UnitId) -> Result<QueueReport> {
        self.ensure_running()?;
        let controller = self.controller_for(unit)?;
        if !self.context.unit(unit).is_some_and(UnitHandle::is_alive) {
            return Ok(QueueReport::default());
        }

        let round = self.round.max(1);
        let mut actor = TurnActor::new(unit);
        let report = actor
            .run_turn(&self.context, controller.as_ref(), round)
            .await?;

        self.check_outcome();
        Ok(report)
    }

    /// Plays one round in roster order. Returns the outcome once the battle
    /// has ended.
    pub async fn run_round(&mut self) -> Result<Option<BattleOutcome>> {
        self.ensure_running()?;
        if self.check_outcome().is_some() {
            return Ok(self.outcome);
        }

        self.round += 1;
        info!(target: "runtime::session", round = self.round, "Round started");
        self.context
            .publish(BattleEvent::RoundStarted { round: self.round });

        let order: Vec<UnitId> = self.context.roster().iter().map(UnitHandle::id).collect();
        for unit in order {
            self.take_turn(unit).await?;
            if self.outcome.is_some() {
                return Ok(self.outcome);
            }
        }

        if self.round >= self.config.max_rounds {
            self.finish(BattleOutcome::RoundLimit { rounds: self.round });
        }
        Ok(self.outcome)
    }

    /// Plays rounds until the battle ends.
    pub async fn run(&mut self) -> Result<BattleOutcome> {
        loop {
            if let Some(outcome) = self.run_round().await? {
                return Ok(outcome);
            }
        }
    }

    fn check_outcome(&mut self) -> Option<BattleOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        let teams = self.context.alive_teams();
        let outcome = match teams.len() {
            0 => BattleOutcome::Draw,
            1 => BattleOutcome::Victory(teams.into_iter().next()?),
            _ => return None,
        };
        self.finish(outcome);
        Some(outcome)
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        info!(target: "runtime::session", outcome = %outcome, round = self.round, "Battle over");
        self.outcome = Some(outcome);
        self.context.publish(BattleEvent::BattleOver { outcome });
    }
}

impl fmt::Debug for BattleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleSession")
            .field("context", &self.context)
            .field("teams", &self.controllers.keys().collect::<Vec<_>>())
            .field("round", &self.round)
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Builder for [`BattleSession`].
pub struct BattleSessionBuilder {
    context: BattleContextBuilder,
    controllers: BTreeMap<TeamId, Arc<dyn TurnController>>,
    default_controller: Option<Arc<dyn TurnController>>,
    config: RuntimeConfig,
}

impl BattleSessionBuilder {
    fn new() -> Self {
        Self {
            context: BattleContext::builder(),
            controllers: BTreeMap::new(),
            default_controller: None,
            config: RuntimeConfig::default(),
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.context = self.context.catalog(catalog);
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.context = self.context.unit(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.context = self.context.units(units);
        self
    }

    pub fn mover(mut self, mover: Arc<dyn MoverService>) -> Self {
        self.context = self.context.mover(mover);
        self
    }

    pub fn ability_runner(mut self, runner: Arc<dyn AbilityRunner>) -> Self {
        self.context = self.context.ability_runner(runner);
        self
    }

    pub fn inventory(mut self, inventory: Arc<dyn InventoryService>) -> Self {
        self.context = self.context.inventory(inventory);
        self
    }

    pub fn targeting(mut self, targeting: Arc<dyn TargetingService>) -> Self {
        self.context = self.context.targeting(targeting);
        self
    }

    pub fn pathfinder(mut self, pathfinder: Arc<dyn Pathfinder>) -> Self {
        self.context = self.context.pathfinder(pathfinder);
        self
    }

    pub fn random_source(mut self, rng: impl RandomSource + Send + 'static) -> Self {
        self.context = self.context.random_source(rng);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.context = self.context.seed(seed);
        self
    }

    /// Controller for every unit of `team`.
    pub fn controller(mut self, team: TeamId, controller: Arc<dyn TurnController>) -> Self {
        self.controllers.insert(team, controller);
        self
    }

    /// Controller for teams without their own.
    pub fn default_controller(mut self, controller: Arc<dyn TurnController>) -> Self {
        self.default_controller = Some(controller);
        self
    }

    pub fn build(self) -> Result<BattleSession> {
        let context = self
            .context
            .config(self.config.battle.clone())
            .event_capacity(self.config.event_buffer_size)
            .build()?;

        Ok(BattleSession {
            context: Arc::new(context),
            controllers: self.controllers,
            default_controller: self.default_controller,
            config: self.config,
            round: 0,
            outcome: None,
        })
    }
}
