//! Shared battle context.
//!
//! [`BattleContext`] is the single value every action, controller and ability
//! runner receives. It owns the roster, the content catalog, the collaborators,
//! the action queue, the random source and the event bus.
//!
//! Unit state lives behind short-lived locks. [`UnitHandle`] only exposes
//! closure-scoped access so a guard can never be held across an `.await`.
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use battle_core::{
    BattleConfig, Catalog, HexCell, PcgRandom, RandomSource, TeamId, TickReport, Unit, UnitId,
};

use crate::api::{
    AbilityRunner, InventoryService, MoverService, Pathfinder, Result, RuntimeError, Services,
    TargetingService,
};
use crate::events::{BattleEvent, EventBus};
use crate::queue::ActionQueue;

/// Cloneable, lock-guarded reference to one unit.
#[derive(Clone, Debug)]
pub struct UnitHandle {
    id: UnitId,
    inner: Arc<RwLock<Unit>>,
}

impl UnitHandle {
    fn new(unit: Unit) -> Self {
        Self {
            id: unit.id,
            inner: Arc::new(RwLock::new(unit)),
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Runs `f` with shared access to the unit.
    pub fn read<T>(&self, f: impl FnOnce(&Unit) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` with exclusive access to the unit.
    pub fn write<T>(&self, f: impl FnOnce(&mut Unit) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Owned copy of the unit's current state.
    pub fn snapshot(&self) -> Unit {
        self.read(Unit::clone)
    }

    pub fn is_alive(&self) -> bool {
        self.read(Unit::is_alive)
    }

    pub fn cell(&self) -> HexCell {
        self.read(|unit| unit.cell)
    }

    pub fn team(&self) -> TeamId {
        self.read(|unit| unit.team)
    }
}

pub struct BattleContext {
    config: BattleConfig,
    catalog: Catalog,
    roster: Vec<UnitHandle>,
    index: BTreeMap<UnitId, usize>,
    services: Services,
    queue: ActionQueue,
    rng: Mutex<Box<dyn RandomSource + Send>>,
    events: EventBus,
}

impl BattleContext {
    pub fn builder() -> BattleContextBuilder {
        BattleContextBuilder::new()
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn publish(&self, event: BattleEvent) {
        self.events.publish(event);
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitHandle> {
        self.index.get(&id).map(|&slot| &self.roster[slot])
    }

    /// Units in roster (turn) order.
    pub fn roster(&self) -> &[UnitHandle] {
        &self.roster
    }

    /// The living unit standing on `cell`, if any.
    pub fn unit_at(&self, cell: HexCell) -> Option<UnitId> {
        self.roster
            .iter()
            .find(|handle| handle.read(|unit| unit.is_alive() && unit.cell == cell))
            .map(UnitHandle::id)
    }

    /// Living units standing on any of `cells`, in roster order.
    pub fn units_in(&self, cells: &[HexCell]) -> Vec<UnitId> {
        self.roster
            .iter()
            .filter(|handle| handle.read(|unit| unit.is_alive() && cells.contains(&unit.cell)))
            .map(UnitHandle::id)
            .collect()
    }

    /// Cells occupied by living units other than `except`.
    pub fn occupied_cells(&self, except: UnitId) -> Vec<HexCell> {
        self.roster
            .iter()
            .filter(|handle| handle.id() != except && handle.is_alive())
            .map(UnitHandle::cell)
            .collect()
    }

    /// Teams with at least one living unit.
    pub fn alive_teams(&self) -> BTreeSet<TeamId> {
        self.roster
            .iter()
            .filter_map(|handle| handle.read(|unit| unit.is_alive().then_some(unit.team)))
            .collect()
    }

    /// Runs `f` with exclusive access to the battle's random source.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RandomSource) -> T) -> T {
        let mut guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **guard)
    }

    /// Publishes one event per status tick and per expired status.
    pub(crate) fn publish_ticks(&self, unit: UnitId, report: &TickReport) {
        for tick in &report.ticks {
            self.publish(BattleEvent::StatusTicked {
                unit,
                status: tick.id.clone(),
                kind: tick.kind,
                damage: tick.damage,
                stacks_after: tick.stacks_after,
            });
        }
        for status in &report.expired {
            self.publish(BattleEvent::StatusExpired {
                unit,
                status: status.clone(),
            });
        }
    }
}

impl std::fmt::Debug for BattleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleContext")
            .field("units", &self.roster.len())
            .field("services", &self.services)
            .field("queued", &self.queue.len())
            .finish()
    }
}

/// Builder for [`BattleContext`].
pub struct BattleContextBuilder {
    config: BattleConfig,
    catalog: Catalog,
    units: Vec<Unit>,
    services: Services,
    rng: Option<Box<dyn RandomSource + Send>>,
    seed: u64,
    event_capacity: usize,
}

impl BattleContextBuilder {
    fn new() -> Self {
        Self {
            config: BattleConfig::default(),
            catalog: Catalog::default(),
            units: Vec::new(),
            services: Services::default(),
            rng: None,
            seed: 0,
            event_capacity: EventBus::DEFAULT_CAPACITY,
        }
    }

    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Adds a unit. Units take turns in the order they are added.
    pub fn unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn mover(mut self, mover: Arc<dyn MoverService>) -> Self {
        self.services.mover = Some(mover);
        self
    }

    pub fn ability_runner(mut self, runner: Arc<dyn AbilityRunner>) -> Self {
        self.services.abilities = Some(runner);
        self
    }

    pub fn inventory(mut self, inventory: Arc<dyn InventoryService>) -> Self {
        self.services.inventory = Some(inventory);
        self
    }

    pub fn targeting(mut self, targeting: Arc<dyn TargetingService>) -> Self {
        self.services.targeting = Some(targeting);
        self
    }

    pub fn pathfinder(mut self, pathfinder: Arc<dyn Pathfinder>) -> Self {
        self.services.pathfinder = Some(pathfinder);
        self
    }

    /// Replaces the default seeded [`PcgRandom`].
    pub fn random_source(mut self, rng: impl RandomSource + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Seed for the default random source.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the context.
    ///
    /// Without an explicit ability runner the [`crate::StandardAbilityRunner`]
    /// is installed.
    pub fn build(self) -> Result<BattleContext> {
        if self.units.is_empty() {
            return Err(RuntimeError::EmptyRoster);
        }

        let mut index = BTreeMap::new();
        let mut roster = Vec::with_capacity(self.units.len());
        for unit in self.units {
            if index.insert(unit.id, roster.len()).is_some() {
                return Err(RuntimeError::DuplicateUnit(unit.id));
            }
            roster.push(UnitHandle::new(unit));
        }

        let mut services = self.services;
        if services.abilities.is_none() {
            services.abilities = Some(Arc::new(crate::abilities::StandardAbilityRunner));
        }

        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(PcgRandom::seeded(self.seed)));

        Ok(BattleContext {
            config: self.config,
            catalog: self.catalog,
            roster,
            index,
            services,
            queue: ActionQueue::new(),
            rng: Mutex::new(rng),
            events: EventBus::with_capacity(self.event_capacity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{CoreAttributes, ScriptedRandom};

    fn unit(id: u32, team: u8, cell: HexCell) -> Unit {
        Unit::new(UnitId(id), format!("u{id}"), TeamId(team), CoreAttributes::default()).at(cell)
    }

    #[test]
    fn build_rejects_bad_rosters() {
        assert!(matches!(
            BattleContext::builder().build(),
            Err(RuntimeError::EmptyRoster)
        ));

        let result = BattleContext::builder()
            .unit(unit(1, 0, HexCell::ORIGIN))
            .unit(unit(1, 1, HexCell::new(1, 0)))
            .build();
        assert!(matches!(result, Err(RuntimeError::DuplicateUnit(UnitId(1)))));
    }

    #[test]
    fn spatial_queries_ignore_the_dead() {
        let ctx = BattleContext::builder()
            .unit(unit(1, 0, HexCell::ORIGIN))
            .unit(unit(2, 1, HexCell::new(1, 0)))
            .unit(unit(3, 1, HexCell::new(2, 0)))
            .build()
            .unwrap();

        ctx.unit(UnitId(3))
            .unwrap()
            .write(|u| u.take_damage(1000, None));

        assert_eq!(ctx.unit_at(HexCell::new(1, 0)), Some(UnitId(2)));
        assert_eq!(ctx.unit_at(HexCell::new(2, 0)), None);
        assert_eq!(
            ctx.units_in(&HexCell::ORIGIN.within(2)),
            vec![UnitId(1), UnitId(2)]
        );
        assert_eq!(ctx.occupied_cells(UnitId(1)), vec![HexCell::new(1, 0)]);
        assert_eq!(ctx.alive_teams().len(), 2);
        assert!(ctx.services().abilities.is_some());
    }

    #[test]
    fn random_source_is_shared() {
        let ctx = BattleContext::builder()
            .unit(unit(1, 0, HexCell::ORIGIN))
            .random_source(ScriptedRandom::new([0.25, 0.5]))
            .build()
            .unwrap();

        assert_eq!(ctx.with_rng(|rng| rng.unit()), 0.25);
        assert_eq!(ctx.with_rng(|rng| rng.range(0.0, 10.0)), 5.0);
    }
}
