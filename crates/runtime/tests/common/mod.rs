//! Test doubles shared by the runtime integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use battle_core::{
    AbilityContext, AbilityDefinition, AbilityId, Catalog, CoreAttributes, DamageConfig, HexCell,
    ItemId, StatusDefinition, StatusEffect, TeamId, Unit, UnitId,
};
use battle_runtime::{
    AbilityRunner, ActionError, AiPlanner, BattleContext, BattleEvent, Completion,
    InventoryService, MoverService, PathRules, Pathfinder, Plan,
};

pub fn unit(id: u32, team: u8, cell: HexCell) -> Unit {
    Unit::new(UnitId(id), format!("unit-{id}"), TeamId(team), CoreAttributes::default())
        .at(cell)
        .with_abilities([AbilityId::from("strike")])
}

/// `strike` deals 10 flat physical damage; `poison_dart` adds Erosion.
pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .register_status(StatusDefinition::new("erosion", StatusEffect::Erosion))
        .unwrap();
    catalog
        .register_ability(
            AbilityDefinition::new("strike").with_damage(DamageConfig::physical(10.0)),
        )
        .unwrap();
    catalog
        .register_ability(
            AbilityDefinition::new("poison_dart")
                .with_range(3)
                .with_damage(DamageConfig::physical(2.0))
                .with_status("erosion", 3),
        )
        .unwrap();
    catalog
}

/// Spins the current-thread scheduler until `condition` holds.
pub async fn settle(condition: impl Fn() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never held");
}

pub fn drain(rx: &mut tokio::sync::broadcast::Receiver<BattleEvent>) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Mover that completes every step and path immediately.
#[derive(Default)]
pub struct InstantMover;

impl MoverService for InstantMover {
    fn try_step_to(&self, _unit: UnitId, _cell: HexCell, on_complete: Completion) -> bool {
        on_complete.complete();
        true
    }

    fn follow_path(&self, _unit: UnitId, _path: &[HexCell], on_complete: Completion) {
        on_complete.complete();
    }

    fn is_moving(&self, _unit: UnitId) -> bool {
        false
    }
}

/// Mover whose completions are fired by the test.
#[derive(Default)]
pub struct ManualMover {
    pending: Mutex<Vec<(UnitId, Completion)>>,
    pub refuse: bool,
}

impl ManualMover {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Fires the oldest pending completion.
    pub fn finish_next(&self) -> bool {
        let next = {
            let mut pending = self.pending.lock().unwrap();
            (!pending.is_empty()).then(|| pending.remove(0))
        };
        match next {
            Some((_, completion)) => {
                completion.complete();
                true
            }
            None => false,
        }
    }

    /// Drops the oldest pending completion without firing it.
    pub fn abandon_next(&self) -> bool {
        let mut pending = self.pending.lock().unwrap();
        if pending.is_empty() {
            return false;
        }
        pending.remove(0);
        true
    }
}

impl MoverService for ManualMover {
    fn try_step_to(&self, unit: UnitId, _cell: HexCell, on_complete: Completion) -> bool {
        if self.refuse {
            return false;
        }
        self.pending.lock().unwrap().push((unit, on_complete));
        true
    }

    fn follow_path(&self, unit: UnitId, _path: &[HexCell], on_complete: Completion) {
        self.pending.lock().unwrap().push((unit, on_complete));
    }

    fn is_moving(&self, unit: UnitId) -> bool {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .any(|(moving, _)| *moving == unit)
    }
}

/// Ability runner that records invocations and suspends until released.
#[derive(Default)]
pub struct ManualRunner {
    started: Mutex<Vec<AbilityId>>,
    releases: Mutex<Vec<oneshot::Sender<()>>>,
}

impl ManualRunner {
    pub fn started(&self) -> Vec<AbilityId> {
        self.started.lock().unwrap().clone()
    }

    pub fn waiting(&self) -> usize {
        self.releases.lock().unwrap().len()
    }

    pub fn release_next(&self) -> bool {
        let next = {
            let mut releases = self.releases.lock().unwrap();
            (!releases.is_empty()).then(|| releases.remove(0))
        };
        next.is_some_and(|tx| tx.send(()).is_ok())
    }
}

#[async_trait]
impl AbilityRunner for ManualRunner {
    async fn run(
        &self,
        ability: &AbilityDefinition,
        _invocation: &AbilityContext,
        _battle: &BattleContext,
    ) -> Result<(), ActionError> {
        let (tx, rx) = oneshot::channel();
        self.started.lock().unwrap().push(ability.id.clone());
        self.releases.lock().unwrap().push(tx);
        rx.await.map_err(|_| ActionError::AbilityFailed {
            ability: ability.id.clone(),
            reason: "released without firing".into(),
        })
    }
}

/// Inventory backed by a count per (owner, item).
#[derive(Default)]
pub struct CountingInventory {
    stock: Mutex<BTreeMap<(UnitId, ItemId), u32>>,
}

impl CountingInventory {
    pub fn with_stock(owner: UnitId, item: ItemId, count: u32) -> Self {
        let inventory = Self::default();
        inventory.stock.lock().unwrap().insert((owner, item), count);
        inventory
    }

    pub fn count(&self, owner: UnitId, item: ItemId) -> u32 {
        self.stock
            .lock()
            .unwrap()
            .get(&(owner, item))
            .copied()
            .unwrap_or(0)
    }
}

impl InventoryService for CountingInventory {
    fn consume_item(&self, owner: UnitId, item: ItemId, count: u32) -> bool {
        let mut stock = self.stock.lock().unwrap();
        match stock.get_mut(&(owner, item)) {
            Some(held) if *held >= count => {
                *held -= count;
                true
            }
            _ => false,
        }
    }
}

/// Greedy pathfinder: walks toward the goal one neighbor at a time.
pub struct GreedyPathfinder;

impl Pathfinder for GreedyPathfinder {
    fn find_path(&self, start: HexCell, goal: HexCell, rules: &PathRules) -> Option<Vec<HexCell>> {
        let mut path = Vec::new();
        let mut at = start;
        while at != goal {
            at = at
                .neighbors()
                .into_iter()
                .filter(|cell| !rules.blocked.contains(cell))
                .min_by_key(|cell| cell.distance(goal))?;
            path.push(at);
            if path.len() > 64 {
                return None;
            }
        }
        match rules.max_steps {
            Some(max) if path.len() > max as usize => None,
            _ => Some(path),
        }
    }
}

/// Planner that strikes the first living enemy in roster order, walking next
/// to it first when needed.
pub struct StrikeFirstEnemy;

#[async_trait]
impl AiPlanner for StrikeFirstEnemy {
    async fn plan(&self, unit: UnitId, battle: &BattleContext) -> Plan {
        let Some(me) = battle.unit(unit) else {
            return Plan::pass();
        };
        let (team, cell) = me.read(|u| (u.team, u.cell));
        let enemy = battle
            .roster()
            .iter()
            .find(|other| other.is_alive() && other.team() != team);
        let Some(enemy) = enemy else {
            return Plan::pass();
        };

        let target = enemy.cell();
        let move_destination = (!cell.is_adjacent(target))
            .then(|| {
                target
                    .neighbors()
                    .into_iter()
                    .min_by_key(|neighbor| neighbor.distance(cell))
            })
            .flatten();
        Plan {
            is_valid: true,
            move_destination,
            target_cell: None,
            target_unit: Some(enemy.id()),
            ability: Some(AbilityId::from("strike")),
        }
    }
}
