//! Nearest-enemy skirmish AI.
use async_trait::async_trait;

use battle_core::{AbilityDefinition, HexCell, MarkerTag, UnitId};
use battle_runtime::{AiPlanner, BattleContext, Plan};

/// Closes on the nearest living enemy and uses the first known ability that
/// can reach it. Units with only self-targeted abilities buff themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestEnemyPlanner;

struct Actor {
    cell: HexCell,
    stride: u32,
    sprinting: bool,
    abilities: Vec<AbilityDefinition>,
}

impl NearestEnemyPlanner {
    fn actor(unit: UnitId, battle: &BattleContext) -> Option<Actor> {
        let handle = battle.unit(unit)?;
        let (cell, stride, sprinting, known) = handle.read(|u| {
            (
                u.cell,
                u.core.stride,
                u.has_marker(MarkerTag::Sprint),
                u.abilities.clone(),
            )
        });
        let abilities = known
            .iter()
            .filter_map(|id| battle.catalog().ability(id).ok())
            .map(|definition| (*definition).clone())
            .collect();
        Some(Actor {
            cell,
            stride,
            sprinting,
            abilities,
        })
    }

    fn nearest_enemy(
        unit: UnitId,
        from: HexCell,
        battle: &BattleContext,
    ) -> Option<(UnitId, HexCell)> {
        let team = battle.unit(unit)?.team();
        battle
            .roster()
            .iter()
            .filter(|other| other.is_alive() && other.team() != team)
            .map(|other| (other.id(), other.cell()))
            .min_by_key(|(id, cell)| (from.distance(*cell), *id))
    }

    /// Closest free cell to `target` within `range`, clipped to what the unit
    /// can walk this turn.
    fn approach(
        actor: &Actor,
        target: HexCell,
        range: u32,
        occupied: &[HexCell],
    ) -> Option<HexCell> {
        let reach = if actor.sprinting {
            u32::MAX
        } else {
            actor.stride
        };
        let free = |cell: &HexCell| !occupied.contains(cell) && *cell != target;

        let in_range = target
            .within(range)
            .into_iter()
            .filter(free)
            .filter(|cell| actor.cell.distance(*cell) <= reach)
            .min_by_key(|cell| actor.cell.distance(*cell));
        if in_range.is_some() {
            return in_range;
        }

        actor
            .cell
            .within(actor.stride)
            .into_iter()
            .filter(free)
            .min_by_key(|cell| cell.distance(target))
            .filter(|cell| cell.distance(target) < actor.cell.distance(target))
    }
}

#[async_trait]
impl AiPlanner for NearestEnemyPlanner {
    async fn plan(&self, unit: UnitId, battle: &BattleContext) -> Plan {
        let Some(actor) = Self::actor(unit, battle) else {
            return Plan::pass();
        };
        let Some((target_unit, target)) = Self::nearest_enemy(unit, actor.cell, battle) else {
            return Plan::pass();
        };

        let distance = actor.cell.distance(target);
        let offensive = || actor.abilities.iter().filter(|ability| ability.range > 0);

        if let Some(ability) = offensive().find(|ability| ability.range >= distance) {
            return Plan {
                is_valid: true,
                move_destination: None,
                target_cell: Some(target),
                target_unit: Some(target_unit),
                ability: Some(ability.id.clone()),
            };
        }

        if let Some(ability) = offensive().next() {
            let occupied = battle.occupied_cells(unit);
            let destination = Self::approach(&actor, target, ability.range, &occupied);
            return Plan {
                is_valid: destination.is_some(),
                move_destination: destination,
                target_cell: Some(target),
                target_unit: Some(target_unit),
                ability: Some(ability.id.clone()),
            };
        }

        match actor.abilities.iter().find(|ability| ability.range == 0) {
            Some(buff) => Plan {
                is_valid: true,
                move_destination: None,
                target_cell: Some(actor.cell),
                target_unit: Some(unit),
                ability: Some(buff.id.clone()),
            },
            None => Plan::pass(),
        }
    }
}
