//! Headless stand-ins for the engine-side collaborators.
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use battle_core::{AbilityDefinition, HexCell, UnitId};
use battle_runtime::{Completion, MoverService, PathRules, Pathfinder, TargetingService};

/// Mover that takes `step_time` per cell and completes on a background task.
#[derive(Clone, Debug, Default)]
pub struct PacedMover {
    step_time: Duration,
    moving: Arc<Mutex<BTreeSet<UnitId>>>,
}

impl PacedMover {
    pub fn new(step_time: Duration) -> Self {
        Self {
            step_time,
            moving: Arc::default(),
        }
    }

    fn start(&self, unit: UnitId, cells: usize, on_complete: Completion) {
        self.moving
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit);

        let moving = Arc::clone(&self.moving);
        let travel = self.step_time * u32::try_from(cells).unwrap_or(u32::MAX);
        tokio::spawn(async move {
            if !travel.is_zero() {
                tokio::time::sleep(travel).await;
            }
            moving
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&unit);
            on_complete.complete();
        });
    }
}

impl MoverService for PacedMover {
    fn try_step_to(&self, unit: UnitId, _cell: HexCell, on_complete: Completion) -> bool {
        if self.is_moving(unit) {
            return false;
        }
        self.start(unit, 1, on_complete);
        true
    }

    fn follow_path(&self, unit: UnitId, path: &[HexCell], on_complete: Completion) {
        self.start(unit, path.len(), on_complete);
    }

    fn is_moving(&self, unit: UnitId) -> bool {
        self.moving
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&unit)
    }
}

/// Breadth-first search over the open hex plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsPathfinder;

impl BfsPathfinder {
    /// Extra steps allowed beyond the straight-line distance when the search
    /// is otherwise unbounded.
    const DETOUR: u32 = 6;
}

impl Pathfinder for BfsPathfinder {
    fn find_path(&self, start: HexCell, goal: HexCell, rules: &PathRules) -> Option<Vec<HexCell>> {
        if start == goal || rules.blocked.contains(&goal) {
            return None;
        }
        let limit = rules
            .max_steps
            .unwrap_or_else(|| start.distance(goal) + Self::DETOUR);

        let mut came_from = BTreeMap::from([(start, start)]);
        let mut frontier = VecDeque::from([(start, 0u32)]);

        while let Some((cell, depth)) = frontier.pop_front() {
            if cell == goal {
                let mut path = vec![goal];
                let mut at = goal;
                while let Some(&prev) = came_from.get(&at) {
                    if prev == start {
                        break;
                    }
                    path.push(prev);
                    at = prev;
                }
                path.reverse();
                return Some(path);
            }
            if depth >= limit {
                continue;
            }
            for next in cell.neighbors() {
                if rules.blocked.contains(&next) || came_from.contains_key(&next) {
                    continue;
                }
                came_from.insert(next, cell);
                frontier.push_back((next, depth + 1));
            }
        }
        None
    }
}

/// Every cell within the ability's radius of the aimed cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct RadiusTargeting;

impl TargetingService for RadiusTargeting {
    fn affected_cells(&self, ability: &AbilityDefinition, target: HexCell) -> Vec<HexCell> {
        target.within(ability.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bfs_finds_shortest_path_around_blockers() {
        let rules = PathRules {
            max_steps: None,
            blocked: vec![HexCell::new(1, 0)],
        };
        let path = BfsPathfinder
            .find_path(HexCell::ORIGIN, HexCell::new(2, 0), &rules)
            .unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some(&HexCell::new(2, 0)));
        assert!(!path.contains(&HexCell::new(1, 0)));
        let mut at = HexCell::ORIGIN;
        for cell in path {
            assert!(at.is_adjacent(cell));
            at = cell;
        }
    }

    #[test]
    fn bfs_respects_step_budget() {
        let rules = PathRules {
            max_steps: Some(2),
            blocked: Vec::new(),
        };
        assert!(
            BfsPathfinder
                .find_path(HexCell::ORIGIN, HexCell::new(3, 0), &rules)
                .is_none()
        );
        assert_eq!(
            BfsPathfinder
                .find_path(HexCell::ORIGIN, HexCell::new(2, 0), &rules)
                .map(|path| path.len()),
            Some(2)
        );
    }

    #[test]
    fn radius_targeting_covers_the_area() {
        let flask = AbilityDefinition::new("flask").with_radius(1);
        assert_eq!(RadiusTargeting.affected_cells(&flask, HexCell::ORIGIN).len(), 7);
    }

    #[tokio::test]
    async fn paced_mover_completes_and_clears_moving_flag() {
        let mover = PacedMover::new(Duration::ZERO);
        let (on_complete, done) = Completion::pair();

        assert!(mover.try_step_to(UnitId(1), HexCell::new(1, 0), on_complete));
        assert!(mover.is_moving(UnitId(1)));
        done.wait("step").await.unwrap();
        assert!(!mover.is_moving(UnitId(1)));
    }
}
