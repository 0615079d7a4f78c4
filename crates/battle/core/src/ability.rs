//! Ability definitions and invocation contexts.
//!
//! An [`AbilityDefinition`] is authored content: what an ability deals and
//! which statuses it leaves behind. An [`AbilityContext`] is one concrete
//! invocation of it, owned by the action that runs it.

use std::borrow::Cow;
use std::fmt;

use arrayvec::ArrayVec;

use crate::combat::DamageConfig;
use crate::config::BattleConfig;
use crate::state::{HexCell, UnitId};
use crate::status::StatusId;

/// Stable identifier of an ability definition (e.g. `"ember_lance"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub Cow<'static, str>);

impl AbilityId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for AbilityId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for AbilityId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an item definition stored outside the core (the inventory
/// collaborator owns item storage).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}", self.0)
    }
}

/// Item an ability was cast from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRef {
    pub id: ItemId,
    /// One unit of the item is consumed after the ability completes.
    pub consume_on_use: bool,
}

impl ItemRef {
    pub fn consumable(id: ItemId) -> Self {
        Self {
            id,
            consume_on_use: true,
        }
    }

    pub fn reusable(id: ItemId) -> Self {
        Self {
            id,
            consume_on_use: false,
        }
    }
}

/// Status applied to each target an ability hits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub status: StatusId,
    pub stacks: u32,
}

/// Authored ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    /// Maximum hex distance from the caster to the aimed cell.
    #[cfg_attr(feature = "serde", serde(default = "default_range"))]
    pub range: u32,
    /// Area radius around the aimed cell; 0 hits a single cell.
    #[cfg_attr(feature = "serde", serde(default))]
    pub radius: u32,
    /// `None` for abilities that only apply statuses.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<DamageConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hit: Vec<StatusApplication>,
}

#[cfg(feature = "serde")]
fn default_range() -> u32 {
    1
}

impl AbilityDefinition {
    pub fn new(id: impl Into<AbilityId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            range: 1,
            radius: 0,
            damage: None,
            on_hit: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_damage(mut self, damage: DamageConfig) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_status(mut self, status: impl Into<StatusId>, stacks: u32) -> Self {
        self.on_hit.push(StatusApplication {
            status: status.into(),
            stacks,
        });
        self
    }

    pub fn in_range(&self, from: HexCell, to: HexCell) -> bool {
        from.distance(to) <= self.range
    }
}

/// One invocation of an ability.
///
/// Target units are unique and keep the order they were added in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityContext {
    pub caster: UnitId,
    pub ability: AbilityId,
    pub origin: HexCell,
    target_units: ArrayVec<UnitId, { BattleConfig::MAX_TARGETS }>,
    pub target_cells: Vec<HexCell>,
    pub source_item: Option<ItemRef>,
}

impl AbilityContext {
    pub fn new(caster: UnitId, ability: impl Into<AbilityId>, origin: HexCell) -> Self {
        Self {
            caster,
            ability: ability.into(),
            origin,
            target_units: ArrayVec::new(),
            target_cells: Vec::new(),
            source_item: None,
        }
    }

    /// Adds a target unit. Returns false for duplicates or when full.
    pub fn add_target(&mut self, unit: UnitId) -> bool {
        if self.target_units.contains(&unit) {
            return false;
        }
        self.target_units.try_push(unit).is_ok()
    }

    pub fn with_targets(mut self, units: impl IntoIterator<Item = UnitId>) -> Self {
        for unit in units {
            self.add_target(unit);
        }
        self
    }

    pub fn with_cells(mut self, cells: impl IntoIterator<Item = HexCell>) -> Self {
        self.target_cells.extend(cells);
        self
    }

    pub fn with_item(mut self, item: ItemRef) -> Self {
        self.source_item = Some(item);
        self
    }

    pub fn target_units(&self) -> &[UnitId] {
        &self.target_units
    }

    /// The item to consume once the ability completes, if any.
    pub fn consumable_item(&self) -> Option<ItemId> {
        self.source_item
            .filter(|item| item.consume_on_use)
            .map(|item| item.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_unique_and_ordered() {
        let ctx = AbilityContext::new(UnitId(0), "strike", HexCell::ORIGIN)
            .with_targets([UnitId(3), UnitId(1), UnitId(3), UnitId(2), UnitId(1)]);
        assert_eq!(ctx.target_units(), &[UnitId(3), UnitId(1), UnitId(2)]);
    }

    #[test]
    fn target_list_is_bounded() {
        let mut ctx = AbilityContext::new(UnitId(0), "volley", HexCell::ORIGIN);
        for id in 0..BattleConfig::MAX_TARGETS as u32 {
            assert!(ctx.add_target(UnitId(id)));
        }
        assert!(!ctx.add_target(UnitId(999)));
    }

    #[test]
    fn only_consume_on_use_items_are_consumed() {
        let ctx = AbilityContext::new(UnitId(0), "potion", HexCell::ORIGIN);
        assert_eq!(ctx.consumable_item(), None);
        assert_eq!(
            ctx.clone().with_item(ItemRef::consumable(ItemId(4))).consumable_item(),
            Some(ItemId(4))
        );
        assert_eq!(ctx.with_item(ItemRef::reusable(ItemId(4))).consumable_item(), None);
    }

    #[test]
    fn range_uses_hex_distance() {
        let ability = AbilityDefinition::new("lance").with_range(2);
        assert!(ability.in_range(HexCell::ORIGIN, HexCell::new(2, -1)));
        assert!(!ability.in_range(HexCell::ORIGIN, HexCell::new(3, 0)));
    }
}
