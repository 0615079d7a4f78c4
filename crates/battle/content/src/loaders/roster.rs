//! Unit roster loader.

use std::path::Path;

use battle_core::{
    AbilityId, AttributeBonuses, CoreAttributes, HexCell, TeamId, Unit, UnitId,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_ROSTER: &str = include_str!("../../data/units.ron");

/// Authored description of one combatant.
///
/// Health starts full and stride starts refilled; mitigation, stride and
/// charges fall back to the core defaults when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub id: u32,
    pub name: String,
    pub team: u8,
    pub cell: HexCell,
    pub strength: i32,
    pub dexterity: i32,
    pub intellect: i32,
    pub faith: i32,
    pub max_health: u32,
    #[serde(default)]
    pub armor: f64,
    #[serde(default)]
    pub ward: f64,
    #[serde(default = "default_stride")]
    pub stride: u32,
    #[serde(default = "default_charges")]
    pub charges: u32,
    #[serde(default)]
    pub bonuses: AttributeBonuses,
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
}

fn default_stride() -> u32 {
    CoreAttributes::DEFAULT_STRIDE
}

fn default_charges() -> u32 {
    Unit::DEFAULT_CHARGES
}

impl UnitTemplate {
    /// Instantiate the template as a fresh unit.
    pub fn spawn(&self) -> Unit {
        let core = CoreAttributes::new(
            self.strength,
            self.dexterity,
            self.intellect,
            self.faith,
            self.max_health,
        )
        .with_mitigation(self.armor, self.ward)
        .with_stride(self.stride);

        Unit::new(UnitId(self.id), self.name.clone(), TeamId(self.team), core)
            .at(self.cell)
            .with_bonuses(self.bonuses.clone())
            .with_abilities(self.abilities.iter().cloned())
            .with_charges(self.charges)
    }
}

/// Roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub units: Vec<UnitTemplate>,
}

/// Loader for unit rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<UnitTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a roster, rejecting duplicate unit ids.
    pub fn parse(content: &str) -> LoadResult<Vec<UnitTemplate>> {
        let roster: Roster = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        for (index, unit) in roster.units.iter().enumerate() {
            if roster.units[..index].iter().any(|other| other.id == unit.id) {
                anyhow::bail!("Duplicate unit id {} in roster", unit.id);
            }
        }

        Ok(roster.units)
    }

    /// The default skirmish roster shipped with the crate.
    pub fn embedded() -> LoadResult<Vec<UnitTemplate>> {
        Self::parse(EMBEDDED_ROSTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_roster_has_two_teams() {
        let roster = RosterLoader::embedded().unwrap();
        assert!(roster.iter().any(|u| u.team == 0));
        assert!(roster.iter().any(|u| u.team == 1));
    }

    #[test]
    fn spawn_applies_template_defaults() {
        let roster = RosterLoader::parse(
            r#"(units: [(
                id: 7,
                name: "Scout",
                team: 1,
                cell: (q: 2, r: -1),
                strength: 8,
                dexterity: 16,
                intellect: 8,
                faith: 8,
                max_health: 60,
                abilities: ["strike"],
            )])"#,
        )
        .unwrap();

        let unit = roster[0].spawn();
        assert_eq!(unit.id, UnitId(7));
        assert_eq!(unit.team, TeamId(1));
        assert_eq!(unit.cell, HexCell::new(2, -1));
        assert_eq!(unit.core.health, 60);
        assert_eq!(unit.core.stride, CoreAttributes::DEFAULT_STRIDE);
        assert_eq!(unit.core.armor, 0.0);
        assert_eq!(unit.charges, Unit::DEFAULT_CHARGES);
        assert!(unit.knows(&"strike".into()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let unit = r#"(id: 1, name: "A", team: 0, cell: (q: 0, r: 0),
            strength: 1, dexterity: 1, intellect: 1, faith: 1, max_health: 1)"#;
        let err = RosterLoader::parse(&format!("(units: [{unit}, {unit}])")).unwrap_err();
        assert!(err.to_string().contains("Duplicate unit id 1"));
    }
}
