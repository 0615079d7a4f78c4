//! Derived attributes - combat stats computed from core attributes.
//!
//! These are NOT stored - always recomputed from [`CoreAttributes`] plus the
//! flat bonuses granted by equipment and statuses.

use super::core::CoreAttributes;

/// Computed combat statistics ("recommended" stats).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedAttributes {
    /// Added to the base hit chance.
    pub accuracy: i32,
    /// Subtracted from the attacker's hit chance.
    pub evasion: i32,
    /// Probability in `[0, 1]` that a hit is critical.
    pub crit_chance: f64,
    /// Damage multiplier on critical hits (≥ 1).
    pub crit_multiplier: f64,
    /// Armor ignored by this unit's attacks, as a fraction.
    pub penetration_phys: f64,
    /// Ward ignored by this unit's attacks, as a fraction.
    pub penetration_mag: f64,
}

impl DerivedAttributes {
    pub const BASE_CRIT_CHANCE: f64 = 0.05;
    pub const CRIT_CHANCE_PER_FAITH: f64 = 0.005;
    pub const BASE_CRIT_MULTIPLIER: f64 = 1.5;

    /// Base formulas (before bonuses):
    /// - Accuracy: DEX
    /// - Evasion: DEX / 2
    /// - Crit chance: 5% + 0.5% per FAITH
    /// - Crit multiplier: 1.5
    /// - Penetration: none
    fn compute_base(core: &CoreAttributes) -> Self {
        Self {
            accuracy: core.dexterity,
            evasion: core.dexterity / 2,
            crit_chance: Self::BASE_CRIT_CHANCE + core.faith as f64 * Self::CRIT_CHANCE_PER_FAITH,
            crit_multiplier: Self::BASE_CRIT_MULTIPLIER,
            penetration_phys: 0.0,
            penetration_mag: 0.0,
        }
    }

    /// Compute derived attributes from core attributes and bonuses.
    pub fn compute(core: &CoreAttributes, bonuses: &AttributeBonuses) -> Self {
        let base = Self::compute_base(core);

        Self {
            accuracy: base.accuracy + bonuses.accuracy,
            evasion: base.evasion + bonuses.evasion,
            crit_chance: (base.crit_chance + bonuses.crit_chance).clamp(0.0, 1.0),
            crit_multiplier: (base.crit_multiplier + bonuses.crit_multiplier).max(1.0),
            penetration_phys: (base.penetration_phys + bonuses.penetration_phys).clamp(0.0, 1.0),
            penetration_mag: (base.penetration_mag + bonuses.penetration_mag).clamp(0.0, 1.0),
        }
    }

    /// Compute with no bonuses (core attributes only).
    pub fn from_core(core: &CoreAttributes) -> Self {
        Self::compute(core, &AttributeBonuses::default())
    }
}

/// Flat bonuses that apply to derived attributes.
///
/// Sources: equipment, passive traits, authored unit templates.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttributeBonuses {
    pub accuracy: i32,
    pub evasion: i32,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub penetration_phys: f64,
    pub penetration_mag: f64,
}

impl AttributeBonuses {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_formulas_follow_core_stats() {
        let core = CoreAttributes::new(10, 14, 10, 20, 100);
        let derived = DerivedAttributes::from_core(&core);

        assert_eq!(derived.accuracy, 14);
        assert_eq!(derived.evasion, 7);
        assert!((derived.crit_chance - 0.15).abs() < 1e-9);
        assert!((derived.crit_multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn bonuses_are_added_then_clamped() {
        let core = CoreAttributes::default();
        let bonuses = AttributeBonuses {
            accuracy: 5,
            crit_chance: 2.0,
            crit_multiplier: -3.0,
            penetration_phys: 0.25,
            penetration_mag: 1.5,
            ..AttributeBonuses::default()
        };
        let derived = DerivedAttributes::compute(&core, &bonuses);

        assert_eq!(derived.accuracy, 15);
        assert!((derived.crit_chance - 1.0).abs() < f64::EPSILON);
        assert!((derived.crit_multiplier - 1.0).abs() < f64::EPSILON);
        assert!((derived.penetration_phys - 0.25).abs() < f64::EPSILON);
        assert!((derived.penetration_mag - 1.0).abs() < f64::EPSILON);
    }
}
