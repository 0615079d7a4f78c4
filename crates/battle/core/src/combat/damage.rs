//! Damage configuration and mitigation.

use crate::stats::CombatantSnapshot;

use super::scaling::ScalingMatrix;

/// Authored damage profile of an attack or ability.
///
/// Read-only at resolution time.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageConfig {
    pub base_physical: f64,
    pub base_magical: f64,
    pub physical_scaling: ScalingMatrix,
    pub magical_scaling: ScalingMatrix,
    /// Fractional spread; `0.1` rolls a multiplier in `[0.9, 1.1]`.
    pub variance: f64,
}

impl DamageConfig {
    pub fn physical(base: f64) -> Self {
        Self {
            base_physical: base,
            ..Self::default()
        }
    }

    pub fn magical(base: f64) -> Self {
        Self {
            base_magical: base,
            ..Self::default()
        }
    }

    pub fn with_physical_scaling(mut self, scaling: ScalingMatrix) -> Self {
        self.physical_scaling = scaling;
        self
    }

    pub fn with_magical_scaling(mut self, scaling: ScalingMatrix) -> Self {
        self.magical_scaling = scaling;
        self
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = variance;
        self
    }
}

/// Physical and magical damage before and after mitigation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageBreakdown {
    pub raw_physical: f64,
    pub raw_magical: f64,
    pub final_physical: f64,
    pub final_magical: f64,
}

impl DamageBreakdown {
    pub fn raw_total(&self) -> f64 {
        self.raw_physical + self.raw_magical
    }

    pub fn mitigated_total(&self) -> f64 {
        self.final_physical + self.final_magical
    }
}

/// Fraction of damage removed by a defense value after penetration.
///
/// `clamp01(defense - penetration)`
pub fn mitigation(defense: f64, penetration: f64) -> f64 {
    (defense - penetration).clamp(0.0, 1.0)
}

/// Compute raw and mitigated damage for both channels.
///
/// # Formula
///
/// ```text
/// raw_phys   = base_physical + physical_scaling · attacker.core
/// final_phys = raw_phys × (1 - clamp01(defender.armor - attacker.penetration_phys))
/// raw_mag    = base_magical + magical_scaling · attacker.core
/// final_mag  = raw_mag × (1 - clamp01(defender.ward - attacker.penetration_mag))
/// ```
pub fn calculate_damage(
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    config: &DamageConfig,
) -> DamageBreakdown {
    let raw_physical = config.base_physical + config.physical_scaling.apply(&attacker.core);
    let def_physical = mitigation(defender.core.armor, attacker.derived.penetration_phys);

    let raw_magical = config.base_magical + config.magical_scaling.apply(&attacker.core);
    let def_magical = mitigation(defender.core.ward, attacker.derived.penetration_mag);

    DamageBreakdown {
        raw_physical,
        raw_magical,
        final_physical: raw_physical * (1.0 - def_physical),
        final_magical: raw_magical * (1.0 - def_magical),
    }
}
