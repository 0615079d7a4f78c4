//! Combat result type and attack resolution.

use crate::config::CombatRules;
use crate::rng::RandomSource;
use crate::stats::CombatantSnapshot;

use super::damage::{DamageConfig, calculate_damage};
use super::hit::check_hit;

/// Outcome of one resolved attack. Produced once, never mutated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub is_hit: bool,
    pub is_critical: bool,
    pub final_damage: u32,
}

impl CombatResult {
    /// A missed attack: no damage, never critical.
    pub const MISS: Self = Self {
        is_hit: false,
        is_critical: false,
        final_damage: 0,
    };
}

/// Resolve an attack under the standard [`CombatRules`].
///
/// See [`resolve_with_rules`].
pub fn resolve(
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    config: &DamageConfig,
    rng: &mut (impl RandomSource + ?Sized),
) -> CombatResult {
    resolve_with_rules(attacker, defender, config, &CombatRules::STANDARD, rng)
}

/// Resolve a complete attack: hit check, critical check, variance, damage.
///
/// Draw order is fixed so the result is reproducible for a given draw
/// sequence:
///
/// 1. hit roll in `[0, ceiling)`; a miss returns immediately without
///    consuming further draws
/// 2. critical roll in `[0, 1)`
/// 3. variance roll in `[1 - variance, 1 + variance]`, only when `variance > 0`
///
/// ```text
/// final = round((final_phys + final_mag) × crit_mult × variance)
/// if final < minimum and raw_phys + raw_mag > 0: final = minimum
/// ```
pub fn resolve_with_rules(
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    config: &DamageConfig,
    rules: &CombatRules,
    rng: &mut (impl RandomSource + ?Sized),
) -> CombatResult {
    // 1. Hit check
    let roll = rng.range(0.0, rules.hit_roll_ceiling);
    if !check_hit(
        attacker.derived.accuracy,
        defender.derived.evasion,
        roll,
        rules,
    ) {
        return CombatResult::MISS;
    }

    // 2. Critical check
    let is_critical = rng.unit() < attacker.derived.crit_chance;
    let crit_multiplier = if is_critical {
        attacker.derived.crit_multiplier
    } else {
        1.0
    };

    // 3. Variance
    let variance = if config.variance > 0.0 {
        rng.range(1.0 - config.variance, 1.0 + config.variance)
    } else {
        1.0
    };

    // 4-5. Physical and magical damage after mitigation
    let breakdown = calculate_damage(attacker, defender, config);

    // 6. Combine
    let total = (breakdown.mitigated_total() * crit_multiplier * variance).max(0.0);
    let mut final_damage = total.round() as u32;

    // 7. Chip damage floor
    if final_damage < rules.minimum_damage && breakdown.raw_total() > 0.0 {
        final_damage = rules.minimum_damage;
    }

    CombatResult {
        is_hit: true,
        is_critical,
        final_damage,
    }
}
