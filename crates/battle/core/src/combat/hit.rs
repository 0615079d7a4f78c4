//! Hit chance and accuracy calculations.

use crate::config::CombatRules;

/// Calculate hit chance based on accuracy vs evasion.
///
/// # Formula
///
/// ```text
/// hit_chance = base + (accuracy - evasion)
/// ```
///
/// The result is intentionally unclamped: a chance at or above the roll
/// ceiling always hits, a chance at or below zero always misses.
pub fn calculate_hit_chance(accuracy: i32, evasion: i32, rules: &CombatRules) -> f64 {
    rules.base_hit_chance + (accuracy - evasion) as f64
}

/// Check a hit roll drawn from `[0, hit_roll_ceiling)`.
///
/// The attack misses when `roll >= hit_chance`.
pub fn check_hit(accuracy: i32, evasion: i32, roll: f64, rules: &CombatRules) -> bool {
    roll < calculate_hit_chance(accuracy, evasion, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_chance_shifts_with_accuracy_and_evasion() {
        let rules = CombatRules::STANDARD;
        assert_eq!(calculate_hit_chance(0, 0, &rules), 100.0);
        assert_eq!(calculate_hit_chance(10, 40, &rules), 70.0);
    }

    #[test]
    fn roll_at_hit_chance_misses() {
        let rules = CombatRules::STANDARD;
        assert!(check_hit(0, 30, 69.99, &rules));
        assert!(!check_hit(0, 30, 70.0, &rules));
        assert!(!check_hit(0, 200, 0.0, &rules));
    }
}
