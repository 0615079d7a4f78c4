/// Tunable combat constants consumed by the resolver.
///
/// Defaults reproduce the standard rules: a flat 100% base hit chance shifted
/// by accuracy minus evasion, hit rolls drawn from `[0, 100)`, and a one point
/// chip-damage floor for any hit that carried base damage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRules {
    /// Hit chance before accuracy/evasion are applied.
    pub base_hit_chance: f64,
    /// Exclusive upper bound of the hit roll.
    pub hit_roll_ceiling: f64,
    /// Damage forced onto hits whose rounded total falls below it.
    pub minimum_damage: u32,
}

impl CombatRules {
    pub const STANDARD: Self = Self {
        base_hit_chance: 100.0,
        hit_roll_ceiling: 100.0,
        minimum_damage: 1,
    };
}

impl Default for CombatRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub combat: CombatRules,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum distinct statuses a single unit can carry.
    pub const MAX_STATUSES: usize = 16;
    /// Maximum units a single ability invocation may target.
    pub const MAX_TARGETS: usize = 32;

    pub fn new() -> Self {
        Self {
            combat: CombatRules::STANDARD,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
