//! Core attributes - the unit's raw stat block.
//!
//! Core attributes are the single source of truth for a unit's primary stats,
//! health, mitigation and movement budget. Everything combat-facing is derived
//! from them on demand (see [`super::DerivedAttributes`]).

/// Raw stat block owned exclusively by one unit.
///
/// - **Strength / Dexterity / Intellect / Faith**: primary stats, read by
///   [`crate::ScalingMatrix`] to compute bonus damage
/// - **Health**: current and maximum hit points
/// - **Armor / Ward**: physical and magical mitigation fractions in `[0, 1]`
/// - **Stride**: hex steps left this turn, refilled to `max_stride` at turn start
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreAttributes {
    pub strength: i32,
    pub dexterity: i32,
    pub intellect: i32,
    pub faith: i32,
    pub health: u32,
    pub max_health: u32,
    pub armor: f64,
    pub ward: f64,
    pub stride: u32,
    pub max_stride: u32,
}

impl CoreAttributes {
    /// Creates a stat block at full health with a full stride.
    pub fn new(strength: i32, dexterity: i32, intellect: i32, faith: i32, max_health: u32) -> Self {
        Self {
            strength,
            dexterity,
            intellect,
            faith,
            health: max_health,
            max_health,
            armor: 0.0,
            ward: 0.0,
            stride: Self::DEFAULT_STRIDE,
            max_stride: Self::DEFAULT_STRIDE,
        }
    }

    pub const DEFAULT_STRIDE: u32 = 3;

    pub fn with_mitigation(mut self, armor: f64, ward: f64) -> Self {
        self.armor = armor;
        self.ward = ward;
        self
    }

    pub fn with_stride(mut self, max_stride: u32) -> Self {
        self.stride = max_stride;
        self.max_stride = max_stride;
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Hit points below maximum.
    pub fn missing_health(&self) -> u32 {
        self.max_health.saturating_sub(self.health)
    }

    /// Removes health, clamped at zero. Returns the amount actually removed.
    pub fn lose_health(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// Restores health, clamped at maximum. Returns the amount actually restored.
    pub fn restore_health(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.missing_health());
        self.health += restored;
        restored
    }

    /// Spends up to `steps` stride. Returns the amount actually spent.
    pub fn spend_stride(&mut self, steps: u32) -> u32 {
        let spent = steps.min(self.stride);
        self.stride -= spent;
        spent
    }

    pub fn refill_stride(&mut self) {
        self.stride = self.max_stride;
    }

    pub fn drain_stride(&mut self) {
        self.stride = 0;
    }
}

impl Default for CoreAttributes {
    /// Average combatant: all primary stats 10, 100 health, no mitigation.
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 100)
    }
}
