use crate::stats::CoreAttributes;

/// Per-stat coefficients mapping a stat block to bonus damage.
///
/// `bonus = strength·s + dexterity·d + intellect·i + faith·f`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScalingMatrix {
    pub strength: f64,
    pub dexterity: f64,
    pub intellect: f64,
    pub faith: f64,
}

impl ScalingMatrix {
    pub const NONE: Self = Self {
        strength: 0.0,
        dexterity: 0.0,
        intellect: 0.0,
        faith: 0.0,
    };

    pub const fn new(strength: f64, dexterity: f64, intellect: f64, faith: f64) -> Self {
        Self {
            strength,
            dexterity,
            intellect,
            faith,
        }
    }

    /// Dot product of the coefficients with the attacker's primary stats.
    pub fn apply(&self, stats: &CoreAttributes) -> f64 {
        self.strength * stats.strength as f64
            + self.dexterity * stats.dexterity as f64
            + self.intellect * stats.intellect as f64
            + self.faith * stats.faith as f64
    }
}
