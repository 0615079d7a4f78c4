//! Authored status definitions.
//!
//! A [`StatusDefinition`] is immutable once loaded and shared (via `Arc`) by
//! every [`super::RuntimeStatus`] instantiated from it. Per-variant behavior
//! lives on [`StatusEffect`]; the stacking and decay switches are shared by
//! all variants.

use std::borrow::Cow;
use std::fmt;

/// Stable identifier of a status definition (e.g. `"erosion"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusId(pub Cow<'static, str>);

impl StatusId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for StatusId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for StatusId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags carried by [`StatusEffect::Marker`] statuses.
///
/// Markers have no tick behavior; other systems query them to unlock
/// alternate rules.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MarkerTag {
    /// Movement may ignore the per-turn stride budget.
    Sprint,
    /// Grants an extra ability charge at turn start.
    Haste,
}

/// Default incoming-damage multiplier for [`StatusEffect::Scar`].
pub const SCAR_VULNERABILITY: f64 = 1.2;

#[cfg(feature = "serde")]
fn default_vulnerability() -> f64 {
    SCAR_VULNERABILITY
}

/// Per-variant behavior of a status.
///
/// | Variant | Turn-start damage | Decay | Damage modifier |
/// |---------|-------------------|-------|-----------------|
/// | Erosion | `stacks` | −1 | - |
/// | Scar | `⌊stacks × pct × missing⌋`, min 1 | −1 | `× vulnerability` |
/// | Cinder | `⌊stacks × pct × current⌋`, min 1 | halve | - |
/// | Marker | - | - | - |
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(StatusKind))]
#[strum_discriminants(derive(Hash, strum::Display, strum::EnumString))]
#[strum_discriminants(strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffect {
    /// Flat damage-over-time equal to the stack count.
    Erosion,

    /// Damage scaling with missing health; amplifies incoming damage.
    Scar {
        percent_missing_per_stack: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_vulnerability"))]
        vulnerability: f64,
    },

    /// Damage scaling with current health; stacks halve on decay.
    Cinder { percent_current_per_stack: f64 },

    /// Inert tag queried by other systems.
    Marker { tag: MarkerTag },
}

impl StatusEffect {
    pub fn scar(percent_missing_per_stack: f64) -> Self {
        Self::Scar {
            percent_missing_per_stack,
            vulnerability: SCAR_VULNERABILITY,
        }
    }

    pub fn cinder(percent_current_per_stack: f64) -> Self {
        Self::Cinder {
            percent_current_per_stack,
        }
    }

    pub fn kind(&self) -> StatusKind {
        StatusKind::from(self)
    }

    /// Damage dealt by the turn-start hook for the given stack count.
    ///
    /// `current` and `missing` are the bearer's health at the time of the tick.
    pub fn turn_start_damage(&self, stacks: u32, current: u32, missing: u32) -> u32 {
        match *self {
            Self::Erosion => stacks,
            Self::Scar {
                percent_missing_per_stack,
                ..
            } => {
                if missing == 0 {
                    return 0;
                }
                let damage =
                    (stacks as f64 * percent_missing_per_stack * missing as f64).floor() as u32;
                damage.max(1)
            }
            Self::Cinder {
                percent_current_per_stack,
            } => {
                let percent = stacks as f64 * percent_current_per_stack;
                if stacks == 0 || percent <= 0.0 {
                    return 0;
                }
                let damage = (percent * current as f64).floor() as u32;
                damage.max(1)
            }
            Self::Marker { .. } => 0,
        }
    }

    /// Stack count after one decay step.
    pub fn decayed_stacks(&self, stacks: u32) -> u32 {
        match self {
            Self::Erosion | Self::Scar { .. } => stacks.saturating_sub(1),
            Self::Cinder { .. } => stacks / 2,
            Self::Marker { .. } => stacks,
        }
    }

    /// Whether this variant participates in stack decay at all.
    pub fn decays(&self) -> bool {
        !matches!(self, Self::Marker { .. })
    }

    /// Whether remaining duration ticks down at turn end.
    pub fn consumes_duration(&self) -> bool {
        !matches!(self, Self::Cinder { .. })
    }

    /// Incoming-damage hook. Identity for every variant except Scar.
    pub fn modify_incoming(&self, damage: u32) -> u32 {
        match *self {
            Self::Scar { vulnerability, .. } => (damage as f64 * vulnerability).round() as u32,
            _ => damage,
        }
    }

    pub fn marker(&self) -> Option<MarkerTag> {
        match *self {
            Self::Marker { tag } => Some(tag),
            _ => None,
        }
    }
}

/// Immutable authored status, shared by every runtime instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusDefinition {
    pub id: StatusId,
    pub name: String,
    /// Decay right after the turn-start tick when set, at turn end otherwise.
    #[cfg_attr(feature = "serde", serde(default))]
    pub decrease_stack_at_start: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u32,
    /// Turns the status lasts; `None` lasts until its stacks run out.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<u32>,
    pub effect: StatusEffect,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u32 {
    StatusDefinition::DEFAULT_MAX_STACKS
}

impl StatusDefinition {
    pub const DEFAULT_MAX_STACKS: u32 = 99;

    pub fn new(id: impl Into<StatusId>, effect: StatusEffect) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            decrease_stack_at_start: false,
            max_stacks: Self::DEFAULT_MAX_STACKS,
            duration: None,
            effect,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn decaying_at_start(mut self, at_start: bool) -> Self {
        self.decrease_stack_at_start = at_start;
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks;
        self
    }

    pub fn with_duration(mut self, turns: u32) -> Self {
        self.duration = Some(turns);
        self
    }

    pub fn kind(&self) -> StatusKind {
        self.effect.kind()
    }
}
