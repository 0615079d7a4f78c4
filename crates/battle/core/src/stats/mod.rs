//! Stat system.
//!
//! ```text
//! [ CoreAttributes ]  stored, mutated by damage / heal / stride
//!        ↓
//! [ DerivedAttributes ]  computed on demand (+ AttributeBonuses)
//!        ↓
//! [ CombatantSnapshot ]  frozen per attack
//! ```

pub mod core;
pub mod derived;
pub mod snapshot;

pub use self::core::CoreAttributes;
pub use derived::{AttributeBonuses, DerivedAttributes};
pub use snapshot::CombatantSnapshot;
