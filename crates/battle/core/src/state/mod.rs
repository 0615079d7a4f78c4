//! Battle state: identities, hex coordinates and the unit aggregate.

pub mod common;
pub mod unit;

pub use common::{HexCell, TeamId, UnitId};
pub use unit::{DamageTaken, Unit};
