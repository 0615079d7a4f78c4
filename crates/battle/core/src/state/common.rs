use std::fmt;

/// Stable identifier for a unit for the lifetime of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side a unit fights for. The battle ends when one team remains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Hex cell in axial coordinates (pointy-top layout).
///
/// The implicit third cube coordinate is `s = -q - r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexCell {
    pub q: i32,
    pub r: i32,
}

impl HexCell {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    /// Axial offsets of the six neighbors, clockwise from east.
    pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Returns the six adjacent cells.
    pub fn neighbors(self) -> [HexCell; 6] {
        Self::DIRECTIONS.map(|(dq, dr)| HexCell::new(self.q + dq, self.r + dr))
    }

    /// Number of steps between two cells on an unobstructed grid.
    pub fn distance(self, other: HexCell) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    pub fn is_adjacent(self, other: HexCell) -> bool {
        self.distance(other) == 1
    }

    /// Every cell within `radius` steps, including `self`, in ring order.
    pub fn within(self, radius: u32) -> Vec<HexCell> {
        let radius = radius as i32;
        let mut cells = Vec::new();
        for dq in -radius..=radius {
            let lo = (-radius).max(-dq - radius);
            let hi = radius.min(-dq + radius);
            for dr in lo..=hi {
                cells.push(HexCell::new(self.q + dq, self.r + dr));
            }
        }
        cells.sort_by_key(|cell| (self.distance(*cell), *cell));
        cells
    }
}

impl fmt::Display for HexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_are_adjacent() {
        let center = HexCell::new(2, -1);
        for neighbor in center.neighbors() {
            assert!(center.is_adjacent(neighbor));
            assert_eq!(neighbor.distance(center), 1);
        }
    }

    #[test]
    fn distance_uses_cube_metric() {
        assert_eq!(HexCell::ORIGIN.distance(HexCell::new(3, 0)), 3);
        assert_eq!(HexCell::ORIGIN.distance(HexCell::new(2, -3)), 3);
        assert_eq!(HexCell::ORIGIN.distance(HexCell::new(-2, 1)), 2);
        assert!(!HexCell::ORIGIN.is_adjacent(HexCell::ORIGIN));
        assert!(!HexCell::ORIGIN.is_adjacent(HexCell::new(1, 1)));
    }

    #[test]
    fn within_counts_hexagonal_area() {
        assert_eq!(HexCell::ORIGIN.within(0), vec![HexCell::ORIGIN]);
        assert_eq!(HexCell::ORIGIN.within(1).len(), 7);
        assert_eq!(HexCell::new(4, 4).within(2).len(), 19);
        assert_eq!(HexCell::new(4, 4).within(2)[0], HexCell::new(4, 4));
    }
}
