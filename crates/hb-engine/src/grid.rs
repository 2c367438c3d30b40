//! The hex occupancy map. Occupancy is updated atomically when a unit
//! moves.

use std::collections::HashMap;

use hb_types::{HexCoord, UnitId};

/// Fixed-size hex grid tracking which unit (if any) occupies each hex.
///
/// Width × height bounds are enforced at construction; occupancy itself is
/// a sparse map since most hexes are empty at any given tick.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    occupancy: HashMap<HexCoord, UnitId>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            occupancy: HashMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Offset-coordinate bounds check against the grid's fixed width/height.
    /// Axial `q`/`r` are translated the same way the hex
    /// module's own circle/cone helpers treat a bounded board: column `q`
    /// and row `r + (q - (q & 1)) / 2` must both land inside the rectangle.
    pub fn in_bounds(&self, hex: HexCoord) -> bool {
        let col = hex.q;
        let row = hex.r + (hex.q - (hex.q & 1)) / 2;
        col >= 0 && (col as u32) < self.width && row >= 0 && (row as u32) < self.height
    }

    pub fn is_occupied(&self, hex: HexCoord) -> bool {
        self.occupancy.contains_key(&hex)
    }

    pub fn occupant(&self, hex: HexCoord) -> Option<UnitId> {
        self.occupancy.get(&hex).copied()
    }

    pub fn is_free(&self, hex: HexCoord) -> bool {
        self.in_bounds(hex) && !self.is_occupied(hex)
    }

    /// Places a unit on a hex. Panics if the hex is already occupied — an
    /// `EngineError::OccupancyConflict` invariant violation, never an
    /// expected outcome.
    pub fn place(&mut self, hex: HexCoord, unit: UnitId) {
        let previous = self.occupancy.insert(hex, unit);
        assert!(
            previous.is_none(),
            "grid occupancy conflict at {hex:?}: already held by {previous:?}"
        );
    }

    pub fn remove(&mut self, hex: HexCoord) -> Option<UnitId> {
        self.occupancy.remove(&hex)
    }

    /// Moves a unit from `from` to `to` atomically: the old cell is cleared
    /// only after the new cell is claimed.
    pub fn move_unit(&mut self, from: HexCoord, to: HexCoord, unit: UnitId) {
        self.place(to, unit);
        self.occupancy.remove(&from);
    }

    pub fn neighbors_in_bounds(&self, hex: HexCoord) -> impl Iterator<Item = HexCoord> + '_ {
        hex.neighbors().into_iter().filter(|h| self.in_bounds(*h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_and_occupant_roundtrip() {
        let mut grid = Grid::new(8, 7);
        let hex = HexCoord::new(0, 0);
        grid.place(hex, UnitId::new(1));
        assert_eq!(grid.occupant(hex), Some(UnitId::new(1)));
        assert!(grid.is_occupied(hex));
    }

    #[test]
    fn move_unit_clears_origin() {
        let mut grid = Grid::new(8, 7);
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(1, 0);
        grid.place(a, UnitId::new(1));
        grid.move_unit(a, b, UnitId::new(1));
        assert!(!grid.is_occupied(a));
        assert_eq!(grid.occupant(b), Some(UnitId::new(1)));
    }

    #[test]
    #[should_panic(expected = "occupancy conflict")]
    fn placing_on_occupied_hex_panics() {
        let mut grid = Grid::new(8, 7);
        let hex = HexCoord::new(2, 2);
        grid.place(hex, UnitId::new(1));
        grid.place(hex, UnitId::new(2));
    }

    #[test]
    fn out_of_bounds_hex_is_not_free() {
        let grid = Grid::new(8, 7);
        assert!(!grid.is_free(HexCoord::new(-5, -5)));
        assert!(!grid.is_free(HexCoord::new(100, 100)));
    }
}
