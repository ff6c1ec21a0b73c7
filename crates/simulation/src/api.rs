//! Relative-offset API for per-kind update rules.

use crate::particle::Particle;
use crate::Grid;

/// View of the grid centred on the particle being updated.
///
/// Offsets are `(dr, dc)`: positive `dr` is down, positive `dc` is right.
/// Out-of-bounds targets read as occupied, so rules treat edges as walls.
#[derive(Debug)]
pub struct CellApi<'a> {
    pub grid: &'a mut Grid,
    pub row: i32,
    pub col: i32,
}

impl<'a> CellApi<'a> {
    pub fn new(grid: &'a mut Grid, row: i32, col: i32) -> Self {
        Self { grid, row, col }
    }

    #[must_use]
    pub fn get(&self, dr: i32, dc: i32) -> Option<Particle> {
        self.grid.get(self.row + dr, self.col + dc)
    }

    #[must_use]
    pub fn is_empty(&self, dr: i32, dc: i32) -> bool {
        self.grid.is_empty(self.row + dr, self.col + dc)
    }

    /// Relocate the centre particle: place at the target, then clear the
    /// origin. No-op if the centre is empty or the target is not empty.
    pub fn move_to(&mut self, dr: i32, dc: i32) -> bool {
        let Some(me) = self.get(0, 0) else {
            return false;
        };
        if !self.is_empty(dr, dc) {
            return false;
        }
        self.grid.set(self.row + dr, self.col + dc, me);
        self.grid.remove(self.row, self.col);
        true
    }

    /// Delete the centre particle.
    pub fn remove(&mut self) {
        self.grid.remove(self.row, self.col);
    }

    #[must_use]
    pub fn is_bottom_row(&self) -> bool {
        self.row + 1 >= self.grid.rows() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fine, obstacle};
    use proptest::prelude::*;

    #[test]
    fn move_to_relocates_without_duplicating() {
        let mut grid = Grid::new(4, 4);
        grid.set(1, 1, fine());
        let mut api = CellApi::new(&mut grid, 1, 1);
        assert!(api.move_to(1, 1));
        assert_eq!(grid.get(1, 1), None);
        assert_eq!(grid.get(2, 2), Some(fine()));
        assert_eq!(grid.particle_count(), 1);
    }

    #[test]
    fn move_to_refuses_occupied_target() {
        let mut grid = Grid::new(4, 4);
        grid.set(1, 1, fine());
        grid.set(2, 1, obstacle());
        let mut api = CellApi::new(&mut grid, 1, 1);
        assert!(!api.move_to(1, 0));
        assert_eq!(grid.get(1, 1), Some(fine()));
        assert_eq!(grid.get(2, 1), Some(obstacle()));
    }

    #[test]
    fn move_to_from_empty_centre_is_noop() {
        let mut grid = Grid::new(4, 4);
        let mut api = CellApi::new(&mut grid, 0, 0);
        assert!(!api.move_to(1, 0));
        assert_eq!(grid.particle_count(), 0);
    }

    #[test]
    fn bottom_row_detection() {
        let mut grid = Grid::new(4, 4);
        assert!(CellApi::new(&mut grid, 3, 0).is_bottom_row());
        assert!(!CellApi::new(&mut grid, 2, 0).is_bottom_row());
    }

    proptest! {
        #[test]
        fn prop_cellapi_out_of_bounds_reads_as_wall(
            row in 0i32..16,
            col in 0i32..16,
            dr in -32i32..32,
            dc in -32i32..32,
        ) {
            prop_assume!(!(0..16).contains(&(row + dr)) || !(0..16).contains(&(col + dc)));

            let mut grid = Grid::new(16, 16);
            grid.set(row, col, fine());
            let before = grid.cells().to_vec();

            let mut api = CellApi::new(&mut grid, row, col);
            prop_assert!(!api.is_empty(dr, dc));
            prop_assert_eq!(api.get(dr, dc), None);
            prop_assert!(!api.move_to(dr, dc));
            prop_assert_eq!(api.grid.cells(), before.as_slice());
        }
    }
}
