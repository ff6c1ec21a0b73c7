//! Perlite accumulation simulation engine.
//!
//! Fine particles fall and slide around obstacles on a fixed grid; a level
//! monitor drains the region below a configurable line once it is nearly
//! full. The UI layer drives [`Simulation::advance_tick`] once per frame and
//! reads the grid between ticks.

pub mod api;
pub mod brush;
pub mod clock;
pub mod config;
pub mod elements;
pub mod error;
pub mod level;
pub mod notice;
pub mod particle;
pub mod physics;
pub mod rng;
pub mod simulation;
pub mod spawn;
pub mod universe;

pub use brush::BrushMode;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LevelConfig, SimConfig, SpawnConfig};
pub use error::{ConfigError, SimError};
pub use notice::Notice;
pub use particle::{Particle, ParticleKind, Rgb};
pub use rng::SimRng;
pub use simulation::Simulation;
pub use universe::Universe;

/// 2D grid of optional particles addressed as `(row, col)`.
///
/// Every operation is total: out-of-bounds reads yield nothing, out-of-bounds
/// writes are no-ops, and out-of-bounds cells are never empty so edges act as
/// walls for the movement rules.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Particle>>,
}

impl Grid {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Grid covering a physical area split into square cells of `cell_size`.
    #[must_use]
    pub fn for_area(area_width: usize, area_height: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        Self::new(area_height / cell_size, area_width / cell_size)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major cell storage, for rendering.
    #[must_use]
    pub fn cells(&self) -> &[Option<Particle>] {
        &self.cells
    }

    #[must_use]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) < self.cols
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        self.in_bounds(row, col)
            .then(|| row as usize * self.cols + col as usize)
    }

    #[must_use]
    pub fn get(&self, row: i32, col: i32) -> Option<Particle> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// In bounds and unoccupied.
    #[must_use]
    pub fn is_empty(&self, row: i32, col: i32) -> bool {
        self.index(row, col).is_some_and(|i| self.cells[i].is_none())
    }

    pub fn set(&mut self, row: i32, col: i32, particle: Particle) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = Some(particle);
        }
    }

    pub fn remove(&mut self, row: i32, col: i32) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = None;
        }
    }

    /// Place a fresh particle of `kind` only if the cell is in bounds and empty.
    /// Returns whether a particle was placed.
    pub fn try_add<R: SimRng + ?Sized>(
        &mut self,
        row: i32,
        col: i32,
        kind: ParticleKind,
        rng: &mut R,
    ) -> bool {
        if !self.is_empty(row, col) {
            return false;
        }
        self.set(row, col, Particle::new(kind, rng));
        true
    }

    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    #[must_use]
    pub fn count_kind(&self, kind: ParticleKind) -> usize {
        self.cells
            .iter()
            .filter(|c| c.is_some_and(|p| p.kind() == kind))
            .count()
    }

    /// Occupied cells in row-major order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (i32, i32, Particle)> + '_ {
        let cols = self.cols;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|p| ((i / cols) as i32, (i % cols) as i32, p))
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("perlite-sim WASM module initialized");
}


#[cfg(test)]
mod tests {
    use super::test_support::{fine, obstacle, seeded};
    use super::*;
    use proptest::prelude::*;

    fn arb_particle() -> impl Strategy<Value = Particle> {
        prop_oneof![Just(fine()), Just(obstacle())]
    }

    #[test]
    fn grid_new_initializes_all_empty() {
        let grid = Grid::new(20, 30);
        assert_eq!(grid.rows(), 20);
        assert_eq!(grid.cols(), 30);
        assert_eq!(grid.cells().len(), 600);
        assert!(grid.cells().iter().all(Option::is_none));
        assert_eq!(grid.particle_count(), 0);
    }

    #[test]
    fn grid_for_area_uses_integer_division() {
        let grid = Grid::for_area(200, 600, 3);
        assert_eq!(grid.rows(), 200);
        assert_eq!(grid.cols(), 66);
        let grid = Grid::for_area(200, 600, 7);
        assert_eq!(grid.rows(), 85);
        assert_eq!(grid.cols(), 28);
    }

    #[test]
    fn grid_get_set_remove_in_bounds() {
        let mut grid = Grid::new(10, 10);
        grid.set(2, 3, fine());
        assert_eq!(grid.get(2, 3), Some(fine()));
        assert!(!grid.is_empty(2, 3));
        grid.set(2, 3, obstacle());
        assert_eq!(grid.get(2, 3), Some(obstacle()));
        grid.remove(2, 3);
        assert_eq!(grid.get(2, 3), None);
        assert!(grid.is_empty(2, 3));
    }

    #[test]
    fn grid_out_of_bounds_is_not_empty() {
        let grid = Grid::new(10, 10);
        assert!(!grid.is_empty(-1, 0));
        assert!(!grid.is_empty(0, -1));
        assert!(!grid.is_empty(10, 0));
        assert!(!grid.is_empty(0, 10));
        assert_eq!(grid.get(10, 10), None);
    }

    #[test]
    fn try_add_only_fills_empty_cells() {
        let mut grid = Grid::new(5, 5);
        let mut rng = seeded(3);
        assert!(grid.try_add(1, 1, ParticleKind::Obstacle, &mut rng));
        assert!(!grid.try_add(1, 1, ParticleKind::Fine, &mut rng));
        assert_eq!(grid.get(1, 1).map(Particle::kind), Some(ParticleKind::Obstacle));
        assert!(!grid.try_add(-1, 1, ParticleKind::Fine, &mut rng));
        assert!(!grid.try_add(1, 5, ParticleKind::Fine, &mut rng));
        assert_eq!(grid.particle_count(), 1);
    }

    #[test]
    fn clear_all_empties_every_cell() {
        let mut grid = Grid::new(4, 4);
        grid.set(0, 0, fine());
        grid.set(3, 3, obstacle());
        grid.clear_all();
        assert_eq!(grid.particle_count(), 0);
    }

    #[test]
    fn count_kind_and_iter_occupied() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 2, fine());
        grid.set(1, 0, fine());
        grid.set(2, 1, obstacle());
        assert_eq!(grid.count_kind(ParticleKind::Fine), 2);
        assert_eq!(grid.count_kind(ParticleKind::Obstacle), 1);
        let positions: Vec<(i32, i32)> = grid.iter_occupied().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(positions, vec![(0, 2), (1, 0), (2, 1)]);
    }

    proptest! {
        #[test]
        fn prop_grid_in_bounds_get_set_round_trip(
            row in 0i32..32,
            col in 0i32..24,
            particle in arb_particle(),
        ) {
            let mut grid = Grid::new(32, 24);
            grid.set(row, col, particle);
            prop_assert_eq!(grid.get(row, col), Some(particle));
            prop_assert_eq!(grid.particle_count(), 1);
        }
    }

    proptest! {
        #[test]
        fn prop_grid_out_of_bounds_is_total(
            row in prop_oneof![(-1000i32..0), (32i32..1000)],
            col in prop_oneof![(-1000i32..0), (24i32..1000)],
            particle in arb_particle(),
        ) {
            let mut grid = Grid::new(32, 24);
            grid.set(5, 5, fine());
            let before = grid.cells().to_vec();

            prop_assert!(!grid.is_empty(row, col));
            prop_assert_eq!(grid.get(row, col), None);

            grid.set(row, col, particle);
            grid.remove(row, col);
            prop_assert_eq!(grid.cells(), before.as_slice());
        }
    }
}
