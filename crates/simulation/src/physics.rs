//! Gravity sweeps over the grid.
//!
//! Rows are scanned bottom-up, so a particle that falls lands in a row that
//! has already been visited this pass and cannot move again until the next
//! pass. The correctness of the single-move bound depends on this order.

use crate::api::CellApi;
use crate::elements;
use crate::rng::SimRng;
use crate::Grid;

fn columns(cols: i32, ascending: bool) -> Box<dyn Iterator<Item = i32>> {
    if ascending {
        Box::new(0..cols)
    } else {
        Box::new((0..cols).rev())
    }
}

/// Advance every fine particle by at most one cell.
///
/// Visits rows from the second-to-last up to the first; the bottom row is a
/// sink. Column direction alternates with row parity: ascending on even rows,
/// descending on odd. Returns the number of particles that moved.
pub fn sweep<R: SimRng + ?Sized>(grid: &mut Grid, rng: &mut R) -> usize {
    let rows = grid.rows() as i32;
    let cols = grid.cols() as i32;
    let mut moved = 0;

    for row in (0..rows - 1).rev() {
        for col in columns(cols, row % 2 == 0) {
            let Some(particle) = grid.get(row, col) else {
                continue;
            };
            let mut api = CellApi::new(grid, row, col);
            if elements::update_cell(particle, &mut api, rng) {
                moved += 1;
            }
        }
    }
    moved
}

/// One drain pass over rows `line_row..rows`, bottom-up, columns ascending.
///
/// Fine particles on the bottom row are deleted; the rest follow the ordinary
/// gravity rule confined to the drain region. Returns the number of particles
/// removed from the grid.
pub fn drain_sweep<R: SimRng + ?Sized>(grid: &mut Grid, line_row: usize, rng: &mut R) -> usize {
    let rows = grid.rows() as i32;
    let cols = grid.cols() as i32;
    let line_row = line_row as i32;
    let before = grid.particle_count();

    for row in (line_row..rows).rev() {
        for col in columns(cols, true) {
            let Some(particle) = grid.get(row, col) else {
                continue;
            };
            let mut api = CellApi::new(grid, row, col);
            elements::update_cell_draining(particle, &mut api, rng);
        }
    }
    before - grid.particle_count()
}
