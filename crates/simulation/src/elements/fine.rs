//! Fine particle: falls straight down, else slides diagonally down.

use crate::api::CellApi;
use crate::rng::SimRng;

/// Diagonal offsets in a freshly shuffled order.
fn diagonals<R: SimRng + ?Sized>(rng: &mut R) -> [i32; 2] {
    if rng.coin_flip() {
        [-1, 1]
    } else {
        [1, -1]
    }
}

/// One gravity step. Returns whether the particle moved.
pub fn update_fine<R: SimRng + ?Sized>(api: &mut CellApi, rng: &mut R) -> bool {
    if api.move_to(1, 0) {
        return true;
    }
    diagonals(rng).into_iter().any(|dc| api.move_to(1, dc))
}

/// Gravity step while the gate is open: the bottom row is an exit.
pub fn update_fine_draining<R: SimRng + ?Sized>(api: &mut CellApi, rng: &mut R) -> bool {
    if api.is_bottom_row() {
        api.remove();
        return true;
    }
    update_fine(api, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dump, parse, seeded};
    use rand::rngs::mock::StepRng;

    fn step_at(grid: &mut crate::Grid, row: i32, col: i32, rng: &mut impl SimRng) -> bool {
        let mut api = CellApi::new(grid, row, col);
        update_fine(&mut api, rng)
    }

    #[test]
    fn falls_straight_when_below_is_free() {
        let mut grid = parse(&[".o.", "...", "..."]);
        assert!(step_at(&mut grid, 0, 1, &mut seeded(1)));
        assert_eq!(dump(&grid), "...\n.o.\n...\n");
    }

    #[test]
    fn slides_to_the_only_free_diagonal() {
        for seed in 0..16 {
            let mut grid = parse(&[".o.", "#o.", "###"]);
            assert!(step_at(&mut grid, 0, 1, &mut seeded(seed)));
            assert_eq!(dump(&grid), "...\n#oo\n###\n");
        }
    }

    #[test]
    fn stays_when_boxed_in() {
        let mut grid = parse(&[".o.", "#o#", "###"]);
        assert!(!step_at(&mut grid, 0, 1, &mut seeded(5)));
        assert_eq!(dump(&grid), ".o.\n#o#\n###\n");
    }

    #[test]
    fn grid_edge_blocks_diagonal() {
        let mut grid = parse(&["o.", "o."]);
        let mut rng = seeded(2);
        assert!(step_at(&mut grid, 0, 0, &mut rng));
        assert_eq!(dump(&grid), "..\noo\n");
    }

    #[test]
    fn tie_break_follows_the_rng() {
        // StepRng(0, 0) always yields zero: coin_flip is false, so right goes first.
        let mut grid = parse(&[".o.", ".#.", "..."]);
        assert!(step_at(&mut grid, 0, 1, &mut StepRng::new(0, 0)));
        assert_eq!(dump(&grid), "...\n.#o\n...\n");

        // High bit set: coin_flip is true, so left goes first.
        let mut grid = parse(&[".o.", ".#.", "..."]);
        assert!(step_at(&mut grid, 0, 1, &mut StepRng::new(u64::MAX, 0)));
        assert_eq!(dump(&grid), "...\no#.\n...\n");
    }

    #[test]
    fn draining_removes_at_floor() {
        let mut grid = parse(&["...", ".o."]);
        let mut api = CellApi::new(&mut grid, 1, 1);
        assert!(update_fine_draining(&mut api, &mut seeded(0)));
        assert_eq!(grid.particle_count(), 0);
    }

    #[test]
    fn draining_falls_above_floor() {
        let mut grid = parse(&[".o.", "...", "..."]);
        let mut api = CellApi::new(&mut grid, 0, 1);
        assert!(update_fine_draining(&mut api, &mut seeded(0)));
        assert_eq!(dump(&grid), "...\n.o.\n...\n");
    }
}
