//! Square brush edits: paint fine particles, paint obstacles, or erase.

use std::fmt;

use crate::particle::ParticleKind;
use crate::rng::SimRng;
use crate::Grid;

pub const BRUSH_MIN: usize = 1;
pub const BRUSH_MAX: usize = 10;
pub const BRUSH_DEFAULT: usize = 3;

/// Discriminants are the values the JS side sends. Do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum BrushMode {
    Erase = 0,
    #[default]
    Fine = 1,
    Obstacle = 2,
}

impl BrushMode {
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Erase),
            1 => Some(Self::Fine),
            2 => Some(Self::Obstacle),
            _ => None,
        }
    }

    /// Particle kind painted by this mode, if any.
    #[must_use]
    pub fn kind(self) -> Option<ParticleKind> {
        match self {
            Self::Fine => Some(ParticleKind::Fine),
            Self::Obstacle => Some(ParticleKind::Obstacle),
            Self::Erase => None,
        }
    }
}

impl fmt::Display for BrushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Erase => write!(f, "Erase"),
            Self::Fine => write!(f, "Fine"),
            Self::Obstacle => write!(f, "Obstacle"),
        }
    }
}

/// Apply `mode` to the `size × size` square with top-left corner `(row, col)`.
///
/// Fine cells are placed with `fine_probability` each; obstacles always land on
/// empty cells; erase clears whatever is there. Out-of-bounds cells are
/// skipped. Returns the number of cells changed.
pub fn apply_brush<R: SimRng + ?Sized>(
    grid: &mut Grid,
    row: i32,
    col: i32,
    mode: BrushMode,
    size: usize,
    fine_probability: f32,
    rng: &mut R,
) -> usize {
    let size = size as i32;
    let mut changed = 0;
    for dr in 0..size {
        for dc in 0..size {
            let (r, c) = (row + dr, col + dc);
            let hit = match mode.kind() {
                None => {
                    let occupied = grid.get(r, c).is_some();
                    grid.remove(r, c);
                    occupied
                }
                Some(ParticleKind::Fine) => {
                    grid.is_empty(r, c)
                        && rng.chance(fine_probability)
                        && grid.try_add(r, c, ParticleKind::Fine, rng)
                }
                Some(ParticleKind::Obstacle) => grid.try_add(r, c, ParticleKind::Obstacle, rng),
            };
            if hit {
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dump, fine, obstacle, seeded};

    #[test]
    fn mode_round_trips_through_u8() {
        for mode in [BrushMode::Erase, BrushMode::Fine, BrushMode::Obstacle] {
            assert_eq!(BrushMode::from_u8(mode as u8), Some(mode));
        }
        assert_eq!(BrushMode::from_u8(7), None);
        assert_eq!(BrushMode::default(), BrushMode::Fine);
    }

    #[test]
    fn obstacle_brush_fills_square() {
        let mut grid = Grid::new(4, 4);
        let changed = apply_brush(&mut grid, 1, 1, BrushMode::Obstacle, 2, 0.15, &mut seeded(0));
        assert_eq!(changed, 4);
        assert_eq!(dump(&grid), "....\n.##.\n.##.\n....\n");
    }

    #[test]
    fn obstacle_brush_does_not_overwrite() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 0, fine());
        let changed = apply_brush(&mut grid, 0, 0, BrushMode::Obstacle, 2, 0.15, &mut seeded(0));
        assert_eq!(changed, 3);
        assert_eq!(grid.get(0, 0), Some(fine()));
    }

    #[test]
    fn brush_clips_at_edges() {
        let mut grid = Grid::new(3, 3);
        let changed = apply_brush(&mut grid, 2, 2, BrushMode::Obstacle, 3, 0.15, &mut seeded(0));
        assert_eq!(changed, 1);
        let changed = apply_brush(&mut grid, -1, -1, BrushMode::Obstacle, 2, 0.15, &mut seeded(0));
        assert_eq!(changed, 1);
        assert_eq!(dump(&grid), "#..\n...\n..#\n");
    }

    #[test]
    fn erase_clears_both_kinds() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 0, fine());
        grid.set(1, 1, obstacle());
        grid.set(2, 2, fine());
        let changed = apply_brush(&mut grid, 0, 0, BrushMode::Erase, 2, 0.15, &mut seeded(0));
        assert_eq!(changed, 2);
        assert_eq!(dump(&grid), "...\n...\n..o\n");
    }

    #[test]
    fn fine_brush_respects_probability() {
        let mut grid = Grid::new(100, 100);
        let always = apply_brush(&mut grid, 0, 0, BrushMode::Fine, 10, 1.0, &mut seeded(0));
        assert_eq!(always, 100);
        let never = apply_brush(&mut grid, 50, 50, BrushMode::Fine, 10, 0.0, &mut seeded(0));
        assert_eq!(never, 0);
        assert_eq!(grid.particle_count(), 100);
    }
}
