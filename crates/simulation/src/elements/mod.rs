//! Per-kind update rules dispatched from the sweeps.

mod fine;

use crate::api::CellApi;
use crate::particle::Particle;
use crate::rng::SimRng;

/// Apply the ordinary gravity rule to the particle at the API's centre.
/// Obstacles never move. Returns whether anything changed.
pub fn update_cell<R: SimRng + ?Sized>(particle: Particle, api: &mut CellApi, rng: &mut R) -> bool {
    match particle {
        Particle::Fine { .. } => fine::update_fine(api, rng),
        Particle::Obstacle { .. } => false,
    }
}

/// Apply the drain rule: like [`update_cell`], but fine particles on the
/// bottom row leave the grid.
pub fn update_cell_draining<R: SimRng + ?Sized>(
    particle: Particle,
    api: &mut CellApi,
    rng: &mut R,
) -> bool {
    match particle {
        Particle::Fine { .. } => fine::update_fine_draining(api, rng),
        Particle::Obstacle { .. } => false,
    }
}
