//! Automatic spawning of fine particles along the top row.

use crate::config::SpawnConfig;
use crate::particle::ParticleKind;
use crate::rng::SimRng;
use crate::Grid;

pub const RATE_MIN: f32 = 0.0;
pub const RATE_MAX: f32 = 10.0;
pub const RATE_STEP: f32 = 0.2;

pub const BAND_MIN: usize = 5;
pub const BAND_STEP: usize = 2;

pub const CLUSTER_MIN: usize = 1;
pub const CLUSTER_MAX: usize = 10;

/// Chance that any one cell of a cluster or fine brush stroke gets a particle.
pub const FINE_SPAWN_PROBABILITY: f32 = 0.15;

fn round_tenth(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

/// Per-tick spawn policy: how many clusters, where, and how large.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnController {
    enabled: bool,
    rate: f32,
    band_width: usize,
    cluster_size: usize,
    fine_probability: f32,
}

impl Default for SpawnController {
    fn default() -> Self {
        Self::new(&SpawnConfig::default(), FINE_SPAWN_PROBABILITY)
    }
}

impl SpawnController {
    /// Values outside their ranges are clamped. The band is only floored
    /// here; its upper bound depends on the grid and is applied by the
    /// adjusting operations.
    #[must_use]
    pub fn new(config: &SpawnConfig, fine_probability: f32) -> Self {
        Self {
            enabled: config.enabled,
            rate: config.rate.clamp(RATE_MIN, RATE_MAX),
            band_width: config.band_width.max(BAND_MIN),
            cluster_size: config.cluster_size.clamp(CLUSTER_MIN, CLUSTER_MAX),
            fine_probability: fine_probability.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[must_use]
    pub fn band_width(&self) -> usize {
        self.band_width
    }

    #[must_use]
    pub fn cluster_size(&self) -> usize {
        self.cluster_size
    }

    #[must_use]
    pub fn fine_probability(&self) -> f32 {
        self.fine_probability
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Apply any provided values, clamped into range. `cols` bounds the band.
    pub fn configure(
        &mut self,
        rate: Option<f32>,
        band_width: Option<usize>,
        cluster_size: Option<usize>,
        cols: usize,
    ) {
        if let Some(rate) = rate {
            let clamped = if rate.is_nan() { RATE_MIN } else { rate.clamp(RATE_MIN, RATE_MAX) };
            if (clamped - rate).abs() > f32::EPSILON {
                log::warn!("spawn rate {rate} clamped to {clamped}");
            }
            self.rate = clamped;
        }
        if let Some(width) = band_width {
            self.band_width = width.clamp(BAND_MIN, cols.max(BAND_MIN));
        }
        if let Some(size) = cluster_size {
            self.cluster_size = size.clamp(CLUSTER_MIN, CLUSTER_MAX);
        }
        log::debug!(
            "spawn configured: rate={} band={} cluster={}",
            self.rate,
            self.band_width,
            self.cluster_size
        );
    }

    pub fn increase_rate(&mut self) -> f32 {
        self.rate = round_tenth(self.rate + RATE_STEP).min(RATE_MAX);
        self.rate
    }

    pub fn decrease_rate(&mut self) -> f32 {
        self.rate = round_tenth(self.rate - RATE_STEP).max(RATE_MIN);
        self.rate
    }

    pub fn increase_band(&mut self, cols: usize) -> usize {
        self.band_width = (self.band_width + BAND_STEP).min(cols.max(BAND_MIN));
        self.band_width
    }

    pub fn decrease_band(&mut self) -> usize {
        self.band_width = self.band_width.saturating_sub(BAND_STEP).max(BAND_MIN);
        self.band_width
    }

    pub fn increase_cluster(&mut self) -> usize {
        self.cluster_size = (self.cluster_size + 1).min(CLUSTER_MAX);
        self.cluster_size
    }

    pub fn decrease_cluster(&mut self) -> usize {
        self.cluster_size = self.cluster_size.saturating_sub(1).max(CLUSTER_MIN);
        self.cluster_size
    }

    #[must_use]
    pub fn is_full_width(&self, cols: usize) -> bool {
        self.band_width >= cols
    }

    /// Whole part of the rate is guaranteed; the fractional part is the
    /// chance of one extra spawn.
    pub fn compute_spawn_count<R: SimRng + ?Sized>(&self, rng: &mut R) -> usize {
        if !self.enabled {
            return 0;
        }
        let guaranteed = self.rate.trunc();
        let fraction = self.rate - guaranteed;
        let mut count = guaranteed as usize;
        if rng.chance(fraction) {
            count += 1;
        }
        count
    }

    /// Uniform column across the grid, or within a band centred on the
    /// midpoint when the band is narrower than the grid.
    pub fn compute_spawn_column<R: SimRng + ?Sized>(&self, cols: usize, rng: &mut R) -> i32 {
        let cols = cols as i32;
        if self.is_full_width(cols as usize) {
            return rng.pick_inclusive(0, cols - 1);
        }
        let centre = cols / 2;
        let half = self.band_width as i32 / 2;
        let left = (centre - half).max(0);
        let right = (centre + half).min(cols - 1);
        rng.pick_inclusive(left, right)
    }

    /// Run one tick of auto-spawn against the top row. Returns particles placed.
    pub fn spawn<R: SimRng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> usize {
        let clusters = self.compute_spawn_count(rng);
        let mut placed = 0;
        for _ in 0..clusters {
            let col = self.compute_spawn_column(grid.cols(), rng);
            placed += spawn_cluster(grid, 0, col, self.cluster_size, self.fine_probability, rng);
        }
        placed
    }
}

/// Sparse square of fine particles with its top-left corner at
/// `(top_row, start_col)`. Each empty in-bounds cell is filled with the given
/// probability. Returns particles placed.
pub fn spawn_cluster<R: SimRng + ?Sized>(
    grid: &mut Grid,
    top_row: i32,
    start_col: i32,
    size: usize,
    probability: f32,
    rng: &mut R,
) -> usize {
    let size = size as i32;
    let mut placed = 0;
    for dr in 0..size {
        for dc in 0..size {
            let (row, col) = (top_row + dr, start_col + dc);
            if grid.is_empty(row, col)
                && rng.chance(probability)
                && grid.try_add(row, col, ParticleKind::Fine, rng)
            {
                placed += 1;
            }
        }
    }
    placed
}
