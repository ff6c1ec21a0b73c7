//! Fill detection below the level line and the timed drain.
//!
//! The monitor is either idle or draining. It holds only configuration and
//! timers; every change to particles goes through the grid.

use std::time::Duration;

use crate::config::LevelConfig;
use crate::particle::{Particle, Rgb};
use crate::physics;
use crate::rng::SimRng;
use crate::Grid;

pub const LINE_MIN: f32 = 0.10;
pub const LINE_MAX: f32 = 0.90;
pub const LINE_STEP: f32 = 0.05;

/// Fill ratio below the line that opens the gate.
pub const FILL_THRESHOLD: f64 = 0.95;

/// Passes per tick reach this multiple of drain progress.
const MAX_PASS_FACTOR: f32 = 3.0;

const MIN_DRAIN_SECS: f32 = 0.01;
pub const MAX_DRAIN_SECS: f32 = 3600.0;

fn round_hundredth(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrainPhase {
    Idle,
    Draining { started: Duration },
}

/// Fine and available cell counts at or below the line.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Occupancy {
    /// Cells holding a fine particle.
    pub filled: usize,
    /// Cells that are empty or hold a fine particle. Obstacles count in neither.
    pub available: usize,
}

impl Occupancy {
    /// `None` when nothing below the line can hold a particle.
    #[must_use]
    pub fn ratio(self) -> Option<f64> {
        (self.available > 0).then(|| self.filled as f64 / self.available as f64)
    }
}

/// What one drain update did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrainStep {
    /// Not draining; nothing happened.
    Idle,
    /// Still draining: `passes` sweeps ran and `removed` particles exited.
    Progress { passes: usize, removed: usize },
    /// Duration elapsed: remaining fine particles below the line were cleared.
    Finished { removed: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelMonitor {
    active: bool,
    line_fraction: f32,
    phase: DrainPhase,
    remaining: Duration,
    drain_duration: Duration,
    line_color: Rgb,
    line_thickness: u32,
}

impl Default for LevelMonitor {
    fn default() -> Self {
        Self::new(&LevelConfig::default())
    }
}

impl LevelMonitor {
    #[must_use]
    pub fn new(config: &LevelConfig) -> Self {
        let mut monitor = Self {
            active: false,
            line_fraction: config.line_fraction.clamp(LINE_MIN, LINE_MAX),
            phase: DrainPhase::Idle,
            remaining: Duration::ZERO,
            drain_duration: Duration::from_secs(2),
            line_color: config.line_color,
            line_thickness: config.line_thickness,
        };
        monitor.configure(
            config.drain_duration_secs,
            config.line_color,
            config.line_thickness,
        );
        monitor
    }

    /// Set drain duration and line appearance. The duration is clamped to
    /// `[0.01, 3600]` seconds; NaN becomes the minimum.
    pub fn configure(&mut self, drain_duration_secs: f32, line_color: Rgb, line_thickness: u32) {
        let secs = if drain_duration_secs.is_nan() {
            MIN_DRAIN_SECS
        } else {
            drain_duration_secs.clamp(MIN_DRAIN_SECS, MAX_DRAIN_SECS)
        };
        if (secs - drain_duration_secs).abs() > f32::EPSILON {
            log::warn!("drain duration {drain_duration_secs}s raised to {secs}s");
        }
        self.drain_duration = Duration::from_secs_f32(secs);
        self.line_color = line_color;
        self.line_thickness = line_thickness;
        log::debug!("level configured: drain={secs}s thickness={line_thickness}");
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn is_draining(&self) -> bool {
        matches!(self.phase, DrainPhase::Draining { .. })
    }

    #[must_use]
    pub fn phase(&self) -> DrainPhase {
        self.phase
    }

    /// Time left in the current drain; zero when idle.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    #[must_use]
    pub fn drain_duration(&self) -> Duration {
        self.drain_duration
    }

    #[must_use]
    pub fn line_fraction(&self) -> f32 {
        self.line_fraction
    }

    #[must_use]
    pub fn line_color(&self) -> Rgb {
        self.line_color
    }

    #[must_use]
    pub fn line_thickness(&self) -> u32 {
        self.line_thickness
    }

    pub fn toggle_mode(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// Nudge the line up one step. No effect while the mode is off.
    pub fn move_line_up(&mut self) -> f32 {
        if self.active {
            self.line_fraction = round_hundredth(self.line_fraction - LINE_STEP).max(LINE_MIN);
        }
        self.line_fraction
    }

    /// Nudge the line down one step. No effect while the mode is off.
    pub fn move_line_down(&mut self) -> f32 {
        if self.active {
            self.line_fraction = round_hundredth(self.line_fraction + LINE_STEP).min(LINE_MAX);
        }
        self.line_fraction
    }

    /// First grid row at or below the line.
    ///
    /// This is `floor(fraction * rows)` plus a 1e-4 bias, so a fraction
    /// within 1e-4 of a row boundary counts as reaching it. Stepped fractions
    /// like 0.3 would otherwise land one row short from f32 error.
    #[must_use]
    pub fn line_row(&self, rows: usize) -> usize {
        ((self.line_fraction * rows as f32 + 1e-4).floor() as usize).min(rows)
    }

    #[must_use]
    pub fn line_pixel_y(&self, rows: usize, cell_size: usize) -> usize {
        (self.line_fraction * (rows * cell_size) as f32) as usize
    }

    #[must_use]
    pub fn occupancy(&self, grid: &Grid) -> Occupancy {
        let line_row = self.line_row(grid.rows()) as i32;
        let mut occupancy = Occupancy::default();
        for row in line_row..grid.rows() as i32 {
            for col in 0..grid.cols() as i32 {
                match grid.get(row, col) {
                    Some(Particle::Fine { .. }) => {
                        occupancy.filled += 1;
                        occupancy.available += 1;
                    }
                    None => occupancy.available += 1,
                    Some(Particle::Obstacle { .. }) => {}
                }
            }
        }
        occupancy
    }

    /// Start a drain if the mode is on, no drain is running and the region
    /// below the line is at least 95% full. Returns whether a drain started.
    pub fn check_fill(&mut self, grid: &Grid, now: Duration) -> bool {
        if !self.active || self.is_draining() {
            return false;
        }
        let occupancy = self.occupancy(grid);
        match occupancy.ratio() {
            Some(ratio) if ratio >= FILL_THRESHOLD => {
                log::info!(
                    "level full ({}/{} cells), opening drain",
                    occupancy.filled,
                    occupancy.available
                );
                self.start_drain(now);
                true
            }
            _ => false,
        }
    }

    pub fn start_drain(&mut self, now: Duration) {
        self.phase = DrainPhase::Draining { started: now };
        self.remaining = self.drain_duration;
    }

    /// Advance a running drain to `now`.
    ///
    /// Passes per tick grow with progress (`max(1, floor(progress * 3))`), and
    /// a particle may fall once per pass, so drains visibly accelerate.
    pub fn update_drain<R: SimRng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        now: Duration,
        rng: &mut R,
    ) -> DrainStep {
        let DrainPhase::Draining { started } = self.phase else {
            return DrainStep::Idle;
        };
        let elapsed = now.saturating_sub(started);
        self.remaining = self.drain_duration.saturating_sub(elapsed);
        let line_row = self.line_row(grid.rows());

        if elapsed >= self.drain_duration {
            let removed = clear_fine_below(grid, line_row);
            self.phase = DrainPhase::Idle;
            self.remaining = Duration::ZERO;
            log::info!("drain finished, cleared {removed} remaining particles");
            return DrainStep::Finished { removed };
        }

        let progress = elapsed.as_secs_f32() / self.drain_duration.as_secs_f32();
        let passes = ((progress * MAX_PASS_FACTOR).floor() as usize).max(1);
        let removed: usize = (0..passes)
            .map(|_| physics::drain_sweep(grid, line_row, rng))
            .sum();
        log::debug!("drain progress {progress:.2}: {passes} passes, {removed} exited");
        DrainStep::Progress { passes, removed }
    }

    /// Cancel any drain without touching the grid.
    pub fn reset(&mut self) {
        self.phase = DrainPhase::Idle;
        self.remaining = Duration::ZERO;
    }
}

/// Remove every fine particle at or below `line_row`; obstacles stay.
fn clear_fine_below(grid: &mut Grid, line_row: usize) -> usize {
    let mut removed = 0;
    for row in line_row as i32..grid.rows() as i32 {
        for col in 0..grid.cols() as i32 {
            if grid.get(row, col).is_some_and(Particle::is_movable) {
                grid.remove(row, col);
                removed += 1;
            }
        }
    }
    removed
}
