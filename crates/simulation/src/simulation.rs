//! The simulation facade driven by the UI layer.
//!
//! One call to [`Simulation::advance_tick`] per frame runs auto-spawn, the
//! gravity sweep and the level monitor, in that order. Everything else here
//! is configuration, brush edits and read accessors for drawing.

use std::time::Duration;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::brush::{self, BrushMode, BRUSH_MAX, BRUSH_MIN};
use crate::clock::{Clock, SystemClock};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::level::{DrainStep, LevelMonitor};
use crate::notice::Notice;
use crate::particle::{Particle, ParticleKind, Rgb};
use crate::physics;
use crate::rng::SimRng;
use crate::spawn::SpawnController;
use crate::Grid;

pub const MAX_CELL_SIZE: usize = 9;

/// What one tick did, for diagnostics and benchmarks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TickSummary {
    pub spawned: usize,
    pub moved: usize,
    pub drain: DrainStep,
}

impl TickSummary {
    const SKIPPED: Self = Self {
        spawned: 0,
        moved: 0,
        drain: DrainStep::Idle,
    };
}

#[derive(Debug)]
pub struct Simulation<R: SimRng = Xoshiro256StarStar, C: Clock = SystemClock> {
    area_width: usize,
    area_height: usize,
    cell_size: usize,
    fine_probability: f32,
    grid: Grid,
    spawn: SpawnController,
    level: LevelMonitor,
    tool: BrushMode,
    brush_size: usize,
    paused: bool,
    ticks: u64,
    notices: Vec<Notice>,
    rng: R,
    clock: C,
}

impl Simulation {
    /// Seeded xoshiro randomness and wall-clock drain timing.
    pub fn with_seed(config: &SimConfig, seed: u64) -> Result<Self, SimError> {
        Self::new(
            config,
            Xoshiro256StarStar::seed_from_u64(seed),
            SystemClock::new(),
        )
    }

    /// Seeded from OS entropy.
    pub fn from_entropy(config: &SimConfig) -> Result<Self, SimError> {
        Self::new(config, Xoshiro256StarStar::from_entropy(), SystemClock::new())
    }
}

impl<R: SimRng, C: Clock> Simulation<R, C> {
    pub fn new(config: &SimConfig, rng: R, clock: C) -> Result<Self, SimError> {
        config.validate()?;
        let cell_size = config.cell_size.min(MAX_CELL_SIZE);
        let grid = Grid::for_area(config.area_width, config.area_height, cell_size);
        log::info!(
            "simulation created: {}x{} cells of {}px",
            grid.cols(),
            grid.rows(),
            cell_size
        );
        Ok(Self {
            area_width: config.area_width,
            area_height: config.area_height,
            cell_size,
            fine_probability: config.fine_spawn_probability.clamp(0.0, 1.0),
            grid,
            spawn: SpawnController::new(&config.spawn, config.fine_spawn_probability),
            level: LevelMonitor::new(&config.level),
            tool: BrushMode::default(),
            brush_size: config.brush_size.clamp(BRUSH_MIN, BRUSH_MAX),
            paused: false,
            ticks: 0,
            notices: Vec::new(),
            rng,
            clock,
        })
    }

    fn notify(&mut self, notice: Notice) {
        log::debug!("{notice}");
        self.notices.push(notice);
    }

    /// Spawn, sweep, then update the level monitor. Does nothing while paused.
    pub fn advance_tick(&mut self) -> TickSummary {
        if self.paused {
            return TickSummary::SKIPPED;
        }
        self.ticks += 1;

        let spawned = if self.spawn.enabled() && self.tool == BrushMode::Fine {
            self.spawn.spawn(&mut self.grid, &mut self.rng)
        } else {
            0
        };

        let moved = physics::sweep(&mut self.grid, &mut self.rng);

        let now = self.clock.now();
        let drain = if self.level.is_draining() {
            let step = self.level.update_drain(&mut self.grid, now, &mut self.rng);
            if matches!(step, DrainStep::Finished { .. }) {
                self.notify(Notice::DrainFinished);
            }
            step
        } else {
            if self.level.check_fill(&self.grid, now) {
                self.notify(Notice::DrainStarted);
            }
            DrainStep::Idle
        };

        TickSummary {
            spawned,
            moved,
            drain,
        }
    }

    /// Edit the `size × size` square at `(row, col)`. Returns cells changed.
    pub fn apply_brush(&mut self, row: i32, col: i32, mode: BrushMode, size: usize) -> usize {
        brush::apply_brush(
            &mut self.grid,
            row,
            col,
            mode,
            size,
            self.fine_probability,
            &mut self.rng,
        )
    }

    /// Overwrite a cell with a fresh particle of `kind`, or clear it with
    /// `None`. Bypasses the brush probability; meant for scripted setups.
    pub fn place(&mut self, row: i32, col: i32, kind: Option<ParticleKind>) {
        match kind {
            Some(kind) => {
                let particle = Particle::new(kind, &mut self.rng);
                self.grid.set(row, col, particle);
            }
            None => self.grid.remove(row, col),
        }
    }

    /// Apply the current tool with the current brush size.
    pub fn apply_tool(&mut self, row: i32, col: i32) -> usize {
        self.apply_brush(row, col, self.tool, self.brush_size)
    }

    pub fn set_tool(&mut self, tool: BrushMode) {
        self.tool = tool;
        self.notify(Notice::ToolChanged {
            tool,
            auto_spawn: self.spawn.enabled(),
        });
    }

    pub fn increase_brush_size(&mut self) -> usize {
        self.brush_size = (self.brush_size + 1).min(BRUSH_MAX);
        self.notify(Notice::BrushSizeChanged(self.brush_size));
        self.brush_size
    }

    pub fn decrease_brush_size(&mut self) -> usize {
        self.brush_size = self.brush_size.saturating_sub(1).max(BRUSH_MIN);
        self.notify(Notice::BrushSizeChanged(self.brush_size));
        self.brush_size
    }

    pub fn configure_spawn(
        &mut self,
        rate: Option<f32>,
        band_width: Option<usize>,
        cluster_size: Option<usize>,
    ) {
        self.spawn
            .configure(rate, band_width, cluster_size, self.grid.cols());
    }

    pub fn increase_rate(&mut self) -> f32 {
        let rate = self.spawn.increase_rate();
        self.notify(Notice::RateChanged(rate));
        rate
    }

    pub fn decrease_rate(&mut self) -> f32 {
        let rate = self.spawn.decrease_rate();
        self.notify(Notice::RateChanged(rate));
        rate
    }

    pub fn increase_band(&mut self) -> usize {
        let width = self.spawn.increase_band(self.grid.cols());
        self.notify_band(width);
        width
    }

    pub fn decrease_band(&mut self) -> usize {
        let width = self.spawn.decrease_band();
        self.notify_band(width);
        width
    }

    fn notify_band(&mut self, width: usize) {
        let full = self.spawn.is_full_width(self.grid.cols());
        self.notify(Notice::BandWidthChanged { width, full });
    }

    pub fn increase_cluster(&mut self) -> usize {
        let size = self.spawn.increase_cluster();
        self.notify(Notice::ClusterChanged(size));
        size
    }

    pub fn decrease_cluster(&mut self) -> usize {
        let size = self.spawn.decrease_cluster();
        self.notify(Notice::ClusterChanged(size));
        size
    }

    pub fn toggle_auto_spawn(&mut self) -> bool {
        let enabled = self.spawn.toggle();
        self.notify(Notice::AutoSpawn {
            enabled,
            tool: self.tool,
        });
        enabled
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.notify(Notice::Paused(self.paused));
        self.paused
    }

    pub fn configure_level(&mut self, drain_duration_secs: f32, line_color: Rgb, line_thickness: u32) {
        self.level
            .configure(drain_duration_secs, line_color, line_thickness);
    }

    pub fn toggle_level_mode(&mut self) -> bool {
        let active = self.level.toggle_mode();
        log::info!("level mode {}", if active { "on" } else { "off" });
        self.notify(Notice::LevelMode(active));
        active
    }

    pub fn move_line_up(&mut self) -> f32 {
        let fraction = self.level.move_line_up();
        if self.level.is_active() {
            self.notify(Notice::LineMoved(fraction));
        }
        fraction
    }

    pub fn move_line_down(&mut self) -> f32 {
        let fraction = self.level.move_line_down();
        if self.level.is_active() {
            self.notify(Notice::LineMoved(fraction));
        }
        fraction
    }

    /// Rebuild the grid for a new cell size over the same physical area.
    ///
    /// Each particle is re-created (same kind, fresh color) at its scaled
    /// position; when scaling maps several particles onto one cell, the first
    /// in row-major order wins and the rest are discarded. The requested size
    /// is clamped to `[1, 9]` and to the area. Returns the size applied.
    pub fn resize_cells(&mut self, new_cell_size: usize) -> usize {
        let limit = MAX_CELL_SIZE.min(self.area_width).min(self.area_height);
        let cell_size = new_cell_size.clamp(1, limit.max(1));
        if cell_size != new_cell_size {
            log::warn!("cell size {new_cell_size} clamped to {cell_size}");
        }
        if cell_size != self.cell_size {
            self.grid = self.rebuild_grid(cell_size);
            self.cell_size = cell_size;
        }
        self.notify(Notice::CellSizeChanged(cell_size));
        cell_size
    }

    fn rebuild_grid(&mut self, cell_size: usize) -> Grid {
        let mut rebuilt = Grid::for_area(self.area_width, self.area_height, cell_size);
        let scale_rows = rebuilt.rows() as f64 / self.grid.rows().max(1) as f64;
        let scale_cols = rebuilt.cols() as f64 / self.grid.cols().max(1) as f64;
        let before = self.grid.particle_count();

        for (row, col, particle) in self.grid.iter_occupied() {
            let target_row = (f64::from(row) * scale_rows).floor() as i32;
            let target_col = (f64::from(col) * scale_cols).floor() as i32;
            rebuilt.try_add(target_row, target_col, particle.kind(), &mut self.rng);
        }

        log::info!(
            "grid rebuilt: {}x{} -> {}x{}, kept {}/{} particles",
            self.grid.cols(),
            self.grid.rows(),
            rebuilt.cols(),
            rebuilt.rows(),
            rebuilt.particle_count(),
            before
        );
        rebuilt
    }

    /// Clear the grid and cancel any drain. Configuration is kept.
    pub fn reset(&mut self) {
        self.grid.clear_all();
        self.level.reset();
        log::info!("simulation reset");
        self.notify(Notice::Reset);
    }

    /// Notices raised since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for scripted setups between ticks.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    #[must_use]
    pub fn particle_at(&self, row: i32, col: i32) -> Option<Particle> {
        self.grid.get(row, col)
    }

    #[must_use]
    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    #[must_use]
    pub fn spawn(&self) -> &SpawnController {
        &self.spawn
    }

    #[must_use]
    pub fn level(&self) -> &LevelMonitor {
        &self.level
    }

    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.level.is_draining()
    }

    #[must_use]
    pub fn drain_remaining(&self) -> Duration {
        self.level.remaining()
    }

    #[must_use]
    pub fn tool(&self) -> BrushMode {
        self.tool
    }

    #[must_use]
    pub fn brush_size(&self) -> usize {
        self.brush_size
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ticks run since creation, not counting paused frames.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
