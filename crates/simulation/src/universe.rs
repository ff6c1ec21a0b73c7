//! JavaScript bindings: the browser UI drives the engine through [`Universe`].

use std::collections::VecDeque;

use wasm_bindgen::prelude::*;

use crate::brush::BrushMode;
use crate::config::SimConfig;
use crate::particle::{ParticleKind, Rgb};
use crate::simulation::{Simulation, TickSummary};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Owns a [`Simulation`] plus a packed RGBA color buffer the renderer reads
/// straight out of WASM memory. The buffer is refreshed after every call that
/// can change the grid; empty cells are transparent black.
#[wasm_bindgen]
#[derive(Debug)]
pub struct Universe {
    sim: Simulation,
    pixels: Vec<u32>,
    notices: VecDeque<String>,
}

impl Universe {
    fn from_sim(sim: Simulation) -> Self {
        let mut universe = Self {
            sim,
            pixels: Vec::new(),
            notices: VecDeque::new(),
        };
        universe.sync();
        universe
    }

    fn from_config(config: &SimConfig, seed: u64) -> Result<Self, JsValue> {
        Simulation::with_seed(config, seed)
            .map(Self::from_sim)
            .map_err(to_js)
    }

    /// Refresh the color buffer and collect pending notices.
    fn sync(&mut self) {
        let cells = self.sim.grid().cells();
        self.pixels.resize(cells.len(), 0);
        for (pixel, cell) in self.pixels.iter_mut().zip(cells) {
            *pixel = cell.map_or(0, |p| p.color().to_rgba_u32());
        }
        self.notices
            .extend(self.sim.take_notices().iter().map(ToString::to_string));
    }

    /// The wrapped simulation, for native callers.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Run one tick and report what happened.
    pub fn step(&mut self) -> TickSummary {
        let summary = self.sim.advance_tick();
        self.sync();
        summary
    }
}

#[wasm_bindgen]
impl Universe {
    /// Default configuration, seeded randomness.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<Universe, JsValue> {
        Self::from_config(&SimConfig::default(), seed)
    }

    /// Build from a RON configuration document.
    #[wasm_bindgen(js_name = fromRon)]
    pub fn from_ron(source: &str, seed: u64) -> Result<Universe, JsValue> {
        let config = SimConfig::from_ron(source).map_err(to_js)?;
        Self::from_config(&config, seed)
    }

    pub fn tick(&mut self) {
        self.step();
    }

    /// `mode`: 0 erase, 1 fine, 2 obstacle. Unknown modes are ignored.
    pub fn apply_brush(&mut self, row: i32, col: i32, mode: u8, size: usize) -> usize {
        let Some(mode) = BrushMode::from_u8(mode) else {
            return 0;
        };
        let changed = self.sim.apply_brush(row, col, mode, size);
        self.sync();
        changed
    }

    pub fn apply_tool(&mut self, row: i32, col: i32) -> usize {
        let changed = self.sim.apply_tool(row, col);
        self.sync();
        changed
    }

    /// `kind`: 0 clears, 1 fine, 2 obstacle.
    pub fn set_cell(&mut self, row: i32, col: i32, kind: u8) {
        let kind = match kind {
            1 => Some(ParticleKind::Fine),
            2 => Some(ParticleKind::Obstacle),
            _ => None,
        };
        self.sim.place(row, col, kind);
        self.sync();
    }

    pub fn set_tool(&mut self, mode: u8) {
        if let Some(mode) = BrushMode::from_u8(mode) {
            self.sim.set_tool(mode);
            self.sync();
        }
    }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.sync();
    }

    pub fn resize_cells(&mut self, cell_size: usize) -> usize {
        let applied = self.sim.resize_cells(cell_size);
        self.sync();
        applied
    }

    pub fn toggle_auto_spawn(&mut self) -> bool {
        let on = self.sim.toggle_auto_spawn();
        self.sync();
        on
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.sim.toggle_pause();
        self.sync();
        paused
    }

    pub fn toggle_level_mode(&mut self) -> bool {
        let on = self.sim.toggle_level_mode();
        self.sync();
        on
    }

    pub fn move_line_up(&mut self) -> f32 {
        let fraction = self.sim.move_line_up();
        self.sync();
        fraction
    }

    pub fn move_line_down(&mut self) -> f32 {
        let fraction = self.sim.move_line_down();
        self.sync();
        fraction
    }

    pub fn configure_level(&mut self, drain_secs: f32, r: u8, g: u8, b: u8, thickness: u32) {
        self.sim.configure_level(drain_secs, Rgb::new(r, g, b), thickness);
    }

    pub fn configure_spawn(
        &mut self,
        rate: Option<f32>,
        band_width: Option<usize>,
        cluster_size: Option<usize>,
    ) {
        self.sim.configure_spawn(rate, band_width, cluster_size);
    }

    pub fn increase_rate(&mut self) -> f32 {
        let rate = self.sim.increase_rate();
        self.sync();
        rate
    }

    pub fn decrease_rate(&mut self) -> f32 {
        let rate = self.sim.decrease_rate();
        self.sync();
        rate
    }

    pub fn increase_band(&mut self) -> usize {
        let width = self.sim.increase_band();
        self.sync();
        width
    }

    pub fn decrease_band(&mut self) -> usize {
        let width = self.sim.decrease_band();
        self.sync();
        width
    }

    pub fn increase_cluster(&mut self) -> usize {
        let size = self.sim.increase_cluster();
        self.sync();
        size
    }

    pub fn decrease_cluster(&mut self) -> usize {
        let size = self.sim.decrease_cluster();
        self.sync();
        size
    }

    pub fn increase_brush_size(&mut self) -> usize {
        let size = self.sim.increase_brush_size();
        self.sync();
        size
    }

    pub fn decrease_brush_size(&mut self) -> usize {
        let size = self.sim.decrease_brush_size();
        self.sync();
        size
    }

    /// Oldest undelivered status message.
    pub fn next_notice(&mut self) -> Option<String> {
        self.notices.pop_front()
    }

    /// Pointer to `rows * cols` packed RGBA pixels, row-major.
    pub fn pixels_ptr(&self) -> *const u32 {
        self.pixels.as_ptr()
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> usize {
        self.sim.rows()
    }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> usize {
        self.sim.cols()
    }

    #[wasm_bindgen(getter)]
    pub fn cell_size(&self) -> usize {
        self.sim.cell_size()
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> usize {
        self.sim.grid().particle_count()
    }

    /// 0 empty, 1 fine, 2 obstacle.
    pub fn kind_at(&self, row: i32, col: i32) -> u8 {
        self.sim.particle_at(row, col).map_or(0, |p| p.kind() as u8)
    }

    #[wasm_bindgen(getter)]
    pub fn is_draining(&self) -> bool {
        self.sim.is_draining()
    }

    #[wasm_bindgen(getter)]
    pub fn drain_remaining_secs(&self) -> f32 {
        self.sim.drain_remaining().as_secs_f32()
    }

    #[wasm_bindgen(getter)]
    pub fn is_paused(&self) -> bool {
        self.sim.is_paused()
    }

    #[wasm_bindgen(getter)]
    pub fn level_mode(&self) -> bool {
        self.sim.level().is_active()
    }

    #[wasm_bindgen(getter)]
    pub fn line_fraction(&self) -> f32 {
        self.sim.level().line_fraction()
    }

    /// Line position in pixels from the top of the area.
    #[wasm_bindgen(getter)]
    pub fn line_pixel_y(&self) -> usize {
        self.sim
            .level()
            .line_pixel_y(self.sim.rows(), self.sim.cell_size())
    }

    #[wasm_bindgen(getter)]
    pub fn line_color(&self) -> u32 {
        self.sim.level().line_color().to_rgba_u32()
    }

    #[wasm_bindgen(getter)]
    pub fn line_thickness(&self) -> u32 {
        self.sim.level().line_thickness()
    }

    #[wasm_bindgen(getter)]
    pub fn auto_spawn(&self) -> bool {
        self.sim.spawn().enabled()
    }

    #[wasm_bindgen(getter)]
    pub fn spawn_rate(&self) -> f32 {
        self.sim.spawn().rate()
    }

    #[wasm_bindgen(getter)]
    pub fn band_width(&self) -> usize {
        self.sim.spawn().band_width()
    }

    #[wasm_bindgen(getter)]
    pub fn cluster_size(&self) -> usize {
        self.sim.spawn().cluster_size()
    }

    #[wasm_bindgen(getter)]
    pub fn brush_size(&self) -> usize {
        self.sim.brush_size()
    }

    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> u8 {
        self.sim.tool() as u8
    }
}
