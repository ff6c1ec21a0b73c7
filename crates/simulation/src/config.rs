//! Simulation configuration, loadable from RON.

use serde::{Deserialize, Serialize};

use crate::brush::BRUSH_DEFAULT;
use crate::error::ConfigError;
use crate::particle::Rgb;
use crate::spawn::FINE_SPAWN_PROBABILITY;

/// Auto-spawn settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub enabled: bool,
    /// Clusters per tick; the fractional part is a probability.
    pub rate: f32,
    /// Width in columns of the centred spawn band.
    pub band_width: usize,
    /// Side length of each spawned cluster.
    pub cluster_size: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            band_width: 100,
            cluster_size: 1,
        }
    }
}

/// Level line and drain settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub drain_duration_secs: f32,
    pub line_color: Rgb,
    pub line_thickness: u32,
    /// Line position as a fraction of the grid height.
    pub line_fraction: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            drain_duration_secs: 2.0,
            line_color: Rgb::new(255, 0, 0),
            line_thickness: 5,
            line_fraction: 0.5,
        }
    }
}

/// Main configuration for a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Physical area width in pixels
    pub area_width: usize,
    /// Physical area height in pixels
    pub area_height: usize,
    /// Side of one grid cell in pixels
    pub cell_size: usize,
    /// Default brush side length in cells (1-10)
    pub brush_size: usize,
    /// Per-cell chance of placing a fine particle
    pub fine_spawn_probability: f32,
    pub spawn: SpawnConfig,
    pub level: LevelConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            area_width: 200,
            area_height: 600,
            cell_size: 3,
            brush_size: BRUSH_DEFAULT,
            fine_spawn_probability: FINE_SPAWN_PROBABILITY,
            spawn: SpawnConfig::default(),
            level: LevelConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a RON document; omitted fields take their defaults.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.area_width == 0 || self.area_height == 0 {
            return Err(ConfigError::ZeroArea {
                width: self.area_width,
                height: self.area_height,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.cell_size > self.area_width || self.cell_size > self.area_height {
            return Err(ConfigError::CellLargerThanArea {
                cell_size: self.cell_size,
                width: self.area_width,
                height: self.area_height,
            });
        }
        let duration = self.level.drain_duration_secs;
        if !duration.is_finite() {
            return Err(ConfigError::NonFiniteDrainDuration(duration));
        }
        if duration <= 0.0 {
            return Err(ConfigError::NonPositiveDrainDuration(duration));
        }
        Ok(())
    }
}
