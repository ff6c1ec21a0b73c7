//! Short status events the UI may show to the user.

use std::fmt;

use crate::brush::BrushMode;

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Notice {
    AutoSpawn { enabled: bool, tool: BrushMode },
    ToolChanged { tool: BrushMode, auto_spawn: bool },
    Paused(bool),
    RateChanged(f32),
    BandWidthChanged { width: usize, full: bool },
    ClusterChanged(usize),
    BrushSizeChanged(usize),
    LevelMode(bool),
    LineMoved(f32),
    CellSizeChanged(usize),
    DrainStarted,
    DrainFinished,
    Reset,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::AutoSpawn { enabled, tool } => {
                if enabled && tool != BrushMode::Fine {
                    write!(f, "Auto spawn: ON (resumes in Fine mode)")
                } else {
                    write!(f, "Auto spawn: {}", on_off(enabled))
                }
            }
            Self::ToolChanged { tool, auto_spawn } => {
                let paused = if auto_spawn && tool != BrushMode::Fine {
                    " (paused)"
                } else {
                    ""
                };
                write!(f, "{tool} mode - Auto spawn: {}{paused}", on_off(auto_spawn))
            }
            Self::Paused(paused) => {
                write!(f, "Simulation: {}", if paused { "PAUSED" } else { "RESUMED" })
            }
            Self::RateChanged(rate) => write!(f, "Rate: {rate:.1}"),
            Self::BandWidthChanged { width, full } => {
                write!(f, "Spawn band: {width} columns")?;
                if full {
                    write!(f, " (FULL)")?;
                }
                Ok(())
            }
            Self::ClusterChanged(size) => write!(f, "Cluster: {size}x{size} particles"),
            Self::BrushSizeChanged(size) => write!(f, "Brush: {size}x{size} cells"),
            Self::LevelMode(on) => write!(f, "Level mode: {}", on_off(on)),
            Self::LineMoved(fraction) => write!(f, "Level line: {fraction:.2}"),
            Self::CellSizeChanged(size) => write!(f, "Cell size: {size}x{size} pixels"),
            Self::DrainStarted => write!(f, "Level reached - draining"),
            Self::DrainFinished => write!(f, "Drain complete"),
            Self::Reset => write!(f, "Simulation reset"),
        }
    }
}
