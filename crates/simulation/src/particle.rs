//! Particle kinds and their display colors.
//!
//! This module has no knowledge of the grid: a particle is an opaque value
//! whose position is implied by the cell that holds it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rng::SimRng;

/// Discriminant values are what the JS side passes for brush modes. Do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Fine granular particle that falls and slides.
    Fine = 1,
    /// Immovable obstacle used as terrain.
    Obstacle = 2,
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fine => write!(f, "Fine"),
            Self::Obstacle => write!(f, "Obstacle"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed as little-endian RGBA bytes with full alpha.
    #[must_use]
    pub fn to_rgba_u32(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, 0xFF])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// A single occupant of a grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Particle {
    Fine { color: Rgb },
    Obstacle { color: Rgb },
}

impl Particle {
    /// Build a particle of `kind` with a freshly sampled color.
    pub fn new<R: SimRng + ?Sized>(kind: ParticleKind, rng: &mut R) -> Self {
        match kind {
            ParticleKind::Fine => Self::Fine {
                color: fine_color(rng),
            },
            ParticleKind::Obstacle => Self::Obstacle {
                color: obstacle_color(rng),
            },
        }
    }

    #[must_use]
    pub fn kind(self) -> ParticleKind {
        match self {
            Self::Fine { .. } => ParticleKind::Fine,
            Self::Obstacle { .. } => ParticleKind::Obstacle,
        }
    }

    #[must_use]
    pub fn color(self) -> Rgb {
        match self {
            Self::Fine { color } | Self::Obstacle { color } => color,
        }
    }

    #[must_use]
    pub fn is_movable(self) -> bool {
        matches!(self, Self::Fine { .. })
    }
}

const FINE_BASE: i32 = 240;
const FINE_JITTER: i32 = 15;

/// Pearly off-white around (240, 240, 235). All channels share one jitter
/// so the tint stays neutral; blue sits a little lower.
pub fn fine_color<R: SimRng + ?Sized>(rng: &mut R) -> Rgb {
    let v = rng.pick_inclusive(-FINE_JITTER, FINE_JITTER);
    let r = (FINE_BASE + v).clamp(225, 255) as u8;
    let b = (FINE_BASE + v - 5).clamp(220, 255) as u8;
    Rgb::new(r, r, b)
}

/// Dark, low-saturation gray with a faint warm hue.
pub fn obstacle_color<R: SimRng + ?Sized>(rng: &mut R) -> Rgb {
    let h = rng.uniform(0.0, 0.1);
    let s = rng.uniform(0.1, 0.3);
    let v = rng.uniform(0.3, 0.5);
    hsv_to_rgb(h, s, v)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let to_byte = |x: f32| (x * 255.0) as u8;
    if s <= 0.0 {
        let c = to_byte(v);
        return Rgb::new(c, c, c);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}
