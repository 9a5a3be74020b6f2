//! Scene snapshot handed to the external renderer each tick.

use serde::{Deserialize, Serialize};

use super::particle::{HslColor, Shape};

/// Visual state of one particle after fade and scale are applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleVisual {
    pub x: f32,
    pub y: f32,
    /// Drawn size in pixels (base size × scale)
    pub size: f32,
    pub rotation: f32,
    pub shape: Shape,
    pub color: HslColor,
    /// Final opacity including the eased fade-out
    pub opacity: f32,
}

/// Ordered particle visuals for one frame, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub particles: Vec<ParticleVisual>,
    pub width: f32,
    pub height: f32,
}

impl SceneSnapshot {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
