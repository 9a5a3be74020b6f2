//! Particle state and visual primitives.

use serde::{Deserialize, Serialize};

use super::scene::ParticleVisual;

/// Closed set of shapes a particle can be drawn as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Circle, Shape::Square, Shape::Triangle];
}

/// Hue in degrees [0, 360), saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslColor {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// One simulated visual entity
///
/// Created by the spawner, then owned and mutated exclusively by the pool
/// until `age >= max_lifetime`.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub shape: Shape,
    /// Base size in pixels before scaling
    pub size: f32,
    pub scale: f32,
    /// Scale lost per tick
    pub scale_velocity: f32,
    /// Radians
    pub rotation: f32,
    /// Radians per tick
    pub rotation_velocity: f32,
    pub color: HslColor,
    pub opacity: f32,
    /// Ticks survived so far
    pub age: u32,
    /// Tick count at which the particle is removed
    pub max_lifetime: u32,
}

impl Particle {
    /// True once the particle has reached its lifetime
    pub fn is_expired(&self) -> bool {
        self.age >= self.max_lifetime
    }

    /// Eased fade-out multiplier: (1 - age / max_lifetime)²
    pub fn fade_alpha(&self) -> f32 {
        if self.max_lifetime == 0 {
            return 0.0;
        }
        let remaining = (1.0 - self.age as f32 / self.max_lifetime as f32).clamp(0.0, 1.0);
        remaining * remaining
    }

    /// Draw-ready view of this particle
    pub fn visual(&self) -> ParticleVisual {
        ParticleVisual {
            x: self.x,
            y: self.y,
            size: self.size * self.scale,
            rotation: self.rotation,
            shape: self.shape,
            color: self.color,
            opacity: self.opacity * self.fade_alpha(),
        }
    }
}
