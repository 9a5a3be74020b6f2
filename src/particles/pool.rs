//! ParticlePool - bounded particle storage and per-tick physics
//!
//! The pool owns every live particle. Each tick it:
//! 1. Appends the newly spawned batch
//! 2. Evicts the oldest particles until the capacity holds
//! 3. Integrates motion, ageing, damping, gravity, spin and hue drift
//! 4. Wraps positions around the viewport with a small off-screen margin
//! 5. Drops particles that reached their lifetime
//!
//! Insertion order is preserved throughout, so snapshots draw oldest first.

use std::collections::VecDeque;

use super::particle::Particle;
use super::scene::SceneSnapshot;
use crate::config::PoolConfig;

#[derive(Debug, Clone)]
pub struct ParticlePool {
    config: PoolConfig,
    particles: VecDeque<Particle>,
    width: f32,
    height: f32,
}

impl ParticlePool {
    pub fn new(config: PoolConfig, width: f32, height: f32) -> Self {
        let particles = VecDeque::with_capacity(config.capacity);
        Self {
            config,
            particles,
            width,
            height,
        }
    }

    /// Advance the simulation by one tick
    ///
    /// # Arguments
    /// * `spawned` - Particles created this tick, appended after the survivors
    /// * `bpm_multiplier` - Motion scale from the current tempo (non-finite counts as 0)
    ///
    /// # Returns
    /// Snapshot of the surviving particles after this tick
    pub fn tick(&mut self, spawned: Vec<Particle>, bpm_multiplier: f32) -> SceneSnapshot {
        let multiplier = if bpm_multiplier.is_finite() {
            bpm_multiplier
        } else {
            0.0
        };

        self.particles.extend(spawned);
        if self.particles.len() > self.config.capacity {
            let excess = self.particles.len() - self.config.capacity;
            self.particles.drain(..excess);
        }

        let config = &self.config;
        let (width, height) = (self.width, self.height);
        for particle in self.particles.iter_mut() {
            Self::integrate(config, particle, multiplier);
            Self::wrap(config, particle, width, height);
        }

        self.particles.retain(|p| !p.is_expired());
        self.snapshot()
    }

    fn integrate(config: &PoolConfig, p: &mut Particle, multiplier: f32) {
        p.x += p.vx * multiplier;
        p.y += p.vy * multiplier;
        p.age = p.age.saturating_add(1);

        p.vx *= config.velocity_damping;
        p.vy *= config.velocity_damping;
        p.vy += config.gravity * multiplier;

        p.scale = (p.scale - p.scale_velocity).max(config.min_scale);
        p.rotation += p.rotation_velocity * multiplier;
        p.color.hue = (p.color.hue + config.hue_drift).rem_euclid(360.0);
    }

    fn wrap(config: &PoolConfig, p: &mut Particle, width: f32, height: f32) {
        let margin = config.wrap_margin;

        if p.x < -margin {
            p.x = width + margin;
        } else if p.x > width + margin {
            p.x = -margin;
        }

        if p.y < -margin {
            p.y = height + margin;
        } else if p.y > height + margin {
            p.y = -margin;
        }
    }

    /// Update the wrap bounds; live particles keep their positions
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Draw-ready view of all live particles, oldest first
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            particles: self.particles.iter().map(Particle::visual).collect(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(PoolConfig::default(), 800.0, 600.0)
    }
}
