// Particles module - audio-reactive particle system
//
// Module organization:
// - particle: Particle state, shapes and HSL colors
// - spawner: AudioFeatures -> new particles (seedable randomness)
// - pool: bounded storage plus per-tick physics
// - scene: draw-ready snapshot handed to renderers

mod particle;
mod pool;
mod scene;
mod spawner;

pub use particle::{HslColor, Particle, Shape};
pub use pool::ParticlePool;
pub use scene::{ParticleVisual, SceneSnapshot};
pub use spawner::ParticleSpawner;
