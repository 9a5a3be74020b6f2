//! ParticleSpawner - audio features to new particles
//!
//! Decides how many particles a tick creates and their initial kinematic and
//! visual state. Key mappings:
//! - Count grows with each band level (saturating, never below one)
//! - Launch speed scales with tempo, damped so fast songs stay readable
//! - Loud bass adds a sub-linear "explosion" impulse
//! - Hue follows a bass → mid → treble → random priority cascade
//!
//! All randomness comes from an owned, seedable `StdRng`, so a seeded
//! spawner produces identical particles for identical input.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::particle::{HslColor, Particle, Shape};
use crate::analysis::AudioFeatures;
use crate::config::{AppConfig, SpawnConfig};

/// Saturation range (percent) for spawned colors
const SATURATION_RANGE: (f32, f32) = (70.0, 100.0);
/// Lightness range (percent) for spawned colors
const LIGHTNESS_RANGE: (f32, f32) = (50.0, 70.0);
/// Spin speed bound in radians per tick
const MAX_ROTATION_VELOCITY: f32 = 0.1;

/// Band levels rescaled to [0, 1]
#[derive(Debug, Clone, Copy)]
struct NormalizedLevels {
    bass: f32,
    mid: f32,
    treble: f32,
    volume: f32,
}

pub struct ParticleSpawner {
    config: SpawnConfig,
    level_scale: f32,
    rng: StdRng,
}

impl ParticleSpawner {
    /// Create a spawner seeded from system entropy
    pub fn new(config: &AppConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a deterministic spawner
    pub fn with_seed(config: &AppConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &AppConfig, rng: StdRng) -> Self {
        Self {
            config: config.spawn.clone(),
            level_scale: config.features.max_magnitude,
            rng,
        }
    }

    /// Number of particles the given features produce
    ///
    /// count = max(1, ⌊bass·w_b⌋ + ⌊mid·w_m⌋ + ⌊treble·w_t⌋ + 1) on
    /// normalized levels.
    pub fn particle_count(&self, features: &AudioFeatures) -> usize {
        let levels = self.normalize(features);
        let count = (levels.bass * self.config.bass_weight).floor()
            + (levels.mid * self.config.mid_weight).floor()
            + (levels.treble * self.config.treble_weight).floor()
            + 1.0;
        (count.max(1.0)) as usize
    }

    /// Tempo-driven motion multiplier shared with the pool
    ///
    /// multiplier = (bpm / reference_bpm) × damping
    pub fn bpm_multiplier(&self, features: &AudioFeatures) -> f32 {
        let bpm = if features.bpm.is_finite() {
            features.bpm
        } else {
            self.config.reference_bpm
        };
        (bpm / self.config.reference_bpm) * self.config.bpm_damping
    }

    /// Create this tick's particles
    ///
    /// # Arguments
    /// * `features` - Features of the current tick
    /// * `viewport_width` - Spawn area width in pixels
    /// * `viewport_height` - Spawn area height in pixels
    pub fn spawn(
        &mut self,
        features: &AudioFeatures,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Vec<Particle> {
        let count = self.particle_count(features);
        let levels = self.normalize(features);
        let speed = self.config.base_speed * self.bpm_multiplier(features);
        let explosion = self.config.explosion_strength
            * levels.bass.powf(self.config.explosion_exponent);

        (0..count)
            .map(|_| self.spawn_one(&levels, speed, explosion, viewport_width, viewport_height))
            .collect()
    }

    fn spawn_one(
        &mut self,
        levels: &NormalizedLevels,
        speed: f32,
        explosion: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Particle {
        let angle = self.rng.gen_range(0.0..TAU);
        let impulse = explosion * self.rng.gen::<f32>();
        let launch_speed = speed + impulse;

        let color = self.pick_color(levels);
        let shape = Shape::ALL[self.rng.gen_range(0..Shape::ALL.len())];
        let size = uniform(&mut self.rng, self.config.size_min, self.config.size_max)
            * (1.0 + levels.volume);
        let lifetime_jitter = self.rng.gen_range(0..=self.config.lifetime_jitter);

        Particle {
            x: uniform(&mut self.rng, 0.0, viewport_width),
            y: uniform(&mut self.rng, 0.0, viewport_height),
            vx: angle.cos() * launch_speed,
            vy: angle.sin() * launch_speed,
            shape,
            size,
            scale: 1.0,
            scale_velocity: self.config.scale_decay,
            rotation: self.rng.gen_range(0.0..TAU),
            rotation_velocity: uniform(
                &mut self.rng,
                -MAX_ROTATION_VELOCITY,
                MAX_ROTATION_VELOCITY,
            ),
            color,
            opacity: 1.0,
            age: 0,
            max_lifetime: self
                .config
                .base_lifetime
                .saturating_add(lifetime_jitter)
                .max(1),
        }
    }

    /// Priority cascade: bass, then mid, then treble, then random hue
    fn pick_color(&mut self, levels: &NormalizedLevels) -> HslColor {
        let center = if levels.bass > self.config.bass_color_threshold {
            Some(self.config.bass_hue)
        } else if levels.mid > self.config.mid_color_threshold {
            Some(self.config.mid_hue)
        } else if levels.treble > self.config.treble_color_threshold {
            Some(self.config.treble_hue)
        } else {
            None
        };

        let hue = match center {
            Some(center) => {
                let jitter = self.config.hue_jitter;
                (center + uniform(&mut self.rng, -jitter, jitter)).rem_euclid(360.0)
            }
            None => self.rng.gen_range(0.0..360.0),
        };

        HslColor {
            hue,
            saturation: uniform(&mut self.rng, SATURATION_RANGE.0, SATURATION_RANGE.1),
            lightness: uniform(&mut self.rng, LIGHTNESS_RANGE.0, LIGHTNESS_RANGE.1),
        }
    }

    fn normalize(&self, features: &AudioFeatures) -> NormalizedLevels {
        NormalizedLevels {
            bass: normalize_level(features.bass, self.level_scale),
            mid: normalize_level(features.mid, self.level_scale),
            treble: normalize_level(features.treble, self.level_scale),
            volume: normalize_level(features.volume, self.level_scale),
        }
    }
}

fn normalize_level(level: f32, scale: f32) -> f32 {
    if !level.is_finite() || scale <= 0.0 {
        return 0.0;
    }
    (level / scale).clamp(0.0, 1.0)
}

/// Uniform sample in [low, high), or `low` when the range is empty
fn uniform(rng: &mut StdRng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(bass: f32, mid: f32, treble: f32, bpm: f32) -> AudioFeatures {
        AudioFeatures {
            volume: (bass + mid + treble) / 3.0,
            bass,
            mid,
            treble,
            energy: (bass + mid + treble) / 3.0,
            dominant_frequency: 0.0,
            bpm,
        }
    }

    fn spawner(seed: u64) -> ParticleSpawner {
        ParticleSpawner::with_seed(&AppConfig::default(), seed)
    }

    fn angular_distance(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_silence_spawns_one_particle() {
        let spawner = spawner(1);
        assert_eq!(spawner.particle_count(&features(0.0, 0.0, 0.0, 120.0)), 1);
    }

    #[test]
    fn test_full_levels_saturate_count() {
        let spawner = spawner(1);
        // 8 + 5 + 3 + 1
        assert_eq!(
            spawner.particle_count(&features(255.0, 255.0, 255.0, 120.0)),
            17
        );
        assert_eq!(
            spawner.particle_count(&features(1000.0, 1000.0, 1000.0, 120.0)),
            17
        );
    }

    #[test]
    fn test_count_is_monotonic_in_each_band() {
        let spawner = spawner(1);
        let mut previous = 0;
        for level in (0..=255).step_by(5) {
            let count = spawner.particle_count(&features(level as f32, 0.0, 0.0, 120.0));
            assert!(count >= previous, "count dropped at bass level {}", level);
            previous = count;
        }
    }

    #[test]
    fn test_bpm_multiplier() {
        let spawner = spawner(1);
        assert!((spawner.bpm_multiplier(&features(0.0, 0.0, 0.0, 120.0)) - 0.75).abs() < 1e-6);
        assert!((spawner.bpm_multiplier(&features(0.0, 0.0, 0.0, 180.0)) - 1.125).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_positions_inside_viewport() {
        let mut spawner = spawner(7);
        let particles = spawner.spawn(&features(255.0, 200.0, 150.0, 140.0), 640.0, 480.0);
        assert!(!particles.is_empty());
        for p in &particles {
            assert!((0.0..640.0).contains(&p.x));
            assert!((0.0..480.0).contains(&p.y));
            assert_eq!(p.age, 0);
            assert!(p.max_lifetime >= 60 && p.max_lifetime <= 100);
            assert_eq!(p.scale, 1.0);
            assert_eq!(p.opacity, 1.0);
        }
    }

    #[test]
    fn test_speed_scales_with_tempo_without_bass() {
        let mut slow = spawner(3);
        let mut fast = spawner(3);
        let slow_particles = slow.spawn(&features(0.0, 0.0, 0.0, 60.0), 100.0, 100.0);
        let fast_particles = fast.spawn(&features(0.0, 0.0, 0.0, 180.0), 100.0, 100.0);

        let speed = |p: &Particle| (p.vx * p.vx + p.vy * p.vy).sqrt();
        // No bass means no explosion impulse: speed = base_speed × multiplier
        assert!((speed(&slow_particles[0]) - 2.0 * 0.375).abs() < 1e-4);
        assert!((speed(&fast_particles[0]) - 2.0 * 1.125).abs() < 1e-4);
    }

    #[test]
    fn test_explosion_bounded_by_bass() {
        let mut spawner = spawner(11);
        let particles = spawner.spawn(&features(255.0, 0.0, 0.0, 120.0), 100.0, 100.0);
        for p in &particles {
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            assert!(speed >= 1.5 - 1e-4);
            assert!(speed <= 1.5 + 4.0 + 1e-4);
        }
    }

    #[test]
    fn test_color_cascade_bass_wins() {
        let mut spawner = spawner(5);
        let particles = spawner.spawn(&features(255.0, 255.0, 255.0, 120.0), 100.0, 100.0);
        for p in &particles {
            assert!(angular_distance(p.color.hue, 0.0) <= 30.0);
        }
    }

    #[test]
    fn test_color_cascade_mid_then_treble() {
        let mut spawner = spawner(5);
        for p in spawner.spawn(&features(0.0, 200.0, 255.0, 120.0), 100.0, 100.0) {
            assert!(angular_distance(p.color.hue, 120.0) <= 30.0);
        }
        for p in spawner.spawn(&features(0.0, 0.0, 255.0, 120.0), 100.0, 100.0) {
            assert!(angular_distance(p.color.hue, 240.0) <= 30.0);
        }
    }

    #[test]
    fn test_colors_within_hsl_bounds() {
        let mut spawner = spawner(9);
        for _ in 0..20 {
            for p in spawner.spawn(&features(30.0, 40.0, 50.0, 120.0), 100.0, 100.0) {
                assert!((0.0..360.0).contains(&p.color.hue));
                assert!((70.0..100.0).contains(&p.color.saturation));
                assert!((50.0..70.0).contains(&p.color.lightness));
            }
        }
    }

    #[test]
    fn test_quiet_bands_fall_back_to_any_hue() {
        let mut spawner = spawner(13);
        let hues: Vec<f32> = (0..200)
            .flat_map(|_| spawner.spawn(&features(10.0, 10.0, 10.0, 120.0), 100.0, 100.0))
            .map(|p| p.color.hue)
            .collect();

        let off_center = hues
            .iter()
            .filter(|&&h| [0.0, 120.0, 240.0].iter().all(|&c| angular_distance(h, c) > 30.0))
            .count();
        assert!(
            off_center > 0,
            "every fallback hue landed inside a band cluster: {:?}",
            hues
        );

        let mut sextants = [false; 6];
        for h in &hues {
            sextants[((h / 60.0) as usize).min(5)] = true;
        }
        assert!(
            sextants.iter().all(|&hit| hit),
            "fallback hues should cover the whole wheel, sextants hit: {:?}",
            sextants
        );
    }

    #[test]
    fn test_max_lifetime_saturates() {
        let mut config = AppConfig::default();
        config.spawn.base_lifetime = u32::MAX;
        config.spawn.lifetime_jitter = 40;
        let mut spawner = ParticleSpawner::with_seed(&config, 4);
        for _ in 0..20 {
            for p in spawner.spawn(&features(100.0, 100.0, 100.0, 120.0), 100.0, 100.0) {
                assert_eq!(p.max_lifetime, u32::MAX);
            }
        }
    }

    #[test]
    fn test_seeded_spawners_are_deterministic() {
        let input = features(180.0, 90.0, 45.0, 128.0);
        let a = spawner(42).spawn(&input, 800.0, 600.0);
        let b = spawner(42).spawn(&input, 800.0, 600.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_viewport_does_not_panic() {
        let mut spawner = spawner(2);
        let particles = spawner.spawn(&features(100.0, 100.0, 100.0, 120.0), 0.0, -5.0);
        for p in particles {
            assert_eq!(p.x, 0.0);
            assert_eq!(p.y, 0.0);
        }
    }
}
