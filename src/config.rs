//! Configuration management for dynamic parameter tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! so band splits, tempo thresholds and particle physics can be tuned
//! without recompilation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::VisualizerError;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub features: FeatureConfig,
    pub tempo: TempoConfig,
    pub spawn: SpawnConfig,
    pub pool: PoolConfig,
    pub runtime: RuntimeConfig,
}

/// Band splitting and magnitude normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Fraction of the spectrum (from bin 0) assigned to the bass band
    pub bass_split: f32,
    /// Fraction of the spectrum where the mid band ends; treble takes the rest
    pub mid_split: f32,
    /// Largest magnitude a bin may carry; larger values are clamped
    pub max_magnitude: f32,
    /// Frames shorter than this are treated as malformed and yield zero levels
    pub min_frame_len: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            bass_split: 0.10,
            mid_split: 0.60,
            max_magnitude: 255.0,
            min_frame_len: 8,
        }
    }
}

/// Tempo estimator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// Bass level that must be exceeded to register a peak (0-255 scale)
    pub peak_threshold: f32,
    /// Minimum time between two accepted peaks
    pub refractory_ms: f64,
    /// Peak timestamp history length
    pub max_peaks: usize,
    /// Inter-peak interval history length
    pub max_intervals: usize,
    /// Intervals required before a BPM estimate is attempted
    pub min_intervals: usize,
    pub min_bpm: f32,
    pub max_bpm: f32,
    pub default_bpm: f32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            peak_threshold: 180.0,
            refractory_ms: 200.0,
            max_peaks: 10,
            max_intervals: 8,
            min_intervals: 4,
            min_bpm: 60.0,
            max_bpm: 200.0,
            default_bpm: 120.0,
        }
    }
}

/// Particle spawning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Particles added per unit of normalized bass
    pub bass_weight: f32,
    pub mid_weight: f32,
    pub treble_weight: f32,
    /// Tempo at which motion runs at `bpm_damping` speed
    pub reference_bpm: f32,
    pub bpm_damping: f32,
    /// Launch speed in pixels per tick before tempo scaling
    pub base_speed: f32,
    pub explosion_strength: f32,
    /// Exponent applied to normalized bass for the explosion impulse
    pub explosion_exponent: f32,
    pub bass_color_threshold: f32,
    pub mid_color_threshold: f32,
    pub treble_color_threshold: f32,
    /// Hue centers in degrees
    pub bass_hue: f32,
    pub mid_hue: f32,
    pub treble_hue: f32,
    /// Maximum hue offset in degrees around a band's center
    pub hue_jitter: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Scale lost per tick
    pub scale_decay: f32,
    /// Lifetime in ticks
    pub base_lifetime: u32,
    pub lifetime_jitter: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            bass_weight: 8.0,
            mid_weight: 5.0,
            treble_weight: 3.0,
            reference_bpm: 120.0,
            bpm_damping: 0.75,
            base_speed: 2.0,
            explosion_strength: 4.0,
            explosion_exponent: 0.5,
            bass_color_threshold: 0.6,
            mid_color_threshold: 0.5,
            treble_color_threshold: 0.4,
            bass_hue: 0.0,
            mid_hue: 120.0,
            treble_hue: 240.0,
            hue_jitter: 30.0,
            size_min: 2.0,
            size_max: 8.0,
            scale_decay: 0.005,
            base_lifetime: 60,
            lifetime_jitter: 40,
        }
    }
}

/// Particle pool physics parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of live particles
    pub capacity: usize,
    /// Velocity multiplier applied every tick (< 1)
    pub velocity_damping: f32,
    /// Downward velocity added every tick before tempo scaling
    pub gravity: f32,
    pub min_scale: f32,
    /// Hue advance per tick in degrees
    pub hue_drift: f32,
    /// Distance outside the viewport before a particle wraps
    pub wrap_margin: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 250,
            velocity_damping: 0.98,
            gravity: 0.05,
            min_scale: 0.1,
            hue_drift: 0.5,
            wrap_margin: 20.0,
        }
    }
}

/// Tick loop and host integration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Nominal host refresh rate, used by offline clocks and WAV sources
    pub frames_per_second: u32,
    /// Log statistics every N ticks
    pub log_every_n_frames: u64,
    pub initial_width: f32,
    pub initial_height: f32,
    /// Fixed seed for particle randomness; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            log_every_n_frames: 300,
            initial_width: 800.0,
            initial_height: 600.0,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// Missing fields take their defaults. If the file cannot be read or
    /// parsed, the full default configuration is returned and a warning is
    /// logged.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default asset location
    pub fn load() -> Self {
        Self::load_from_file("assets/pulsefield.json")
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), VisualizerError> {
        let features = &self.features;
        if !(features.bass_split > 0.0
            && features.bass_split < features.mid_split
            && features.mid_split < 1.0)
        {
            return Err(invalid(format!(
                "band splits must satisfy 0 < bass_split < mid_split < 1 (got {} / {})",
                features.bass_split, features.mid_split
            )));
        }
        if !(features.max_magnitude.is_finite() && features.max_magnitude > 0.0) {
            return Err(invalid(format!(
                "max_magnitude must be positive (got {})",
                features.max_magnitude
            )));
        }

        let tempo = &self.tempo;
        if !(tempo.min_bpm > 0.0 && tempo.min_bpm < tempo.max_bpm) {
            return Err(invalid(format!(
                "tempo range must satisfy 0 < min_bpm < max_bpm (got {} / {})",
                tempo.min_bpm, tempo.max_bpm
            )));
        }
        if tempo.default_bpm < tempo.min_bpm || tempo.default_bpm > tempo.max_bpm {
            return Err(invalid(format!(
                "default_bpm {} outside [{}, {}]",
                tempo.default_bpm, tempo.min_bpm, tempo.max_bpm
            )));
        }
        if tempo.min_intervals == 0 || tempo.min_intervals > tempo.max_intervals {
            return Err(invalid(format!(
                "min_intervals must be in 1..={} (got {})",
                tempo.max_intervals, tempo.min_intervals
            )));
        }
        if tempo.max_peaks == 0 || !(tempo.refractory_ms >= 0.0) {
            return Err(invalid("max_peaks must be > 0 and refractory_ms >= 0".to_string()));
        }

        let spawn = &self.spawn;
        if !(spawn.reference_bpm > 0.0) {
            return Err(invalid("reference_bpm must be positive".to_string()));
        }
        if !(spawn.size_min >= 0.0 && spawn.size_min < spawn.size_max) {
            return Err(invalid(format!(
                "size range must satisfy 0 <= size_min < size_max (got {} / {})",
                spawn.size_min, spawn.size_max
            )));
        }
        if spawn.base_lifetime == 0 || spawn.base_lifetime.checked_add(spawn.lifetime_jitter).is_none() {
            return Err(invalid(format!(
                "lifetime must satisfy base_lifetime >= 1 and base_lifetime + lifetime_jitter <= {} (got {} + {})",
                u32::MAX,
                spawn.base_lifetime,
                spawn.lifetime_jitter
            )));
        }

        let pool = &self.pool;
        if !(pool.velocity_damping > 0.0 && pool.velocity_damping < 1.0) {
            return Err(invalid(format!(
                "velocity_damping must be in (0, 1) (got {})",
                pool.velocity_damping
            )));
        }
        if !(pool.min_scale > 0.0) {
            return Err(invalid("min_scale must be positive".to_string()));
        }

        if self.runtime.frames_per_second == 0 {
            return Err(invalid("frames_per_second must be > 0".to_string()));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> VisualizerError {
    VisualizerError::InvalidConfig { reason }
}
