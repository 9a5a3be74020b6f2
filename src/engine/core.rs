//! Visualizer: the per-tick orchestration layer.
//!
//! Ties the audio boundary (`SpectrumSource`), feature analysis, particle
//! spawning and the particle pool into one `tick()` driven by a host clock.
//! All methods take `&mut self`, so a stop or resize can never interleave
//! with a tick in progress.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{AudioFeatureEngine, AudioFeatures};
use crate::config::AppConfig;
use crate::engine::clock::FrameClock;
use crate::error::VisualizerError;
use crate::particles::{ParticlePool, ParticleSpawner, SceneSnapshot};
use crate::source::SpectrumSource;

/// Everything produced by one visualization tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Zero-based tick index since `start()`
    pub frame_index: u64,
    pub timestamp_ms: f64,
    pub features: AudioFeatures,
    pub scene: SceneSnapshot,
}

/// Render boundary. Receives each frame's scene and features; one-way.
pub trait SceneRenderer {
    fn render(&mut self, scene: &SceneSnapshot, features: &AudioFeatures);
}

/// Audio-reactive particle visualizer.
pub struct Visualizer {
    config: AppConfig,
    engine: AudioFeatureEngine,
    spawner: ParticleSpawner,
    pool: ParticlePool,
    source: Option<Box<dyn SpectrumSource>>,
    running: bool,
    width: f32,
    height: f32,
    frames_processed: u64,
}

impl Visualizer {
    /// Create a visualizer with the default configuration.
    pub fn new() -> Self {
        Self::build(AppConfig::default())
    }

    /// Create a visualizer from a validated configuration.
    ///
    /// A `runtime.seed` makes particle spawning deterministic.
    pub fn with_config(config: AppConfig) -> Result<Self, VisualizerError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: AppConfig) -> Self {
        let spawner = match config.runtime.seed {
            Some(seed) => ParticleSpawner::with_seed(&config, seed),
            None => ParticleSpawner::new(&config),
        };
        let width = config.runtime.initial_width;
        let height = config.runtime.initial_height;

        Self {
            engine: AudioFeatureEngine::new(&config),
            spawner,
            pool: ParticlePool::new(config.pool.clone(), width, height),
            source: None,
            running: false,
            width,
            height,
            frames_processed: 0,
            config,
        }
    }

    /// Begin pulling frames from `source`.
    ///
    /// # Errors
    /// * `AlreadyRunning` if a previous `start()` was not stopped
    /// * `SourceNotConfigured` if `source` is `None`; nothing is scheduled
    pub fn start(
        &mut self,
        source: Option<Box<dyn SpectrumSource>>,
    ) -> Result<(), VisualizerError> {
        if self.running {
            return Err(VisualizerError::AlreadyRunning);
        }
        let source = source.ok_or(VisualizerError::SourceNotConfigured)?;

        info!(
            sample_rate = source.sample_rate(),
            width = self.width,
            height = self.height,
            "visualizer started"
        );
        self.source = Some(source);
        self.frames_processed = 0;
        self.running = true;
        Ok(())
    }

    /// Halt ticking, release the source, clear particles and reset tempo.
    ///
    /// # Errors
    /// `NotRunning` if the visualizer was never started or already stopped
    pub fn stop(&mut self) -> Result<(), VisualizerError> {
        if !self.running {
            return Err(VisualizerError::NotRunning);
        }
        self.halt();
        info!(frames = self.frames_processed, "visualizer stopped");
        Ok(())
    }

    fn halt(&mut self) {
        self.running = false;
        self.source = None;
        self.pool.clear();
        self.engine.reset();
    }

    /// Update spawn and wrap bounds for subsequent ticks.
    ///
    /// # Errors
    /// `InvalidViewport` for zero, negative or non-finite dimensions
    pub fn on_resize(&mut self, width: f32, height: f32) -> Result<(), VisualizerError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(VisualizerError::InvalidViewport { width, height });
        }
        self.width = width;
        self.height = height;
        self.pool.set_viewport(width, height);
        debug!(width, height, "viewport resized");
        Ok(())
    }

    /// Run one visualization tick at `timestamp_ms`.
    ///
    /// Returns `None` when not running, or when the source just ran dry (the
    /// visualizer then stops itself with the same cleanup as `stop()`).
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<FrameOutput> {
        if !self.running {
            return None;
        }
        let source = self.source.as_mut()?;

        let Some(frame) = source.next_frame() else {
            self.halt();
            info!(frames = self.frames_processed, "spectrum source exhausted, visualizer stopped");
            return None;
        };
        let sample_rate = source.sample_rate();

        let features = self.engine.analyze(&frame, sample_rate, timestamp_ms);
        let spawned = self.spawner.spawn(&features, self.width, self.height);
        let multiplier = self.spawner.bpm_multiplier(&features);
        let scene = self.pool.tick(spawned, multiplier);

        let frame_index = self.frames_processed;
        self.frames_processed += 1;

        let log_every = self.config.runtime.log_every_n_frames;
        if log_every > 0 && self.frames_processed % log_every == 0 {
            debug!(
                frames = self.frames_processed,
                particles = scene.len(),
                bpm = features.bpm,
                volume = features.volume,
                "visualizer progress"
            );
        }

        Some(FrameOutput {
            frame_index,
            timestamp_ms,
            features,
            scene,
        })
    }

    /// Read `clock`, tick, and hand the frame to `renderer`.
    ///
    /// # Returns
    /// The rendered frame, or `None` if no frame was produced
    pub fn run_frame<C, R>(&mut self, clock: &C, renderer: &mut R) -> Option<FrameOutput>
    where
        C: FrameClock + ?Sized,
        R: SceneRenderer + ?Sized,
    {
        let output = self.tick(clock.now_ms())?;
        renderer.render(&output.scene, &output.features);
        Some(output)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks completed since the last `start()`
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn particle_count(&self) -> usize {
        self.pool.len()
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Current tempo estimate in BPM
    pub fn bpm(&self) -> f32 {
        self.engine.tempo().bpm()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
