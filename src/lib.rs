// Pulsefield Core - audio-reactive particle visualizer
// Spectrum frames in, particle scenes out, one tick per host frame

// Module declarations
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod particles;
pub mod source;

// Re-exports for convenience
pub use analysis::{AudioFeatureEngine, AudioFeatures, SpectrumFrame};
pub use config::AppConfig;
pub use engine::{FrameClock, FrameOutput, ManualFrameClock, SceneRenderer, SystemFrameClock, Visualizer};
pub use error::{ErrorCode, VisualizerError};
pub use particles::{ParticleVisual, SceneSnapshot, Shape};
pub use source::{FrameQueue, SpectrumSource, SyntheticPulseSource, WavSpectrumSource};
