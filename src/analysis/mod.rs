// Analysis module - spectrum to audio feature pipeline
//
// This module composes the stateless feature extractor with the stateful
// tempo estimator into a single per-tick call.
//
// Architecture:
// - FeatureExtractor: bands, volume, energy, dominant frequency (pure)
// - TempoEstimator: bass peaks -> BPM (owns the only mutable state)
// - AudioFeatureEngine: analyze(frame) -> AudioFeatures

pub mod features;
pub mod tempo;

pub use features::{AudioFeatures, BandLevels, FeatureExtractor, SpectrumFrame};
pub use tempo::TempoEstimator;

use crate::config::AppConfig;

/// Per-tick feature engine
///
/// Memory use is bounded for any number of ticks: the only history kept is
/// the tempo estimator's fixed-size peak and interval buffers.
#[derive(Debug, Clone)]
pub struct AudioFeatureEngine {
    feature_extractor: FeatureExtractor,
    tempo_estimator: TempoEstimator,
}

impl AudioFeatureEngine {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            feature_extractor: FeatureExtractor::new(&config.features),
            tempo_estimator: TempoEstimator::new(config.tempo.clone()),
        }
    }

    /// Extract all features from one spectrum frame
    ///
    /// # Arguments
    /// * `frame` - Magnitude spectrum for this tick
    /// * `sample_rate` - Sample rate of the analysed audio in Hz
    /// * `timestamp_ms` - Monotonic host timestamp in milliseconds
    ///
    /// # Returns
    /// AudioFeatures for this tick. Malformed frames yield zero levels with
    /// the current tempo estimate.
    pub fn analyze(
        &mut self,
        frame: &SpectrumFrame,
        sample_rate: u32,
        timestamp_ms: f64,
    ) -> AudioFeatures {
        let bands = self.feature_extractor.extract_bands(frame);
        let bpm = self.tempo_estimator.observe(bands.bass, timestamp_ms);

        if self.feature_extractor.is_undersized(frame) {
            return AudioFeatures::silent(bpm);
        }

        AudioFeatures {
            volume: self.feature_extractor.compute_volume(frame),
            bass: bands.bass,
            mid: bands.mid,
            treble: bands.treble,
            energy: self.feature_extractor.compute_energy(frame),
            dominant_frequency: self.feature_extractor.dominant_frequency(frame, sample_rate),
            bpm,
        }
    }

    /// Forget all tempo history
    pub fn reset(&mut self) {
        self.tempo_estimator.reset();
    }

    pub fn tempo(&self) -> &TempoEstimator {
        &self.tempo_estimator
    }
}

impl Default for AudioFeatureEngine {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
