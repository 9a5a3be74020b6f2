// FeatureExtractor - stateless level features for audio-reactive visuals
//
// This module turns a magnitude spectrum into the levels that drive the
// particle simulation. The spectrum itself is produced by an external
// analyser; nothing here performs a transform.
//
// Module organization:
// - types: Data structures (SpectrumFrame, BandLevels, AudioFeatures)
// - spectral: Pure level computations (bands, RMS volume, mean energy, peak bin)
// - mod.rs: Coordinator (FeatureExtractor)
//
// Features extracted:
// 1. Band levels: mean magnitude of bass / mid / treble (10% / 50% / 40% split)
// 2. Volume: RMS magnitude of the whole spectrum
// 3. Energy: plain mean magnitude of the whole spectrum
// 4. Dominant frequency: loudest bin converted to Hz

mod spectral;
mod types;

pub use spectral::sanitize_magnitude;
pub use types::{AudioFeatures, BandLevels, SpectrumFrame};

use spectral::SpectralFeatures;

use crate::config::FeatureConfig;

/// FeatureExtractor coordinates per-frame level extraction
///
/// Frames shorter than the configured minimum are treated as malformed and
/// produce zero levels instead of an error.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    spectral_features: SpectralFeatures,
    min_frame_len: usize,
}

impl FeatureExtractor {
    pub fn new(config: &FeatureConfig) -> Self {
        Self {
            spectral_features: SpectralFeatures::new(
                config.bass_split,
                config.mid_split,
                config.max_magnitude,
            ),
            min_frame_len: config.min_frame_len,
        }
    }

    /// True when the frame is too short to carry meaningful bands
    pub fn is_undersized(&self, frame: &SpectrumFrame) -> bool {
        frame.is_empty() || frame.len() < self.min_frame_len
    }

    /// Mean magnitude of the bass, mid and treble bands
    pub fn extract_bands(&self, frame: &SpectrumFrame) -> BandLevels {
        if self.is_undersized(frame) {
            return BandLevels::default();
        }
        self.spectral_features.extract_bands(frame.magnitudes())
    }

    /// RMS magnitude over the whole frame
    pub fn compute_volume(&self, frame: &SpectrumFrame) -> f32 {
        if self.is_undersized(frame) {
            return 0.0;
        }
        self.spectral_features.compute_volume(frame.magnitudes())
    }

    /// Mean magnitude over the whole frame
    pub fn compute_energy(&self, frame: &SpectrumFrame) -> f32 {
        if self.is_undersized(frame) {
            return 0.0;
        }
        self.spectral_features.compute_energy(frame.magnitudes())
    }

    /// Loudest bin in Hz
    ///
    /// # Arguments
    /// * `frame` - Magnitude spectrum covering 0 Hz to Nyquist
    /// * `sample_rate` - Sample rate of the analysed audio in Hz
    pub fn dominant_frequency(&self, frame: &SpectrumFrame, sample_rate: u32) -> f32 {
        if self.is_undersized(frame) {
            return 0.0;
        }
        self.spectral_features
            .dominant_frequency(frame.magnitudes(), sample_rate)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(&FeatureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Spectrum with a single loud bin and a low noise floor
    fn generate_tone_spectrum(len: usize, bin: usize, level: f32) -> SpectrumFrame {
        let mut magnitudes = vec![5.0; len];
        magnitudes[bin] = level;
        SpectrumFrame::new(magnitudes)
    }

    #[test]
    fn test_bands_within_magnitude_range() {
        let extractor = FeatureExtractor::default();
        let frame = SpectrumFrame::new((0..256).map(|i| (i % 256) as f32).collect());
        let bands = extractor.extract_bands(&frame);

        for level in [bands.bass, bands.mid, bands.treble] {
            assert!(
                (0.0..=255.0).contains(&level),
                "band level {} outside [0, 255]",
                level
            );
        }
        assert!(bands.bass < bands.mid && bands.mid < bands.treble);
    }

    #[test]
    fn test_low_tone_lands_in_bass() {
        let extractor = FeatureExtractor::default();
        let frame = generate_tone_spectrum(256, 4, 250.0);
        let bands = extractor.extract_bands(&frame);

        assert!(bands.bass > bands.mid);
        assert!(bands.bass > bands.treble);
        let freq = extractor.dominant_frequency(&frame, 44100);
        assert!((freq - 4.0 * 44100.0 / 512.0).abs() < 1e-3);
    }

    #[test]
    fn test_volume_exceeds_energy_for_peaky_spectrum() {
        let extractor = FeatureExtractor::default();
        let frame = generate_tone_spectrum(256, 100, 255.0);
        let volume = extractor.compute_volume(&frame);
        let energy = extractor.compute_energy(&frame);
        assert!(
            volume > energy,
            "RMS volume {} should exceed mean energy {} for a peaky spectrum",
            volume,
            energy
        );
    }

    #[test]
    fn test_undersized_frame_yields_zero() {
        let extractor = FeatureExtractor::default();
        let frame = SpectrumFrame::new(vec![255.0; 4]);

        assert!(extractor.is_undersized(&frame));
        assert_eq!(extractor.extract_bands(&frame), BandLevels::default());
        assert_eq!(extractor.compute_volume(&frame), 0.0);
        assert_eq!(extractor.compute_energy(&frame), 0.0);
        assert_eq!(extractor.dominant_frequency(&frame, 44100), 0.0);
    }

    #[test]
    fn test_empty_frame_yields_zero() {
        let extractor = FeatureExtractor::default();
        let frame = SpectrumFrame::default();
        assert_eq!(extractor.compute_volume(&frame), 0.0);
        assert_eq!(extractor.dominant_frequency(&frame, 44100), 0.0);
    }

    #[test]
    fn test_from_bytes() {
        let frame = SpectrumFrame::from_bytes(&[0, 128, 255]);
        assert_eq!(frame.magnitudes(), &[0.0, 128.0, 255.0]);
    }
}
