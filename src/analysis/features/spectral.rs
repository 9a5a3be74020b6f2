// Spectral module - Level features from magnitude spectra
//
// Every function here is pure and allocation-free. Magnitudes pass through
// `sanitize_magnitude` before use so a single corrupt bin can never poison
// the aggregates.

use std::ops::Range;

use super::types::BandLevels;

/// Clamp a raw magnitude into `[0, max_magnitude]`, mapping NaN/inf to 0
#[inline]
pub fn sanitize_magnitude(magnitude: f32, max_magnitude: f32) -> f32 {
    if magnitude.is_finite() && magnitude > 0.0 {
        magnitude.min(max_magnitude)
    } else {
        0.0
    }
}

/// Band split and normalization parameters
#[derive(Debug, Clone, Copy)]
pub struct SpectralFeatures {
    bass_split: f32,
    mid_split: f32,
    max_magnitude: f32,
}

impl SpectralFeatures {
    /// Create a spectral features processor
    ///
    /// # Arguments
    /// * `bass_split` - Fraction of bins (from bin 0) in the bass band
    /// * `mid_split` - Fraction of bins where the mid band ends
    /// * `max_magnitude` - Upper clamp for any single bin
    pub fn new(bass_split: f32, mid_split: f32, max_magnitude: f32) -> Self {
        Self {
            bass_split,
            mid_split,
            max_magnitude,
        }
    }

    /// Contiguous bin ranges for bass, mid and treble
    ///
    /// The three ranges partition `0..len` with no overlap or gap.
    pub fn band_ranges(&self, len: usize) -> (Range<usize>, Range<usize>, Range<usize>) {
        let bass_end = split_index(len, self.bass_split);
        let mid_end = split_index(len, self.mid_split).max(bass_end);
        (0..bass_end, bass_end..mid_end, mid_end..len)
    }

    /// Mean magnitude of each band
    pub fn extract_bands(&self, spectrum: &[f32]) -> BandLevels {
        let (bass, mid, treble) = self.band_ranges(spectrum.len());
        BandLevels {
            bass: self.mean(&spectrum[bass]),
            mid: self.mean(&spectrum[mid]),
            treble: self.mean(&spectrum[treble]),
        }
    }

    /// Root-mean-square magnitude
    ///
    /// Formula: volume = sqrt(Σ|X[i]|² / N)
    pub fn compute_volume(&self, spectrum: &[f32]) -> f32 {
        if spectrum.is_empty() {
            return 0.0;
        }

        let sum_squares: f32 = spectrum
            .iter()
            .map(|&mag| {
                let mag = sanitize_magnitude(mag, self.max_magnitude);
                mag * mag
            })
            .sum();

        (sum_squares / spectrum.len() as f32).sqrt()
    }

    /// Arithmetic mean magnitude
    pub fn compute_energy(&self, spectrum: &[f32]) -> f32 {
        self.mean(spectrum)
    }

    /// Frequency of the loudest bin
    ///
    /// Formula: f = argmax(|X[i]|) × sample_rate / (2 × N)
    ///
    /// The first bin wins ties, so an all-zero spectrum reports 0 Hz.
    pub fn dominant_frequency(&self, spectrum: &[f32], sample_rate: u32) -> f32 {
        if spectrum.is_empty() {
            return 0.0;
        }

        let mut peak_bin = 0;
        let mut peak_mag = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            let mag = sanitize_magnitude(mag, self.max_magnitude);
            if mag > peak_mag {
                peak_mag = mag;
                peak_bin = i;
            }
        }

        peak_bin as f32 * sample_rate as f32 / (2.0 * spectrum.len() as f32)
    }

    fn mean(&self, values: &[f32]) -> f32 {
        if values.is_empty() {
            return 0.0;
        }

        let sum: f32 = values
            .iter()
            .map(|&mag| sanitize_magnitude(mag, self.max_magnitude))
            .sum();
        sum / values.len() as f32
    }
}

fn split_index(len: usize, fraction: f32) -> usize {
    ((len as f64 * fraction as f64).floor() as usize).min(len)
}
