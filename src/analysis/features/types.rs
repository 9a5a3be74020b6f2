// Types module - Data structures for spectrum input and audio features
//
// This module defines the values that flow through the feature extraction
// pipeline: the incoming spectrum snapshot and the per-tick feature set.

use serde::{Deserialize, Serialize};

/// One snapshot of spectral magnitudes for a single analysis tick
///
/// Magnitudes are expected on the 0-255 byte scale produced by analyser
/// front ends. Values outside that range, NaN and infinities are tolerated
/// here and sanitized by the extractor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrumFrame {
    magnitudes: Vec<f32>,
}

impl SpectrumFrame {
    pub fn new(magnitudes: Vec<f32>) -> Self {
        Self { magnitudes }
    }

    /// Build a frame from byte magnitudes (as delivered by most analysers)
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            magnitudes: bytes.iter().map(|&b| b as f32).collect(),
        }
    }

    /// All-zero frame with `len` bins
    pub fn silent(len: usize) -> Self {
        Self {
            magnitudes: vec![0.0; len],
        }
    }

    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

impl From<Vec<f32>> for SpectrumFrame {
    fn from(magnitudes: Vec<f32>) -> Self {
        Self::new(magnitudes)
    }
}

/// Mean magnitude of the three contiguous frequency bands
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandLevels {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

/// Perceptual features extracted from one spectrum frame
///
/// All levels share the 0-255 scale of the input spectrum. A fresh value is
/// produced every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// Root-mean-square magnitude over the whole spectrum
    pub volume: f32,

    /// Mean magnitude of the bass band
    pub bass: f32,

    /// Mean magnitude of the mid band
    pub mid: f32,

    /// Mean magnitude of the treble band
    pub treble: f32,

    /// Plain mean magnitude over the whole spectrum
    ///
    /// Kept separate from `volume`: RMS weights loud bins more heavily, and
    /// downstream mappings rely on the difference.
    pub energy: f32,

    /// Frequency in Hz of the loudest bin
    pub dominant_frequency: f32,

    /// Current tempo estimate, always within the configured BPM range
    pub bpm: f32,
}

impl AudioFeatures {
    /// Features of a silent or malformed frame
    pub fn silent(bpm: f32) -> Self {
        Self {
            volume: 0.0,
            bass: 0.0,
            mid: 0.0,
            treble: 0.0,
            energy: 0.0,
            dominant_frequency: 0.0,
            bpm,
        }
    }
}
