// FFT module - audio window to byte-scaled magnitude spectrum
//
// Mirrors the behaviour of a typical analyser front end: Hann window,
// forward FFT, magnitude normalised by the window length, exponential
// smoothing across calls, then a decibel range mapped onto 0-255.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::analysis::SpectrumFrame;
use crate::error::VisualizerError;

/// Default FFT window size (yields 256 bins)
pub const DEFAULT_FFT_SIZE: usize = 512;

/// Smallest and largest accepted FFT window
const MIN_FFT_SIZE: usize = 32;
const MAX_FFT_SIZE: usize = 32768;

/// Decibel range mapped onto the byte scale
const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;

/// Default temporal smoothing between successive spectra
const DEFAULT_SMOOTHING: f32 = 0.8;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window (pre-computed)
    window: Vec<f32>,
    smoothing: f32,
    /// Smoothed linear magnitudes from the previous call
    smoothed: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer
    ///
    /// # Arguments
    /// * `fft_size` - Window length, a power of two in [32, 32768]
    ///
    /// # Errors
    /// `InvalidConfig` when `fft_size` is out of range or not a power of two
    pub fn new(fft_size: usize) -> Result<Self, VisualizerError> {
        if !fft_size.is_power_of_two() || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size) {
            return Err(VisualizerError::InvalidConfig {
                reason: format!(
                    "fft_size must be a power of two in [{}, {}], got {}",
                    MIN_FFT_SIZE, MAX_FFT_SIZE, fft_size
                ),
            });
        }

        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Ok(Self {
            fft,
            fft_size,
            window,
            smoothing: DEFAULT_SMOOTHING,
            smoothed: vec![0.0; fft_size / 2],
        })
    }

    /// Override the temporal smoothing constant (clamped to [0, 1))
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = if smoothing.is_finite() {
            smoothing.clamp(0.0, 0.999)
        } else {
            DEFAULT_SMOOTHING
        };
        self
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins each spectrum carries
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Forget the smoothing history
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|m| *m = 0.0);
    }

    /// Analyse the most recent `fft_size` samples of `audio`
    ///
    /// Shorter input is zero-padded at the front so the newest sample always
    /// sits at the end of the window.
    pub fn analyze(&mut self, audio: &[f32]) -> SpectrumFrame {
        let tail = &audio[audio.len().saturating_sub(self.fft_size)..];
        let padding = self.fft_size - tail.len();

        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(self.fft_size);
        buffer.extend((0..padding).map(|_| Complex::new(0.0, 0.0)));
        buffer.extend(tail.iter().enumerate().map(|(i, &sample)| {
            let sample = if sample.is_finite() { sample } else { 0.0 };
            Complex::new(sample * self.window[padding + i], 0.0)
        }));

        self.fft.process(&mut buffer);

        let bins = self.bin_count();
        let smoothing = self.smoothing;
        let scale = 1.0 / self.fft_size as f32;
        let byte_scale = 255.0 / (MAX_DECIBELS - MIN_DECIBELS);
        let magnitudes = buffer[..bins]
            .iter()
            .zip(self.smoothed.iter_mut())
            .map(|(bin, smoothed)| {
                *smoothed = smoothing * *smoothed + (1.0 - smoothing) * bin.norm() * scale;
                if *smoothed <= 0.0 {
                    return 0.0;
                }
                let decibels = 20.0 * smoothed.log10();
                ((decibels - MIN_DECIBELS) * byte_scale).clamp(0.0, 255.0).floor()
            })
            .collect();

        SpectrumFrame::new(magnitudes)
    }
}
