// WAV source - decoded file audio as a stream of spectra

use std::path::Path;

use super::fft::{SpectrumAnalyzer, DEFAULT_FFT_SIZE};
use super::SpectrumSource;
use crate::analysis::SpectrumFrame;
use crate::error::VisualizerError;

/// Spectrum source over a mono-mixed WAV file
///
/// Each frame advances one hop of `sample_rate / frames_per_second` samples
/// and analyses the window ending at the new read position.
pub struct WavSpectrumSource {
    samples: Vec<f32>,
    sample_rate: u32,
    hop: usize,
    cursor: usize,
    analyzer: SpectrumAnalyzer,
}

impl WavSpectrumSource {
    /// Open and fully decode a WAV file
    ///
    /// # Errors
    /// `SourceOpenFailed` when the file cannot be read, `SourceDecodeFailed`
    /// for malformed or unsupported sample data
    pub fn open<P: AsRef<Path>>(path: P, frames_per_second: u32) -> Result<Self, VisualizerError> {
        let (samples, sample_rate) = read_wav(path.as_ref())?;
        Self::from_samples(samples, sample_rate, frames_per_second, DEFAULT_FFT_SIZE)
    }

    /// Build a source over already decoded mono samples
    pub fn from_samples(
        samples: Vec<f32>,
        sample_rate: u32,
        frames_per_second: u32,
        fft_size: usize,
    ) -> Result<Self, VisualizerError> {
        if sample_rate == 0 || frames_per_second == 0 {
            return Err(VisualizerError::InvalidConfig {
                reason: format!(
                    "sample_rate ({}) and frames_per_second ({}) must be positive",
                    sample_rate, frames_per_second
                ),
            });
        }

        Ok(Self {
            samples,
            sample_rate,
            hop: (sample_rate / frames_per_second).max(1) as usize,
            cursor: 0,
            analyzer: SpectrumAnalyzer::new(fft_size)?,
        })
    }

    /// Samples advanced per frame
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Total frames the file yields
    pub fn frame_count(&self) -> usize {
        self.samples.len().div_ceil(self.hop)
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

impl SpectrumSource for WavSpectrumSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> Option<SpectrumFrame> {
        if self.cursor >= self.samples.len() {
            return None;
        }

        let end = (self.cursor + self.hop).min(self.samples.len());
        self.cursor = end;
        Some(self.analyzer.analyze(&self.samples[..end]))
    }
}

fn decode_error(path: &Path, err: hound::Error) -> VisualizerError {
    match VisualizerError::from(err) {
        VisualizerError::SourceDecodeFailed { reason } => VisualizerError::SourceDecodeFailed {
            reason: format!("{}: {}", path.display(), reason),
        },
        VisualizerError::SourceOpenFailed { reason } => VisualizerError::SourceOpenFailed {
            reason: format!("{}: {}", path.display(), reason),
        },
        other => other,
    }
}

fn read_wav(path: &Path) -> Result<(Vec<f32>, u32), VisualizerError> {
    let mut reader = hound::WavReader::open(path).map_err(|err| decode_error(path, err))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(VisualizerError::SourceDecodeFailed {
            reason: format!("{} has zero channels", path.display()),
        });
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|err| decode_error(path, err))?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(VisualizerError::SourceDecodeFailed {
                    reason: format!(
                        "unsupported bits_per_sample={} for {}",
                        spec.bits_per_sample,
                        path.display()
                    ),
                });
            }
            let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|v| v as f32 / full_scale))
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|err| decode_error(path, err))?
        }
    };

    Ok((downmix(&samples, spec.channels as usize), spec.sample_rate))
}

/// Average interleaved channels into one
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
        .collect()
}
