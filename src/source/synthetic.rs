// Synthetic source - generated spectra with a steady bass pulse
//
// Produces byte-scale spectra whose bass band spikes on every beat of the
// requested tempo and decays exponentially in between. Mid and treble bands
// carry seeded noise, so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SpectrumSource;
use crate::analysis::SpectrumFrame;

const DEFAULT_SAMPLE_RATE: u32 = 44100;
const DEFAULT_BIN_COUNT: usize = 256;
const DEFAULT_FRAMES_PER_SECOND: u32 = 60;

/// Pulse decay time constant in milliseconds
const PULSE_DECAY_MS: f64 = 60.0;
/// Bass floor between beats
const BASS_FLOOR: (f32, f32) = (10.0, 40.0);
const MID_NOISE: (f32, f32) = (20.0, 120.0);
const TREBLE_NOISE: (f32, f32) = (10.0, 80.0);

#[derive(Debug, Clone)]
pub struct SyntheticPulseSource {
    bpm: f32,
    sample_rate: u32,
    bin_count: usize,
    frames_per_second: u32,
    frame_limit: Option<usize>,
    frame_index: usize,
    rng: StdRng,
}

impl SyntheticPulseSource {
    /// Endless source pulsing at `bpm` with noise drawn from `seed`
    pub fn new(bpm: f32, seed: u64) -> Self {
        Self {
            bpm,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bin_count: DEFAULT_BIN_COUNT,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            frame_limit: None,
            frame_index: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stop after `frames` frames
    pub fn with_frame_limit(mut self, frames: usize) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn with_frames_per_second(mut self, frames_per_second: u32) -> Self {
        self.frames_per_second = frames_per_second.max(1);
        self
    }

    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Frames produced so far
    pub fn frames_emitted(&self) -> usize {
        self.frame_index
    }

    /// Stream time of frame `index` in milliseconds
    pub fn frame_time_ms(&self, index: usize) -> f64 {
        index as f64 * 1000.0 / self.frames_per_second as f64
    }

    /// Bass pulse level at `time_ms`, 0 when the tempo is unusable
    fn pulse_level(&self, time_ms: f64) -> f32 {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return 0.0;
        }
        let period_ms = 60_000.0 / self.bpm as f64;
        let phase_ms = time_ms % period_ms;
        (255.0 * (-phase_ms / PULSE_DECAY_MS).exp()) as f32
    }
}

impl SpectrumSource for SyntheticPulseSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> Option<SpectrumFrame> {
        if self
            .frame_limit
            .is_some_and(|limit| self.frame_index >= limit)
        {
            return None;
        }

        let pulse = self.pulse_level(self.frame_time_ms(self.frame_index));
        let bass_end = self.bin_count / 10;
        let mid_end = self.bin_count * 6 / 10;

        let magnitudes = (0..self.bin_count)
            .map(|bin| {
                if bin < bass_end {
                    pulse.max(self.rng.gen_range(BASS_FLOOR.0..BASS_FLOOR.1))
                } else if bin < mid_end {
                    self.rng.gen_range(MID_NOISE.0..MID_NOISE.1)
                } else {
                    self.rng.gen_range(TREBLE_NOISE.0..TREBLE_NOISE.1)
                }
            })
            .collect();

        self.frame_index += 1;
        Some(SpectrumFrame::new(magnitudes))
    }
}
