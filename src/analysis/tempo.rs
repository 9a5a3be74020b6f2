// TempoEstimator - peak-interval tempo tracking
//
// A low-complexity heuristic, not a beat tracker: the bass level stream is
// debounced into discrete peaks, and the mean of the recent inter-peak
// intervals is converted to BPM.
//
// Algorithm:
// 1. Peak when bass_level > threshold and at least `refractory_ms` has
//    elapsed since the last accepted peak
// 2. Push the interval since the previous peak into a bounded FIFO
// 3. With >= `min_intervals` intervals: candidate = 60000 / mean(intervals)
// 4. Accept the candidate only if it lies in [min_bpm, max_bpm]; otherwise
//    the previous estimate is kept (outlier rejection)
// 5. Push the peak timestamp into a bounded FIFO regardless of step 4
//
// Syncopated or sub-threshold material will mislead it. That is accepted.

use std::collections::VecDeque;

use crate::config::TempoConfig;

/// Stateful tempo estimator fed one bass level per tick
#[derive(Debug, Clone)]
pub struct TempoEstimator {
    config: TempoConfig,
    peaks: VecDeque<f64>,
    intervals: VecDeque<f64>,
    last_peak_ms: Option<f64>,
    bpm: f32,
}

impl TempoEstimator {
    pub fn new(config: TempoConfig) -> Self {
        Self {
            peaks: VecDeque::with_capacity(config.max_peaks),
            intervals: VecDeque::with_capacity(config.max_intervals),
            last_peak_ms: None,
            bpm: config.default_bpm,
            config,
        }
    }

    /// Fold one bass level into the estimate
    ///
    /// # Arguments
    /// * `bass_level` - Bass band level on the same scale as the threshold
    /// * `timestamp_ms` - Monotonic host timestamp in milliseconds
    ///
    /// # Returns
    /// The current BPM estimate (always within the configured range)
    pub fn observe(&mut self, bass_level: f32, timestamp_ms: f64) -> f32 {
        if !bass_level.is_finite() || !timestamp_ms.is_finite() {
            return self.bpm;
        }
        if bass_level <= self.config.peak_threshold {
            return self.bpm;
        }

        if let Some(last_peak) = self.last_peak_ms {
            let interval = timestamp_ms - last_peak;
            if interval < self.config.refractory_ms {
                return self.bpm;
            }

            self.intervals.push_back(interval);
            if self.intervals.len() > self.config.max_intervals {
                self.intervals.pop_front();
            }

            if self.intervals.len() >= self.config.min_intervals {
                self.update_bpm();
            }
        }

        self.last_peak_ms = Some(timestamp_ms);
        self.peaks.push_back(timestamp_ms);
        if self.peaks.len() > self.config.max_peaks {
            self.peaks.pop_front();
        }

        tracing::trace!(
            "[Tempo] Peak at {:.1}ms (intervals={}, bpm={:.1})",
            timestamp_ms,
            self.intervals.len(),
            self.bpm
        );

        self.bpm
    }

    fn update_bpm(&mut self) {
        let mean_interval = self.intervals.iter().sum::<f64>() / self.intervals.len() as f64;
        if mean_interval <= 0.0 {
            return;
        }

        let candidate = (60_000.0 / mean_interval) as f32;
        if candidate >= self.config.min_bpm && candidate <= self.config.max_bpm {
            self.bpm = candidate;
        }
    }

    /// Clear all history and return to the default tempo
    pub fn reset(&mut self) {
        self.peaks.clear();
        self.intervals.clear();
        self.last_peak_ms = None;
        self.bpm = self.config.default_bpm;
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn last_peak_ms(&self) -> Option<f64> {
        self.last_peak_ms
    }
}

impl Default for TempoEstimator {
    fn default() -> Self {
        Self::new(TempoConfig::default())
    }
}
