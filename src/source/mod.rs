// Source module - spectrum providers at the audio boundary
//
// The visualizer core never touches raw audio. It pulls one magnitude
// spectrum per tick from a SpectrumSource. This module defines that boundary
// and ships reference providers so the core can run end to end.
//
// Module organization:
// - fft: SpectrumAnalyzer (windowed FFT -> byte-scaled magnitudes)
// - wav: WavSpectrumSource (hound decoding + analyzer)
// - synthetic: SyntheticPulseSource (generated spectra with bass pulses)
// - FrameQueue (below): replay of pre-recorded frames

mod fft;
mod synthetic;
mod wav;

pub use fft::{SpectrumAnalyzer, DEFAULT_FFT_SIZE};
pub use synthetic::SyntheticPulseSource;
pub use wav::WavSpectrumSource;

use std::collections::VecDeque;

use crate::analysis::SpectrumFrame;

/// Provider of one magnitude spectrum per visualization tick
///
/// Implementations return `None` once the stream is exhausted; the
/// visualizer then stops itself.
pub trait SpectrumSource: Send {
    /// Sample rate of the audio behind the spectra, in Hz
    fn sample_rate(&self) -> u32;

    /// Next spectrum frame, or `None` at end of stream
    fn next_frame(&mut self) -> Option<SpectrumFrame>;
}

impl<S: SpectrumSource + ?Sized> SpectrumSource for Box<S> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn next_frame(&mut self) -> Option<SpectrumFrame> {
        (**self).next_frame()
    }
}

/// Source over a pre-recorded sequence of frames
#[derive(Debug, Clone)]
pub struct FrameQueue {
    sample_rate: u32,
    frames: VecDeque<SpectrumFrame>,
}

impl FrameQueue {
    pub fn new(sample_rate: u32, frames: Vec<SpectrumFrame>) -> Self {
        Self {
            sample_rate,
            frames: frames.into(),
        }
    }

    /// Append a frame to the end of the queue
    pub fn push(&mut self, frame: SpectrumFrame) {
        self.frames.push_back(frame);
    }

    /// Frames not yet consumed
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl SpectrumSource for FrameQueue {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> Option<SpectrumFrame> {
        self.frames.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_queue_replays_in_order() {
        let mut queue = FrameQueue::new(
            44100,
            vec![SpectrumFrame::silent(4), SpectrumFrame::new(vec![1.0; 4])],
        );
        assert_eq!(queue.sample_rate(), 44100);
        assert_eq!(queue.remaining(), 2);

        assert_eq!(queue.next_frame(), Some(SpectrumFrame::silent(4)));
        assert_eq!(queue.next_frame(), Some(SpectrumFrame::new(vec![1.0; 4])));
        assert_eq!(queue.next_frame(), None);
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut queue = FrameQueue::new(22050, Vec::new());
        queue.push(SpectrumFrame::silent(8));
        let mut boxed: Box<dyn SpectrumSource> = Box::new(queue);

        assert_eq!(boxed.sample_rate(), 22050);
        assert!(boxed.next_frame().is_some());
        assert!(boxed.next_frame().is_none());
    }
}
