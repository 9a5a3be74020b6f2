//! Integration tests for the public visualizer API
//!
//! These tests drive the crate the way an embedding host would:
//! - Lifecycle: start -> tick -> stop, and self-stop at end of stream
//! - Feature extraction scenarios on hand-built spectra
//! - Particle pool bounds over long runs
//! - Error codes surfaced through the control surface

use pulsefield::analysis::{AudioFeatureEngine, AudioFeatures, SpectrumFrame};
use pulsefield::config::AppConfig;
use pulsefield::engine::{FrameClock, ManualFrameClock, SceneRenderer, Visualizer};
use pulsefield::error::{ErrorCode, VisualizerError};
use pulsefield::particles::SceneSnapshot;
use pulsefield::source::{FrameQueue, SpectrumSource, SyntheticPulseSource};

fn seeded_visualizer(seed: u64) -> Visualizer {
    let mut config = AppConfig::default();
    config.runtime.seed = Some(seed);
    Visualizer::with_config(config).expect("default config is valid")
}

/// Renderer that keeps every scene it receives
#[derive(Default)]
struct RecordingRenderer {
    scenes: Vec<SceneSnapshot>,
    bpms: Vec<f32>,
}

impl SceneRenderer for RecordingRenderer {
    fn render(&mut self, scene: &SceneSnapshot, features: &AudioFeatures) {
        self.scenes.push(scene.clone());
        self.bpms.push(features.bpm);
    }
}

#[test]
fn test_full_lifecycle_with_synthetic_source() {
    let mut visualizer = seeded_visualizer(1);
    let source = SyntheticPulseSource::new(120.0, 9).with_frame_limit(300);
    visualizer.start(Some(Box::new(source))).unwrap();

    let mut renderer = RecordingRenderer::default();
    let mut clock = ManualFrameClock::from_fps(60);
    while visualizer.run_frame(&clock, &mut renderer).is_some() {
        clock.advance();
    }

    assert_eq!(renderer.scenes.len(), 300);
    assert!(!visualizer.is_running(), "visualizer should stop at end of stream");
    assert!(
        (renderer.bpms.last().copied().unwrap_or_default() - 120.0).abs() < 2.0,
        "tempo should lock to the pulse, got {:?}",
        renderer.bpms.last()
    );
    for scene in &renderer.scenes {
        assert!(scene.len() <= 250);
        for particle in &scene.particles {
            assert!((0.0..=1.0).contains(&particle.opacity));
            assert!((0.0..360.0).contains(&particle.color.hue));
        }
    }
}

#[test]
fn test_silent_spectrum_features() {
    let mut engine = AudioFeatureEngine::default();
    let features = engine.analyze(&SpectrumFrame::silent(256), 44100, 0.0);

    assert_eq!(features.volume, 0.0);
    assert_eq!(features.bass, 0.0);
    assert_eq!(features.mid, 0.0);
    assert_eq!(features.treble, 0.0);
    assert_eq!(features.energy, 0.0);
    assert_eq!(features.dominant_frequency, 0.0);
    assert_eq!(features.bpm, 120.0);
}

#[test]
fn test_saturated_spectrum_features() {
    let mut engine = AudioFeatureEngine::default();
    let features = engine.analyze(&SpectrumFrame::from_bytes(&[255u8; 512]), 48000, 0.0);

    assert!((features.volume - 255.0).abs() < 1e-3);
    assert!((features.bass - 255.0).abs() < 1e-3);
    assert!((features.mid - 255.0).abs() < 1e-3);
    assert!((features.treble - 255.0).abs() < 1e-3);
    // All bins tie, the first one wins
    assert_eq!(features.dominant_frequency, 0.0);
}

#[test]
fn test_dominant_frequency_bin_mapping() {
    let mut engine = AudioFeatureEngine::default();
    let mut magnitudes = vec![10.0; 256];
    magnitudes[64] = 250.0;
    let features = engine.analyze(&SpectrumFrame::new(magnitudes), 44100, 0.0);

    // bin · sample_rate / (2 · bin_count)
    assert!((features.dominant_frequency - 64.0 * 44100.0 / 512.0).abs() < 1e-2);
}

#[test]
fn test_tempo_from_bass_peaks_every_500ms() {
    let mut engine = AudioFeatureEngine::default();
    let mut loud = vec![0.0; 256];
    loud[..25].iter_mut().for_each(|m| *m = 200.0);
    let loud = SpectrumFrame::new(loud);

    let mut bpm = 0.0;
    for t in [0.0, 500.0, 1000.0, 1500.0, 2000.0] {
        bpm = engine.analyze(&loud, 44100, t).bpm;
    }
    assert!((bpm - 120.0).abs() < 1e-3);
}

#[test]
fn test_frame_queue_source_drives_visualizer() {
    let frames = vec![
        SpectrumFrame::silent(128),
        SpectrumFrame::new(vec![255.0; 128]),
        SpectrumFrame::new(vec![3.0; 4]),
    ];
    let mut visualizer = seeded_visualizer(2);
    visualizer
        .start(Some(Box::new(FrameQueue::new(22050, frames))))
        .unwrap();

    let quiet = visualizer.tick(0.0).unwrap();
    assert_eq!(quiet.scene.len(), 1, "silence spawns exactly one particle");

    let loud = visualizer.tick(16.0).unwrap();
    assert_eq!(loud.scene.len(), 1 + 17);

    let undersized = visualizer.tick(32.0).unwrap();
    assert_eq!(undersized.features.volume, 0.0);

    assert!(visualizer.tick(48.0).is_none());
}

#[test]
fn test_control_surface_error_codes() {
    let mut visualizer = Visualizer::new();

    let err = visualizer.start(None).unwrap_err();
    assert_eq!(err.code(), 3001);
    assert!(err.to_string().contains("SourceNotConfigured"));

    let err = visualizer.stop().unwrap_err();
    assert_eq!(err, VisualizerError::NotRunning);
    assert_eq!(err.code(), 3003);

    let err = visualizer.on_resize(-1.0, 10.0).unwrap_err();
    assert_eq!(err.code(), 3004);
}

#[test]
fn test_live_clock_session() {
    struct Endless;
    impl SpectrumSource for Endless {
        fn sample_rate(&self) -> u32 {
            44100
        }
        fn next_frame(&mut self) -> Option<SpectrumFrame> {
            Some(SpectrumFrame::new(vec![90.0; 64]))
        }
    }

    let clock = pulsefield::engine::SystemFrameClock::new();
    let mut visualizer = seeded_visualizer(3);
    visualizer.start(Some(Box::new(Endless))).unwrap();

    let mut renderer = RecordingRenderer::default();
    for _ in 0..1000 {
        assert!(visualizer.run_frame(&clock, &mut renderer).is_some());
    }
    assert!(clock.now_ms() >= 0.0);
    assert!(visualizer.particle_count() <= 250);

    visualizer.stop().unwrap();
    assert_eq!(visualizer.particle_count(), 0);
}
