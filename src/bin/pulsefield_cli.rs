use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pulsefield::analysis::{AudioFeatureEngine, AudioFeatures};
use pulsefield::config::AppConfig;
use pulsefield::engine::{ManualFrameClock, SceneRenderer, Visualizer};
use pulsefield::error::{log_visualizer_error, VisualizerError};
use pulsefield::particles::SceneSnapshot;
use pulsefield::source::{SpectrumSource, SyntheticPulseSource, WavSpectrumSource};
use serde::Serialize;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "pulsefield_cli",
    about = "Offline driver for the Pulsefield audio-reactive particle visualizer"
)]
struct Cli {
    /// JSON configuration file (defaults to assets/pulsefield.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the visualizer on a synthetic pulse and print one JSON line per frame
    Simulate {
        #[arg(long, default_value_t = 120.0)]
        bpm: f32,
        #[arg(long, default_value_t = 600)]
        frames: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        width: Option<f32>,
        #[arg(long)]
        height: Option<f32>,
        /// Include the full particle scene in each frame line
        #[arg(long)]
        emit_scenes: bool,
    },
    /// Extract audio features from a WAV file, one JSON line per frame
    Analyze {
        #[arg(long)]
        wav: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Commands::Simulate {
            bpm,
            frames,
            seed,
            width,
            height,
            emit_scenes,
        } => run_simulate(config, bpm, frames, seed, width.zip(height), emit_scenes),
        Commands::Analyze { wav, limit } => run_analyze(&config, &wav, limit),
    }
}

fn run_simulate(
    mut config: AppConfig,
    bpm: f32,
    frames: usize,
    seed: u64,
    viewport: Option<(f32, f32)>,
    emit_scenes: bool,
) -> Result<()> {
    config.runtime.seed = Some(seed);
    let fps = config.runtime.frames_per_second;

    let mut visualizer = Visualizer::with_config(config)
        .map_err(|err| logged(err, "simulate/config"))
        .context("building visualizer")?;
    if let Some((width, height)) = viewport {
        visualizer
            .on_resize(width, height)
            .map_err(|err| logged(err, "simulate/resize"))?;
    }

    let source = SyntheticPulseSource::new(bpm, seed)
        .with_frames_per_second(fps)
        .with_frame_limit(frames);
    visualizer
        .start(Some(Box::new(source)))
        .map_err(|err| logged(err, "simulate/start"))?;

    let stdout = io::stdout();
    let mut renderer = JsonLinesRenderer::new(stdout.lock(), emit_scenes);
    let mut clock = ManualFrameClock::from_fps(fps);
    while visualizer.run_frame(&clock, &mut renderer).is_some() {
        renderer.set_timestamp(clock.advance());
    }
    let summary = renderer.finish()?;

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn run_analyze(config: &AppConfig, wav: &Path, limit: Option<usize>) -> Result<()> {
    config
        .validate()
        .map_err(|err| logged(err, "analyze/config"))
        .context("validating configuration")?;

    let fps = config.runtime.frames_per_second;
    let mut source = WavSpectrumSource::open(wav, fps)
        .map_err(|err| logged(err, "analyze/open"))
        .with_context(|| format!("opening {}", wav.display()))?;
    let mut engine = AudioFeatureEngine::new(config);
    let clock_step = ManualFrameClock::from_fps(fps).step_ms();
    let limit = limit.unwrap_or(usize::MAX);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut frame = 0usize;
    while frame < limit {
        let Some(spectrum) = source.next_frame() else {
            break;
        };
        let timestamp_ms = frame as f64 * clock_step;
        let features = engine.analyze(&spectrum, source.sample_rate(), timestamp_ms);
        let line = FeatureLine {
            frame,
            timestamp_ms,
            features,
        };
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
        frame += 1;
    }

    Ok(())
}

fn logged(err: VisualizerError, context: &str) -> VisualizerError {
    log_visualizer_error(&err, context);
    err
}

#[derive(Serialize)]
struct FeatureLine {
    frame: usize,
    timestamp_ms: f64,
    #[serde(flatten)]
    features: AudioFeatures,
}

#[derive(Serialize)]
struct FrameLine<'a> {
    kind: &'static str,
    frame: u64,
    timestamp_ms: f64,
    particles: usize,
    features: &'a AudioFeatures,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<&'a SceneSnapshot>,
}

#[derive(Serialize)]
struct SimulationSummary {
    kind: &'static str,
    frames: u64,
    final_bpm: f32,
    max_particles: usize,
    mean_particles: f32,
}

/// Renderer that serializes every frame as a JSON line
struct JsonLinesRenderer<W: Write> {
    out: W,
    emit_scenes: bool,
    frames: u64,
    timestamp_ms: f64,
    last_bpm: f32,
    max_particles: usize,
    total_particles: u64,
    error: Option<anyhow::Error>,
}

impl<W: Write> JsonLinesRenderer<W> {
    fn new(out: W, emit_scenes: bool) -> Self {
        Self {
            out,
            emit_scenes,
            frames: 0,
            timestamp_ms: 0.0,
            last_bpm: 0.0,
            max_particles: 0,
            total_particles: 0,
            error: None,
        }
    }

    fn set_timestamp(&mut self, timestamp_ms: f64) {
        self.timestamp_ms = timestamp_ms;
    }

    fn write_line(&mut self, scene: &SceneSnapshot, features: &AudioFeatures) -> Result<()> {
        let line = FrameLine {
            kind: "frame",
            frame: self.frames,
            timestamp_ms: self.timestamp_ms,
            particles: scene.len(),
            features,
            scene: self.emit_scenes.then_some(scene),
        };
        writeln!(self.out, "{}", serde_json::to_string(&line)?)?;
        Ok(())
    }

    fn finish(mut self) -> Result<SimulationSummary> {
        if let Some(err) = self.error.take() {
            return Err(err).context("writing frame output");
        }
        self.out.flush()?;

        let mean_particles = if self.frames == 0 {
            0.0
        } else {
            self.total_particles as f32 / self.frames as f32
        };
        Ok(SimulationSummary {
            kind: "summary",
            frames: self.frames,
            final_bpm: self.last_bpm,
            max_particles: self.max_particles,
            mean_particles,
        })
    }
}

impl<W: Write> SceneRenderer for JsonLinesRenderer<W> {
    fn render(&mut self, scene: &SceneSnapshot, features: &AudioFeatures) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_line(scene, features) {
            self.error = Some(err);
            return;
        }

        self.frames += 1;
        self.last_bpm = features.bpm;
        self.max_particles = self.max_particles.max(scene.len());
        self.total_particles += scene.len() as u64;
    }
}
