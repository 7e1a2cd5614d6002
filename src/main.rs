//! bellchoir - plays a song file through the default audio device.
//!
//! # Usage
//!
//! ```bash
//! bellchoir song.txt               # Play the song
//! bellchoir --conduct song.txt     # Run the performer timing model instead
//! bellchoir --measure 2 song.txt   # Two-second measures
//! ```
//!
//! Set `RUST_LOG=debug` for per-note logging.

use anyhow::{Context, Result};
use bellchoir::audio::{AudioSink, PlaybackEngine, RodioSink};
use bellchoir::choir::{CancelToken, Conductor, StageOutcome};
use bellchoir::config::{ToneConfig, MEASURE_LENGTH_SECS, SAMPLE_RATE};
use bellchoir::song::{load_song, DurationTable, Song};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "Usage: bellchoir [OPTIONS] <song-file>

Play a song file, one line per note: <PITCH> <LENGTH> (e.g. `A4 4`, `REST 8`).
Files ending in .json hold an array of {\"pitch\", \"length\"} records.

Options:
  -c, --conduct         Run the conductor timing model instead of playing audio
  -m, --measure SECS    Length of one measure in seconds (default 1)
  -h, --help            Print this help message
";

/// Command-line options for the application.
struct CliOptions {
    /// Song file to load.
    song: PathBuf,
    /// Run the conductor instead of the playback engine.
    conduct: bool,
    /// Seconds per measure.
    measure_secs: u32,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Returns `Ok(None)` when help was requested.
    fn parse(args: &[String]) -> Result<Option<Self>> {
        let mut song: Option<PathBuf> = None;
        let mut conduct = false;
        let mut measure_secs = MEASURE_LENGTH_SECS;
        let mut i = 0;

        while i < args.len() {
            match args[i].as_str() {
                "--conduct" | "-c" => conduct = true,
                "--measure" | "-m" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .context("--measure requires a number of seconds")?;
                    measure_secs = value
                        .parse()
                        .with_context(|| format!("Invalid measure length: {}", value))?;
                }
                "--help" | "-h" => return Ok(None),
                other if other.starts_with('-') => {
                    anyhow::bail!("Unknown option: {}", other);
                }
                other => {
                    if song.is_some() {
                        anyhow::bail!("Unexpected argument: {}", other);
                    }
                    song = Some(PathBuf::from(other));
                }
            }
            i += 1;
        }

        let song = song.context("Missing song file")?;
        Ok(Some(Self {
            song,
            conduct,
            measure_secs,
        }))
    }
}

fn conduct(song: &Song, config: &ToneConfig) -> Result<()> {
    let durations = DurationTable::new(config);
    let conductor = Conductor::for_song(song, durations);
    let performance = conductor
        .conduct(song, &CancelToken::new())
        .context("Conducting failed")?;

    for stage in &performance.stages {
        let who = match &stage.outcome {
            StageOutcome::Rested => "rest".to_string(),
            StageOutcome::Performed { performer } => performer.clone(),
            StageOutcome::Skipped { reason } => format!("skipped: {}", reason),
        };
        println!(
            "{:>4}  {:<4} {:>3}  {:>6}ms  {}",
            stage.index,
            stage.entry.pitch,
            stage.entry.length,
            stage.finished.as_millis(),
            who
        );
    }
    println!(
        "{} notes held by {} performers, {} skipped, {}ms total",
        performance.performed(),
        conductor.registry().len(),
        performance.skipped(),
        performance.elapsed().as_millis()
    );
    Ok(())
}

fn play(song: &Song, config: ToneConfig) -> Result<()> {
    let engine = PlaybackEngine::new(config);
    let mut sink = RodioSink::open(config.sample_rate).context("Failed to open audio output")?;
    let result = engine.play(song, &mut sink, &CancelToken::new());
    sink.close().context("Failed to close audio output")?;
    result.context("Playback failed")?;
    Ok(())
}

fn run(cli: CliOptions) -> Result<()> {
    let config = ToneConfig::new(SAMPLE_RATE, cli.measure_secs).context("Invalid configuration")?;

    let parsed = load_song(&cli.song)
        .with_context(|| format!("Failed to load song: {}", cli.song.display()))?;
    if !parsed.malformed.is_empty() {
        tracing::warn!("Skipped {} invalid entries", parsed.malformed.len());
    }

    if cli.conduct {
        conduct(&parsed.song, &config)
    } else {
        play(&parsed.song, config)
    }
}

/// Main entry point.
fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match CliOptions::parse(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            eprint!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprint!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
