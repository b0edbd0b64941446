use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::TryRecvError;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use chordline::analysis::meter::{self, TimeSignature};
use chordline::analysis::pipeline::Pipeline;
use chordline::audio::{beats, decode};
use chordline::cli::Cli;
use chordline::config;
use chordline::worker::{self, AnalysisMessage};

/// Poll interval for the worker's message channel in follow mode.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect chordline.toml /
    // global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("chordline.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("chordline").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("chordline").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.threshold == 0.1 {
                cli.threshold = cfg.analysis.threshold;
            }
            if cli.time_signature == "4/4" {
                cli.time_signature = cfg.analysis.time_signature;
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let signature: TimeSignature = cli
        .time_signature
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    log::info!("chordline - per-measure chord analysis");
    log::info!("Input: {}", input.display());
    log::info!("Time signature: {}", signature);

    if cli.follow {
        return run_follow(input.clone(), signature, cli.threshold);
    }

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio = decode::decode_audio(input)?;

    // 2. Detect beats
    log::info!("Detecting beats...");
    let beat_analysis = beats::track_beats(&audio.samples, audio.sample_rate);
    if beat_analysis.beat_times.is_empty() {
        log::warn!("No beats detected; nothing to segment");
    }

    let total = meter::segment(&beat_analysis.beat_times, signature).len();
    log::info!("Analyzing {} complete measures...", total);

    // 3. Per-measure analysis
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} measures")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pipeline = Pipeline::new().with_threshold(cli.threshold);
    let results = pipeline.run_with(
        &audio,
        &beat_analysis.beat_times,
        signature,
        &std::sync::atomic::AtomicBool::new(false),
        |done, _| pb.set_position(done as u64),
    );
    pb.finish_and_clear();

    // 4. Report
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for entry in &results {
            println!("Measure {}: {}", entry.measure, entry.label);
        }
    }

    log::info!("Done: {} measures labelled", results.len());
    Ok(())
}

/// Interactive adapter: spawn the worker and poll its channel at a fixed
/// interval, printing results as they stream in. Never blocks on the worker;
/// stops polling once the completion message arrives.
fn run_follow(
    input: std::path::PathBuf,
    signature: TimeSignature,
    threshold: f32,
) -> Result<()> {
    let job = worker::spawn(input, signature, threshold);

    let outcome = loop {
        match job.messages.try_recv() {
            Ok(AnalysisMessage::Progress { percent, status }) => {
                log::info!("[{percent:3.0}%] {status}");
            }
            Ok(AnalysisMessage::Measure(entry)) => {
                println!("Measure {}: {}", entry.measure, entry.label);
            }
            Ok(AnalysisMessage::Complete(outcome)) => break outcome,
            Err(TryRecvError::Empty) => std::thread::sleep(POLL_INTERVAL),
            Err(TryRecvError::Disconnected) => {
                break Err("analysis worker exited unexpectedly".to_string())
            }
        }
    };
    job.join();

    outcome.map_err(|e| anyhow::anyhow!(e))
}
