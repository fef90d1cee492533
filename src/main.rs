mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use sinetrack::config::{self, Config};
use sinetrack::model::analysis::{self, AnalysisParams};
use sinetrack::model::band::{Band, BandSpec};
use sinetrack::model::synth::Synthesizer;
use sinetrack::{audio, encode};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Config values apply only where the CLI is still at its default
    let cfg = match config::find_config(cli.config.as_deref()) {
        Some(path) => {
            let cfg = config::load_config(&path)?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => Config::default(),
    };
    if cli.hop == config::default_hop() { cli.hop = cfg.analysis.hop; }
    if cli.threshold == config::default_threshold() { cli.threshold = cfg.analysis.threshold; }
    if cli.min_sine_dur == config::default_min_sine_dur() { cli.min_sine_dur = cfg.analysis.min_sine_dur; }
    if cli.max_sines == config::default_max_sines() { cli.max_sines = cfg.analysis.max_sines; }
    if cli.freq_dev_offset == config::default_freq_dev_offset() { cli.freq_dev_offset = cfg.analysis.freq_dev_offset; }
    if cli.freq_dev_slope == config::default_freq_dev_slope() { cli.freq_dev_slope = cfg.analysis.freq_dev_slope; }
    if cli.synth_size == config::default_synth_size() { cli.synth_size = cfg.synthesis.size; }
    if cli.bands.is_empty() {
        cli.bands = cfg.bands;
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    log::info!("sinetrack - multi-resolution sinusoidal analysis");
    log::info!("Input: {}", cli.input.display());
    for (i, b) in cli.bands.iter().enumerate() {
        log::info!(
            "Band {}: {} {} / N {} up to {:.1} Hz",
            i, b.window, b.size, b.fft_size, b.edge
        );
    }

    let params = AnalysisParams {
        bands: cli.bands.iter().map(BandSpec::build).collect::<Vec<Band>>(),
        hop: cli.hop,
        threshold: cli.threshold,
        min_sine_dur: cli.min_sine_dur,
        max_sines: cli.max_sines,
        freq_dev_offset: cli.freq_dev_offset,
        freq_dev_slope: cli.freq_dev_slope,
    };

    // 1. Decode audio
    log::info!("Decoding audio...");
    let signal = audio::decode::decode_audio(&cli.input)?;

    // Fail before any analysis work
    params
        .validate(signal.sample_rate)
        .context("Invalid analysis settings")?;
    let synth = if cli.no_synth {
        None
    } else {
        Some(
            Synthesizer::new(cli.synth_size, cli.hop, signal.sample_rate)
                .context("Invalid synthesis settings")?,
        )
    };

    // 2. Analyze
    let total_frames = analysis::frame_count(signal.samples.len(), &params.bands, params.hop);
    log::info!(
        "Analyzing {} frames (hop {}, threshold {} dB, max {} sines)...",
        total_frames, params.hop, params.threshold, params.max_sines
    );

    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );
    let tracks = analysis::analyze(&signal, &params, |frame| pb.set_position(frame as u64 + 1))
        .context("Analysis failed")?;
    pb.finish_with_message("Analysis complete");

    let active_slots = (0..tracks.width())
        .filter(|&s| tracks.freq().iter().any(|row| row[s] > 0.0))
        .count();
    log::info!("{} of {} slots carry tracks", active_slots, tracks.width());

    if let Some(ref path) = cli.tracks {
        encode::tracks::write_tracks(path, &tracks, signal.sample_rate, params.hop)?;
    }

    // 3. Resynthesize
    if let Some(synth) = synth {
        log::info!("Synthesizing (N = {})...", cli.synth_size);
        let y = synth.synthesize(&tracks);

        let common = signal.samples.len().min(y.len());
        let diff: f64 = signal.samples[..common]
            .iter()
            .zip(&y[..common])
            .map(|(a, b)| (a - b).abs())
            .sum();
        log::info!("Reconstruction error: sum |x - y| = {:.4} over {} samples", diff, common);

        encode::wav::write_wav(&cli.output, &y, signal.sample_rate)?;
    }

    log::info!("Done!");
    Ok(())
}
