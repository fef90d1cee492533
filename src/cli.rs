use clap::Parser;
use std::path::PathBuf;

use sinetrack::model::band::BandSpec;

#[derive(Parser, Debug)]
#[command(
    name = "sinetrack",
    about = "Multi-resolution sinusoidal analysis, partial tracking and resynthesis"
)]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Resynthesized output (32-bit float WAV)
    #[arg(short, long, default_value = "output_sines.wav")]
    pub output: PathBuf,

    /// Also write the cleaned track matrices as JSON
    #[arg(long)]
    pub tracks: Option<PathBuf>,

    /// Config file (defaults to ./sinetrack.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Analysis band as window:size:fft_size:edge, lowest edge first.
    /// Repeat for each band; replaces the configured bands.
    #[arg(short, long = "band")]
    pub bands: Vec<BandSpec>,

    /// Hop size in samples
    #[arg(long, default_value_t = 128)]
    pub hop: usize,

    /// Peak detection threshold in dB
    #[arg(short, long, default_value_t = -80.0, allow_hyphen_values = true)]
    pub threshold: f64,

    /// Minimum track duration in seconds
    #[arg(long, default_value_t = 0.02)]
    pub min_sine_dur: f64,

    /// Maximum number of simultaneous sines
    #[arg(long, default_value_t = 150)]
    pub max_sines: usize,

    /// Allowed frequency deviation at 0 Hz, in Hz
    #[arg(long, default_value_t = 10.0)]
    pub freq_dev_offset: f64,

    /// Additional allowed deviation per Hz of track frequency
    #[arg(long, default_value_t = 0.001)]
    pub freq_dev_slope: f64,

    /// Synthesis FFT size
    #[arg(long, default_value_t = 512)]
    pub synth_size: usize,

    /// Skip resynthesis (analysis and track export only)
    #[arg(long)]
    pub no_synth: bool,
}
