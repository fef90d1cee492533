use super::band::{validate_bands, Band};
use super::cleaner::clean_tracks;
use super::matrix::TrackMatrices;
use super::merge::BandMerger;
use super::tracker::PartialTracker;
use crate::audio::decode::Signal;
use crate::error::ConfigError;

/// Everything the multi-resolution analysis needs besides the signal.
#[derive(Clone, Debug)]
pub struct AnalysisParams {
    /// Ordered by increasing upper edge.
    pub bands: Vec<Band>,
    /// Hop size in samples.
    pub hop: usize,
    /// Peak detection threshold in dB.
    pub threshold: f64,
    /// Tracks shorter than this (seconds) are removed.
    pub min_sine_dur: f64,
    pub max_sines: usize,
    /// Hz
    pub freq_dev_offset: f64,
    /// Hz per Hz
    pub freq_dev_slope: f64,
}

impl AnalysisParams {
    pub fn validate(&self, sample_rate: u32) -> Result<(), ConfigError> {
        if sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        if self.hop == 0 {
            return Err(ConfigError::InvalidHop);
        }
        if self.max_sines == 0 {
            return Err(ConfigError::NoSines);
        }
        if !self.min_sine_dur.is_finite() || self.min_sine_dur < 0.0 {
            return Err(ConfigError::InvalidDuration(self.min_sine_dur));
        }
        validate_bands(&self.bands)
    }
}

/// First frame center: half the hop or the largest leading half-window.
pub fn initial_offset(bands: &[Band], hop: usize) -> usize {
    bands
        .iter()
        .map(|b| b.half_windows().0)
        .fold((hop + 1) / 2, usize::max)
}

/// Number of frames analyzed for a signal of `len` samples.
pub fn frame_count(len: usize, bands: &[Band], hop: usize) -> usize {
    let start = initial_offset(bands, hop);
    if len < start {
        0
    } else {
        (len - start) / hop + 1
    }
}

/// Shortest track length in frames, rounded half to even.
pub fn min_frames(sample_rate: u32, min_sine_dur: f64, hop: usize) -> usize {
    (sample_rate as f64 * min_sine_dur / hop as f64).round_ties_even() as usize
}

/// Multi-resolution sinusoidal analysis: per-frame band merging, partial
/// tracking, then one cleaning pass over the finished matrices.
///
/// `on_frame` is called after every analyzed frame with its index.
pub fn analyze(
    signal: &Signal,
    params: &AnalysisParams,
    mut on_frame: impl FnMut(usize),
) -> Result<TrackMatrices, ConfigError> {
    params.validate(signal.sample_rate)?;

    let pad = initial_offset(&params.bands, params.hop);
    let end = signal.samples.len();
    let frames = frame_count(end, &params.bands, params.hop);

    let mut padded = vec![0.0; pad];
    padded.extend_from_slice(&signal.samples);
    padded.resize(end + 2 * pad, 0.0);

    let merger = BandMerger::new(&params.bands, signal.sample_rate, params.threshold);
    let mut tracker =
        PartialTracker::new(params.max_sines, params.freq_dev_offset, params.freq_dev_slope);
    let mut tracks = TrackMatrices::with_capacity(params.max_sines, frames);

    log::debug!(
        "Analyzing {} frames over {} bands (pad {}, hop {})",
        frames,
        merger.band_count(),
        pad,
        params.hop
    );

    let mut dropped = 0;
    let mut pin = pad;
    while pin <= end {
        let peaks = merger.merge(&padded, pin);
        let stats = tracker.step(&peaks);
        log::trace!(
            "pin {}: {} peaks, {} continued, {} born, {} died",
            pin,
            peaks.len(),
            stats.continued,
            stats.born,
            stats.died
        );
        dropped += stats.dropped;
        tracks.push_slots(tracker.slots());
        on_frame(tracks.frames() - 1);
        pin += params.hop;
    }

    if dropped > 0 {
        log::debug!("{} peaks found no free slot", dropped);
    }

    let min_len = min_frames(signal.sample_rate, params.min_sine_dur, params.hop);
    let removed = clean_tracks(&mut tracks, min_len);
    log::info!(
        "Analyzed {} frames, removed {} tracks shorter than {} frames",
        tracks.frames(),
        removed,
        min_len
    );

    Ok(tracks)
}
