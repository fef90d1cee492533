use rayon::prelude::*;

use super::band::{bin_range, Band};
use super::peaks::{detect_peaks, interpolate_peak, Peak};
use super::spectrum::SpectrumAnalyzer;

struct BandAnalysis {
    window: Vec<f64>,
    analyzer: SpectrumAnalyzer,
    before: usize,
    after: usize,
    lower_bin: usize,
    upper_bin: usize,
}

/// Runs every band at one frame position and keeps each band's peaks only
/// inside its own `(lower, upper]` bin range, so adjacent bands never report
/// the same partial twice.
pub struct BandMerger {
    bands: Vec<BandAnalysis>,
    sample_rate: f64,
    threshold: f64,
}

impl BandMerger {
    /// `bands` must already be validated.
    pub fn new(bands: &[Band], sample_rate: u32, threshold: f64) -> Self {
        let analyses = bands
            .iter()
            .enumerate()
            .map(|(index, band)| {
                let (lower_bin, upper_bin) = bin_range(bands, index, sample_rate);
                let (before, after) = band.half_windows();
                log::debug!(
                    "Band {}: window {} / N {} / edge {:.1} Hz -> bins ({}, {}]",
                    index,
                    band.window_len(),
                    band.fft_size,
                    band.edge,
                    lower_bin,
                    upper_bin
                );
                BandAnalysis {
                    window: band.normalized_window(),
                    analyzer: SpectrumAnalyzer::new(band.fft_size),
                    before,
                    after,
                    lower_bin,
                    upper_bin,
                }
            })
            .collect();

        Self {
            bands: analyses,
            sample_rate: sample_rate as f64,
            threshold,
        }
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Peaks of band `index` centered at `pin`. The signal must hold a full
    /// window around `pin`.
    pub fn band_peaks(&self, index: usize, signal: &[f64], pin: usize) -> Vec<Peak> {
        let band = &self.bands[index];
        let segment = &signal[pin - band.before..pin + band.after];
        let spectrum = band.analyzer.analyze(segment, &band.window);
        let n = band.analyzer.size() as f64;

        detect_peaks(&spectrum.magnitude, self.threshold)
            .into_iter()
            .filter(|&bin| bin > band.lower_bin && bin <= band.upper_bin)
            .map(|bin| {
                let (location, mag, phase) =
                    interpolate_peak(&spectrum.magnitude, &spectrum.phase, bin);
                Peak {
                    freq: self.sample_rate * location / n,
                    mag,
                    phase,
                    bin,
                    band: index,
                }
            })
            .collect()
    }

    /// All bands' peaks at `pin`, concatenated by band then bin.
    pub fn merge(&self, signal: &[f64], pin: usize) -> Vec<Peak> {
        (0..self.bands.len())
            .into_par_iter()
            .map(|index| self.band_peaks(index, signal, pin))
            .collect::<Vec<_>>()
            .concat()
    }
}
