//! Additive resynthesis of track matrices by inverse FFT and overlap-add.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

use super::matrix::TrackMatrices;
use super::window::{blackman_harris, triangular, BLACKMAN_HARRIS};
use crate::error::ConfigError;

/// Bins on each side of a partial's center bin that receive lobe energy.
const LOBE_HALF_WIDTH: i64 = 4;

/// Transform size the main-lobe model is computed for.
const LOBE_SIZE: f64 = 512.0;

pub struct Synthesizer {
    size: usize,
    hop: usize,
    sample_rate: f64,
    window: Vec<f64>,
    ifft: Arc<dyn Fft<f64>>,
}

impl Synthesizer {
    /// `size` is the synthesis FFT size; it must be even, span at least
    /// two hops and leave room for a full lobe on both sides of a partial.
    pub fn new(size: usize, hop: usize, sample_rate: u32) -> Result<Self, ConfigError> {
        if hop == 0 {
            return Err(ConfigError::InvalidHop);
        }
        if sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        if size % 2 != 0 || size < 2 * hop || size < 2 * LOBE_HALF_WIDTH as usize {
            return Err(ConfigError::InvalidSynthesisSize { size, hop });
        }

        let mut planner = FftPlanner::<f64>::new();
        let ifft = planner.plan_fft_inverse(size);

        Ok(Self {
            size,
            hop,
            sample_rate: sample_rate as f64,
            window: synthesis_window(size, hop),
            ifft,
        })
    }

    /// Output is empty for an empty matrix, otherwise
    /// `hop * (frames + 3) - size` samples (longer when `size > 4 * hop`).
    pub fn synthesize(&self, tracks: &TrackMatrices) -> Vec<f64> {
        let frames = tracks.frames();
        if frames == 0 {
            return Vec::new();
        }

        let n = self.size;
        let half = n / 2;
        let len = (self.hop * (frames + 3)).max(self.hop * (frames - 1) + n);
        let mut y = vec![0.0; len];

        let rows = tracks.freq().iter().zip(tracks.mag()).zip(tracks.phase());
        for (l, ((freq, mag), phase)) in rows.enumerate() {
            let mut spectrum = spectral_sines(freq, mag, phase, n, self.sample_rate);
            self.ifft.process(&mut spectrum);

            let pout = l * self.hop;
            for (i, out) in y[pout..pout + n].iter_mut().enumerate() {
                // fftshift, then 1/N scaling of the inverse transform
                let sample = spectrum[(i + half) % n].re / n as f64;
                *out += self.window[i] * sample;
            }
        }

        y.drain(..half);
        y.truncate(y.len() - half);
        y
    }
}

/// Triangle over two hops, divided by a unit-sum Blackman-Harris over the
/// same span so it undoes the window implied by [`bh_lobe`].
fn synthesis_window(size: usize, hop: usize) -> Vec<f64> {
    let half = size / 2;
    let mut bh = blackman_harris(size);
    let sum: f64 = bh.iter().sum();
    bh.iter_mut().for_each(|v| *v /= sum);

    let mut window = vec![0.0; size];
    for (i, t) in triangular(2 * hop).into_iter().enumerate() {
        let k = half - hop + i;
        window[k] = t / bh[k];
    }
    window
}

/// Main lobe of the Blackman-Harris transform at `x` bins from its center,
/// normalized to 1 at the center.
pub fn bh_lobe(x: f64) -> f64 {
    let f = x * PI * 2.0 / LOBE_SIZE;
    let df = 2.0 * PI / LOBE_SIZE;

    let y: f64 = BLACKMAN_HARRIS
        .iter()
        .enumerate()
        .map(|(m, &c)| c / 2.0 * (dirichlet(f - df * m as f64) + dirichlet(f + df * m as f64)))
        .sum();

    y / LOBE_SIZE / BLACKMAN_HARRIS[0]
}

fn dirichlet(x: f64) -> f64 {
    let den = (x / 2.0).sin();
    if den == 0.0 {
        LOBE_SIZE
    } else {
        (LOBE_SIZE * x / 2.0).sin() / den
    }
}

/// Full `n`-point spectrum of a set of sinusoids, each drawn as a 9-bin
/// Blackman-Harris lobe. Slots at 0 Hz or above `n/2 - 1` bins are skipped.
pub fn spectral_sines(
    freq: &[f64],
    mag: &[f64],
    phase: &[f64],
    n: usize,
    sample_rate: f64,
) -> Vec<Complex<f64>> {
    let half = n / 2;
    let mut spectrum = vec![Complex::new(0.0, 0.0); n];

    for ((&f, &m), &p) in freq.iter().zip(mag).zip(phase) {
        let loc = n as f64 * f / sample_rate;
        if loc <= 0.0 || loc > (half - 1) as f64 {
            continue;
        }

        let center = loc.round_ties_even();
        let remainder = center - loc;
        let amplitude = 10f64.powf(m / 20.0);
        let positive = Complex::from_polar(1.0, p);
        let negative = positive.conj();

        for offset in -LOBE_HALF_WIDTH..=LOBE_HALF_WIDTH {
            let lobe = bh_lobe(remainder + offset as f64) * amplitude;
            let b = center as i64 + offset;
            if b < 0 {
                spectrum[(-b) as usize] += negative * lobe;
            } else if b as usize > half {
                spectrum[b as usize] += negative * lobe;
            } else if b == 0 || b as usize == half {
                spectrum[b as usize] += (positive + negative) * lobe;
            } else {
                spectrum[b as usize] += positive * lobe;
            }
        }
    }

    for k in 1..half {
        spectrum[n - k] = spectrum[k].conj();
    }

    spectrum
}
