use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

use super::band::half_windows;

/// Real/imaginary parts smaller than this are treated as zero before the
/// phase is taken.
const PHASE_TOLERANCE: f64 = 1e-14;

/// Positive-frequency half of a windowed transform.
#[derive(Clone, Debug)]
pub struct Spectrum {
    /// Magnitude in dB, `N/2 + 1` bins.
    pub magnitude: Vec<f64>,
    /// Unwrapped phase in radians, `N/2 + 1` bins.
    pub phase: Vec<f64>,
}

/// Single-resolution windowed DFT with zero-phase buffering.
///
/// The FFT plan is built once and shared, so one analyzer per band can be
/// used from several threads.
#[derive(Clone)]
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f64>>,
    size: usize,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// `segment` and `window` must have the same length, no longer than the
    /// transform size.
    pub fn analyze(&self, segment: &[f64], window: &[f64]) -> Spectrum {
        debug_assert_eq!(segment.len(), window.len());
        debug_assert!(window.len() <= self.size);

        let n = self.size;
        let (hm1, hm2) = half_windows(window.len());
        let sum: f64 = window.iter().sum();

        let windowed: Vec<f64> = segment
            .iter()
            .zip(window.iter())
            .map(|(x, w)| x * w / sum)
            .collect();

        // Center of the window goes to bin 0
        let mut buffer = vec![Complex::new(0.0, 0.0); n];
        for (i, &v) in windowed[hm2..].iter().enumerate() {
            buffer[i].re = v;
        }
        for (i, &v) in windowed[..hm2].iter().enumerate() {
            buffer[n - hm2 + i].re = v;
        }
        debug_assert_eq!(windowed.len() - hm2, hm1);

        self.fft.process(&mut buffer);

        let half = n / 2 + 1;
        let magnitude: Vec<f64> = buffer[..half]
            .iter()
            .map(|c| 20.0 * c.norm().max(f64::EPSILON).log10())
            .collect();

        let wrapped: Vec<f64> = buffer[..half]
            .iter()
            .map(|c| {
                let re = if c.re.abs() < PHASE_TOLERANCE { 0.0 } else { c.re };
                let im = if c.im.abs() < PHASE_TOLERANCE { 0.0 } else { c.im };
                im.atan2(re)
            })
            .collect();

        Spectrum {
            magnitude,
            phase: unwrap_phase(&wrapped),
        }
    }
}

/// Removes 2π jumps between consecutive values.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let Some(&first) = phase.first() else {
        return out;
    };
    out.push(first);

    let mut correction = 0.0;
    for pair in phase.windows(2) {
        let delta = pair[1] - pair[0];
        let mut wrapped = (delta + PI).rem_euclid(2.0 * PI) - PI;
        if wrapped == -PI && delta > 0.0 {
            wrapped = PI;
        }
        if delta.abs() >= PI {
            correction += wrapped - delta;
        }
        out.push(pair[1] + correction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::window::WindowKind;

    fn tone(freq: f64, fs: f64, len: usize, amplitude: f64) -> Vec<f64> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / fs).cos())
            .collect()
    }

    #[test]
    fn spectrum_has_half_plus_one_bins() {
        let analyzer = SpectrumAnalyzer::new(1024);
        let window = WindowKind::Hamming.generate(1023);
        let spec = analyzer.analyze(&vec![0.0; 1023], &window);
        assert_eq!(spec.magnitude.len(), 513);
        assert_eq!(spec.phase.len(), 513);
    }

    #[test]
    fn silence_sits_at_the_floor() {
        let analyzer = SpectrumAnalyzer::new(256);
        let window = WindowKind::Hann.generate(255);
        let spec = analyzer.analyze(&vec![0.0; 255], &window);
        let floor = 20.0 * f64::EPSILON.log10();
        assert!(spec.magnitude.iter().all(|&m| (m - floor).abs() < 1e-9));
        assert!(spec.phase.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn bin_centered_tone_peaks_at_half_amplitude() {
        // Unit-sum window: a cosine of amplitude A shows up as A/2
        let fs = 44100.0;
        let n = 1024;
        let freq = 32.0 * fs / n as f64;
        let window = WindowKind::Blackman.generate(1023);
        let analyzer = SpectrumAnalyzer::new(n);
        let spec = analyzer.analyze(&tone(freq, fs, 1023, 1.0), &window);

        let (peak_bin, peak_db) = spec
            .magnitude
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &m)| if m > acc.1 { (i, m) } else { acc });
        assert_eq!(peak_bin, 32);
        assert!((peak_db - 20.0 * 0.5f64.log10()).abs() < 0.1, "peak {} dB", peak_db);
    }

    #[test]
    fn unwrap_removes_jumps() {
        let wrapped = vec![3.0, -3.0, 3.0];
        let unwrapped = unwrap_phase(&wrapped);
        assert!((unwrapped[1] - (2.0 * PI - 3.0)).abs() < 1e-12);
        assert!((unwrapped[2] - 3.0).abs() < 1e-12);
        assert!(unwrap_phase(&[]).is_empty());
    }
}
