//! Spectral peak picking and parabolic refinement.

/// One refined spectral peak, attributed to the band that reported it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Hz, sub-bin accurate.
    pub freq: f64,
    /// dB
    pub mag: f64,
    /// radians
    pub phase: f64,
    /// Integer bin of the local maximum in the band's transform.
    pub bin: usize,
    pub band: usize,
}

/// Local maxima of `magnitude` strictly above `threshold`, ascending by bin.
/// The first and last bins are never reported.
pub fn detect_peaks(magnitude: &[f64], threshold: f64) -> Vec<usize> {
    if magnitude.len() < 3 {
        return Vec::new();
    }

    (1..magnitude.len() - 1)
        .filter(|&k| {
            let v = magnitude[k];
            v > threshold && v > magnitude[k - 1] && v > magnitude[k + 1]
        })
        .collect()
}

/// Refines the peak at `bin` with a parabola through its neighbors.
///
/// Returns `(fractional bin, magnitude dB, phase)`. The phase is linearly
/// interpolated from the unwrapped phase spectrum.
pub fn interpolate_peak(magnitude: &[f64], phase: &[f64], bin: usize) -> (f64, f64, f64) {
    let val = magnitude[bin];
    let left = magnitude[bin - 1];
    let right = magnitude[bin + 1];

    let offset = 0.5 * (left - right) / (left - 2.0 * val + right);
    let location = bin as f64 + offset;
    let mag = val - 0.25 * (left - right) * offset;

    (location, mag, interp_linear(phase, location))
}

fn interp_linear(values: &[f64], position: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    if position <= 0.0 {
        return values[0];
    }
    let last = values.len() - 1;
    if position >= last as f64 {
        return values[last];
    }
    let i = position.floor() as usize;
    let frac = position - i as f64;
    values[i] + frac * (values[i + 1] - values[i])
}
