use serde::Deserialize;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Analysis window shapes. All are generated in their symmetric form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Rectangular,
    Hann,
    Hamming,
    Blackman,
    #[serde(alias = "blackman-harris")]
    BlackmanHarris,
}

impl WindowKind {
    pub fn generate(self, size: usize) -> Vec<f64> {
        match self {
            WindowKind::Rectangular => vec![1.0; size],
            WindowKind::Hann => cosine_sum(size, &[0.5, 0.5]),
            WindowKind::Hamming => cosine_sum(size, &[0.54, 0.46]),
            WindowKind::Blackman => cosine_sum(size, &[0.42, 0.5, 0.08]),
            WindowKind::BlackmanHarris => blackman_harris(size),
        }
    }
}

impl FromStr for WindowKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rectangular" | "boxcar" => Ok(WindowKind::Rectangular),
            "hann" | "hanning" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            "blackmanharris" | "blackman-harris" => Ok(WindowKind::BlackmanHarris),
            _ => Err(ConfigError::UnknownWindow(s.to_string())),
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::BlackmanHarris => "blackmanharris",
        };
        f.write_str(name)
    }
}

/// 4-term Blackman-Harris, also used to shape the synthesis lobes.
pub const BLACKMAN_HARRIS: [f64; 4] = [0.35875, 0.48829, 0.14128, 0.01168];

pub fn blackman_harris(size: usize) -> Vec<f64> {
    cosine_sum(size, &BLACKMAN_HARRIS)
}

/// Triangular window of even or odd length, never touching zero at the ends.
pub fn triangular(size: usize) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0; size];
    }
    let half = (size + 1) / 2;
    let rising: Vec<f64> = if size % 2 == 0 {
        (1..=half).map(|n| (2 * n - 1) as f64 / size as f64).collect()
    } else {
        (1..=half).map(|n| 2.0 * n as f64 / (size + 1) as f64).collect()
    };
    let mut window = rising.clone();
    let skip = if size % 2 == 0 { 0 } else { 1 };
    window.extend(rising.iter().rev().skip(skip));
    window
}

// w[n] = a0 - a1 cos(2πn/(M-1)) + a2 cos(4πn/(M-1)) - ...
// Rounding leaves Blackman's zero endpoints at about -1e-17; clamp them.
fn cosine_sum(size: usize, coefficients: &[f64]) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0; size];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|n| {
            coefficients
                .iter()
                .enumerate()
                .map(|(k, &a)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * a * (2.0 * PI * k as f64 * n as f64 / denom).cos()
                })
                .sum::<f64>()
                .max(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_symmetric() {
        for kind in [
            WindowKind::Hann,
            WindowKind::Hamming,
            WindowKind::Blackman,
            WindowKind::BlackmanHarris,
        ] {
            let w = kind.generate(1023);
            for i in 0..w.len() / 2 {
                assert!((w[i] - w[w.len() - 1 - i]).abs() < 1e-12, "{} not symmetric", kind);
            }
        }
    }

    #[test]
    fn weights_are_never_negative() {
        for size in [255, 1023, 2047, 4095] {
            let w = WindowKind::Blackman.generate(size);
            assert!(w.iter().all(|&x| x >= 0.0), "blackman {}", size);
            assert_eq!(w[0], 0.0);
        }
    }

    #[test]
    fn hamming_endpoints_and_center() {
        let w = WindowKind::Hamming.generate(5);
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn blackman_endpoints_are_zero() {
        let w = WindowKind::Blackman.generate(9);
        assert!(w[0].abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn triangular_even_length() {
        let w = triangular(4);
        assert_eq!(w, vec![0.25, 0.75, 0.75, 0.25]);
    }

    #[test]
    fn triangular_odd_length() {
        let w = triangular(5);
        let expected = [1.0 / 3.0, 2.0 / 3.0, 1.0, 2.0 / 3.0, 1.0 / 3.0];
        for (a, b) in w.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!("Blackman".parse::<WindowKind>().unwrap(), WindowKind::Blackman);
        assert_eq!("hanning".parse::<WindowKind>().unwrap(), WindowKind::Hann);
        assert!(matches!(
            "kaiser".parse::<WindowKind>(),
            Err(ConfigError::UnknownWindow(_))
        ));
    }

    #[test]
    fn single_sample_window() {
        assert_eq!(WindowKind::Blackman.generate(1), vec![1.0]);
        assert!(WindowKind::Hann.generate(0).is_empty());
    }
}
