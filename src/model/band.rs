use serde::Deserialize;
use std::str::FromStr;

use super::window::WindowKind;
use crate::error::ConfigError;

/// One analysis resolution: a window, its transform size and the upper
/// frequency edge of the range this band is responsible for.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub window: Vec<f64>,
    pub fft_size: usize,
    /// Upper edge in Hz. The band covers `(previous edge, edge]`.
    pub edge: f64,
}

impl Band {
    pub fn new(window: Vec<f64>, fft_size: usize, edge: f64) -> Self {
        Self {
            window,
            fft_size,
            edge,
        }
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Samples taken before and after the frame center.
    pub fn half_windows(&self) -> (usize, usize) {
        half_windows(self.window.len())
    }

    /// Window scaled to unit sum.
    pub fn normalized_window(&self) -> Vec<f64> {
        let sum: f64 = self.window.iter().sum();
        self.window.iter().map(|w| w / sum).collect()
    }
}

/// `floor((len+1)/2)` samples before the center, `floor(len/2)` after.
pub fn half_windows(len: usize) -> (usize, usize) {
    ((len + 1) / 2, len / 2)
}

/// Exclusive bin range `(lower, upper]` of band `index`.
pub fn bin_range(bands: &[Band], index: usize, sample_rate: u32) -> (usize, usize) {
    let band = &bands[index];
    let n = band.fft_size as f64;
    let fs = sample_rate as f64;
    let lower = if index == 0 {
        1
    } else {
        (bands[index - 1].edge * n / fs).ceil() as usize
    };
    let upper = (band.edge * n / fs).ceil() as usize;
    (lower, upper)
}

pub fn validate_bands(bands: &[Band]) -> Result<(), ConfigError> {
    if bands.is_empty() {
        return Err(ConfigError::NoBands);
    }

    let mut previous: Option<f64> = None;
    for (index, band) in bands.iter().enumerate() {
        if !(band.edge > 0.0) {
            return Err(ConfigError::NonPositiveEdge {
                index,
                edge: band.edge,
            });
        }
        if let Some(prev) = previous {
            if band.edge <= prev {
                return Err(ConfigError::NonIncreasingEdges {
                    index,
                    edge: band.edge,
                    previous: prev,
                });
            }
        }
        previous = Some(band.edge);

        if band.window.is_empty() {
            return Err(ConfigError::EmptyWindow { index });
        }
        if let Some((position, &weight)) = band.window.iter().enumerate().find(|(_, w)| **w < 0.0) {
            return Err(ConfigError::NegativeWindowWeight {
                index,
                position,
                weight,
            });
        }
        if band.window.iter().sum::<f64>() == 0.0 {
            return Err(ConfigError::ZeroWindowSum { index });
        }
        if !band.fft_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                index,
                fft_size: band.fft_size,
            });
        }
        if band.window.len() > band.fft_size {
            return Err(ConfigError::WindowTooLong {
                index,
                window: band.window.len(),
                fft_size: band.fft_size,
            });
        }
    }

    Ok(())
}

/// Serializable description of a band, as written in config files or on the
/// command line (`window:size:fft_size:edge`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BandSpec {
    pub window: WindowKind,
    pub size: usize,
    pub fft_size: usize,
    pub edge: f64,
}

impl BandSpec {
    pub fn build(&self) -> Band {
        Band::new(self.window.generate(self.size), self.fft_size, self.edge)
    }
}

impl FromStr for BandSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidBandSpec {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid("expected window:size:fft_size:edge"));
        }

        let window: WindowKind = parts[0].parse()?;
        let size = parts[1]
            .parse()
            .map_err(|_| invalid("window size is not an integer"))?;
        let fft_size = parts[2]
            .parse()
            .map_err(|_| invalid("transform size is not an integer"))?;
        let edge = parts[3]
            .parse()
            .map_err(|_| invalid("edge is not a number"))?;

        Ok(BandSpec {
            window,
            size,
            fft_size,
            edge,
        })
    }
}

/// blackman 4095/4096 up to 1 kHz, hamming 2047/2048 up to 5 kHz, hamming
/// 1023/1024 above.
pub fn default_band_specs() -> Vec<BandSpec> {
    vec![
        BandSpec {
            window: WindowKind::Blackman,
            size: 4095,
            fft_size: 4096,
            edge: 1000.0,
        },
        BandSpec {
            window: WindowKind::Hamming,
            size: 2047,
            fft_size: 2048,
            edge: 5000.0,
        },
        BandSpec {
            window: WindowKind::Hamming,
            size: 1023,
            fft_size: 1024,
            edge: 22050.0,
        },
    ]
}
