use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::band::{default_band_specs, BandSpec};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default = "default_band_specs")]
    pub bands: Vec<BandSpec>,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_hop")]
    pub hop: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_min_sine_dur")]
    pub min_sine_dur: f64,
    #[serde(default = "default_max_sines")]
    pub max_sines: usize,
    #[serde(default = "default_freq_dev_offset")]
    pub freq_dev_offset: f64,
    #[serde(default = "default_freq_dev_slope")]
    pub freq_dev_slope: f64,
}

#[derive(Debug, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default = "default_synth_size")]
    pub size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            bands: default_band_specs(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hop: default_hop(),
            threshold: default_threshold(),
            min_sine_dur: default_min_sine_dur(),
            max_sines: default_max_sines(),
            freq_dev_offset: default_freq_dev_offset(),
            freq_dev_slope: default_freq_dev_slope(),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            size: default_synth_size(),
        }
    }
}

pub fn default_hop() -> usize { 128 }
pub fn default_threshold() -> f64 { -80.0 }
pub fn default_min_sine_dur() -> f64 { 0.02 }
pub fn default_max_sines() -> usize { 150 }
pub fn default_freq_dev_offset() -> f64 { 10.0 }
pub fn default_freq_dev_slope() -> f64 { 0.001 }
pub fn default_synth_size() -> usize { 512 }

/// Reads and parses one config file. Unreadable or malformed files are
/// errors.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

/// Explicit path, else `./sinetrack.toml`, else the user config directories.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("sinetrack.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("sinetrack").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("sinetrack").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
