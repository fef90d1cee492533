use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::model::matrix::TrackMatrices;

/// JSON layout of an analysis result: frame x slot matrices plus the timing
/// needed to place each row.
#[derive(Serialize)]
struct TrackExport<'a> {
    sample_rate: u32,
    hop: usize,
    frames: usize,
    #[serde(flatten)]
    tracks: &'a TrackMatrices,
}

pub fn to_json(tracks: &TrackMatrices, sample_rate: u32, hop: usize) -> Result<String> {
    let export = TrackExport {
        sample_rate,
        hop,
        frames: tracks.frames(),
        tracks,
    };
    serde_json::to_string(&export).context("Failed to serialize tracks")
}

pub fn write_tracks(path: &Path, tracks: &TrackMatrices, sample_rate: u32, hop: usize) -> Result<()> {
    let json = to_json(tracks, sample_rate, hop)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write tracks: {}", path.display()))?;
    log::info!("Wrote {} frames of tracks to {}", tracks.frames(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_contains_matrices_and_timing() {
        let mut tracks = TrackMatrices::new(2);
        tracks.push_row(&[440.0, 0.0], &[-6.0, 0.0], &[0.5, 0.0]);

        let json = to_json(&tracks, 44100, 128).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sample_rate"], 44100);
        assert_eq!(value["hop"], 128);
        assert_eq!(value["frames"], 1);
        assert_eq!(value["width"], 2);
        assert_eq!(value["freq"][0][0], 440.0);
        assert_eq!(value["mag"][0][0], -6.0);
        assert_eq!(value["phase"][0][1], 0.0);
    }
}
