use serde::Serialize;

use super::tracker::Slot;

/// Frame x slot matrices of frequency (Hz), magnitude (dB) and phase (rad),
/// grown one row per analyzed frame. A zero frequency marks an empty slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackMatrices {
    width: usize,
    freq: Vec<Vec<f64>>,
    mag: Vec<Vec<f64>>,
    phase: Vec<Vec<f64>>,
}

impl TrackMatrices {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            freq: Vec::new(),
            mag: Vec::new(),
            phase: Vec::new(),
        }
    }

    pub fn with_capacity(width: usize, frames: usize) -> Self {
        Self {
            width,
            freq: Vec::with_capacity(frames),
            mag: Vec::with_capacity(frames),
            phase: Vec::with_capacity(frames),
        }
    }

    /// Number of slots per row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn frames(&self) -> usize {
        self.freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }

    /// Appends one row. Slots past `width` are cut, missing ones are empty.
    pub fn push_slots(&mut self, slots: &[Slot]) {
        let mut freq = vec![0.0; self.width];
        let mut mag = vec![0.0; self.width];
        let mut phase = vec![0.0; self.width];

        for (i, slot) in slots.iter().take(self.width).enumerate() {
            if let Some(s) = slot.sinusoid() {
                freq[i] = s.freq;
                mag[i] = s.mag;
                phase[i] = s.phase;
            }
        }

        self.freq.push(freq);
        self.mag.push(mag);
        self.phase.push(phase);
    }

    /// Appends one raw row; shorter rows are zero-extended, longer ones cut.
    #[cfg(test)]
    pub(crate) fn push_row(&mut self, freq: &[f64], mag: &[f64], phase: &[f64]) {
        let width = self.width;
        let fit = move |row: &[f64]| {
            let mut out = row.iter().copied().take(width).collect::<Vec<_>>();
            out.resize(width, 0.0);
            out
        };
        self.freq.push(fit(freq));
        self.mag.push(fit(mag));
        self.phase.push(fit(phase));
    }

    pub fn freq(&self) -> &[Vec<f64>] {
        &self.freq
    }

    pub fn mag(&self) -> &[Vec<f64>] {
        &self.mag
    }

    pub fn phase(&self) -> &[Vec<f64>] {
        &self.phase
    }

    /// Frequencies of one slot over time.
    pub fn column(&self, slot: usize) -> Vec<f64> {
        self.freq.iter().map(|row| row[slot]).collect()
    }

    pub fn active_in_frame(&self, frame: usize) -> usize {
        self.freq[frame].iter().filter(|&&f| f > 0.0).count()
    }

    /// Empties one cell in all three matrices.
    pub fn clear(&mut self, frame: usize, slot: usize) {
        self.freq[frame][slot] = 0.0;
        self.mag[frame][slot] = 0.0;
        self.phase[frame][slot] = 0.0;
    }
}
