//! Frame-to-frame partial tracking over a fixed set of slots.
//!
//! A slot is either empty or holds one alive partial. Each frame:
//!
//! 1. alive slots, in ascending slot order, claim the nearest unclaimed peak
//!    within `offset + slope * previous frequency`; a slot with no candidate
//!    dies,
//! 2. the remaining peaks, loudest first, are born into slots that were
//!    already empty in the previous frame, in ascending slot order,
//! 3. peaks left over once the free slots run out are dropped.

use super::peaks::Peak;

/// Frequency (Hz), magnitude (dB) and phase (rad) of one partial at one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sinusoid {
    pub freq: f64,
    pub mag: f64,
    pub phase: f64,
}

impl From<&Peak> for Sinusoid {
    fn from(peak: &Peak) -> Self {
        Self {
            freq: peak.freq,
            mag: peak.mag,
            phase: peak.phase,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Slot {
    #[default]
    Empty,
    Alive(Sinusoid),
}

impl Slot {
    pub fn is_alive(&self) -> bool {
        matches!(self, Slot::Alive(_))
    }

    pub fn sinusoid(&self) -> Option<&Sinusoid> {
        match self {
            Slot::Alive(s) => Some(s),
            Slot::Empty => None,
        }
    }
}

/// What happened during one [`PartialTracker::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub continued: usize,
    pub born: usize,
    pub died: usize,
    pub dropped: usize,
}

pub struct PartialTracker {
    slots: Vec<Slot>,
    freq_dev_offset: f64,
    freq_dev_slope: f64,
}

impl PartialTracker {
    pub fn new(max_sines: usize, freq_dev_offset: f64, freq_dev_slope: f64) -> Self {
        Self {
            slots: vec![Slot::Empty; max_sines],
            freq_dev_offset,
            freq_dev_slope,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Largest accepted frequency jump for a partial currently at `freq`.
    pub fn max_deviation(&self, freq: f64) -> f64 {
        self.freq_dev_offset + self.freq_dev_slope * freq
    }

    /// Advances every slot by one frame given that frame's unordered peaks.
    pub fn step(&mut self, peaks: &[Peak]) -> StepStats {
        let mut stats = StepStats::default();
        let mut next = vec![Slot::Empty; self.slots.len()];
        let mut claimed: Vec<bool> = peaks.iter().map(|p| !(p.freq > 0.0)).collect();

        for (index, slot) in self.slots.iter().enumerate() {
            let Slot::Alive(prev) = slot else {
                continue;
            };
            let tolerance = self.max_deviation(prev.freq);

            let nearest = peaks
                .iter()
                .enumerate()
                .filter(|(j, _)| !claimed[*j])
                .map(|(j, p)| (j, (p.freq - prev.freq).abs()))
                .filter(|&(_, distance)| distance < tolerance)
                .min_by(|a, b| a.1.total_cmp(&b.1));

            match nearest {
                Some((j, _)) => {
                    claimed[j] = true;
                    next[index] = Slot::Alive(Sinusoid::from(&peaks[j]));
                    stats.continued += 1;
                }
                None => stats.died += 1,
            }
        }

        let mut unclaimed: Vec<usize> = (0..peaks.len()).filter(|&j| !claimed[j]).collect();
        unclaimed.sort_by(|&a, &b| peaks[b].mag.total_cmp(&peaks[a].mag));

        let mut free = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_alive())
            .map(|(index, _)| index);

        for (n, &j) in unclaimed.iter().enumerate() {
            match free.next() {
                Some(index) => {
                    next[index] = Slot::Alive(Sinusoid::from(&peaks[j]));
                    stats.born += 1;
                }
                None => {
                    stats.dropped = unclaimed.len() - n;
                    break;
                }
            }
        }

        if stats.dropped > 0 {
            log::debug!("No free slot for {} peaks", stats.dropped);
        }

        self.slots = next;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(freq: f64, mag: f64) -> Peak {
        Peak {
            freq,
            mag,
            phase: 0.0,
            bin: 0,
            band: 0,
        }
    }

    fn freqs(tracker: &PartialTracker) -> Vec<f64> {
        tracker
            .slots()
            .iter()
            .map(|s| s.sinusoid().map_or(0.0, |s| s.freq))
            .collect()
    }

    #[test]
    fn births_go_to_lowest_slots_loudest_first() {
        let mut tracker = PartialTracker::new(4, 10.0, 0.001);
        let stats = tracker.step(&[peak(200.0, -30.0), peak(100.0, -10.0), peak(300.0, -20.0)]);
        assert_eq!(freqs(&tracker), vec![100.0, 300.0, 200.0, 0.0]);
        assert_eq!(stats.born, 3);
    }

    #[test]
    fn continuation_keeps_slot() {
        let mut tracker = PartialTracker::new(4, 10.0, 0.001);
        tracker.step(&[peak(100.0, -10.0), peak(500.0, -20.0)]);
        let stats = tracker.step(&[peak(503.0, -20.0), peak(101.0, -10.0)]);
        assert_eq!(freqs(&tracker), vec![101.0, 503.0, 0.0, 0.0]);
        assert_eq!(stats.continued, 2);
        assert_eq!(stats.born, 0);
    }

    #[test]
    fn slot_dies_outside_tolerance() {
        let mut tracker = PartialTracker::new(2, 10.0, 0.0);
        tracker.step(&[peak(100.0, -10.0)]);
        // exactly at the tolerance is not accepted
        let stats = tracker.step(&[peak(110.0, -10.0)]);
        assert_eq!(stats.died, 1);
        // slot 0 was alive last frame, so the new peak goes to slot 1
        assert_eq!(freqs(&tracker), vec![0.0, 110.0]);
    }

    #[test]
    fn dead_slot_is_reused_next_frame() {
        let mut tracker = PartialTracker::new(2, 10.0, 0.0);
        tracker.step(&[peak(100.0, -10.0), peak(900.0, -10.0)]);
        tracker.step(&[peak(900.0, -10.0)]);
        assert_eq!(freqs(&tracker), vec![0.0, 900.0]);
        tracker.step(&[peak(900.0, -10.0), peak(400.0, -10.0)]);
        assert_eq!(freqs(&tracker), vec![400.0, 900.0]);
    }

    #[test]
    fn lower_slot_claims_first() {
        let mut tracker = PartialTracker::new(2, 10.0, 0.0);
        tracker.step(&[peak(100.0, -10.0), peak(106.0, -20.0)]);
        assert_eq!(freqs(&tracker), vec![100.0, 106.0]);
        // 104 is nearest to slot 1, but slot 0 goes first and takes it
        tracker.step(&[peak(104.0, -10.0)]);
        assert_eq!(freqs(&tracker), vec![104.0, 0.0]);
    }

    #[test]
    fn tolerance_scales_with_frequency() {
        let tracker = PartialTracker::new(1, 10.0, 0.001);
        assert!((tracker.max_deviation(0.0) - 10.0).abs() < 1e-12);
        assert!((tracker.max_deviation(10000.0) - 20.0).abs() < 1e-12);

        let mut tracker = PartialTracker::new(1, 10.0, 0.001);
        tracker.step(&[peak(10000.0, -10.0)]);
        tracker.step(&[peak(10015.0, -10.0)]);
        assert_eq!(freqs(&tracker), vec![10015.0]);
    }

    #[test]
    fn excess_peaks_are_dropped() {
        let mut tracker = PartialTracker::new(2, 10.0, 0.001);
        let stats = tracker.step(&[
            peak(100.0, -40.0),
            peak(200.0, -10.0),
            peak(300.0, -20.0),
            peak(400.0, -30.0),
        ]);
        assert_eq!(freqs(&tracker), vec![200.0, 300.0]);
        assert_eq!(stats.born, 2);
        assert_eq!(stats.dropped, 2);
    }

    #[test]
    fn empty_frame_kills_everything() {
        let mut tracker = PartialTracker::new(3, 10.0, 0.001);
        tracker.step(&[peak(100.0, -10.0), peak(200.0, -10.0)]);
        let stats = tracker.step(&[]);
        assert_eq!(stats.died, 2);
        assert!(tracker.slots().iter().all(|s| *s == Slot::Empty));
    }

    #[test]
    fn non_positive_frequencies_are_ignored() {
        let mut tracker = PartialTracker::new(2, 10.0, 0.001);
        let stats = tracker.step(&[peak(0.0, 0.0), peak(-5.0, 0.0), peak(50.0, -10.0)]);
        assert_eq!(stats.born, 1);
        assert_eq!(freqs(&tracker), vec![50.0, 0.0]);
    }
}
