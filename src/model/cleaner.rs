use super::matrix::TrackMatrices;

/// Deletes every maximal run of nonzero frequencies in a slot that lasts
/// fewer than `min_frames` frames. Columns are never shifted. Returns the
/// number of runs removed.
pub fn clean_tracks(tracks: &mut TrackMatrices, min_frames: usize) -> usize {
    let mut removed = 0;

    for slot in 0..tracks.width() {
        let column = tracks.column(slot);
        for (start, len) in runs(&column) {
            if len < min_frames {
                for frame in start..start + len {
                    tracks.clear(frame, slot);
                }
                removed += 1;
            }
        }
    }

    log::debug!("Removed {} tracks shorter than {} frames", removed, min_frames);
    removed
}

/// `(start, length)` of each maximal run of values > 0.
fn runs(column: &[f64]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = None;

    for (i, &f) in column.iter().enumerate() {
        match (start, f > 0.0) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                out.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, column.len() - s));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(columns: &[&[f64]]) -> TrackMatrices {
        let frames = columns[0].len();
        let mut m = TrackMatrices::new(columns.len());
        for f in 0..frames {
            let row: Vec<f64> = columns.iter().map(|c| c[f]).collect();
            m.push_row(&row, &row, &row);
        }
        m
    }

    #[test]
    fn finds_runs() {
        assert_eq!(runs(&[0.0, 1.0, 1.0, 0.0, 2.0]), vec![(1, 2), (4, 1)]);
        assert_eq!(runs(&[1.0, 1.0, 1.0]), vec![(0, 3)]);
        assert!(runs(&[0.0, 0.0]).is_empty());
        assert!(runs(&[]).is_empty());
    }

    #[test]
    fn removes_short_runs_only() {
        let mut m = matrix(&[&[0.0, 5.0, 5.0, 0.0, 7.0, 7.0, 7.0, 0.0]]);
        let removed = clean_tracks(&mut m, 3);
        assert_eq!(removed, 1);
        assert_eq!(m.column(0), vec![0.0, 0.0, 0.0, 0.0, 7.0, 7.0, 7.0, 0.0]);
        assert_eq!(m.mag()[1][0], 0.0);
        assert_eq!(m.mag()[4][0], 7.0);
    }

    #[test]
    fn runs_touching_the_edges_use_their_real_length() {
        let mut m = matrix(&[
            &[3.0, 3.0, 3.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0, 4.0, 4.0],
        ]);
        clean_tracks(&mut m, 3);
        assert_eq!(m.column(0), vec![3.0, 3.0, 3.0, 0.0, 0.0, 0.0]);
        assert_eq!(m.column(1), vec![0.0; 6]);
    }

    #[test]
    fn columns_are_independent() {
        let mut m = matrix(&[&[1.0, 1.0, 1.0, 1.0], &[0.0, 2.0, 0.0, 2.0]]);
        assert_eq!(clean_tracks(&mut m, 2), 2);
        assert_eq!(m.column(0), vec![1.0; 4]);
        assert_eq!(m.column(1), vec![0.0; 4]);
    }

    #[test]
    fn zero_minimum_keeps_everything() {
        let mut m = matrix(&[&[0.0, 1.0, 0.0]]);
        assert_eq!(clean_tracks(&mut m, 0), 0);
        assert_eq!(m.column(0), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_matrix_is_untouched() {
        let mut m = TrackMatrices::new(4);
        assert_eq!(clean_tracks(&mut m, 5), 0);
        assert!(m.is_empty());
    }
}
