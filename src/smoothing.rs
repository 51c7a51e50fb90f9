//! Trailing moving-average smoothing of segments
//!
//! Output point `j` is the per-coordinate mean of input points
//! `j..j + window`, so a segment of `n` points shrinks to
//! `n - window + 1` points. Segments shorter than the window have no
//! defined average and end up empty.

use tracing::debug;

use crate::error::{FeatureError, Result};
use crate::point::{Point, Segment};

pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Trailing simple moving average of `points`.
///
/// Returns an empty vector when there are fewer points than `window_size`.
pub fn moving_average(points: &[Point], window_size: usize) -> Result<Vec<Point>> {
    if window_size == 0 {
        return Err(FeatureError::InvalidWindow(window_size));
    }
    if points.len() < window_size {
        return Ok(Vec::new());
    }

    let count = window_size as f64;
    let averaged = points
        .windows(window_size)
        .map(|w| {
            let (lon, lat, ele) = w.iter().fold((0.0, 0.0, 0.0), |acc, p| {
                (acc.0 + p.longitude, acc.1 + p.latitude, acc.2 + p.elevation)
            });
            Point::new(lon / count, lat / count, ele / count)
        })
        .collect();

    Ok(averaged)
}

/// Replace every segment's points with their moving average, in place.
///
/// Segment names and timestamps are left as they are, as is the number and
/// order of segments. A zero window is rejected before any segment is
/// touched.
pub fn smooth_segments(segments: &mut [Segment], window_size: usize) -> Result<()> {
    if window_size == 0 {
        return Err(FeatureError::InvalidWindow(window_size));
    }

    for segment in segments.iter_mut() {
        let before = segment.points.len();
        segment.points = moving_average(&segment.points, window_size)?;

        if segment.points.is_empty() && before > 0 {
            debug!(
                "Segment {:?} has {} points, fewer than window {}; emptied",
                segment.name, before, window_size
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{segment_from_array, segment_to_array};
    use chrono::{DateTime, Utc};

    const EPS: f64 = 1e-9;

    fn assert_rows_close(actual: &[[f64; 3]], expected: &[[f64; 3]]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            for k in 0..3 {
                assert!((a[k] - e[k]).abs() < EPS, "{:?} != {:?}", a, e);
            }
        }
    }

    /// Reference trailing rolling mean: compute a mean at every index that
    /// has a full window behind it.
    fn rolling_mean_reference(rows: &[[f64; 3]], window: usize) -> Vec<[f64; 3]> {
        let mut out = Vec::new();
        for end in 0..rows.len() {
            if end + 1 < window {
                continue;
            }
            let mut mean = [0.0; 3];
            for row in &rows[end + 1 - window..=end] {
                for k in 0..3 {
                    mean[k] += row[k] / window as f64;
                }
            }
            out.push(mean);
        }
        out
    }

    fn noisy_rows(n: usize, scale: f64) -> Vec<[f64; 3]> {
        // deterministic pseudo-noise
        (0..n)
            .map(|i| {
                let t = i as f64;
                [
                    scale * (t * 1.7).sin(),
                    scale * (t * 0.9 + 0.3).cos(),
                    scale * ((t * 2.3).sin() + (t * 0.4).cos()),
                ]
            })
            .collect()
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut segments = vec![segment_from_array(&[[1.0, 1.0, 1.0]; 4])];
        let err = smooth_segments(&mut segments, 0).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidWindow(0)));
        assert_eq!(segments[0].len(), 4);
    }

    #[test]
    fn test_empty_collection_is_noop() {
        let mut segments: Vec<Segment> = Vec::new();
        smooth_segments(&mut segments, DEFAULT_WINDOW_SIZE).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_short_segments_become_empty() {
        for n in 0..5 {
            let mut segments = vec![segment_from_array(&vec![[1.0, 2.0, 3.0]; n])];
            smooth_segments(&mut segments, 5).unwrap();
            assert_eq!(segments.len(), 1);
            assert!(segments[0].is_empty());
        }
    }

    #[test]
    fn test_output_length() {
        for n in 0..12 {
            for w in 1..6 {
                let mut segments = vec![segment_from_array(&noisy_rows(n, 1.0))];
                smooth_segments(&mut segments, w).unwrap();
                assert_eq!(segments[0].len(), (n + 1).saturating_sub(w));
            }
        }
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let rows = noisy_rows(7, 4.0);
        let mut segments = vec![segment_from_array(&rows)];
        smooth_segments(&mut segments, 1).unwrap();
        assert_rows_close(&segment_to_array(&segments[0]), &rows);
    }

    #[test]
    fn test_matches_rolling_mean_window_3() {
        let rows_a = noisy_rows(25, 5.0);
        let rows_b = noisy_rows(9, 2.0);
        let mut segments = vec![segment_from_array(&rows_a), segment_from_array(&rows_b)];

        smooth_segments(&mut segments, 3).unwrap();

        assert_rows_close(&segment_to_array(&segments[0]), &rolling_mean_reference(&rows_a, 3));
        assert_rows_close(&segment_to_array(&segments[1]), &rolling_mean_reference(&rows_b, 3));
    }

    #[test]
    fn test_matches_rolling_mean_window_5() {
        let rows_a = noisy_rows(25, 5.0);
        let rows_b = noisy_rows(9, 2.0);
        let mut segments = vec![segment_from_array(&rows_a), segment_from_array(&rows_b)];

        smooth_segments(&mut segments, 5).unwrap();

        assert_rows_close(&segment_to_array(&segments[0]), &rolling_mean_reference(&rows_a, 5));
        assert_rows_close(&segment_to_array(&segments[1]), &rolling_mean_reference(&rows_b, 5));
    }

    #[test]
    fn test_metadata_preserved() {
        let started_at: DateTime<Utc> = "2024-04-15T13:45:00Z".parse().unwrap();
        let mut segments = vec![Segment {
            name: Some("Boston".to_string()),
            started_at: Some(started_at),
            points: vec![Point::new(0.0, 0.0, 0.0); 6],
        }];

        smooth_segments(&mut segments, 3).unwrap();

        assert_eq!(segments[0].name.as_deref(), Some("Boston"));
        assert_eq!(segments[0].started_at, Some(started_at));
        assert_eq!(segments[0].len(), 4);
    }

    #[test]
    fn test_segments_smoothed_independently() {
        let long = noisy_rows(6, 1.0);
        let mut segments = vec![
            segment_from_array(&long),
            segment_from_array(&long[..2]),
            segment_from_array(&long),
        ];

        smooth_segments(&mut segments, 3).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 4);
        assert!(segments[1].is_empty());
        assert_eq!(segments[0], segments[2]);
    }

    #[test]
    fn test_moving_average_leaves_input() {
        let points = vec![Point::new(1.0, 1.0, 1.0), Point::new(3.0, 3.0, 3.0)];
        let averaged = moving_average(&points, 2).unwrap();
        assert_eq!(averaged, vec![Point::new(2.0, 2.0, 2.0)]);
        assert_eq!(points.len(), 2);
    }
}
