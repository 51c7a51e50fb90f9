//! Fixed-size feature encoding of a path
//!
//! Every row is expressed relative to the first point of the path: planar
//! distance from the origin, a reserved column, and elevation change. Rows
//! past the end of the path are zero padding so the matrix always has the
//! static shape a model expects.

use geo::EuclideanDistance;
use serde::Serialize;
use tracing::debug;

use crate::error::{FeatureError, Result};
use crate::point::{Point, Segment};

/// Columns per feature row: distance, reserved, elevation delta.
pub const FEATURE_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    rows: Vec<[f64; FEATURE_COLUMNS]>,
}

impl FeatureMatrix {
    fn zeros(max_length: usize) -> Self {
        FeatureMatrix { rows: vec![[0.0; FEATURE_COLUMNS]; max_length] }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), FEATURE_COLUMNS)
    }

    pub fn rows(&self) -> &[[f64; FEATURE_COLUMNS]] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64; FEATURE_COLUMNS]> {
        self.rows.get(index)
    }

    /// Row-major copy of the matrix, `len() * FEATURE_COLUMNS` values.
    pub fn to_flat(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }
}

/// Flat Euclidean distance over raw longitude/latitude. No geodesic
/// correction is applied.
pub fn planar_distance(a: &Point, b: &Point) -> f64 {
    let a: geo::Point<f64> = (*a).into();
    let b: geo::Point<f64> = (*b).into();
    a.euclidean_distance(&b)
}

/// Encode `path` into a `max_length x 3` matrix.
///
/// Fails with [`FeatureError::InvalidPath`] when the path is empty or has
/// more than `max_length` points. Paths are never truncated.
pub fn encode_path_feature(path: &[Point], max_length: usize) -> Result<FeatureMatrix> {
    if path.is_empty() || path.len() > max_length {
        return Err(FeatureError::InvalidPath { len: path.len(), max_length });
    }

    let mut matrix = FeatureMatrix::zeros(max_length);
    let origin = &path[0];

    for (row, point) in matrix.rows.iter_mut().zip(path).skip(1) {
        row[0] = planar_distance(origin, point);
        row[2] = point.elevation - origin.elevation;
    }

    debug!("Encoded path of {} points into {} rows", path.len(), max_length);
    Ok(matrix)
}

/// Encode each segment on its own. One result per segment, in order, so a
/// rejected path does not hide the others.
pub fn encode_segments(segments: &[Segment], max_length: usize) -> Vec<Result<FeatureMatrix>> {
    segments
        .iter()
        .map(|segment| encode_path_feature(&segment.points, max_length))
        .collect()
}
