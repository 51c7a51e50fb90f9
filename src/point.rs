//! Point, segment and track value types plus the array conversions used
//! to feed them into (and back out of) the numeric transforms.

use chrono::{DateTime, Utc};
use geo::point;
use serde::Serialize;

/// A single GPS fix. Longitude and latitude are treated as plain
/// Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64, elevation: f64) -> Self {
        Point { longitude, latitude, elevation }
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(p: Point) -> Self {
        point!(x: p.longitude, y: p.latitude)
    }
}

/// One continuous trajectory fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segment {
    pub name: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub points: Vec<Point>,
}

impl Segment {
    pub fn new(points: Vec<Point>) -> Self {
        Segment { points, ..Default::default() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// All segments read from one source file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Track {
    pub filename: String,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

pub fn point_to_array(p: &Point) -> [f64; 3] {
    [p.longitude, p.latitude, p.elevation]
}

pub fn point_from_array(a: [f64; 3]) -> Point {
    Point::new(a[0], a[1], a[2])
}

/// Rows are (longitude, latitude, elevation) in segment order.
pub fn segment_to_array(segment: &Segment) -> Vec<[f64; 3]> {
    segment.points.iter().map(point_to_array).collect()
}

pub fn segment_from_array(rows: &[[f64; 3]]) -> Segment {
    Segment::new(rows.iter().copied().map(point_from_array).collect())
}
