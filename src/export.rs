//! CSV and GPX output

use std::fs::File;
use std::path::Path;

use csv::Writer;
use geo::point;
use gpx::{write, Gpx, GpxVersion, Track as GpxTrack, TrackSegment, Waypoint};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::pipeline::{TrackFeatures, TrackReport};
use crate::point::Track;

#[derive(Debug, Serialize)]
struct FeatureRow<'a> {
    filename: &'a str,
    segment: usize,
    row: usize,
    distance: f64,
    reserved: f64,
    elevation_delta: f64,
}

/// One CSV line per matrix row, padding rows included.
pub fn write_features_csv(results: &[TrackFeatures], csv_path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(csv_path)?;
    let mut rows = 0;

    for result in results {
        for encoded in &result.encoded {
            for (row, values) in encoded.matrix.rows().iter().enumerate() {
                wtr.serialize(FeatureRow {
                    filename: &result.report.filename,
                    segment: encoded.index,
                    row,
                    distance: values[0],
                    reserved: values[1],
                    elevation_delta: values[2],
                })?;
                rows += 1;
            }
        }
    }

    wtr.flush()?;
    info!("Wrote {} feature rows to {}", rows, csv_path.display());
    Ok(())
}

pub fn write_reports_csv(reports: &[TrackReport], csv_path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(csv_path)?;
    for report in reports {
        wtr.serialize(report)?;
    }
    wtr.flush()?;
    info!("Processing report saved to {}", csv_path.display());
    Ok(())
}

/// Write each segment as its own `<trk>`. Emptied segments are written as
/// empty tracks so segment positions survive the round trip.
pub fn write_smoothed_gpx(track: &Track, output_path: &Path) -> Result<()> {
    let mut out = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(env!("CARGO_PKG_NAME").to_string()),
        ..Default::default()
    };

    for segment in &track.segments {
        let mut gpx_track = GpxTrack::new();
        gpx_track.name = segment.name.clone();

        let mut trkseg = TrackSegment::new();
        for p in &segment.points {
            let mut waypoint = Waypoint::new(point!(x: p.longitude, y: p.latitude));
            waypoint.elevation = Some(p.elevation);
            trkseg.points.push(waypoint);
        }

        gpx_track.segments.push(trkseg);
        out.tracks.push(gpx_track);
    }

    let file = File::create(output_path)?;
    write(&out, file)?;
    info!("Smoothed track written to {}", output_path.display());
    Ok(())
}
