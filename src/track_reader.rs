//! GPX loading
//!
//! Every `<trkseg>` becomes one [`Segment`]. Waypoints without elevation
//! are skipped, matching how the rest of the pipeline needs all three
//! coordinates.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use gpx::{read, Gpx, Time};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FeatureError, Result};
use crate::point::{Point, Segment, Track};

pub fn load_track(path: &Path) -> Result<Track> {
    let file = File::open(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    parse_track(BufReader::new(file), &filename)
}

/// Parse GPX from any reader. `filename` only labels the result.
pub fn parse_track<R: Read>(reader: R, filename: &str) -> Result<Track> {
    let gpx = read(reader)?;
    track_from_gpx(&gpx, filename)
}

fn track_from_gpx(gpx: &Gpx, filename: &str) -> Result<Track> {
    if gpx.tracks.is_empty() {
        return Err(FeatureError::EmptyTrack(filename.to_string()));
    }

    let mut segments = Vec::new();
    let mut skipped = 0;

    for track in &gpx.tracks {
        for trkseg in &track.segments {
            let mut points = Vec::with_capacity(trkseg.points.len());
            let mut started_at = None;

            for pt in &trkseg.points {
                let Some(elevation) = pt.elevation else {
                    skipped += 1;
                    continue;
                };
                if started_at.is_none() {
                    started_at = pt.time.as_ref().and_then(parse_time);
                }
                let p = pt.point();
                points.push(Point::new(p.x(), p.y(), elevation));
            }

            segments.push(Segment { name: track.name.clone(), started_at, points });
        }
    }

    if skipped > 0 {
        debug!("{}: skipped {} waypoints without elevation", filename, skipped);
    }
    debug!("{}: loaded {} segments", filename, segments.len());

    Ok(Track { filename: filename.to_string(), segments })
}

fn parse_time(time: &Time) -> Option<DateTime<Utc>> {
    time.format().ok()?.parse::<DateTime<Utc>>().ok()
}

/// All `.gpx` files under `dir`, sorted by path.
pub fn find_gpx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut gpx_files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_gpx = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gpx"))
            .unwrap_or(false);
        if is_gpx {
            gpx_files.push(entry.path().to_path_buf());
        }
    }

    gpx_files.sort();
    Ok(gpx_files)
}
