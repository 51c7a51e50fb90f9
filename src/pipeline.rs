//! Batch driver: load, smooth, encode
//!
//! Files are independent, so a folder run hands one file to each rayon
//! task. Inside a task the smoother and encoder run sequentially.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{FeatureError, Result};
use crate::feature::{encode_segments, FeatureMatrix};
use crate::point::Track;
use crate::smoothing::smooth_segments;
use crate::track_reader::{find_gpx_files, load_track};

#[derive(Debug, Clone)]
pub struct EncodedSegment {
    /// Position of the segment in its track
    pub index: usize,
    pub name: Option<String>,
    pub matrix: FeatureMatrix,
}

/// One CSV row per input file
#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    pub filename: String,
    pub segments: usize,
    pub raw_points: usize,
    pub smoothed_points: usize,
    pub encoded_paths: usize,
    pub rejected_paths: usize,
    pub status: String,
}

impl TrackReport {
    fn failed(filename: String, error: &FeatureError) -> Self {
        TrackReport {
            filename,
            segments: 0,
            raw_points: 0,
            smoothed_points: 0,
            encoded_paths: 0,
            rejected_paths: 0,
            status: format!("ERROR: {}", error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackFeatures {
    /// The track after smoothing (or as loaded, when smoothing is off)
    pub track: Track,
    pub encoded: Vec<EncodedSegment>,
    pub report: TrackReport,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub features: Vec<TrackFeatures>,
    /// Every discovered file, failures included
    pub reports: Vec<TrackReport>,
}

impl BatchResult {
    pub fn failed_count(&self) -> usize {
        self.reports.len() - self.features.len()
    }
}

pub fn process_file(path: &Path, config: &PipelineConfig) -> Result<TrackFeatures> {
    let track = load_track(path)?;
    process_track(track, config)
}

/// Smooth and encode an already loaded track.
pub fn process_track(mut track: Track, config: &PipelineConfig) -> Result<TrackFeatures> {
    config.validate()?;

    let raw_points = track.point_count();
    if config.smoothing {
        smooth_segments(&mut track.segments, config.window_size)?;
    }
    let smoothed_points = track.point_count();

    let mut encoded = Vec::new();
    let mut rejected_paths = 0;
    let results = encode_segments(&track.segments, config.max_length);

    for (index, (segment, result)) in track.segments.iter().zip(results).enumerate() {
        // Segments the smoother emptied have no path left to encode.
        if segment.is_empty() {
            debug!("{} segment {}: empty, skipped", track.filename, index);
            continue;
        }
        match result {
            Ok(matrix) => encoded.push(EncodedSegment {
                index,
                name: segment.name.clone(),
                matrix,
            }),
            Err(e) => {
                warn!("{} segment {}: {}", track.filename, index, e);
                rejected_paths += 1;
            }
        }
    }

    let report = TrackReport {
        filename: track.filename.clone(),
        segments: track.segments.len(),
        raw_points,
        smoothed_points,
        encoded_paths: encoded.len(),
        rejected_paths,
        status: "SUCCESS".to_string(),
    };

    Ok(TrackFeatures { track, encoded, report })
}

/// Process every GPX file under `input` in parallel.
///
/// Per-file failures are recorded in the reports; only discovery errors or
/// an invalid configuration abort the batch.
pub fn process_folder(input: &Path, config: &PipelineConfig) -> Result<BatchResult> {
    config.validate()?;

    let gpx_files = find_gpx_files(input)?;
    info!("Found {} GPX files under {}", gpx_files.len(), input.display());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads())
        .build()
        .map_err(|e| FeatureError::Config(e.to_string()))?;
    info!("Using {} worker threads", pool.current_num_threads());

    let outcomes: Vec<(PathBuf, Result<TrackFeatures>)> = pool.install(|| {
        gpx_files
            .par_iter()
            .map(|path| (path.clone(), process_file(path, config)))
            .collect()
    });

    let mut batch = BatchResult::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(features) => {
                batch.reports.push(features.report.clone());
                batch.features.push(features);
            }
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                batch.reports.push(TrackReport::failed(filename, &e));
            }
        }
    }

    info!(
        "Processed {} of {} files ({} failed)",
        batch.features.len(),
        batch.reports.len(),
        batch.failed_count()
    );
    Ok(batch)
}
