//! Fixed-shape feature extraction from GPS trajectories
//!
//! Two transforms sit at the core: [`smooth_segments`] denoises segments
//! with a trailing moving average, and [`encode_path_feature`] turns one
//! path into a `max_length x 3` matrix for models with a static input
//! size. The remaining modules load GPX files, run folders in batch and
//! write the results out.

pub mod config;
pub mod error;
pub mod export;
pub mod feature;
pub mod pipeline;
pub mod point;
pub mod smoothing;
pub mod track_reader;

pub use config::PipelineConfig;
pub use error::{FeatureError, Result};
pub use feature::{encode_path_feature, encode_segments, planar_distance, FeatureMatrix, FEATURE_COLUMNS};
pub use point::{point_from_array, point_to_array, segment_from_array, segment_to_array, Point, Segment, Track};
pub use smoothing::{moving_average, smooth_segments, DEFAULT_WINDOW_SIZE};
