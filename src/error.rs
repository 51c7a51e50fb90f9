use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FeatureError>;

#[derive(Error, Debug)]
pub enum FeatureError {
    /// Path is empty or does not fit the requested matrix length.
    #[error("invalid path: {len} points cannot be encoded into {max_length} rows")]
    InvalidPath { len: usize, max_length: usize },

    #[error("invalid smoothing window size: {0} (must be at least 1)")]
    InvalidWindow(usize),

    #[error("no tracks found in {0}")]
    EmptyTrack(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
