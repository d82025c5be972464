//! Error types for the circulant tracker.

use thiserror::Error;

/// Main error type for tracker operations.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "Track region {region_width}x{region_height} is larger than the input image {image_width}x{image_height}"
    )]
    RegionTooLarge {
        region_width: i32,
        region_height: i32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Tracker has not been initialized")]
    NotInitialized,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackError>;
