//! Gateway error types.

use std::fmt;

use tfn_core::TfnError;

/// Result alias for load/save operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Which curve a file was short of points on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Color,
    Opacity,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => write!(f, "color"),
            Self::Opacity => write!(f, "opacity"),
        }
    }
}

/// Errors raised while reading, writing, or exporting transfer functions.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The file is malformed, truncated, or describes an invalid curve.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("file has {count} {channel} point(s), at least 2 required")]
    InsufficientPoints { channel: Channel, count: usize },

    #[error("unsupported transfer function format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Model(#[from] TfnError),
}
