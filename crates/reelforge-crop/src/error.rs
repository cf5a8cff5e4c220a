//! Error types for reelforge-crop.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before or around crop resolution.
///
/// Resolution itself never fails; these cover malformed inputs and the
/// detector lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A frame with a zero width or height.
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Invalid crop configuration.
    #[error("invalid crop config: {0}")]
    InvalidConfig(String),

    /// The face detection model could not be loaded.
    #[error("failed to load face model {}: {message}", path.display())]
    ModelLoad { path: PathBuf, message: String },

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a model load error.
    pub fn model_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}
