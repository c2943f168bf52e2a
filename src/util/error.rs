//! Error types for ssimmap.

use thiserror::Error;

/// Result alias for ssimmap operations.
pub type SsimResult<T> = std::result::Result<T, SsimError>;

/// Errors that can occur when building matrices or computing SSIM maps.
///
/// Every variant is raised before or at the start of a computation; once the
/// inputs validate, the numeric pipelines always run to completion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SsimError {
    /// An option key is unknown or its value is out of range.
    #[error("invalid option {key}: {reason}")]
    InvalidOption { key: String, reason: String },
    /// The requested SSIM algorithm is not one of the known variants.
    #[error("invalid ssim algorithm {name:?} (use: fast, original, bezkrovny, weber)")]
    InvalidAlgorithm { name: String },
    /// Two operands that must share a shape do not.
    #[error("dimension mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    /// A kernel does not satisfy the precondition of the selected convolution path.
    #[error("invalid kernel: {reason}")]
    InvalidKernel { reason: &'static str },
    /// Width or height is zero or overflows.
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer length does not match the declared dimensions.
    #[error("buffer size mismatch: needed={needed}, got={got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A sliding window does not fit inside the image.
    #[error("window size {window_size} exceeds image {width}x{height}")]
    WindowTooLarge {
        window_size: usize,
        width: usize,
        height: usize,
    },
    /// Failed to decode or load an image.
    #[error("image I/O error: {reason}")]
    ImageIo { reason: String },
}

impl SsimError {
    pub(crate) fn invalid_option(key: &str, reason: impl Into<String>) -> Self {
        SsimError::InvalidOption {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
