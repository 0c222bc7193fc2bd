//! Error values returned by the image model and the raw serializer.

use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Error values that may be returned from `hsi` functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Unsupported bit depth.
    ///
    /// Samples are between 1 and 25 bits wide. 25 is the widest sample
    /// for which an accumulator refill never needs more than four bytes.
    #[error("unsupported bit depth {0}: must be in range [1, 25]")]
    UnsupportedBitDepth(u8),

    /// Unsupported ordering.
    ///
    /// A band or byte ordering name that is not recognized.
    #[error("unsupported ordering {0:?}")]
    UnsupportedOrdering(String),

    /// Invalid dimensions.
    ///
    /// One of the axes is zero, or the cube is too large to address.
    #[error("invalid dimensions {bands}x{lines}x{samples}")]
    InvalidDimensions {
        bands: usize,
        lines: usize,
        samples: usize,
    },

    /// A `(band, line, sample)` coordinate outside the cube.
    #[error("position ({band}, {line}, {sample}) out of bounds for cube {dims:?}")]
    OutOfBounds {
        band: usize,
        line: usize,
        sample: usize,
        dims: (usize, usize, usize),
    },

    /// The raw buffer holds fewer bytes than the configuration requires.
    #[error("buffer too short: need {expected} bytes, got {got}")]
    BufferTooShort { expected: usize, got: usize },

    /// Two cubes with differing shapes were compared or combined.
    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize, usize),
        right: (usize, usize, usize),
    },
}
