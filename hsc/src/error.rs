//! Error values returned by the transform and coding stages.

use hsi::ImageError;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A look-back predictor needs at least one sample of history.
    #[error("invalid look-back window {0}: must be greater than zero")]
    InvalidLookBack(usize),

    /// The arithmetic coder parameters do not fit together.
    #[error("invalid coder configuration: {0}")]
    InvalidCoderConfig(String),

    /// A recursive transform was asked for zero steps.
    #[error("recursive transform requires at least one step")]
    InvalidSteps,

    /// A prediction was requested outside the data.
    #[error("position {position} out of bounds for length {len}")]
    PositionOutOfBounds { position: usize, len: usize },

    /// The data does not cover the whole predictor grid.
    #[error("data length {len} smaller than grid {rows}x{cols}")]
    GridTooSmall { rows: usize, cols: usize, len: usize },

    /// A transform region does not fit inside the matrix.
    #[error("region {height}x{width} exceeds matrix {rows}x{cols}")]
    RegionOutOfBounds {
        height: usize,
        width: usize,
        rows: usize,
        cols: usize,
    },

    /// A symbol that does not belong to the coder alphabet.
    #[error("symbol {symbol} outside alphabet of size {alphabet_size}")]
    SymbolOutOfRange { symbol: u32, alphabet_size: u32 },

    /// A cube sample outside the range its configuration can represent.
    #[error("sample {value} outside [{min}, {max}]")]
    ValueOutOfRange { value: i32, min: i32, max: i32 },

    /// The number of coded band streams does not match the cube.
    #[error("expected {expected} band streams, got {got}")]
    StreamCountMismatch { expected: usize, got: usize },

    /// Matrices with differing shapes were combined or compared.
    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// The stream signalled a correct prediction where the predictor had none.
    #[error("stream signals a prediction at position {position} but none is available")]
    MissingPrediction { position: usize },

    #[error(transparent)]
    Image(#[from] ImageError),
}
