//! Hyperspectral image compression.
//!
//! The codec decorrelates each band with a CDF-9/7 wavelet and reduces the
//! entropy of integer planes with a predictive arithmetic coder. Raw cubes are
//! read and written by the [`hsi`] crate.
//!
//! ```
//! use hsc::{LastValue1D, PredictiveArithmeticCodec};
//!
//! let data = [5, 5, 5, 2, 5, 5, 5, 5];
//! let mut codec = PredictiveArithmeticCodec::new(LastValue1D::new(), 6).unwrap();
//! let stream = codec.encode(&data).unwrap();
//! assert_eq!(codec.decode(&stream, data.len()).unwrap(), data);
//! ```

pub mod bit_reader;
pub mod coder;
pub mod error;
pub mod pipeline;
pub mod predictive_codec;
pub mod predictor;
pub mod wavelet;

pub use coder::{
    ArithmeticDecoder, ArithmeticEncoder, CoderConfig, SymbolDecoder, SymbolEncoder,
};
pub use error::{Error, Result};
pub use pipeline::CubeCoder;
pub use predictive_codec::PredictiveArithmeticCodec;
pub use predictor::{
    LastValue1D, LookBackMajority1D, Neighborhood2D, NoPrediction, PredictiveFunction,
};
pub use wavelet::{
    BidimensionalWavelet, Kernel, KernelApplier, KernelWavelet, LiftingWavelet, RecursiveWavelet,
    WaveMatrix, WaveletTransform, WaveletTransform2D,
};
