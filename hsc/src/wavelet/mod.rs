//! CDF-9/7 wavelet transforms.
//!
//! The 1-D transforms work in place on a signal buffer and leave it packed:
//! the lowpass (even position) outputs first, then the highpass (odd
//! position) outputs. Two equivalent 1-D forms are provided, a convolution
//! form built from [`Kernel`]s and an in-place lifting form. Both agree on
//! the packed output.
//!
//! [`BidimensionalWavelet`] lifts a 1-D transform to a sub-rectangle of a
//! [`WaveMatrix`] and [`RecursiveWavelet`] repeats the 2-D transform over the
//! shrinking low-frequency corner.

mod bidimensional;
mod kernel;
mod lifting;
mod matrix;

pub use bidimensional::{step_sizes, BidimensionalWavelet, RecursiveWavelet};
pub use kernel::{Kernel, KernelApplier, KernelWavelet};
pub use lifting::{lifting_params_97, LiftingWavelet};
pub use matrix::WaveMatrix;

use crate::error::Result;

/// A 1-D transform over a mutable signal buffer.
pub trait WaveletTransform {
    fn forward_transform(&self, signal: &mut [f64]);
    fn reverse_transform(&self, signal: &mut [f64]);
}

/// A 2-D transform over the `[0, height) x [0, width)` corner of a matrix.
pub trait WaveletTransform2D {
    fn forward_transform(&self, matrix: &mut WaveMatrix, height: usize, width: usize)
        -> Result<()>;
    fn reverse_transform(&self, matrix: &mut WaveMatrix, height: usize, width: usize)
        -> Result<()>;
}

/// Stable partition by parity: even positions first, then odd positions.
pub fn pack(signal: &mut [f64]) {
    let n = signal.len();
    if n < 3 {
        return;
    }
    let scratch = signal.to_vec();
    let half = n.div_ceil(2);
    for (i, &v) in scratch.iter().enumerate() {
        let dst = if i % 2 == 0 { i / 2 } else { half + i / 2 };
        signal[dst] = v;
    }
}

/// Inverse of [`pack`].
pub fn unpack(signal: &mut [f64]) {
    let n = signal.len();
    if n < 3 {
        return;
    }
    let scratch = signal.to_vec();
    let half = n.div_ceil(2);
    for (i, out) in signal.iter_mut().enumerate() {
        let src = if i % 2 == 0 { i / 2 } else { half + i / 2 };
        *out = scratch[src];
    }
}

#[cfg(test)]
pub(crate) fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}
