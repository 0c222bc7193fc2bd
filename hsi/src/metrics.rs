//! Cube comparison metrics.
//!
//! Used to check a reconstructed cube against the original. Every function
//! fails with [`ImageError::DimensionMismatch`] when the shapes differ.

use crate::cube::ImageCube;
use crate::error::Result;

/// Mean squared error. Zero for identical cubes.
pub fn mse(a: &ImageCube, b: &ImageCube) -> Result<f64> {
    a.check_same_shape(b)?;
    if a.data().is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum();
    Ok(sum / a.data().len() as f64)
}

/// Peak signal to noise ratio in dB for samples whose peak is `max_value`.
///
/// Infinite when the cubes are identical.
pub fn psnr(a: &ImageCube, b: &ImageCube, max_value: f64) -> Result<f64> {
    let mse = mse(a, b)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (max_value * max_value / mse).log10())
}

/// Largest absolute per-sample difference.
pub fn max_abs_error(a: &ImageCube, b: &ImageCube) -> Result<u32> {
    a.check_same_shape(b)?;
    Ok(a.data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| x.abs_diff(y))
        .max()
        .unwrap_or(0))
}
