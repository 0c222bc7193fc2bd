use log::{debug, trace};

use super::{WaveMatrix, WaveletTransform, WaveletTransform2D};
use crate::error::{Error, Result};

fn check_region(matrix: &WaveMatrix, height: usize, width: usize) -> Result<()> {
    if height > matrix.rows() || width > matrix.cols() {
        return Err(Error::RegionOutOfBounds {
            height,
            width,
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }
    Ok(())
}

/// Applies a 1-D transform along the rows and then the columns of a corner of
/// a matrix. The columns are reached by transposing the whole matrix, so the
/// rest of the matrix is left untouched.
#[derive(Debug, Clone, Default)]
pub struct BidimensionalWavelet<W> {
    wavelet: W,
}

impl<W: WaveletTransform> BidimensionalWavelet<W> {
    pub fn new(wavelet: W) -> Self {
        Self { wavelet }
    }

    pub fn wavelet(&self) -> &W {
        &self.wavelet
    }

    fn each_row(&self, matrix: &mut WaveMatrix, rows: usize, len: usize, forward: bool) {
        for r in 0..rows {
            let row = &mut matrix.row_mut(r)[..len];
            if forward {
                self.wavelet.forward_transform(row);
            } else {
                self.wavelet.reverse_transform(row);
            }
        }
    }
}

impl<W: WaveletTransform> WaveletTransform2D for BidimensionalWavelet<W> {
    fn forward_transform(
        &self,
        matrix: &mut WaveMatrix,
        height: usize,
        width: usize,
    ) -> Result<()> {
        check_region(matrix, height, width)?;
        self.each_row(matrix, height, width, true);
        matrix.transpose();
        self.each_row(matrix, width, height, true);
        matrix.transpose();
        Ok(())
    }

    fn reverse_transform(
        &self,
        matrix: &mut WaveMatrix,
        height: usize,
        width: usize,
    ) -> Result<()> {
        check_region(matrix, height, width)?;
        self.each_row(matrix, height, width, false);
        matrix.transpose();
        self.each_row(matrix, width, height, false);
        matrix.transpose();
        Ok(())
    }
}

/// The rectangles visited by a recursive transform, largest first.
///
/// Each step keeps the low-frequency half of the previous one along both axes,
/// `ceil(h / 2) x ceil(w / 2)`.
pub fn step_sizes(height: usize, width: usize, steps: usize) -> Result<Vec<(usize, usize)>> {
    if steps == 0 {
        return Err(Error::InvalidSteps);
    }
    let mut sizes = Vec::with_capacity(steps);
    let (mut h, mut w) = (height, width);
    for _ in 0..steps {
        sizes.push((h, w));
        h = h.div_ceil(2);
        w = w.div_ceil(2);
    }
    Ok(sizes)
}

/// Multiresolution decomposition: a 2-D transform repeated over the shrinking
/// low-frequency corner.
#[derive(Debug, Clone, Default)]
pub struct RecursiveWavelet<T> {
    transform: T,
}

impl<T: WaveletTransform2D> RecursiveWavelet<T> {
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    pub fn forward_transform(
        &self,
        matrix: &mut WaveMatrix,
        height: usize,
        width: usize,
        steps: usize,
    ) -> Result<()> {
        check_region(matrix, height, width)?;
        let sizes = step_sizes(height, width, steps)?;
        debug!("forward {}x{} in {} steps", height, width, steps);
        for (step, &(h, w)) in sizes.iter().enumerate() {
            trace!("step {}: {}x{}", step, h, w);
            self.transform.forward_transform(matrix, h, w)?;
        }
        Ok(())
    }

    pub fn reverse_transform(
        &self,
        matrix: &mut WaveMatrix,
        height: usize,
        width: usize,
        steps: usize,
    ) -> Result<()> {
        check_region(matrix, height, width)?;
        let sizes = step_sizes(height, width, steps)?;
        debug!("reverse {}x{} in {} steps", height, width, steps);
        for (step, &(h, w)) in sizes.iter().enumerate().rev() {
            trace!("step {}: {}x{}", step, h, w);
            self.transform.reverse_transform(matrix, h, w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{approx_eq, KernelWavelet, LiftingWavelet};
    use super::*;

    const EPSILON: f64 = 1e-4;

    fn test_matrix(rows: usize, cols: usize) -> WaveMatrix {
        let data = (0..rows * cols)
            .map(|i| ((i * 7919) % 251) as f64)
            .collect();
        WaveMatrix::from_data(data, rows, cols).unwrap()
    }

    #[test]
    fn test_step_sizes() {
        assert_eq!(
            step_sizes(16, 16, 3).unwrap(),
            vec![(16, 16), (8, 8), (4, 4)]
        );
        assert_eq!(
            step_sizes(7, 5, 4).unwrap(),
            vec![(7, 5), (4, 3), (2, 2), (1, 1)]
        );
        assert_eq!(step_sizes(4, 4, 0), Err(Error::InvalidSteps));
    }

    #[test]
    fn test_2d_round_trip() {
        let w = BidimensionalWavelet::new(LiftingWavelet::cdf97());
        let original = test_matrix(9, 12);
        let mut m = original.clone();
        w.forward_transform(&mut m, 9, 12).unwrap();
        assert!(!m.approx_eq(&original, EPSILON).unwrap());
        w.reverse_transform(&mut m, 9, 12).unwrap();
        assert!(m.approx_eq(&original, EPSILON).unwrap());
    }

    #[test]
    fn test_2d_leaves_outside_region() {
        let w = BidimensionalWavelet::new(KernelWavelet::cdf97());
        let original = test_matrix(6, 8);
        let mut m = original.clone();
        w.forward_transform(&mut m, 4, 5).unwrap();
        for r in 0..6 {
            for c in 0..8 {
                if r >= 4 || c >= 5 {
                    assert_eq!(m[(r, c)], original[(r, c)], "({}, {})", r, c);
                }
            }
        }
    }

    #[test]
    fn test_region_check() {
        let w = BidimensionalWavelet::new(LiftingWavelet::cdf97());
        let mut m = WaveMatrix::new(4, 4);
        assert_eq!(
            w.forward_transform(&mut m, 5, 4),
            Err(Error::RegionOutOfBounds {
                height: 5,
                width: 4,
                rows: 4,
                cols: 4
            })
        );
    }

    #[test]
    fn test_recursive_round_trip() {
        for w in [
            RecursiveWavelet::new(BidimensionalWavelet::new(LiftingWavelet::cdf97())),
            RecursiveWavelet::new(BidimensionalWavelet::new(LiftingWavelet::default())),
        ] {
            let original = test_matrix(16, 16);
            let mut m = original.clone();
            w.forward_transform(&mut m, 16, 16, 3).unwrap();
            w.reverse_transform(&mut m, 16, 16, 3).unwrap();
            assert!(m.approx_eq(&original, EPSILON).unwrap());
        }
    }

    #[test]
    fn test_recursive_kernel_round_trip_odd_sizes() {
        let w = RecursiveWavelet::new(BidimensionalWavelet::new(KernelWavelet::cdf97()));
        let original = test_matrix(13, 7);
        let mut m = original.clone();
        w.forward_transform(&mut m, 13, 7, 4).unwrap();
        w.reverse_transform(&mut m, 13, 7, 4).unwrap();
        assert!(m.approx_eq(&original, EPSILON).unwrap());
    }

    #[test]
    fn test_recursive_concentrates_energy() {
        let w = RecursiveWavelet::new(BidimensionalWavelet::new(LiftingWavelet::cdf97()));
        let mut m = WaveMatrix::from_data(vec![50.0; 64], 8, 8).unwrap();
        w.forward_transform(&mut m, 8, 8, 2).unwrap();
        assert!(approx_eq(m[(0, 0)], 50.0, 1e-9));
        for r in 0..8 {
            for c in 0..8 {
                if (r, c) != (0, 0) && (r >= 2 || c >= 2) {
                    assert!(approx_eq(m[(r, c)], 0.0, 1e-9), "({}, {})", r, c);
                }
            }
        }
    }

    #[test]
    fn test_recursive_rejects_zero_steps() {
        let w = RecursiveWavelet::new(BidimensionalWavelet::new(LiftingWavelet::cdf97()));
        let mut m = WaveMatrix::new(4, 4);
        assert_eq!(
            w.forward_transform(&mut m, 4, 4, 0),
            Err(Error::InvalidSteps)
        );
    }
}
