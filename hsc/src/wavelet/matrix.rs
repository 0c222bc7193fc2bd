use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// A row-major matrix of real samples.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl WaveMatrix {
    /// Create a zero-filled matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create from existing row-major data
    pub fn from_data(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::DimensionMismatch {
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        Ok(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::RegionOutOfBounds {
                height: row + 1,
                width: col + 1,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Swap rows and columns.
    pub fn transpose(&mut self) {
        if self.rows > 1 && self.cols > 1 {
            let mut out = vec![0.0; self.data.len()];
            for r in 0..self.rows {
                for c in 0..self.cols {
                    out[c * self.rows + r] = self.data[r * self.cols + c];
                }
            }
            self.data = out;
        }
        std::mem::swap(&mut self.rows, &mut self.cols);
    }

    /// True if every element differs by less than `eps`.
    pub fn approx_eq(&self, other: &WaveMatrix, eps: f64) -> Result<bool> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a - b).abs() < eps))
    }
}

impl Index<(usize, usize)> for WaveMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for WaveMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.cols + col]
    }
}
