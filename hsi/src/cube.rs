//! In-memory hyperspectral cube.

use std::ops::{Index, IndexMut};

use crate::error::{ImageError, Result};

/// A cube of integer samples addressed by `(band, line, sample)`.
///
/// Storage is band sequential. The raw band ordering of a file only affects
/// how the serializer walks the cube, never how it is stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCube {
    data: Vec<i32>,
    bands: usize,
    lines: usize,
    samples: usize,
}

impl ImageCube {
    /// Create a zero filled cube.
    pub fn new(bands: usize, lines: usize, samples: usize) -> Self {
        Self {
            data: vec![0; bands * lines * samples],
            bands,
            lines,
            samples,
        }
    }

    /// Create from band sequential data.
    pub fn from_data(data: Vec<i32>, bands: usize, lines: usize, samples: usize) -> Result<Self> {
        if data.len() != bands * lines * samples {
            return Err(ImageError::InvalidDimensions {
                bands,
                lines,
                samples,
            });
        }
        Ok(Self {
            data,
            bands,
            lines,
            samples,
        })
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.bands, self.lines, self.samples)
    }

    /// Band sequential view of all samples.
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    fn offset(&self, band: usize, line: usize, sample: usize) -> Result<usize> {
        if band >= self.bands || line >= self.lines || sample >= self.samples {
            return Err(ImageError::OutOfBounds {
                band,
                line,
                sample,
                dims: self.dimensions(),
            });
        }
        Ok((band * self.lines + line) * self.samples + sample)
    }

    pub fn get(&self, band: usize, line: usize, sample: usize) -> Result<i32> {
        let offset = self.offset(band, line, sample)?;
        Ok(self.data[offset])
    }

    pub fn set(&mut self, band: usize, line: usize, sample: usize, value: i32) -> Result<()> {
        let offset = self.offset(band, line, sample)?;
        self.data[offset] = value;
        Ok(())
    }

    /// One band as a row-major `lines x samples` slice.
    pub fn band(&self, band: usize) -> Result<&[i32]> {
        let start = self.offset(band, 0, 0)?;
        Ok(&self.data[start..start + self.lines * self.samples])
    }

    pub fn band_mut(&mut self, band: usize) -> Result<&mut [i32]> {
        let start = self.offset(band, 0, 0)?;
        let len = self.lines * self.samples;
        Ok(&mut self.data[start..start + len])
    }

    /// Fail with `DimensionMismatch` unless `other` has the same shape.
    pub fn check_same_shape(&self, other: &ImageCube) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(ImageError::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize, usize)> for ImageCube {
    type Output = i32;

    fn index(&self, (band, line, sample): (usize, usize, usize)) -> &Self::Output {
        &self.data[(band * self.lines + line) * self.samples + sample]
    }
}

impl IndexMut<(usize, usize, usize)> for ImageCube {
    fn index_mut(&mut self, (band, line, sample): (usize, usize, usize)) -> &mut Self::Output {
        &mut self.data[(band * self.lines + line) * self.samples + sample]
    }
}
