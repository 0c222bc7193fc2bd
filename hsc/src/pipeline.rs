//! Glue between [`hsi`] cubes and the transform and coding stages.
//!
//! Bands are processed independently. A band is a row-major
//! `lines x samples` plane, which is the shape both the wave matrices and the
//! [`Neighborhood2D`] predictor expect.

use hsi::{ImageConfig, ImageCube};
use log::debug;

use crate::coder::{CoderConfig, DEFAULT_TOTAL_FREQUENCY};
use crate::error::{Error, Result};
use crate::predictive_codec::PredictiveArithmeticCodec;
use crate::predictor::Neighborhood2D;
use crate::wavelet::{
    BidimensionalWavelet, LiftingWavelet, RecursiveWavelet, WaveMatrix,
};

/// Lift one band into a `lines x samples` matrix.
pub fn band_matrix(cube: &ImageCube, band: usize) -> Result<WaveMatrix> {
    let data = cube.band(band)?.iter().map(|&v| f64::from(v)).collect();
    WaveMatrix::from_data(data, cube.lines(), cube.samples())
}

/// Write `matrix` back into `band`, rounding to the nearest integer and
/// clamping to the sample range of `config`.
pub fn store_band(
    cube: &mut ImageCube,
    band: usize,
    matrix: &WaveMatrix,
    config: &ImageConfig,
) -> Result<()> {
    if matrix.dimensions() != (cube.lines(), cube.samples()) {
        return Err(Error::DimensionMismatch {
            left: (cube.lines(), cube.samples()),
            right: matrix.dimensions(),
        });
    }
    let (min, max) = (f64::from(config.min_value()), f64::from(config.max_value()));
    for (out, &v) in cube.band_mut(band)?.iter_mut().zip(matrix.data()) {
        *out = v.round().clamp(min, max) as i32;
    }
    Ok(())
}

fn recursive_cdf97() -> RecursiveWavelet<BidimensionalWavelet<LiftingWavelet>> {
    RecursiveWavelet::new(BidimensionalWavelet::new(LiftingWavelet::cdf97()))
}

/// Forward recursive CDF-9/7 over a whole band.
pub fn decorrelate_band(cube: &ImageCube, band: usize, steps: usize) -> Result<WaveMatrix> {
    let mut matrix = band_matrix(cube, band)?;
    let (rows, cols) = matrix.dimensions();
    recursive_cdf97().forward_transform(&mut matrix, rows, cols, steps)?;
    debug!("band {} decorrelated in {} steps", band, steps);
    Ok(matrix)
}

/// Inverse of [`decorrelate_band`], stored into `band` of `cube`.
pub fn reconstruct_band(
    cube: &mut ImageCube,
    band: usize,
    mut matrix: WaveMatrix,
    steps: usize,
    config: &ImageConfig,
) -> Result<()> {
    let (rows, cols) = matrix.dimensions();
    recursive_cdf97().reverse_transform(&mut matrix, rows, cols, steps)?;
    store_band(cube, band, &matrix, config)?;
    debug!("band {} reconstructed in {} steps", band, steps);
    Ok(())
}

/// Frequency budget for an alphabet of `alphabet_size` symbols.
///
/// The model halves its counts whenever the total passes the budget, so a
/// budget close to the alphabet size would rescale on every update and never
/// adapt. Wide alphabets get sixteen counts per symbol, capped at the largest
/// total a 32-bit coder accepts.
fn frequency_budget(alphabet_size: u32) -> u32 {
    (u64::from(alphabet_size) << 4).clamp(u64::from(DEFAULT_TOTAL_FREQUENCY), 1 << 30) as u32
}

/// Lossless band-by-band coding of a whole cube.
///
/// Every band is coded as its own stream with a [`Neighborhood2D`] predictor.
/// Signed samples are shifted up by `2^(bit_depth - 1)` so every symbol is in
/// `[0, 2^bit_depth)`.
#[derive(Debug, Clone)]
pub struct CubeCoder {
    config: ImageConfig,
    coder: CoderConfig,
}

impl CubeCoder {
    pub fn new(config: ImageConfig) -> Result<Self> {
        config.validate()?;
        let number_of_chars = 1u32 << config.bit_depth;
        let alphabet_size = number_of_chars + 1;
        let coder = CoderConfig {
            total_frequency: frequency_budget(alphabet_size),
            ..CoderConfig::new(alphabet_size)
        };
        coder.validate()?;
        Ok(Self { config, coder })
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    fn codec(&self) -> Result<PredictiveArithmeticCodec<Neighborhood2D>> {
        let predictor = Neighborhood2D::new(self.config.lines, self.config.samples);
        PredictiveArithmeticCodec::with_config(predictor, self.coder)
    }

    fn check_shape(&self, cube: &ImageCube) -> Result<()> {
        if cube.dimensions() != self.config.dimensions() {
            return Err(Error::Image(hsi::ImageError::DimensionMismatch {
                left: self.config.dimensions(),
                right: cube.dimensions(),
            }));
        }
        Ok(())
    }

    /// One coded stream per band.
    pub fn encode(&self, cube: &ImageCube) -> Result<Vec<Vec<u8>>> {
        self.check_shape(cube)?;
        let (min, max) = (self.config.min_value(), self.config.max_value());
        let mut codec = self.codec()?;
        let mut streams = Vec::with_capacity(cube.bands());
        for band in 0..cube.bands() {
            let symbols = cube
                .band(band)?
                .iter()
                .map(|&value| {
                    if value < min || value > max {
                        return Err(Error::ValueOutOfRange { value, min, max });
                    }
                    Ok((i64::from(value) - i64::from(min)) as u32)
                })
                .collect::<Result<Vec<u32>>>()?;
            let stream = codec.encode(&symbols)?;
            debug!("band {}: {} samples in {} bytes", band, symbols.len(), stream.len());
            streams.push(stream);
        }
        Ok(streams)
    }

    /// Rebuild the cube from the streams produced by [`CubeCoder::encode`].
    pub fn decode(&self, streams: &[Vec<u8>]) -> Result<ImageCube> {
        let (bands, lines, samples) = self.config.dimensions();
        if streams.len() != bands {
            return Err(Error::StreamCountMismatch {
                expected: bands,
                got: streams.len(),
            });
        }
        let min = i64::from(self.config.min_value());
        let mut codec = self.codec()?;
        let mut cube = ImageCube::new(bands, lines, samples);
        for (band, stream) in streams.iter().enumerate() {
            let symbols = codec.decode(stream, lines * samples)?;
            for (out, symbol) in cube.band_mut(band)?.iter_mut().zip(symbols) {
                *out = (i64::from(symbol) + min) as i32;
            }
        }
        Ok(cube)
    }
}
