//! Bit-exact raw cube reader and writer.
//!
//! A reader or writer is chosen by three independent settings:
//!
//! - the band ordering (BSQ, BIL, BIP), which only decides loop nesting,
//! - the sample width, 1 to 25 bits,
//! - the byte ordering, used when the width is a whole number of bytes.
//!
//! Byte aligned widths move each sample as `bit_depth / 8` raw bytes. All other
//! widths go through a [`BitAccumulator`], packing samples MSB first without
//! gaps, and the last byte is zero padded. Either way the raw buffer is exactly
//! `ceil(bands * lines * samples * bit_depth / 8)` bytes long.

use log::{debug, warn};

use crate::bit_accumulator::BitAccumulator;
use crate::config::{ByteOrdering, ImageConfig};
use crate::cube::ImageCube;
use crate::error::{ImageError, Result};
use crate::traversal::Traversal;

/// How a single sample is laid out in the raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePacking {
    /// Whole bytes in the given byte order.
    Byte { bytes: usize, order: ByteOrdering },
    /// Tightly packed bits, MSB first.
    Bit { bits: u8 },
}

impl SamplePacking {
    pub fn for_config(config: &ImageConfig) -> Self {
        if config.is_byte_aligned() {
            SamplePacking::Byte {
                bytes: config.bit_depth as usize / 8,
                order: config.byte_ordering,
            }
        } else {
            SamplePacking::Bit {
                bits: config.bit_depth,
            }
        }
    }
}

fn sign_extend(raw: u32, bits: u8) -> i32 {
    let shift = 32 - bits as u32;
    ((raw << shift) as i32) >> shift
}

fn width_mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

fn read_bytes(input: &[u8], order: ByteOrdering) -> u32 {
    match order {
        ByteOrdering::BigEndian => input.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32),
        ByteOrdering::LittleEndian => input
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32),
    }
}

fn write_bytes(value: u32, bytes: usize, order: ByteOrdering, out: &mut Vec<u8>) {
    match order {
        ByteOrdering::BigEndian => {
            for i in (0..bytes).rev() {
                out.push((value >> (8 * i)) as u8);
            }
        }
        ByteOrdering::LittleEndian => {
            for i in 0..bytes {
                out.push((value >> (8 * i)) as u8);
            }
        }
    }
}

/// Reads raw buffers into cubes.
#[derive(Debug, Clone)]
pub struct ImageReader {
    config: ImageConfig,
    packing: SamplePacking,
}

impl ImageReader {
    pub fn new(config: ImageConfig) -> Result<Self> {
        config.validate()?;
        let packing = SamplePacking::for_config(&config);
        Ok(Self { config, packing })
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn packing(&self) -> SamplePacking {
        self.packing
    }

    /// Decode a whole cube. Bytes past `byte_len()` are ignored.
    pub fn read(&self, input: &[u8]) -> Result<ImageCube> {
        let config = &self.config;
        let expected = config.byte_len();
        if input.len() < expected {
            return Err(ImageError::BufferTooShort {
                expected,
                got: input.len(),
            });
        }
        debug!(
            "reading {} cube {:?}, {} bits per sample",
            config.band_ordering,
            config.dimensions(),
            config.bit_depth
        );

        let mut cube = ImageCube::new(config.bands, config.lines, config.samples);
        let traversal = Traversal::new(
            config.band_ordering,
            config.bands,
            config.lines,
            config.samples,
        );
        match self.packing {
            SamplePacking::Byte { bytes, order } => {
                for (pos, chunk) in traversal.zip(input.chunks_exact(bytes)) {
                    cube[pos] = self.to_sample(read_bytes(chunk, order));
                }
            }
            SamplePacking::Bit { bits } => {
                let mut acc = BitAccumulator::new();
                let mut cursor = 0;
                for pos in traversal {
                    let raw = acc
                        .pull(bits, &input[..expected], &mut cursor)
                        .ok_or(ImageError::BufferTooShort {
                            expected,
                            got: cursor,
                        })?;
                    cube[pos] = self.to_sample(raw);
                }
            }
        }
        Ok(cube)
    }

    fn to_sample(&self, raw: u32) -> i32 {
        if self.config.signed {
            sign_extend(raw, self.config.bit_depth)
        } else {
            raw as i32
        }
    }
}

/// Writes cubes into raw buffers.
#[derive(Debug, Clone)]
pub struct ImageWriter {
    config: ImageConfig,
    packing: SamplePacking,
}

impl ImageWriter {
    pub fn new(config: ImageConfig) -> Result<Self> {
        config.validate()?;
        let packing = SamplePacking::for_config(&config);
        Ok(Self { config, packing })
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn packing(&self) -> SamplePacking {
        self.packing
    }

    /// Encode `cube`. Values outside the configured range are truncated to
    /// `bit_depth` bits.
    pub fn write(&self, cube: &ImageCube) -> Result<Vec<u8>> {
        let config = &self.config;
        if cube.dimensions() != config.dimensions() {
            return Err(ImageError::DimensionMismatch {
                left: config.dimensions(),
                right: cube.dimensions(),
            });
        }
        debug!(
            "writing {} cube {:?}, {} bits per sample",
            config.band_ordering,
            config.dimensions(),
            config.bit_depth
        );

        let (min, max) = (config.min_value(), config.max_value());
        let clipped = cube.data().iter().filter(|&&v| v < min || v > max).count();
        if clipped > 0 {
            warn!(
                "{} samples outside [{}, {}] will be truncated to {} bits",
                clipped, min, max, config.bit_depth
            );
        }

        let mask = width_mask(config.bit_depth);
        let mut out = Vec::with_capacity(config.byte_len());
        let traversal = Traversal::new(
            config.band_ordering,
            config.bands,
            config.lines,
            config.samples,
        );
        match self.packing {
            SamplePacking::Byte { bytes, order } => {
                for pos in traversal {
                    write_bytes(cube[pos] as u32 & mask, bytes, order, &mut out);
                }
            }
            SamplePacking::Bit { bits } => {
                let mut acc = BitAccumulator::new();
                for pos in traversal {
                    acc.push(cube[pos] as u32, bits, &mut out);
                }
                acc.flush(&mut out);
            }
        }
        debug_assert_eq!(out.len(), config.byte_len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BandOrdering;

    fn counting_cube(bands: usize, lines: usize, samples: usize, modulo: i32) -> ImageCube {
        let data = (0..(bands * lines * samples) as i32)
            .map(|v| v % modulo)
            .collect();
        ImageCube::from_data(data, bands, lines, samples).unwrap()
    }

    #[test]
    fn test_packing_selection() {
        let config = ImageConfig::new(BandOrdering::BSQ, 16, 1, 1, 1)
            .with_byte_ordering(ByteOrdering::LittleEndian);
        assert_eq!(
            SamplePacking::for_config(&config),
            SamplePacking::Byte {
                bytes: 2,
                order: ByteOrdering::LittleEndian
            }
        );
        let config = ImageConfig::new(BandOrdering::BSQ, 12, 1, 1, 1);
        assert_eq!(
            SamplePacking::for_config(&config),
            SamplePacking::Bit { bits: 12 }
        );
    }

    #[test]
    fn test_rejects_bad_width() {
        assert_eq!(
            ImageReader::new(ImageConfig::new(BandOrdering::BSQ, 26, 1, 1, 1)).err(),
            Some(ImageError::UnsupportedBitDepth(26))
        );
        assert_eq!(
            ImageWriter::new(ImageConfig::new(BandOrdering::BIL, 0, 1, 1, 1)).err(),
            Some(ImageError::UnsupportedBitDepth(0))
        );
    }

    #[test]
    fn test_three_bit_bsq_layout() {
        // values 0..7 in BSQ order, 3 bits each: 000 001 010 011 100 101 110 111
        let cube = counting_cube(2, 2, 2, 8);
        let config = ImageConfig::new(BandOrdering::BSQ, 3, 2, 2, 2);
        let raw = ImageWriter::new(config.clone()).unwrap().write(&cube).unwrap();
        assert_eq!(raw, vec![0b0000_0101, 0b0011_1001, 0b0111_0111]);

        let back = ImageReader::new(config).unwrap().read(&raw).unwrap();
        assert_eq!(back, cube);
        for band in 0..2 {
            for line in 0..2 {
                for sample in 0..2 {
                    let expected = (band * 4 + line * 2 + sample) as i32;
                    assert_eq!(back.get(band, line, sample).unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn test_bip_interleaves_bands() {
        let cube = counting_cube(2, 1, 2, 256);
        let config = ImageConfig::new(BandOrdering::BIP, 8, 2, 1, 2);
        let raw = ImageWriter::new(config).unwrap().write(&cube).unwrap();
        // band 0 = [0, 1], band 1 = [2, 3]
        assert_eq!(raw, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_bil_interleaves_lines() {
        let cube = counting_cube(2, 2, 2, 256);
        let config = ImageConfig::new(BandOrdering::BIL, 8, 2, 2, 2);
        let raw = ImageWriter::new(config).unwrap().write(&cube).unwrap();
        assert_eq!(raw, vec![0, 1, 4, 5, 2, 3, 6, 7]);
    }

    #[test]
    fn test_byte_order() {
        let cube = ImageCube::from_data(vec![0x0102, 0xA0B0], 1, 1, 2).unwrap();
        let config = ImageConfig::new(BandOrdering::BSQ, 16, 1, 1, 2);
        let big = ImageWriter::new(config.clone()).unwrap().write(&cube).unwrap();
        assert_eq!(big, vec![0x01, 0x02, 0xA0, 0xB0]);

        let little_config = config.with_byte_ordering(ByteOrdering::LittleEndian);
        let little = ImageWriter::new(little_config.clone())
            .unwrap()
            .write(&cube)
            .unwrap();
        assert_eq!(little, vec![0x02, 0x01, 0xB0, 0xA0]);
        let back = ImageReader::new(little_config).unwrap().read(&little).unwrap();
        assert_eq!(back, cube);
    }

    #[test]
    fn test_24_bit_samples() {
        let cube = ImageCube::from_data(vec![0x123456, 0xFEDCBA], 1, 2, 1).unwrap();
        let config = ImageConfig::new(BandOrdering::BIL, 24, 1, 2, 1);
        let raw = ImageWriter::new(config.clone()).unwrap().write(&cube).unwrap();
        assert_eq!(raw, vec![0x12, 0x34, 0x56, 0xFE, 0xDC, 0xBA]);
        assert_eq!(ImageReader::new(config).unwrap().read(&raw).unwrap(), cube);
    }

    #[test]
    fn test_signed_samples() {
        let cube = ImageCube::from_data(vec![-1, -2048, 2047, 0, 5], 1, 1, 5).unwrap();
        let config = ImageConfig::new(BandOrdering::BSQ, 12, 1, 1, 5).with_signed(true);
        let raw = ImageWriter::new(config.clone()).unwrap().write(&cube).unwrap();
        assert_eq!(raw.len(), 8);
        assert_eq!(&raw[..2], &[0xFF, 0xF8]);
        assert_eq!(ImageReader::new(config).unwrap().read(&raw).unwrap(), cube);

        let cube = ImageCube::from_data(vec![-128, 127, -3], 1, 1, 3).unwrap();
        let config = ImageConfig::new(BandOrdering::BIP, 8, 1, 1, 3).with_signed(true);
        let raw = ImageWriter::new(config.clone()).unwrap().write(&cube).unwrap();
        assert_eq!(raw, vec![0x80, 0x7F, 0xFD]);
        assert_eq!(ImageReader::new(config).unwrap().read(&raw).unwrap(), cube);
    }

    #[test]
    fn test_short_buffer() {
        let config = ImageConfig::new(BandOrdering::BSQ, 5, 1, 2, 2);
        let reader = ImageReader::new(config).unwrap();
        assert_eq!(
            reader.read(&[0, 0]),
            Err(ImageError::BufferTooShort {
                expected: 3,
                got: 2
            })
        );
        assert!(reader.read(&[0, 0, 0, 0xFF]).is_ok());
    }

    #[test]
    fn test_writer_shape_mismatch() {
        let config = ImageConfig::new(BandOrdering::BSQ, 8, 2, 2, 2);
        let writer = ImageWriter::new(config).unwrap();
        assert!(matches!(
            writer.write(&ImageCube::new(2, 2, 3)),
            Err(ImageError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_one_bit_padding() {
        let cube = ImageCube::from_data(vec![1, 0, 1, 1, 0, 0, 1, 1, 1, 0, 1], 1, 1, 11).unwrap();
        let config = ImageConfig::new(BandOrdering::BSQ, 1, 1, 1, 11);
        let raw = ImageWriter::new(config).unwrap().write(&cube).unwrap();
        assert_eq!(raw, vec![0b1011_0011, 0b1010_0000]);
    }
}
