//! Raw image configuration.
//!
//! An `ImageConfig` is produced by the header parser and handed to the
//! serializer already filled in. It describes the logical cube (bands, lines,
//! samples), how the cube is laid out in the raw buffer (band ordering) and how
//! each sample is encoded (bit depth, signedness, byte ordering).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ImageError, Result};

/// Narrowest supported sample.
pub const MIN_BIT_DEPTH: u8 = 1;
/// Widest supported sample.
pub const MAX_BIT_DEPTH: u8 = 25;

/// Band interleaving order of the raw buffer.
///
/// The ordering only decides the loop nesting used to visit the cube. The
/// value stored at a given `(band, line, sample)` is the same for all three.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandOrdering {
    /// Band sequential: band, line, sample.
    BSQ,
    /// Band interleaved by line: line, band, sample.
    BIL,
    /// Band interleaved by pixel: line, sample, band.
    BIP,
}

impl BandOrdering {
    pub fn name(&self) -> &'static str {
        match self {
            BandOrdering::BSQ => "BSQ",
            BandOrdering::BIL => "BIL",
            BandOrdering::BIP => "BIP",
        }
    }
}

impl fmt::Display for BandOrdering {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BandOrdering {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BSQ" => Ok(BandOrdering::BSQ),
            "BIL" => Ok(BandOrdering::BIL),
            "BIP" => Ok(BandOrdering::BIP),
            _ => Err(ImageError::UnsupportedOrdering(s.to_owned())),
        }
    }
}

/// Byte order of multi-byte samples.
///
/// Only meaningful for byte aligned bit depths (8, 16, 24).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ByteOrdering {
    #[default]
    BigEndian,
    LittleEndian,
}

impl FromStr for ByteOrdering {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "BIG_ENDIAN" | "BE" => Ok(ByteOrdering::BigEndian),
            "LITTLE_ENDIAN" | "LE" => Ok(ByteOrdering::LittleEndian),
            _ => Err(ImageError::UnsupportedOrdering(s.to_owned())),
        }
    }
}

/// Everything the serializer needs to know about a raw cube.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub band_ordering: BandOrdering,
    #[serde(default)]
    pub byte_ordering: ByteOrdering,
    /// Sample width in bits, `[1, 25]`.
    pub bit_depth: u8,
    /// Samples are two's complement of `bit_depth` bits.
    #[serde(default)]
    pub signed: bool,
    pub bands: usize,
    pub lines: usize,
    pub samples: usize,
}

impl ImageConfig {
    pub fn new(
        band_ordering: BandOrdering,
        bit_depth: u8,
        bands: usize,
        lines: usize,
        samples: usize,
    ) -> Self {
        Self {
            band_ordering,
            byte_ordering: ByteOrdering::default(),
            bit_depth,
            signed: false,
            bands,
            lines,
            samples,
        }
    }

    pub fn with_byte_ordering(mut self, byte_ordering: ByteOrdering) -> Self {
        self.byte_ordering = byte_ordering;
        self
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Check the bit depth range and the cube dimensions.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BIT_DEPTH..=MAX_BIT_DEPTH).contains(&self.bit_depth) {
            return Err(ImageError::UnsupportedBitDepth(self.bit_depth));
        }
        let total_bits = self
            .bands
            .checked_mul(self.lines)
            .and_then(|n| n.checked_mul(self.samples))
            .and_then(|n| n.checked_mul(self.bit_depth as usize));
        if self.bands == 0 || self.lines == 0 || self.samples == 0 || total_bits.is_none() {
            return Err(ImageError::InvalidDimensions {
                bands: self.bands,
                lines: self.lines,
                samples: self.samples,
            });
        }
        Ok(())
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.bands, self.lines, self.samples)
    }

    pub fn sample_count(&self) -> usize {
        self.bands * self.lines * self.samples
    }

    /// Number of bytes in the raw buffer, trailing bits included.
    pub fn byte_len(&self) -> usize {
        (self.sample_count() * self.bit_depth as usize + 7) / 8
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.bit_depth % 8 == 0
    }

    /// Smallest representable sample value.
    pub fn min_value(&self) -> i32 {
        if self.signed {
            -(1 << (self.bit_depth - 1))
        } else {
            0
        }
    }

    /// Largest representable sample value.
    pub fn max_value(&self) -> i32 {
        if self.signed {
            (1 << (self.bit_depth - 1)) - 1
        } else {
            ((1u32 << self.bit_depth) - 1) as i32
        }
    }
}
