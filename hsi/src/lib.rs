//! Raw hyperspectral image cubes.
//!
//! A hyperspectral image is a cube of integer samples with three axes: band,
//! line and sample. On disk the cube is a flat buffer whose layout is fixed by
//! the band ordering (BSQ, BIL or BIP), the sample width in bits and, for
//! whole-byte samples, the byte ordering.
//!
//! This crate is the byte and bit boundary of the compression pipeline. The
//! [`ImageReader`] turns a raw buffer into an [`ImageCube`], the
//! [`ImageWriter`] does the reverse, and neither knows anything about the
//! transform or entropy coding stages that run between them.
//!
//! ```
//! use hsi::{BandOrdering, ImageConfig, ImageCube, ImageReader, ImageWriter};
//!
//! let config = ImageConfig::new(BandOrdering::BIP, 3, 2, 2, 2);
//! let cube = ImageCube::from_data((0..8).collect(), 2, 2, 2).unwrap();
//!
//! let raw = ImageWriter::new(config.clone()).unwrap().write(&cube).unwrap();
//! assert_eq!(raw.len(), 3);
//!
//! let back = ImageReader::new(config).unwrap().read(&raw).unwrap();
//! assert_eq!(back, cube);
//! ```

pub mod bit_accumulator;
pub mod config;
pub mod cube;
pub mod error;
pub mod metrics;
pub mod serializer;
pub mod traversal;

pub use bit_accumulator::BitAccumulator;
pub use config::{BandOrdering, ByteOrdering, ImageConfig, MAX_BIT_DEPTH, MIN_BIT_DEPTH};
pub use cube::ImageCube;
pub use error::{ImageError, Result};
pub use serializer::{ImageReader, ImageWriter, SamplePacking};
pub use traversal::{Axis, Traversal};
