//! Round trips through the raw serializer for every width and ordering.

mod shared;

use hsi::{BandOrdering, ByteOrdering, ImageConfig, ImageCube, ImageReader, ImageWriter};
use shared::{init_logger, random_cube};

const ORDERINGS: [BandOrdering; 3] = [BandOrdering::BSQ, BandOrdering::BIL, BandOrdering::BIP];

#[test]
fn test_round_trip_every_width_and_ordering() {
    init_logger();
    for bit_depth in 1..=25u8 {
        for ordering in ORDERINGS {
            for signed in [false, true] {
                let config = ImageConfig::new(ordering, bit_depth, 3, 5, 7).with_signed(signed);
                let cube = random_cube(&config, bit_depth as u64 * 31 + signed as u64);

                let raw = ImageWriter::new(config.clone())
                    .unwrap()
                    .write(&cube)
                    .unwrap();
                assert_eq!(
                    raw.len(),
                    config.byte_len(),
                    "raw length for {} bits {}",
                    bit_depth,
                    ordering
                );

                let back = ImageReader::new(config).unwrap().read(&raw).unwrap();
                assert_eq!(back, cube, "round trip for {} bits {}", bit_depth, ordering);
            }
        }
    }
}

#[test]
fn test_round_trip_little_endian() {
    init_logger();
    for bit_depth in [8u8, 16, 24] {
        for ordering in ORDERINGS {
            let config = ImageConfig::new(ordering, bit_depth, 4, 3, 2)
                .with_byte_ordering(ByteOrdering::LittleEndian);
            let cube = random_cube(&config, bit_depth as u64);
            let raw = ImageWriter::new(config.clone())
                .unwrap()
                .write(&cube)
                .unwrap();
            let back = ImageReader::new(config).unwrap().read(&raw).unwrap();
            assert_eq!(back, cube);
        }
    }
}

#[test]
fn test_ordering_does_not_change_values() {
    init_logger();
    // values 0..7 assigned in BSQ order
    let cube = ImageCube::from_data((0..8).collect(), 2, 2, 2).unwrap();
    for ordering in ORDERINGS {
        let config = ImageConfig::new(ordering, 3, 2, 2, 2);
        let raw = ImageWriter::new(config.clone())
            .unwrap()
            .write(&cube)
            .unwrap();
        let back = ImageReader::new(config).unwrap().read(&raw).unwrap();
        for band in 0..2 {
            for line in 0..2 {
                for sample in 0..2 {
                    assert_eq!(
                        back.get(band, line, sample).unwrap(),
                        (band * 4 + line * 2 + sample) as i32,
                        "{} at ({}, {}, {})",
                        ordering,
                        band,
                        line,
                        sample
                    );
                }
            }
        }
    }
}

#[test]
fn test_orderings_are_permutations() {
    init_logger();
    let base = ImageConfig::new(BandOrdering::BSQ, 8, 3, 2, 4);
    let cube = random_cube(&base, 7);
    let mut layouts = Vec::new();
    for ordering in ORDERINGS {
        let config = ImageConfig {
            band_ordering: ordering,
            ..base.clone()
        };
        let raw = ImageWriter::new(config).unwrap().write(&cube).unwrap();
        let mut sorted = raw.clone();
        sorted.sort_unstable();
        layouts.push((raw, sorted));
    }
    assert_eq!(layouts[0].1, layouts[1].1);
    assert_eq!(layouts[1].1, layouts[2].1);
}

#[test]
fn test_cross_ordering_reread() {
    init_logger();
    // A buffer written as BIL and read back as BIL then rewritten as BIP must
    // describe the same cube.
    let bil = ImageConfig::new(BandOrdering::BIL, 11, 4, 3, 5);
    let cube = random_cube(&bil, 99);
    let raw = ImageWriter::new(bil.clone()).unwrap().write(&cube).unwrap();
    let decoded = ImageReader::new(bil.clone()).unwrap().read(&raw).unwrap();

    let bip = ImageConfig {
        band_ordering: BandOrdering::BIP,
        ..bil
    };
    let raw_bip = ImageWriter::new(bip.clone()).unwrap().write(&decoded).unwrap();
    let from_bip = ImageReader::new(bip).unwrap().read(&raw_bip).unwrap();
    assert_eq!(from_bip, cube);
}
