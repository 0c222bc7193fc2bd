//! Helpers shared by the integration tests.
#![allow(dead_code)]

use hsi::{ImageConfig, ImageCube};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// A cube of pseudo-random samples covering the full range of `config`.
pub fn random_cube(config: &ImageConfig, seed: u64) -> ImageCube {
    let mut rng = StdRng::seed_from_u64(seed);
    let (min, max) = (config.min_value(), config.max_value());
    let data = (0..config.sample_count())
        .map(|_| rng.random_range(min..=max))
        .collect();
    ImageCube::from_data(data, config.bands, config.lines, config.samples)
        .expect("dimensions match sample count")
}
