use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::image_pipeline::sensor::types::NoiseConfig;
use crate::image_pipeline::stages::PixelBuffer;

/// Adds zero-mean Gaussian noise to every sample. The noise field depends
/// only on `(config.seed, image_index)`.
pub fn renoise(image: &mut PixelBuffer<f32>, config: &NoiseConfig, image_index: u64) {
    if config.sigma == 0.0 {
        return;
    }
    let seed = config
        .seed
        .wrapping_add(image_index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    let mut rng = StdRng::seed_from_u64(seed);

    for v in image.as_mut_slice() {
        *v += config.sigma * standard_normal(&mut rng);
    }
    debug!(sigma = config.sigma, image_index, "Sensor noise added");
}

/// Box-Muller transform over two uniform draws.
fn standard_normal<R: Rng>(rng: &mut R) -> f32 {
    let u1 = rng.random::<f32>().max(f32::MIN_POSITIVE);
    let u2 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}
