use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::sensor::remosaic::remosaic;
use crate::image_pipeline::sensor::renoise::renoise;
use crate::image_pipeline::sensor::types::{NoiseConfig, RemosaicConfig};
use crate::image_pipeline::stages::PixelBuffer;

/// Boundary where the reconstructed sensor-domain image leaves the pixel
/// graph and comes back after noise and mosaic simulation.
///
/// Implementations must be deterministic for a given `image_index`.
pub trait SensorSimulator: Sync {
    fn simulate(&self, image: &mut PixelBuffer<f32>, image_index: u64) -> Result<()>;
}

/// Passes images through untouched.
pub struct IdentitySimulator;

impl SensorSimulator for IdentitySimulator {
    fn simulate(&self, _image: &mut PixelBuffer<f32>, _image_index: u64) -> Result<()> {
        Ok(())
    }
}

/// Additive noise followed by colour-filter-array resampling; either step
/// can be disabled.
#[derive(Debug, Clone, Default)]
pub struct NoiseMosaicSimulator {
    pub noise: Option<NoiseConfig>,
    pub mosaic: Option<RemosaicConfig>,
}

impl NoiseMosaicSimulator {
    pub fn new(noise: Option<NoiseConfig>, mosaic: Option<RemosaicConfig>) -> Self {
        Self { noise, mosaic }
    }
}

impl SensorSimulator for NoiseMosaicSimulator {
    fn simulate(&self, image: &mut PixelBuffer<f32>, image_index: u64) -> Result<()> {
        if let Some(noise) = &self.noise {
            renoise(image, noise, image_index);
        }
        if let Some(mosaic) = &self.mosaic {
            remosaic(image, mosaic)?;
        }
        Ok(())
    }
}
