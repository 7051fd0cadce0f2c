use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::conversions::PipelineConfig;
use crate::image_pipeline::stages::PixelBuffer;

pub trait ImageWriter: Sync {
    fn write_image(&self, image: &PixelBuffer<u8>, output: &mut dyn Write, config: &PipelineConfig) -> Result<()>;
}
