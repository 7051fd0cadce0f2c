use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::stages::PixelBuffer;

/// Decodes one encoded image into an interleaved 8-bit RGB buffer.
pub trait ImageReader: Sync {
    fn read_image(&self, data: &[u8]) -> Result<PixelBuffer<u8>>;
}
