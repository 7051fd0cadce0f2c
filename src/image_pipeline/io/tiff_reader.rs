use std::io::Cursor;
use tracing::debug;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::io::reader::ImageReader;
use crate::image_pipeline::stages::{Domain, PixelBuffer};

/// Decodes 8-bit RGB TIFF images.
pub struct TiffImageReader;

impl ImageReader for TiffImageReader {
    fn read_image(&self, data: &[u8]) -> Result<PixelBuffer<u8>> {
        debug!("Decoding TIFF image, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let color = decoder
            .colortype()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        if color != ColorType::RGB(8) {
            return Err(PipelineError::DecodeError(format!(
                "unsupported color type {:?}, expected 8-bit RGB",
                color
            )));
        }

        let samples = match decoder
            .read_image()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?
        {
            DecodingResult::U8(samples) => samples,
            _ => return Err(PipelineError::DecodeError("expected 8-bit samples".into())),
        };

        debug!("Decoded image: {}x{}", width, height);

        PixelBuffer::from_vec(Domain::rgb(width as usize, height as usize), samples)
    }
}
