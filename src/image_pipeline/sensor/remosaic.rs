use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::sensor::types::RemosaicConfig;
use crate::image_pipeline::stages::PixelBuffer;

const U16_MAX: f32 = 65535.0;

/// Keeps only the channel the colour filter passes at each site and zeroes
/// the other two. With `config.demosaic` the full RGB image is then
/// re-interpolated from the mosaic.
pub fn remosaic(image: &mut PixelBuffer<f32>, config: &RemosaicConfig) -> Result<()> {
    let (width, height) = (image.width(), image.height());
    for y in 0..height {
        for x in 0..width {
            let keep = config.cfa.channel_at(x, y);
            for c in 0..3 {
                if c != keep {
                    image.set(x, y, c, 0.0);
                }
            }
        }
    }
    debug!(cfa = ?config.cfa, width, height, "Image re-mosaiced");

    if config.demosaic {
        if width < 2 || height < 2 {
            warn!(width, height, "Image too small to demosaic, keeping the raw mosaic");
            return Ok(());
        }
        demosaic_linear(image, config)?;
    }
    Ok(())
}

/// Bilinear demosaic through the `bayer` crate at 16-bit precision.
fn demosaic_linear(image: &mut PixelBuffer<f32>, config: &RemosaicConfig) -> Result<()> {
    let (width, height) = (image.width(), image.height());

    let mut bayer_bytes = Vec::with_capacity(width * height * 2);
    for y in 0..height {
        for x in 0..width {
            let v = image.get(x, y, config.cfa.channel_at(x, y));
            let code = (v.clamp(0.0, 1.0) * U16_MAX).round() as u16;
            bayer_bytes.extend_from_slice(&code.to_le_bytes());
        }
    }

    let mut output_buf = vec![0u8; width * height * 3 * 2];
    {
        let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
        bayer::run_demosaic(
            &mut Cursor::new(&bayer_bytes[..]),
            BayerDepth::Depth16LE,
            config.cfa.to_bayer(),
            Demosaic::Linear,
            &mut output_raster,
        )
        .map_err(|e| PipelineError::SensorError(format!("Demosaic failed: {:?}", e)))?;
    }

    for (dst, bytes) in image
        .as_mut_slice()
        .iter_mut()
        .zip(output_buf.chunks_exact(2))
    {
        *dst = u16::from_le_bytes([bytes[0], bytes[1]]) as f32 / U16_MAX;
    }
    debug!(width, height, "Mosaic re-interpolated");
    Ok(())
}
