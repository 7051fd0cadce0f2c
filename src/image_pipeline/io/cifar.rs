//! Label + planar-pixel batch records
//!
//! Each record is one label byte followed by the red, green and blue planes,
//! each stored row by row.

use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::io::types::{CifarRecord, RecordLayout};
use crate::image_pipeline::stages::{Domain, PixelBuffer};

pub fn decode_batch(data: &[u8], layout: RecordLayout) -> Result<Vec<CifarRecord>> {
    let record_len = layout.record_len();
    if data.len() % record_len != 0 {
        return Err(PipelineError::InputReadError(format!(
            "batch size {} is not a multiple of the {record_len}-byte record",
            data.len()
        )));
    }

    let plane = layout.width * layout.height;
    let domain = Domain::rgb(layout.width, layout.height);
    let records: Vec<CifarRecord> = data
        .chunks_exact(record_len)
        .map(|record| {
            let pixels = &record[1..];
            CifarRecord {
                label: record[0],
                image: PixelBuffer::from_fn(domain, |x, y, c| {
                    pixels[c * plane + y * layout.width + x]
                }),
            }
        })
        .collect();

    debug!(records = records.len(), "Batch decoded");
    Ok(records)
}

pub fn encode_batch(records: &[CifarRecord], output: &mut dyn Write) -> Result<()> {
    for record in records {
        let image = &record.image;
        let mut bytes = Vec::with_capacity(1 + image.as_slice().len());
        bytes.push(record.label);
        for c in 0..3 {
            for y in 0..image.height() {
                for x in 0..image.width() {
                    bytes.push(image.get(x, y, c));
                }
            }
        }
        output.write_all(&bytes)?;
    }
    Ok(())
}
