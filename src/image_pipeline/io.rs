//! Image I/O module
//!
//! Batch records for dataset conversion and single-image TIFF reading and writing.

pub mod cifar;
mod reader;
mod standard_tiff_writer;
mod tiff_reader;
pub mod types;
mod writer;

pub use cifar::{decode_batch, encode_batch};
pub use reader::ImageReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use tiff_reader::TiffImageReader;
pub use types::{CifarRecord, RecordLayout, TiffCompression};
pub use writer::ImageWriter;
