//! Image I/O types

use crate::image_pipeline::stages::PixelBuffer;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Geometry of a label+pixels batch record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub width: usize,
    pub height: usize,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
        }
    }
}

impl RecordLayout {
    /// Bytes per record: one label byte, then three channel planes.
    pub fn record_len(&self) -> usize {
        1 + 3 * self.width * self.height
    }
}

/// One labelled image from a batch file.
#[derive(Debug, Clone, PartialEq)]
pub struct CifarRecord {
    pub label: u8,
    pub image: PixelBuffer<u8>,
}
