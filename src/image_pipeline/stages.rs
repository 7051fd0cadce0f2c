//! Stage library: pixel buffers and the per-sample transforms of the reverse pipeline.

mod buffer;
pub mod kernels;

pub use buffer::{Domain, PixelBuffer, Sample};
