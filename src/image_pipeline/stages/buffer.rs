//! Dense pixel buffers

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Rectangular pixel domain a graph is realized over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl Domain {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    pub fn rgb(width: usize, height: usize) -> Self {
        Self::new(width, height, 3)
    }

    pub fn len(&self) -> usize {
        self.width * self.height * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn with_channels(self, channels: usize) -> Self {
        Self { channels, ..self }
    }
}

/// Element types a [`PixelBuffer`] can hold.
pub trait Sample: Copy + Default + Send + Sync + 'static {
    fn to_f32(self) -> f32;
    fn from_f32(v: f32) -> Self;
}

impl Sample for u8 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    /// Saturating conversion; callers round first.
    #[inline]
    fn from_f32(v: f32) -> Self {
        v as u8
    }
}

impl Sample for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }
}

/// Dense 3-D array indexed by `(x, y, channel)`, stored row-major with
/// interleaved channels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T> {
    domain: Domain,
    data: Vec<T>,
}

impl<T: Sample> PixelBuffer<T> {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            data: vec![T::default(); domain.len()],
        }
    }

    pub fn from_vec(domain: Domain, data: Vec<T>) -> Result<Self> {
        if data.len() != domain.len() {
            return Err(PipelineError::mismatch(
                "pixel buffer",
                format!("{} samples", domain.len()),
                format!("{} samples", data.len()),
            ));
        }
        Ok(Self { domain, data })
    }

    /// Builds a buffer by evaluating `f(x, y, c)` at every coordinate.
    pub fn from_fn(domain: Domain, mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(domain.len());
        for y in 0..domain.height {
            for x in 0..domain.width {
                for c in 0..domain.channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self { domain, data }
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.domain.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.domain.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.domain.channels
    }

    #[inline]
    fn index(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.domain.width + x) * self.domain.channels + c
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> T {
        self.data[self.index(x, y, c)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: T) {
        let i = self.index(x, y, c);
        self.data[i] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Length of one row of samples.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.domain.width * self.domain.channels
    }

    pub fn to_f32(&self) -> PixelBuffer<f32> {
        PixelBuffer {
            domain: self.domain,
            data: self.data.iter().map(|v| v.to_f32()).collect(),
        }
    }
}
