//! Stage variants of the pixel graph

use crate::image_pipeline::camera_model::{GamutMap, ReverseTone};
use crate::image_pipeline::stages::PixelBuffer;

/// Index of a stage inside one graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageId(pub(crate) usize);

impl StageId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Materialization flag of a stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Schedule {
    /// Recomputed at every downstream access.
    #[default]
    Lazy,
    /// Evaluated once into a dense buffer before any consumer runs.
    Root,
}

/// Element type a stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    F32,
}

/// Dense buffer feeding the graph from outside.
#[derive(Debug, Clone)]
pub enum SourceBuffer {
    U8(PixelBuffer<u8>),
    F32(PixelBuffer<f32>),
}

impl SourceBuffer {
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> f32 {
        match self {
            SourceBuffer::U8(b) => b.get(x, y, c) as f32,
            SourceBuffer::F32(b) => b.get(x, y, c),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            SourceBuffer::U8(b) => b.width(),
            SourceBuffer::F32(b) => b.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            SourceBuffer::U8(b) => b.height(),
            SourceBuffer::F32(b) => b.height(),
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            SourceBuffer::U8(b) => b.channels(),
            SourceBuffer::F32(b) => b.channels(),
        }
    }
}

impl From<PixelBuffer<u8>> for SourceBuffer {
    fn from(b: PixelBuffer<u8>) -> Self {
        SourceBuffer::U8(b)
    }
}

impl From<PixelBuffer<f32>> for SourceBuffer {
    fn from(b: PixelBuffer<f32>) -> Self {
        SourceBuffer::F32(b)
    }
}

/// The closed set of transforms a pixel graph can contain.
///
/// Calibration tables are borrowed from a [`CameraModel`](crate::image_pipeline::CameraModel)
/// that outlives the graph.
#[derive(Debug, Clone)]
pub enum Stage<'m> {
    Source(SourceBuffer),
    Scale,
    ReverseToneMap(&'m ReverseTone),
    /// One output channel per control point.
    RbfResponse(&'m GamutMap),
    /// Inputs: the colour fed to the response stage, then the response stage.
    RbfBiasSum(&'m GamutMap),
    ColorTransform([[f32; 3]; 3]),
    Descale,
}

impl Stage<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Stage::Source(_) => "source",
            Stage::Scale => "scale",
            Stage::ReverseToneMap(_) => "reverse_tone_map",
            Stage::RbfResponse(_) => "rbf_response",
            Stage::RbfBiasSum(_) => "rbf_bias_sum",
            Stage::ColorTransform(_) => "color_transform",
            Stage::Descale => "descale",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Stage::Source(_) => 0,
            Stage::RbfBiasSum(_) => 2,
            _ => 1,
        }
    }

    pub fn output_type(&self) -> SampleType {
        match self {
            Stage::Descale => SampleType::U8,
            _ => SampleType::F32,
        }
    }

    /// Channel count each input must have, `None` when any count is accepted.
    pub(crate) fn required_input_channels(&self) -> Vec<Option<usize>> {
        match self {
            Stage::Source(_) => Vec::new(),
            Stage::Scale | Stage::Descale => vec![None],
            Stage::ReverseToneMap(_) | Stage::RbfResponse(_) | Stage::ColorTransform(_) => {
                vec![Some(3)]
            }
            Stage::RbfBiasSum(gamut) => vec![Some(3), Some(gamut.len())],
        }
    }

    pub(crate) fn output_channels(&self, inputs: &[usize]) -> usize {
        match self {
            Stage::Source(buf) => buf.channels(),
            Stage::RbfResponse(gamut) => gamut.len(),
            Stage::RbfBiasSum(_) => 3,
            _ => inputs[0],
        }
    }
}
