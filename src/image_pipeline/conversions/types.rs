//! Reverse pipeline configuration types

use std::path::PathBuf;

use crate::image_pipeline::io::{RecordLayout, TiffCompression};
use crate::image_pipeline::sensor::{NoiseConfig, RemosaicConfig};

/// Which stages the reverse pipeline runs before the sensor simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineVariant {
    /// Scale, reverse tone map, reverse gamut map, reverse colour transform
    #[default]
    FullReverse,
    /// Stops after the reverse gamut map
    StopBeforeTransform,
}

/// Which stages are materialized into buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Materialization {
    /// Reverse tone map and RBF response are root, everything else inlined
    #[default]
    Default,
    /// Nothing is materialized except the terminal stage
    Inline,
    /// Every non-terminal stage is materialized
    Eager,
}

/// Configuration for the reverse camera pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Camera calibration file
    pub model_path: PathBuf,
    /// White-balance setting selected from the calibration file
    pub wb_index: usize,
    /// Number of RBF control points per gamut direction
    pub num_ctrl_pts: usize,
    pub variant: PipelineVariant,
    pub materialization: Materialization,
    /// Sensor noise, `None` to skip
    pub renoise: Option<NoiseConfig>,
    /// Colour filter resampling, `None` to skip
    pub remosaic: Option<RemosaicConfig>,
    /// Geometry of batch records
    pub record_layout: RecordLayout,
    /// Whether to reject empty images before processing
    pub validate_dimensions: bool,
    /// Compression for single-image TIFF output
    pub compression: TiffCompression,
    /// Predictor value for compression (2 for horizontal differencing)
    pub predictor: Option<u16>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("camera_models/NikonD7000.txt"),
            wb_index: 6,
            num_ctrl_pts: 3702,
            variant: PipelineVariant::FullReverse,
            materialization: Materialization::Default,
            renoise: Some(NoiseConfig::default()),
            remosaic: Some(RemosaicConfig::default()),
            record_layout: RecordLayout::default(),
            validate_dimensions: true,
            compression: TiffCompression::None,
            predictor: None,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    model_path: Option<PathBuf>,
    wb_index: Option<usize>,
    num_ctrl_pts: Option<usize>,
    variant: Option<PipelineVariant>,
    materialization: Option<Materialization>,
    renoise: Option<Option<NoiseConfig>>,
    remosaic: Option<Option<RemosaicConfig>>,
    record_layout: Option<RecordLayout>,
    validate_dimensions: Option<bool>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
}

impl PipelineConfigBuilder {
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn wb_index(mut self, index: usize) -> Self {
        self.wb_index = Some(index);
        self
    }

    pub fn num_ctrl_pts(mut self, count: usize) -> Self {
        self.num_ctrl_pts = Some(count);
        self
    }

    pub fn variant(mut self, variant: PipelineVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn materialization(mut self, materialization: Materialization) -> Self {
        self.materialization = Some(materialization);
        self
    }

    pub fn renoise(mut self, noise: Option<NoiseConfig>) -> Self {
        self.renoise = Some(noise);
        self
    }

    pub fn remosaic(mut self, mosaic: Option<RemosaicConfig>) -> Self {
        self.remosaic = Some(mosaic);
        self
    }

    pub fn record_layout(mut self, layout: RecordLayout) -> Self {
        self.record_layout = Some(layout);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            model_path: self.model_path.unwrap_or(default.model_path),
            wb_index: self.wb_index.unwrap_or(default.wb_index),
            num_ctrl_pts: self.num_ctrl_pts.unwrap_or(default.num_ctrl_pts),
            variant: self.variant.unwrap_or(default.variant),
            materialization: self.materialization.unwrap_or(default.materialization),
            renoise: self.renoise.unwrap_or(default.renoise),
            remosaic: self.remosaic.unwrap_or(default.remosaic),
            record_layout: self.record_layout.unwrap_or(default.record_layout),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
        }
    }
}
