//! Reverse camera pipeline module
//!
//! Turns display-referred 8-bit images back into simulated sensor data:
//! calibration model loading, the per-image pixel graph, sensor noise and
//! mosaic simulation, and batch/single-image I/O.

pub mod camera_model;
pub mod common;
pub mod conversions;
pub mod graph;
pub mod io;
pub mod matrix;
pub mod sensor;
pub mod stages;

pub use common::{
    PipelineError,
    Result,
};

pub use camera_model::{
    CameraModel,
    GamutDirection,
    GamutMap,
    RbfKernel,
    ReverseTone,
    load_camera_model,
};

pub use conversions::{
    BatchReport,
    Materialization,
    PipelineConfig,
    PipelineConfigBuilder,
    PipelineVariant,
    ReversePipeline,
};

pub use io::{
    CifarRecord,
    ImageReader,
    ImageWriter,
    RecordLayout,
    StandardTiffWriter,
    TiffCompression,
    TiffImageReader,
};

pub use sensor::{
    CfaPattern,
    NoiseConfig,
    RemosaicConfig,
    SensorSimulator,
};

pub use stages::{Domain, PixelBuffer};
