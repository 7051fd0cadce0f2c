use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load camera model {path}: {reason}")]
    ModelLoadError { path: PathBuf, reason: String },

    #[error("Malformed record in camera model {path}, line {line} ([{section}]): {reason}")]
    ModelParseError {
        path: PathBuf,
        section: String,
        line: usize,
        reason: String,
    },

    #[error("Dimension mismatch in {table}: expected {expected}, found {found}")]
    DimensionMismatchError {
        table: String,
        expected: String,
        found: String,
    },

    #[error("Matrix {0} is singular (|det| = {1:e})")]
    SingularMatrixError(String, f32),

    #[error("Cycle detected in pixel graph at stage '{0}'")]
    GraphCycleError(String),

    #[error("Invalid graph state: {0}")]
    InvalidStateError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode TIFF image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Sensor simulation failed: {0}")]
    SensorError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn mismatch(
        table: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::DimensionMismatchError {
            table: table.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
