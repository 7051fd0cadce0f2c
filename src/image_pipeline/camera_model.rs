//! Camera calibration model
//!
//! Typed tables parameterizing every stage of the reverse pipeline, and the
//! loader for the text calibration format.

mod loader;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use loader::{load_camera_model, parse_camera_model};
pub use types::{
    COEF_ROWS, CameraModel, GamutDirection, GamutMap, RbfKernel, ReverseTone, TONE_TABLE_SIZE,
};
