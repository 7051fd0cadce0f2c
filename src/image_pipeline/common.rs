//! Common utilities module
//!
//! This module contains the error type shared across the reverse pipeline.

pub mod error;

pub use error::{PipelineError, Result};
