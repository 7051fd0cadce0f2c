//! Pipeline conversions module
//!
//! Orchestrates the reverse pipeline per image and per batch: graph
//! construction, sensor simulation, descale and encoding.

mod reverse_pipeline;
pub mod types;


pub use reverse_pipeline::{BatchReport, ReversePipeline, ReverseStages, build_reverse_graph};
pub use types::{Materialization, PipelineConfig, PipelineConfigBuilder, PipelineVariant};
