//! Pixel graph and scheduler
//!
//! A per-image DAG of [`Stage`]s over an arena of nodes. Each stage is either
//! lazy (inlined into its consumers) or root (materialized once into a dense
//! buffer); [`PixelGraph::realize`] walks the graph in dependency order.

mod builder;
mod pixel_graph;
mod stage;

#[cfg(test)]
mod tests;

pub use builder::GraphBuilder;
pub use pixel_graph::{GraphState, PixelGraph, Realized};
pub use stage::{SampleType, Schedule, SourceBuffer, Stage, StageId};
