use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::graph::pixel_graph::{Node, PixelGraph};
use crate::image_pipeline::graph::stage::{Schedule, Stage, StageId};
use crate::image_pipeline::stages::Domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Processing,
    Done,
}

/// Collects stages and their wiring, then validates them into a [`PixelGraph`].
pub struct GraphBuilder<'m> {
    width: usize,
    height: usize,
    nodes: Vec<Node<'m>>,
}

impl<'m> GraphBuilder<'m> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            nodes: Vec::new(),
        }
    }

    /// Adds an unwired stage.
    pub fn add_stage(&mut self, name: impl Into<String>, stage: Stage<'m>) -> StageId {
        self.nodes.push(Node {
            name: name.into(),
            stage,
            inputs: Vec::new(),
            schedule: Schedule::Lazy,
        });
        StageId(self.nodes.len() - 1)
    }

    /// Sets the producers feeding `consumer`, in input order.
    pub fn bind(&mut self, consumer: StageId, producers: &[StageId]) -> Result<()> {
        let count = self.nodes.len();
        if let Some(bad) = producers.iter().chain([&consumer]).find(|id| id.0 >= count) {
            return Err(PipelineError::InvalidStateError(format!(
                "stage id {} does not belong to this graph",
                bad.0
            )));
        }
        self.nodes[consumer.0].inputs = producers.to_vec();
        Ok(())
    }

    /// Adds a stage already wired to its producers.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        stage: Stage<'m>,
        producers: &[StageId],
    ) -> Result<StageId> {
        let id = self.add_stage(name, stage);
        self.bind(id, producers)?;
        Ok(id)
    }

    /// Validates arity, acyclicity, channel counts and source domains.
    pub fn build(self) -> Result<PixelGraph<'m>> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidDimensions(self.width, self.height));
        }

        for node in &self.nodes {
            if node.inputs.len() != node.stage.arity() {
                return Err(PipelineError::mismatch(
                    format!("inputs of stage '{}'", node.name),
                    node.stage.arity(),
                    node.inputs.len(),
                ));
            }
        }

        let order = self.topological_order()?;

        let mut channels = vec![0usize; self.nodes.len()];
        for &idx in &order {
            let node = &self.nodes[idx];
            if let Stage::Source(buf) = &node.stage {
                if buf.width() != self.width || buf.height() != self.height {
                    return Err(PipelineError::mismatch(
                        format!("source '{}'", node.name),
                        format!("{}x{}", self.width, self.height),
                        format!("{}x{}", buf.width(), buf.height()),
                    ));
                }
            }

            let input_channels: Vec<usize> = node.inputs.iter().map(|i| channels[i.0]).collect();
            for (slot, (required, found)) in node
                .stage
                .required_input_channels()
                .into_iter()
                .zip(&input_channels)
                .enumerate()
            {
                if let Some(required) = required {
                    if required != *found {
                        return Err(PipelineError::mismatch(
                            format!("input {slot} of stage '{}'", node.name),
                            format!("{required} channels"),
                            format!("{found} channels"),
                        ));
                    }
                }
            }
            channels[idx] = node.stage.output_channels(&input_channels);
        }

        debug!(stages = self.nodes.len(), width = self.width, height = self.height, "Pixel graph built");

        Ok(PixelGraph::new(
            Domain::new(self.width, self.height, 0),
            self.nodes,
            order,
            channels,
        ))
    }

    /// Depth-first post-order over every node; producers precede consumers.
    fn topological_order(&self) -> Result<Vec<usize>> {
        let mut state = vec![VisitState::Unvisited; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, bool)> = Vec::new();

        for root in 0..self.nodes.len() {
            if state[root] != VisitState::Unvisited {
                continue;
            }
            stack.push((root, false));

            while let Some((idx, children_done)) = stack.pop() {
                if children_done {
                    state[idx] = VisitState::Done;
                    order.push(idx);
                    continue;
                }
                match state[idx] {
                    VisitState::Done => continue,
                    VisitState::Processing => {
                        return Err(PipelineError::GraphCycleError(self.nodes[idx].name.clone()));
                    }
                    VisitState::Unvisited => {}
                }
                state[idx] = VisitState::Processing;
                stack.push((idx, true));
                for input in &self.nodes[idx].inputs {
                    match state[input.0] {
                        VisitState::Processing => {
                            return Err(PipelineError::GraphCycleError(
                                self.nodes[input.0].name.clone(),
                            ));
                        }
                        VisitState::Unvisited => stack.push((input.0, false)),
                        VisitState::Done => {}
                    }
                }
            }
        }

        Ok(order)
    }
}
