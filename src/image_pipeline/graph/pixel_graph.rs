use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::graph::stage::{SampleType, Schedule, Stage, StageId};
use crate::image_pipeline::stages::{Domain, PixelBuffer, Sample, kernels};

#[derive(Debug, Clone)]
pub(crate) struct Node<'m> {
    pub(crate) name: String,
    pub(crate) stage: Stage<'m>,
    pub(crate) inputs: Vec<StageId>,
    pub(crate) schedule: Schedule,
}

/// Lifecycle of a graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    Built,
    Scheduled,
    Realized,
}

/// Output of [`PixelGraph::realize`], typed by the terminal stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Realized {
    U8(PixelBuffer<u8>),
    F32(PixelBuffer<f32>),
}

impl Realized {
    pub fn into_u8(self) -> Result<PixelBuffer<u8>> {
        match self {
            Realized::U8(b) => Ok(b),
            Realized::F32(_) => Err(PipelineError::InvalidStateError(
                "terminal stage produces f32 samples, not u8".into(),
            )),
        }
    }

    pub fn into_f32(self) -> Result<PixelBuffer<f32>> {
        match self {
            Realized::F32(b) => Ok(b),
            Realized::U8(_) => Err(PipelineError::InvalidStateError(
                "terminal stage produces u8 samples, not f32".into(),
            )),
        }
    }
}

/// A validated DAG of stages bound to one output domain.
///
/// Built per image, realized once, then dropped.
#[derive(Debug)]
pub struct PixelGraph<'m> {
    domain: Domain,
    nodes: Vec<Node<'m>>,
    order: Vec<usize>,
    channels: Vec<usize>,
    state: GraphState,
}

impl<'m> PixelGraph<'m> {
    pub(crate) fn new(
        domain: Domain,
        nodes: Vec<Node<'m>>,
        order: Vec<usize>,
        channels: Vec<usize>,
    ) -> Self {
        Self {
            domain,
            nodes,
            order,
            channels,
            state: GraphState::Built,
        }
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<StageId> {
        self.nodes.iter().position(|n| n.name == name).map(StageId)
    }

    pub fn name(&self, id: StageId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn schedule(&self, id: StageId) -> Schedule {
        self.nodes[id.0].schedule
    }

    /// Domain of a stage's output: graph width and height, stage channel count.
    pub fn stage_domain(&self, id: StageId) -> Domain {
        self.domain.with_channels(self.channels[id.0])
    }

    /// Number of stages reading the output of `id`.
    pub fn consumers(&self, id: StageId) -> usize {
        self.nodes
            .iter()
            .map(|n| n.inputs.iter().filter(|i| **i == id).count())
            .sum()
    }

    /// Flags `id` for eager materialization.
    pub fn mark_root(&mut self, id: StageId) -> Result<()> {
        self.set_schedule(id, Schedule::Root)
    }

    pub fn mark_lazy(&mut self, id: StageId) -> Result<()> {
        self.set_schedule(id, Schedule::Lazy)
    }

    fn set_schedule(&mut self, id: StageId, schedule: Schedule) -> Result<()> {
        if self.state == GraphState::Realized {
            return Err(PipelineError::InvalidStateError(
                "cannot reschedule a realized graph".into(),
            ));
        }
        let node = self.nodes.get_mut(id.0).ok_or_else(|| {
            PipelineError::InvalidStateError(format!("stage id {} does not belong to this graph", id.0))
        })?;
        node.schedule = schedule;
        self.state = GraphState::Scheduled;
        Ok(())
    }

    /// Evaluates `terminal` over the whole domain.
    ///
    /// Root stages upstream of `terminal` are materialized first, in dependency
    /// order; lazy stages are recomputed inside their consumers. Rows are
    /// computed in parallel. A graph can be realized only once.
    pub fn realize(&mut self, terminal: StageId) -> Result<Realized> {
        if self.state == GraphState::Realized {
            return Err(PipelineError::InvalidStateError(
                "graph has already been realized".into(),
            ));
        }
        if terminal.0 >= self.nodes.len() {
            return Err(PipelineError::InvalidStateError(format!(
                "stage id {} does not belong to this graph",
                terminal.0
            )));
        }
        let _span = info_span!("realize", terminal = %self.nodes[terminal.0].name).entered();

        let reachable = self.upstream_of(terminal);
        let mut materialized: Vec<Option<PixelBuffer<f32>>> = vec![None; self.nodes.len()];

        for &idx in &self.order {
            let node = &self.nodes[idx];
            if !reachable[idx]
                || idx == terminal.0
                || node.schedule != Schedule::Root
                || matches!(node.stage, Stage::Source(_))
            {
                continue;
            }
            let domain = self.domain.with_channels(self.channels[idx]);
            let _stage_span = info_span!("materialize", stage = %node.name).entered();
            let buffer = Evaluator {
                nodes: &self.nodes,
                materialized: &materialized,
            }
            .fill(StageId(idx), domain);
            debug!(stage = %node.name, channels = domain.channels, "Stage materialized");
            materialized[idx] = Some(buffer);
        }

        let domain = self.stage_domain(terminal);
        let out = Evaluator {
            nodes: &self.nodes,
            materialized: &materialized,
        }
        .fill(terminal, domain);

        self.state = GraphState::Realized;

        Ok(match self.nodes[terminal.0].stage.output_type() {
            SampleType::F32 => Realized::F32(out),
            SampleType::U8 => Realized::U8(PixelBuffer::from_vec(
                domain,
                out.as_slice().iter().map(|&v| u8::from_f32(v)).collect(),
            )?),
        })
    }

    fn upstream_of(&self, terminal: StageId) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![terminal.0];
        while let Some(idx) = stack.pop() {
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            stack.extend(self.nodes[idx].inputs.iter().map(|i| i.0));
        }
        seen
    }
}

/// Read-only view used while computing one stage; shared across row workers.
struct Evaluator<'a, 'm> {
    nodes: &'a [Node<'m>],
    materialized: &'a [Option<PixelBuffer<f32>>],
}

impl Evaluator<'_, '_> {
    fn fill(&self, id: StageId, domain: Domain) -> PixelBuffer<f32> {
        let mut buffer = PixelBuffer::new(domain);
        let row_len = buffer.row_len();
        if row_len == 0 {
            return buffer;
        }
        let channels = domain.channels;
        buffer
            .as_mut_slice()
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(channels).enumerate() {
                    for (c, sample) in pixel.iter_mut().enumerate() {
                        *sample = self.eval(id, x, y, c);
                    }
                }
            });
        buffer
    }

    #[inline]
    fn pixel(&self, id: StageId, x: usize, y: usize) -> [f32; 3] {
        [self.eval(id, x, y, 0), self.eval(id, x, y, 1), self.eval(id, x, y, 2)]
    }

    fn eval(&self, id: StageId, x: usize, y: usize, c: usize) -> f32 {
        if let Some(buffer) = &self.materialized[id.0] {
            return buffer.get(x, y, c);
        }
        let node = &self.nodes[id.0];
        match &node.stage {
            Stage::Source(src) => src.sample(x, y, c),
            Stage::Scale => kernels::scale(self.eval(node.inputs[0], x, y, c)),
            Stage::ReverseToneMap(tone) => {
                kernels::reverse_tone_map(tone, self.eval(node.inputs[0], x, y, c), c)
            }
            Stage::RbfResponse(gamut) => {
                kernels::rbf_response(gamut, self.pixel(node.inputs[0], x, y), c)
            }
            Stage::RbfBiasSum(gamut) => {
                let v = self.pixel(node.inputs[0], x, y);
                let response = node.inputs[1];
                kernels::rbf_bias_sum(gamut, v, c, |k| self.eval(response, x, y, k))
            }
            Stage::ColorTransform(m) => {
                kernels::color_transform(m, self.pixel(node.inputs[0], x, y), c)
            }
            Stage::Descale => kernels::descale(self.eval(node.inputs[0], x, y, c)) as f32,
        }
    }
}
