use rayon::prelude::*;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::image_pipeline::{
    camera_model::{CameraModel, GamutDirection, load_camera_model},
    common::error::{PipelineError, Result},
    conversions::types::{Materialization, PipelineConfig, PipelineVariant},
    graph::{GraphBuilder, PixelGraph, Stage, StageId},
    io::{CifarRecord, ImageReader, ImageWriter, StandardTiffWriter, TiffImageReader, decode_batch, encode_batch},
    sensor::{NoiseMosaicSimulator, SensorSimulator},
    stages::PixelBuffer,
};

/// Stage handles of one reverse graph instance.
#[derive(Debug, Clone, Copy)]
pub struct ReverseStages {
    pub scale: StageId,
    pub tone: StageId,
    pub response: StageId,
    pub bias: StageId,
    pub transform: Option<StageId>,
    pub terminal: StageId,
}

/// Wires `input -> scale -> reverse tone map -> RBF response -> RBF bias sum
/// [-> colour transform]` and applies the materialization policy.
pub fn build_reverse_graph<'m>(
    model: &'m CameraModel,
    input: PixelBuffer<u8>,
    variant: PipelineVariant,
    materialization: Materialization,
) -> Result<(PixelGraph<'m>, ReverseStages)> {
    let gamut = model.gamut(GamutDirection::Reverse);
    let mut builder = GraphBuilder::new(input.width(), input.height());

    let source = builder.add_stage("input", Stage::Source(input.into()));
    let scale = builder.add("scale", Stage::Scale, &[source])?;
    let tone = builder.add("rev_tone_map", Stage::ReverseToneMap(model.reverse_tone()), &[scale])?;
    let response = builder.add("rev_gamut_map_ctrl", Stage::RbfResponse(gamut), &[tone])?;
    let bias = builder.add("rev_gamut_map_bias", Stage::RbfBiasSum(gamut), &[tone, response])?;
    let transform = match variant {
        PipelineVariant::FullReverse => Some(builder.add(
            "rev_transform",
            Stage::ColorTransform(model.reverse_transform()),
            &[bias],
        )?),
        PipelineVariant::StopBeforeTransform => None,
    };

    let stages = ReverseStages {
        scale,
        tone,
        response,
        bias,
        transform,
        terminal: transform.unwrap_or(bias),
    };

    let mut graph = builder.build()?;
    match materialization {
        Materialization::Default => {
            graph.mark_root(stages.tone)?;
            graph.mark_root(stages.response)?;
        }
        Materialization::Inline => {}
        Materialization::Eager => {
            for id in [stages.scale, stages.tone, stages.response, stages.bias] {
                if id != stages.terminal {
                    graph.mark_root(id)?;
                }
            }
        }
    }

    Ok((graph, stages))
}

/// Outcome of a batch run. Failed images are logged and left out of `records`.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<CifarRecord>,
    pub failed: Vec<(usize, String)>,
}

pub struct ReversePipeline<R: ImageReader, W: ImageWriter> {
    reader: R,
    writer: W,
    simulator: Box<dyn SensorSimulator + Send>,
    model: Arc<CameraModel>,
    config: PipelineConfig,
}

impl ReversePipeline<TiffImageReader, StandardTiffWriter> {
    /// Loads the camera model named by `config` and builds the sensor simulator.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let model = {
            let _span = tracing::info_span!("load_model").entered();
            load_camera_model(&config.model_path, config.wb_index, config.num_ctrl_pts)?
        };
        Ok(Self::with_custom(TiffImageReader, StandardTiffWriter, model, config))
    }
}

impl<R: ImageReader, W: ImageWriter> ReversePipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, model: CameraModel, config: PipelineConfig) -> Self {
        let simulator = Box::new(NoiseMosaicSimulator::new(config.renoise, config.remosaic));
        Self {
            reader,
            writer,
            simulator,
            model: Arc::new(model),
            config,
        }
    }

    /// Replaces the noise/mosaic stage.
    pub fn with_simulator(mut self, simulator: impl SensorSimulator + Send + 'static) -> Self {
        self.simulator = Box::new(simulator);
        self
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Display-referred 8-bit image to the reconstructed float sensor image,
    /// before noise and mosaic simulation.
    pub fn reverse(&self, input: &PixelBuffer<u8>) -> Result<PixelBuffer<f32>> {
        let (mut graph, stages) = {
            let _span = tracing::info_span!("build_graph").entered();
            build_reverse_graph(
                &self.model,
                input.clone(),
                self.config.variant,
                self.config.materialization,
            )?
        };
        graph.realize(stages.terminal)?.into_f32()
    }

    /// Runs the full per-image sequence: reverse graph, sensor simulation, descale.
    #[instrument(skip(self, input), fields(width = input.width(), height = input.height()))]
    pub fn convert_image(&self, input: &PixelBuffer<u8>, image_index: u64) -> Result<PixelBuffer<u8>> {
        self.validate_dimensions(input.width(), input.height())?;

        let mut sensor_image = self.reverse(input)?;

        {
            let _span = tracing::info_span!("sensor").entered();
            self.simulator.simulate(&mut sensor_image, image_index)?;
        }

        let _span = tracing::info_span!("descale").entered();
        let mut builder = GraphBuilder::new(sensor_image.width(), sensor_image.height());
        let source = builder.add_stage("sensor_image", Stage::Source(sensor_image.into()));
        let descale = builder.add("descale", Stage::Descale, &[source])?;
        let mut graph = builder.build()?;
        graph.realize(descale)?.into_u8()
    }

    /// Converts every record in parallel. A failing image is reported and
    /// skipped; the rest of the batch still completes.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn convert_batch(&self, records: &[CifarRecord]) -> BatchReport {
        let results: Vec<(usize, Result<CifarRecord>)> = records
            .par_iter()
            .enumerate()
            .map(|(i, record)| {
                let converted = self
                    .convert_image(&record.image, i as u64)
                    .map(|image| CifarRecord {
                        label: record.label,
                        image,
                    });
                (i, converted)
            })
            .collect();

        let mut report = BatchReport::default();
        for (i, result) in results {
            match result {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    error!(image = i, "Image conversion failed: {}", e);
                    report.failed.push((i, e.to_string()));
                }
            }
        }

        info!(
            converted = report.records.len(),
            failed = report.failed.len(),
            "Batch complete"
        );
        report
    }

    /// Single encoded image in, single encoded image out.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        info!("Starting reverse pipeline conversion");

        let image = {
            let _span = tracing::info_span!("decode_image").entered();
            self.reader.read_image(input_data)?
        };

        let converted = self.convert_image(&image, 0)?;

        {
            let _span = tracing::info_span!("encode_image").entered();
            self.writer.write_image(&converted, output, &self.config)?;
        }

        info!(
            width = converted.width(),
            height = converted.height(),
            "Conversion complete"
        );
        Ok(())
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = read_input(input_path)?;
        let mut output_file = create_output(output_path)?;

        self.convert(&input_data, &mut output_file)?;

        Ok(())
    }

    /// Converts a whole batch file, writing the successfully converted records.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_batch_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<BatchReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting batch"
        );

        let input_data = read_input(input_path)?;
        let records = decode_batch(&input_data, self.config.record_layout)?;
        let report = self.convert_batch(&records);

        let mut output_file = create_output(output_path)?;
        encode_batch(&report.records, &mut output_file)?;

        Ok(report)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn model(&self) -> &CameraModel {
        &self.model
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let _span = tracing::info_span!("read_input_file").entered();
    std::fs::read(path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))
}

fn create_output(path: &Path) -> Result<std::fs::File> {
    let _span = tracing::info_span!("create_output_file").entered();
    std::fs::File::create(path)
        .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))
}
