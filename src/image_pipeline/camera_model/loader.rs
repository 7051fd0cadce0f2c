//! Text camera-model loader
//!
//! The calibration file is line oriented:
//!
//! ```text
//! # comment
//! kernel linear
//! [ts]
//! 1.0 0.0 0.0
//! ...
//! [tw 6]
//! ...
//! [ctrl_pts reverse]
//! ...
//! [rev_tone]
//! ...
//! ```
//!
//! Every data row holds three whitespace-separated floats.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::image_pipeline::camera_model::types::{
    COEF_ROWS, CameraModel, GamutDirection, GamutMap, RbfKernel, ReverseTone, TONE_TABLE_SIZE,
};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::matrix::Matrix;

struct Section {
    rows: Vec<Vec<f32>>,
}

struct ParsedFile {
    kernel: RbfKernel,
    sections: HashMap<String, Section>,
}

/// Loads a camera model for one white-balance setting.
#[instrument(skip(path))]
pub fn load_camera_model<P: AsRef<Path>>(
    path: P,
    wb_index: usize,
    num_ctrl_pts: usize,
) -> Result<CameraModel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PipelineError::ModelLoadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let model = parse_camera_model(BufReader::new(file), path, wb_index, num_ctrl_pts)?;
    info!(
        path = %path.display(),
        wb_index,
        num_ctrl_pts,
        kernel = ?model.gamut(GamutDirection::Reverse).kernel(),
        "Camera model loaded"
    );
    Ok(model)
}

/// Parses a camera model from any reader. `source` is only used in error messages.
pub fn parse_camera_model<R: BufRead>(
    reader: R,
    source: &Path,
    wb_index: usize,
    num_ctrl_pts: usize,
) -> Result<CameraModel> {
    let parsed = parse_sections(reader, source)?;
    let table = |name: &str, rows: usize| take_table(&parsed, source, name, rows);

    let ts = table("ts", 3)?;
    let tw = table(&format!("tw {wb_index}"), 3).map_err(|e| match e {
        PipelineError::ModelLoadError { path, reason } if reason.starts_with("missing") => {
            PipelineError::ModelLoadError {
                path,
                reason: format!("white-balance index {wb_index} out of range ({reason})"),
            }
        }
        other => other,
    })?;
    let tstw_name = format!("tstw {wb_index}");
    let ts_tw = if parsed.sections.contains_key(&tstw_name) {
        Some(table(&tstw_name, 3)?)
    } else {
        None
    };

    let gamut = |direction: GamutDirection| -> Result<GamutMap> {
        let dir = direction.as_str();
        let ctrl_pts = table(&format!("ctrl_pts {dir}"), num_ctrl_pts)?;
        let weights_name = format!("weights {dir}");
        let weight_rows = parsed
            .sections
            .get(&weights_name)
            .map(|s| s.rows.len())
            .unwrap_or(0);
        let weights = table(&weights_name, weight_rows)?;
        let coefs = table(&format!("coefs {dir}"), COEF_ROWS)?;
        GamutMap::new(ctrl_pts, weights, coefs, parsed.kernel).map_err(|e| match e {
            PipelineError::DimensionMismatchError {
                table,
                expected,
                found,
            } => PipelineError::DimensionMismatchError {
                table: format!("{table} {dir} in {}", source.display()),
                expected,
                found,
            },
            other => other,
        })
    };
    let forward_gamut = gamut(GamutDirection::Forward)?;
    let reverse_gamut = gamut(GamutDirection::Reverse)?;

    let tone = table("rev_tone", TONE_TABLE_SIZE)?;
    let reverse_tone = ReverseTone::new(
        (0..tone.rows())
            .map(|r| [tone.get(r, 0), tone.get(r, 1), tone.get(r, 2)])
            .collect(),
    )?;

    debug!(sections = parsed.sections.len(), "Camera model tables parsed");

    CameraModel::new(ts, tw, ts_tw, forward_gamut, reverse_gamut, reverse_tone, wb_index)
}

fn parse_sections<R: BufRead>(reader: R, source: &Path) -> Result<ParsedFile> {
    let mut kernel = RbfKernel::default();
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut current: Option<String> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| PipelineError::ModelLoadError {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let parse_error = |section: &str, reason: String| PipelineError::ModelParseError {
            path: source.to_path_buf(),
            section: section.to_string(),
            line: line_no,
            reason,
        };

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| parse_error(header, "unterminated section header".into()))?;
            let name = normalize(name);
            if sections.contains_key(&name) {
                return Err(parse_error(&name, "duplicate section".into()));
            }
            sections.insert(name.clone(), Section { rows: Vec::new() });
            current = Some(name);
        } else if let Some(value) = line.strip_prefix("kernel") {
            let value = value.trim();
            kernel = RbfKernel::from_name(value)
                .ok_or_else(|| parse_error("kernel", format!("unknown RBF kernel '{value}'")))?;
        } else {
            let name = current
                .as_ref()
                .ok_or_else(|| parse_error("", "data row outside of any section".into()))?;
            let row = line
                .split_whitespace()
                .map(|field| {
                    field
                        .parse::<f32>()
                        .map_err(|_| parse_error(name, format!("'{field}' is not a number")))
                })
                .collect::<Result<Vec<f32>>>()?;
            if let Some(section) = sections.get_mut(name) {
                section.rows.push(row);
            }
        }
    }

    Ok(ParsedFile { kernel, sections })
}

fn take_table(parsed: &ParsedFile, source: &Path, name: &str, rows: usize) -> Result<Matrix> {
    let load_error = |reason: String| PipelineError::ModelLoadError {
        path: source.to_path_buf(),
        reason,
    };
    let section = parsed
        .sections
        .get(name)
        .ok_or_else(|| load_error(format!("missing section [{name}]")))?;

    if section.rows.len() != rows {
        return Err(load_error(format!(
            "section [{name}] has {} rows, expected {rows}",
            section.rows.len()
        )));
    }
    if let Some((i, row)) = section.rows.iter().enumerate().find(|(_, r)| r.len() != 3) {
        return Err(load_error(format!(
            "section [{name}] row {} has {} columns, expected 3",
            i + 1,
            row.len()
        )));
    }
    Matrix::from_rows(section.rows.clone())
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
