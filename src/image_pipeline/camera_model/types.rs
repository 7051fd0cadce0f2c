//! Calibration data model types

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::matrix::{Matrix, invert_3x3};

/// Number of rows in the reverse tone table (one per 8-bit code value).
pub const TONE_TABLE_SIZE: usize = 256;

/// Rows in a gamut coefficient table: constant bias followed by one row per input channel.
pub const COEF_ROWS: usize = 4;

/// Radial basis kernel applied to the distance between a colour and a control point.
///
/// The kernel is a property of the calibration file, not of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RbfKernel {
    /// `phi(r) = r`
    #[default]
    Linear,
    /// `phi(r) = r^3`
    Cubic,
    /// `phi(r) = r^2 ln r`, with `phi(0) = 0`
    ThinPlate,
}

impl RbfKernel {
    #[inline]
    pub fn eval(self, r: f32) -> f32 {
        match self {
            RbfKernel::Linear => r,
            RbfKernel::Cubic => r * r * r,
            RbfKernel::ThinPlate => {
                if r > 0.0 {
                    r * r * r.ln()
                } else {
                    0.0
                }
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(RbfKernel::Linear),
            "cubic" => Some(RbfKernel::Cubic),
            "thin_plate" => Some(RbfKernel::ThinPlate),
            _ => None,
        }
    }
}

/// Direction of a gamut-mapping table set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamutDirection {
    /// Device to display
    Forward,
    /// Display to device
    Reverse,
}

impl GamutDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            GamutDirection::Forward => "forward",
            GamutDirection::Reverse => "reverse",
        }
    }
}

/// One direction of the RBF gamut warp: control points, per-point response
/// weights and the affine coefficient rows.
#[derive(Debug, Clone)]
pub struct GamutMap {
    ctrl_pts: Matrix,
    weights: Matrix,
    coefs: Matrix,
    kernel: RbfKernel,
}

impl GamutMap {
    pub fn new(ctrl_pts: Matrix, weights: Matrix, coefs: Matrix, kernel: RbfKernel) -> Result<Self> {
        if ctrl_pts.cols() != 3 {
            return Err(PipelineError::mismatch("ctrl_pts", "3 columns", ctrl_pts.cols()));
        }
        if weights.cols() != 3 {
            return Err(PipelineError::mismatch("weights", "3 columns", weights.cols()));
        }
        if weights.rows() != ctrl_pts.rows() {
            return Err(PipelineError::mismatch(
                "weights",
                format!("{} rows (one per control point)", ctrl_pts.rows()),
                format!("{} rows", weights.rows()),
            ));
        }
        coefs.expect_shape("coefs", COEF_ROWS, 3)?;
        Ok(Self {
            ctrl_pts,
            weights,
            coefs,
            kernel,
        })
    }

    /// Number of control points.
    #[inline]
    pub fn len(&self) -> usize {
        self.ctrl_pts.rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ctrl_pts.rows() == 0
    }

    pub fn kernel(&self) -> RbfKernel {
        self.kernel
    }

    pub fn ctrl_pts(&self) -> &Matrix {
        &self.ctrl_pts
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn coefs(&self) -> &Matrix {
        &self.coefs
    }

    /// Kernel response of control point `k` to colour `v`.
    #[inline]
    pub fn response(&self, v: [f32; 3], k: usize) -> f32 {
        let p = self.ctrl_pts.row(k);
        let dr = v[0] - p[0];
        let dg = v[1] - p[1];
        let db = v[2] - p[2];
        self.kernel.eval((dr * dr + dg * dg + db * db).sqrt())
    }

    #[inline]
    pub fn weight(&self, k: usize, c: usize) -> f32 {
        self.weights.get(k, c)
    }

    /// Constant bias plus the per-input-channel linear term for output channel `c`.
    #[inline]
    pub fn affine(&self, v: [f32; 3], c: usize) -> f32 {
        self.coefs.get(0, c)
            + self.coefs.get(1, c) * v[0]
            + self.coefs.get(2, c) * v[1]
            + self.coefs.get(3, c) * v[2]
    }

    /// Evaluates the full warp for a single colour, without a graph.
    pub fn apply(&self, v: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (c, o) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for k in 0..self.len() {
                sum += self.weight(k, c) * self.response(v, k);
            }
            *o = sum + self.affine(v, c);
        }
        out
    }

    /// Copy with every weight multiplied by `factor`.
    pub fn with_scaled_weights(&self, factor: f32) -> Self {
        Self {
            weights: self.weights.scaled(factor),
            ..self.clone()
        }
    }
}

/// Per-channel table mapping an 8-bit tone-mapped code to a linear sensor value.
#[derive(Debug, Clone)]
pub struct ReverseTone {
    table: Vec<[f32; 3]>,
}

impl ReverseTone {
    pub fn new(table: Vec<[f32; 3]>) -> Result<Self> {
        if table.len() != TONE_TABLE_SIZE {
            return Err(PipelineError::mismatch("rev_tone", TONE_TABLE_SIZE, table.len()));
        }
        Ok(Self { table })
    }

    pub fn identity() -> Self {
        Self {
            table: (0..TONE_TABLE_SIZE)
                .map(|i| {
                    let v = i as f32 / 255.0;
                    [v, v, v]
                })
                .collect(),
        }
    }

    /// Looks up `v` in `[0, 1]` for channel `c`, interpolating linearly between
    /// neighbouring rows. Out-of-range inputs are clamped to the table ends.
    #[inline]
    pub fn lookup(&self, v: f32, c: usize) -> f32 {
        let last = (TONE_TABLE_SIZE - 1) as f32;
        let idx = (v * last).clamp(0.0, last);
        // NaN survives clamp; the saturating cast sends it to row 0.
        let lo = idx.floor() as usize;
        let hi = (lo + 1).min(TONE_TABLE_SIZE - 1);
        let t = if idx.is_finite() { idx - lo as f32 } else { 0.0 };
        let a = self.table[lo][c];
        let b = self.table[hi][c];
        a + (b - a) * t
    }

    pub fn rows(&self) -> &[[f32; 3]] {
        &self.table
    }
}

/// Per-camera calibration. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct CameraModel {
    ts: Matrix,
    tw: Matrix,
    ts_tw: Matrix,
    ts_tw_inverse_transpose: Matrix,
    reverse_transform: [[f32; 3]; 3],
    forward_gamut: GamutMap,
    reverse_gamut: GamutMap,
    reverse_tone: ReverseTone,
    wb_index: usize,
}

impl CameraModel {
    /// Assembles a model and precomputes `inverse(transpose(TsTw))`.
    ///
    /// When `ts_tw` is `None` it is computed as `Ts * Tw`.
    pub fn new(
        ts: Matrix,
        tw: Matrix,
        ts_tw: Option<Matrix>,
        forward_gamut: GamutMap,
        reverse_gamut: GamutMap,
        reverse_tone: ReverseTone,
        wb_index: usize,
    ) -> Result<Self> {
        ts.expect_shape("Ts", 3, 3)?;
        tw.expect_shape("Tw", 3, 3)?;
        let ts_tw = match ts_tw {
            Some(m) => m,
            None => ts.multiply(&tw)?,
        };
        ts_tw.expect_shape("TsTw", 3, 3)?;

        let ts_tw_inverse_transpose = invert_3x3(&ts_tw.transpose(), "transpose(TsTw)")?;
        let reverse_transform = ts_tw_inverse_transpose.to_array3()?;

        Ok(Self {
            ts,
            tw,
            ts_tw,
            ts_tw_inverse_transpose,
            reverse_transform,
            forward_gamut,
            reverse_gamut,
            reverse_tone,
            wb_index,
        })
    }

    pub fn ts(&self) -> &Matrix {
        &self.ts
    }

    pub fn tw(&self) -> &Matrix {
        &self.tw
    }

    pub fn ts_tw(&self) -> &Matrix {
        &self.ts_tw
    }

    pub fn ts_tw_inverse_transpose(&self) -> &Matrix {
        &self.ts_tw_inverse_transpose
    }

    /// `TsTwInverseTranspose` as a fixed array, ready for per-pixel use.
    pub fn reverse_transform(&self) -> [[f32; 3]; 3] {
        self.reverse_transform
    }

    pub fn gamut(&self, direction: GamutDirection) -> &GamutMap {
        match direction {
            GamutDirection::Forward => &self.forward_gamut,
            GamutDirection::Reverse => &self.reverse_gamut,
        }
    }

    pub fn reverse_tone(&self) -> &ReverseTone {
        &self.reverse_tone
    }

    pub fn wb_index(&self) -> usize {
        self.wb_index
    }
}
