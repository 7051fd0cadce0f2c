//! Per-sample stage kernels
//!
//! Each function computes one output sample from already-evaluated inputs.
//! The pixel graph decides where those inputs come from (a materialized
//! buffer or an inlined recomputation).

use crate::image_pipeline::camera_model::{GamutMap, ReverseTone};

const CODE_MAX: f32 = 255.0;

/// Maps an 8-bit code value to `[0, 1]`.
#[inline]
pub fn scale(v: f32) -> f32 {
    v / CODE_MAX
}

/// Maps a `[0, 1]` value back to an 8-bit code, rounding and clamping.
#[inline]
pub fn descale(v: f32) -> u8 {
    // NaN clamps to NaN and the saturating cast turns it into 0.
    (v * CODE_MAX).round().clamp(0.0, CODE_MAX) as u8
}

#[inline]
pub fn reverse_tone_map(tone: &ReverseTone, v: f32, c: usize) -> f32 {
    tone.lookup(v, c)
}

/// Response of control point `k` to the colour `v`.
#[inline]
pub fn rbf_response(gamut: &GamutMap, v: [f32; 3], k: usize) -> f32 {
    gamut.response(v, k)
}

/// Weighted sum of the control-point responses plus the affine bias for
/// output channel `c`. `response(k)` yields `phi_k` for the current pixel.
#[inline]
pub fn rbf_bias_sum(
    gamut: &GamutMap,
    v: [f32; 3],
    c: usize,
    mut response: impl FnMut(usize) -> f32,
) -> f32 {
    let mut sum = 0.0;
    for k in 0..gamut.len() {
        sum += gamut.weight(k, c) * response(k);
    }
    sum + gamut.affine(v, c)
}

/// Row `c` of `m * v`.
#[inline]
pub fn color_transform(m: &[[f32; 3]; 3], v: [f32; 3], c: usize) -> f32 {
    m[c][0] * v[0] + m[c][1] * v[1] + m[c][2] * v[2]
}
