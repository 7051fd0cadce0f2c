//! Camera models shared by the test suites.

use std::fmt::Write;

use crate::image_pipeline::camera_model::types::{
    CameraModel, GamutMap, RbfKernel, ReverseTone, TONE_TABLE_SIZE,
};
use crate::image_pipeline::matrix::Matrix;

/// Identity colour matrices, one zero-weight control point at mid-gray,
/// zero bias with an identity affine term, identity tone table.
pub(crate) fn trivial_model() -> CameraModel {
    let mid = 128.0 / 255.0;
    let gamut = GamutMap::new(
        Matrix::from_rows(vec![vec![mid, mid, mid]]).unwrap(),
        Matrix::zeros(1, 3),
        affine_identity(),
        RbfKernel::Linear,
    )
    .unwrap();
    CameraModel::new(
        Matrix::identity(3),
        Matrix::identity(3),
        None,
        gamut.clone(),
        gamut,
        ReverseTone::identity(),
        0,
    )
    .unwrap()
}

/// A model with non-trivial values in every table.
pub(crate) fn warped_model() -> CameraModel {
    let gamut = warped_gamut();
    let tone = ReverseTone::new(
        (0..TONE_TABLE_SIZE)
            .map(|i| {
                let v = i as f32 / 255.0;
                [v.powf(2.2), v.powf(2.0), v.powf(1.8)]
            })
            .collect(),
    )
    .unwrap();
    CameraModel::new(
        Matrix::from_array3([[1.2, -0.1, -0.1], [-0.2, 1.3, -0.1], [0.0, -0.3, 1.3]]),
        Matrix::from_array3([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.6]]),
        None,
        gamut.clone(),
        gamut,
        tone,
        3,
    )
    .unwrap()
}

pub(crate) fn warped_gamut() -> GamutMap {
    GamutMap::new(
        Matrix::from_rows(vec![
            vec![0.1, 0.2, 0.3],
            vec![0.8, 0.5, 0.2],
            vec![0.4, 0.9, 0.6],
        ])
        .unwrap(),
        Matrix::from_rows(vec![
            vec![0.05, -0.02, 0.01],
            vec![-0.03, 0.04, 0.02],
            vec![0.01, 0.01, -0.05],
        ])
        .unwrap(),
        Matrix::from_rows(vec![
            vec![0.01, 0.0, -0.01],
            vec![0.95, 0.02, 0.0],
            vec![0.03, 0.97, 0.01],
            vec![0.0, 0.01, 0.98],
        ])
        .unwrap(),
        RbfKernel::Linear,
    )
    .unwrap()
}

pub(crate) fn affine_identity() -> Matrix {
    Matrix::from_rows(vec![
        vec![0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ])
    .unwrap()
}

/// Renders a calibration file with `n` control points and white-balance
/// indices `0..wb_count`.
pub(crate) fn model_text(n: usize, wb_count: usize) -> String {
    let mut s = String::from("# synthetic camera model\nkernel linear\n\n[ts]\n");
    s.push_str("1.0 0.0 0.0\n0.0 1.0 0.0\n0.0 0.0 1.0\n");
    for wb in 0..wb_count {
        let g = 1.0 + wb as f32 * 0.1;
        writeln!(s, "[tw {wb}]\n{g} 0 0\n0 1 0\n0 0 {g}").unwrap();
    }
    for dir in ["forward", "reverse"] {
        writeln!(s, "[ctrl_pts {dir}]").unwrap();
        for k in 0..n {
            let t = k as f32 / n.max(1) as f32;
            writeln!(s, "{t} {} {}", 1.0 - t, t * 0.5).unwrap();
        }
        writeln!(s, "[weights {dir}]").unwrap();
        for _ in 0..n {
            s.push_str("0.0 0.0 0.0\n");
        }
        writeln!(s, "[coefs {dir}]\n0 0 0\n1 0 0\n0 1 0\n0 0 1").unwrap();
    }
    s.push_str("[rev_tone]\n");
    for i in 0..TONE_TABLE_SIZE {
        let v = i as f32 / 255.0;
        writeln!(s, "{v} {v} {v}").unwrap();
    }
    s
}
