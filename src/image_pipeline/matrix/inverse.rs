use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::matrix::Matrix;

/// Smallest determinant magnitude accepted by [`invert_3x3`].
pub const SINGULAR_EPSILON: f32 = 1e-8;

pub fn determinant_3x3(m: &Matrix) -> Result<f32> {
    m.expect_shape("determinant operand", 3, 3)?;
    let a = |r, c| m.get(r, c);
    Ok(a(0, 0) * (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1))
        - a(0, 1) * (a(1, 0) * a(2, 2) - a(1, 2) * a(2, 0))
        + a(0, 2) * (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0)))
}

/// Inverts a 3x3 matrix with the adjugate/determinant method.
///
/// `name` identifies the matrix in the error when it is singular.
pub fn invert_3x3(m: &Matrix, name: &str) -> Result<Matrix> {
    let det = determinant_3x3(m)?;
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return Err(PipelineError::SingularMatrixError(name.to_string(), det));
    }

    let a = |r, c| m.get(r, c);
    let inv_det = 1.0 / det;

    // Cofactor matrix, transposed and scaled by 1/det
    Ok(Matrix::from_array3([
        [
            (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1)) * inv_det,
            (a(0, 2) * a(2, 1) - a(0, 1) * a(2, 2)) * inv_det,
            (a(0, 1) * a(1, 2) - a(0, 2) * a(1, 1)) * inv_det,
        ],
        [
            (a(1, 2) * a(2, 0) - a(1, 0) * a(2, 2)) * inv_det,
            (a(0, 0) * a(2, 2) - a(0, 2) * a(2, 0)) * inv_det,
            (a(0, 2) * a(1, 0) - a(0, 0) * a(1, 2)) * inv_det,
        ],
        [
            (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0)) * inv_det,
            (a(0, 1) * a(2, 0) - a(0, 0) * a(2, 1)) * inv_det,
            (a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0)) * inv_det,
        ],
    ]))
}
