//! Matrix utilities used to precompute the reverse colour transform.

mod dense;
mod inverse;

pub use dense::Matrix;
pub use inverse::{SINGULAR_EPSILON, determinant_3x3, invert_3x3};
