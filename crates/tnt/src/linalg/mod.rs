//! Linear algebra on dense tensors.
//!
//! Matrix routines expect rank-2 row-major tensors and report shape
//! violations as `InvalidParameter`. Routines that only make sense for
//! floating point take a `num_traits::Float` bound, except [`dct`], which
//! reports `FeatureNotSupported` for integer element types at run time.

mod conv;
mod dct;
mod dot;
mod eigen;
mod gaussian;
mod matmul;
mod projection;

pub use conv::{ConvOptions, conv3d};
pub use dct::dct;
pub use dot::dot;
pub use eigen::{EigenOptions, EigenReport, eigenvalues, eigenvalues_with_report};
pub use gaussian::{gaussian_elimination, gaussian_elimination_with_vector};
pub use matmul::{matrix_multiply, tiled_matrix_multiply};
pub use projection::project;
