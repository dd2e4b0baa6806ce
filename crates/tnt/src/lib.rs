//! tnt - N-dimensional tensors with strided views and SIMD kernels
//!
//! Dense row-major tensors over ten primitive element types, zero-copy
//! strided views with inclusive negative-bound slicing, and arithmetic that
//! is dispatched at compile time to a kernel strategy chosen by the element
//! type.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Tensor API (tensor, view, operations, linalg)
//!     → constructors, slicing, operators, reductions, matmul, eigenvalues
//!
//! Level 2: Kernel dispatch (Element::Kernel)
//!     → ScalarLoop   i8, u8, i64, u64
//!     → WideVector   i16, u16, i32, u32   (pulp)
//!     → FloatVector  f32, f64             (pulp, faer GEMM)
//!
//! Level 3: Storage
//!     → AlignedPtr: 32-byte aligned, zero-padded to whole vector blocks
//! ```
//!
//! # Example
//!
//! ```
//! use tnt::{Range, Tensor};
//!
//! let mut t = Tensor::from_vec((1..=9).map(|v| v as f32).collect(), [3, 3]).unwrap();
//! t += 1.0f32;
//!
//! // last two rows, first column
//! let corner = t.slice(&[Range::new(1, -1), Range::at(0)]).unwrap();
//! assert_eq!(corner.to_tensor().data(), &[5.0, 8.0]);
//!
//! let product = t.matmul(&Tensor::identity([3, 3]).unwrap()).unwrap();
//! assert_eq!(product, t);
//! ```
//!
//! # Checks
//!
//! Every precondition is checked and reported as a [`TensorError`]. The
//! `disable-checks` feature compiles the checks out.

pub mod backend;
pub mod config;
pub mod error;
pub mod index;
pub mod linalg;
pub mod operations;
pub mod range;
mod random;
pub mod scalar;
pub mod shape;
pub mod storage;
pub mod strides;
pub mod tensor;
pub mod view;

pub use backend::{BitwiseOp, CompareOp, FloatVector, Kernel, ScalarLoop, WideVector};
pub use error::{ErrorKind, TensorError};
pub use index::Index;
pub use range::Range;
pub use scalar::{Element, KernelClass};
pub use shape::Shape;
pub use storage::AlignedPtr;
pub use strides::Stride;
pub use tensor::Tensor;
pub use view::{TensorView, TensorViewIter, TensorViewMut};
