//! Kernel strategies for tensor arithmetic.
//!
//! Every [`Element`] names one strategy through its associated
//! [`Element::Kernel`] type, so the choice is made at compile time:
//!
//! - [`ScalarLoop`]: plain loops with wrapping arithmetic (8- and 64-bit integers)
//! - [`WideVector`]: `pulp` vector loops for add/sub/mul/dot, bitwise and
//!   comparisons (16- and 32-bit integers)
//! - [`FloatVector`]: `pulp` vector loops plus faer GEMM (f32, f64)
//!
//! Elementwise entry points work in place on the left operand. Callers pass
//! equal-length slices; the kernels do not check shapes.
//!
//! # faer Integration
//!
//! The `faer_interop` module multiplies row-major buffers through faer's
//! column-major GEMM without copying. `tiled` is the portable blocked
//! multiply used when the `faer-gemm` feature is off.

mod faer_interop;
mod generic;
mod simd;
pub(crate) mod tiled;
pub(crate) mod vector;

pub use generic::ScalarLoop;
pub use simd::{FloatVector, WideVector};

pub(crate) use faer_interop::gemm_row_major;
pub(crate) use generic::naive_matmul;

use crate::scalar::Element;

/// Dimensions of `out(m×n) = lhs(m×k) · rhs(k×n)`, all row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulDims {
    pub m: usize,
    pub k: usize,
    pub n: usize,
}

impl MatmulDims {
    #[inline]
    pub const fn new(m: usize, k: usize, n: usize) -> Self {
        Self { m, k, n }
    }
}

/// Lane-wise bitwise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
}

impl BitwiseOp {
    #[inline]
    pub fn apply<T: Element>(self, a: T, b: T) -> T {
        match self {
            Self::And => a.bit_and(b),
            Self::Or => a.bit_or(b),
            Self::Xor => a.bit_xor(b),
        }
    }
}

/// Lane-wise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    #[inline]
    pub fn holds<T: Element>(self, a: T, b: T) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => a < b,
            Self::Gt => a > b,
            Self::Le => a <= b,
            Self::Ge => a >= b,
        }
    }

    /// Mask byte for one lane: all bits set when the comparison holds.
    #[inline]
    pub fn mask<T: Element>(self, a: T, b: T) -> u8 {
        if self.holds(a, b) { u8::MAX } else { 0 }
    }
}

/// Arithmetic kernels for one element type.
///
/// Implemented by zero-sized strategy types; every method is an associated
/// function so calls resolve statically through `T::Kernel`.
pub trait Kernel<T: Element> {
    /// `lhs[i] += rhs[i]`.
    fn add(lhs: &mut [T], rhs: &[T]);
    /// `lhs[i] += rhs`.
    fn add_scalar(lhs: &mut [T], rhs: T);

    fn sub(lhs: &mut [T], rhs: &[T]);
    fn sub_scalar(lhs: &mut [T], rhs: T);

    fn mul(lhs: &mut [T], rhs: &[T]);
    fn mul_scalar(lhs: &mut [T], rhs: T);

    /// `lhs[i] /= rhs[i]`. Integer strategies panic on a zero divisor, so
    /// callers reject those first.
    fn div(lhs: &mut [T], rhs: &[T]);
    fn div_scalar(lhs: &mut [T], rhs: T);

    /// `Σ lhs[i] * rhs[i]` accumulated in `T`.
    fn dot(lhs: &[T], rhs: &[T]) -> T;

    /// Overwrite `out` with `lhs · rhs`.
    ///
    /// `lhs`, `rhs` and `out` hold at least `m*k`, `k*n` and `m*n` elements.
    fn matmul(lhs: &[T], rhs: &[T], out: &mut [T], dims: MatmulDims);

    /// `lhs[i] = op(lhs[i], rhs[i])` on the raw bits.
    fn bitwise(lhs: &mut [T], rhs: &[T], op: BitwiseOp);
    fn bitwise_scalar(lhs: &mut [T], rhs: T, op: BitwiseOp);
    fn not(lhs: &mut [T]);

    /// `out[i] = 0xFF` where `op(lhs[i], rhs[i])` holds, `0` elsewhere.
    ///
    /// `out` holds at least `lhs.len()` bytes.
    fn compare(lhs: &[T], rhs: &[T], out: &mut [u8], op: CompareOp);
    fn compare_scalar(lhs: &[T], rhs: T, out: &mut [u8], op: CompareOp);
}
