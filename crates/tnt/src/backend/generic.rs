//! Generic (naive loop-based) kernel implementation.

use crate::backend::{BitwiseOp, CompareOp, Kernel, MatmulDims};
use crate::scalar::Element;

/// Scalar loops with wrapping integer arithmetic.
///
/// Used for element types that gain nothing from the vector engine: 8-bit
/// lanes have no vector multiply and 64-bit integer multiply is missing on
/// most targets. Also serves as the reference the vector strategies are
/// tested against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarLoop;

#[inline]
fn zip_apply<T: Element>(lhs: &mut [T], rhs: &[T], op: impl Fn(T, T) -> T) {
    for (a, &b) in lhs.iter_mut().zip(rhs) {
        *a = op(*a, b);
    }
}

#[inline]
fn splat_apply<T: Element>(lhs: &mut [T], rhs: T, op: impl Fn(T, T) -> T) {
    for a in lhs.iter_mut() {
        *a = op(*a, rhs);
    }
}

impl<T: Element> Kernel<T> for ScalarLoop {
    fn add(lhs: &mut [T], rhs: &[T]) {
        zip_apply(lhs, rhs, T::wrapping_add);
    }

    fn add_scalar(lhs: &mut [T], rhs: T) {
        splat_apply(lhs, rhs, T::wrapping_add);
    }

    fn sub(lhs: &mut [T], rhs: &[T]) {
        zip_apply(lhs, rhs, T::wrapping_sub);
    }

    fn sub_scalar(lhs: &mut [T], rhs: T) {
        splat_apply(lhs, rhs, T::wrapping_sub);
    }

    fn mul(lhs: &mut [T], rhs: &[T]) {
        zip_apply(lhs, rhs, T::wrapping_mul);
    }

    fn mul_scalar(lhs: &mut [T], rhs: T) {
        splat_apply(lhs, rhs, T::wrapping_mul);
    }

    fn div(lhs: &mut [T], rhs: &[T]) {
        zip_apply(lhs, rhs, T::wrapping_div);
    }

    fn div_scalar(lhs: &mut [T], rhs: T) {
        splat_apply(lhs, rhs, T::wrapping_div);
    }

    fn dot(lhs: &[T], rhs: &[T]) -> T {
        lhs.iter()
            .zip(rhs)
            .fold(T::zero(), |acc, (&a, &b)| acc.wrapping_add(a.wrapping_mul(b)))
    }

    fn matmul(lhs: &[T], rhs: &[T], out: &mut [T], dims: MatmulDims) {
        naive_matmul(lhs, rhs, out, dims);
    }

    fn bitwise(lhs: &mut [T], rhs: &[T], op: BitwiseOp) {
        zip_apply(lhs, rhs, |a, b| op.apply(a, b));
    }

    fn bitwise_scalar(lhs: &mut [T], rhs: T, op: BitwiseOp) {
        splat_apply(lhs, rhs, |a, b| op.apply(a, b));
    }

    fn not(lhs: &mut [T]) {
        for a in lhs.iter_mut() {
            *a = a.bit_not();
        }
    }

    fn compare(lhs: &[T], rhs: &[T], out: &mut [u8], op: CompareOp) {
        for ((m, &a), &b) in out.iter_mut().zip(lhs).zip(rhs) {
            *m = op.mask(a, b);
        }
    }

    fn compare_scalar(lhs: &[T], rhs: T, out: &mut [u8], op: CompareOp) {
        for (m, &a) in out.iter_mut().zip(lhs) {
            *m = op.mask(a, rhs);
        }
    }
}

/// Triple loop in i-p-j order so the inner loop walks rows of `rhs` and `out`.
pub(crate) fn naive_matmul<T: Element>(lhs: &[T], rhs: &[T], out: &mut [T], dims: MatmulDims) {
    let MatmulDims { m, k, n } = dims;
    out[..m * n].fill(T::zero());
    for i in 0..m {
        let out_row = &mut out[i * n..(i + 1) * n];
        for p in 0..k {
            let a = lhs[i * k + p];
            let rhs_row = &rhs[p * n..(p + 1) * n];
            for (c, &b) in out_row.iter_mut().zip(rhs_row) {
                *c = c.wrapping_add(a.wrapping_mul(b));
            }
        }
    }
}
