//! Vectorized kernel strategies.

use faer_traits::ComplexField;

use crate::backend::vector::{
    self, AddOp, AndOp, DivOp, MulOp, OrOp, SimdBinaryOp, SimdCompare, SubOp, XorOp,
};
use crate::backend::{BitwiseOp, CompareOp, Kernel, MatmulDims, ScalarLoop, naive_matmul, tiled};
use crate::config::FAER_GEMM;

/// Shared vector bitwise and comparison entry points.
macro_rules! vector_bitwise_compare {
    () => {
        fn bitwise(lhs: &mut [T], rhs: &[T], op: BitwiseOp) {
            match op {
                BitwiseOp::And => vector::binary_in_place::<T, AndOp>(lhs, rhs),
                BitwiseOp::Or => vector::binary_in_place::<T, OrOp>(lhs, rhs),
                BitwiseOp::Xor => vector::binary_in_place::<T, XorOp>(lhs, rhs),
            }
        }

        fn bitwise_scalar(lhs: &mut [T], rhs: T, op: BitwiseOp) {
            match op {
                BitwiseOp::And => vector::scalar_in_place::<T, AndOp>(lhs, rhs),
                BitwiseOp::Or => vector::scalar_in_place::<T, OrOp>(lhs, rhs),
                BitwiseOp::Xor => vector::scalar_in_place::<T, XorOp>(lhs, rhs),
            }
        }

        fn not(lhs: &mut [T]) {
            vector::scalar_in_place::<T, XorOp>(lhs, T::zero().bit_not());
        }

        fn compare(lhs: &[T], rhs: &[T], out: &mut [u8], op: CompareOp) {
            vector::compare(lhs, rhs, out, op);
        }

        fn compare_scalar(lhs: &[T], rhs: T, out: &mut [u8], op: CompareOp) {
            vector::compare_scalar(lhs, rhs, out, op);
        }
    };
}

/// Vector loops for 16- and 32-bit integers.
///
/// Add, sub, mul, dot, bitwise ops and comparisons use the vector engine. The lane multiply computes
/// the double-width product and keeps the low half, which is the wrapping
/// product. Integer vector division does not exist, so `div` is a scalar loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct WideVector;

impl<T> Kernel<T> for WideVector
where
    T: SimdCompare,
    AddOp: SimdBinaryOp<T>,
    SubOp: SimdBinaryOp<T>,
    MulOp: SimdBinaryOp<T>,
    AndOp: SimdBinaryOp<T>,
    OrOp: SimdBinaryOp<T>,
    XorOp: SimdBinaryOp<T>,
{
    fn add(lhs: &mut [T], rhs: &[T]) {
        vector::binary_in_place::<T, AddOp>(lhs, rhs);
    }

    fn add_scalar(lhs: &mut [T], rhs: T) {
        vector::scalar_in_place::<T, AddOp>(lhs, rhs);
    }

    fn sub(lhs: &mut [T], rhs: &[T]) {
        vector::binary_in_place::<T, SubOp>(lhs, rhs);
    }

    fn sub_scalar(lhs: &mut [T], rhs: T) {
        vector::scalar_in_place::<T, SubOp>(lhs, rhs);
    }

    fn mul(lhs: &mut [T], rhs: &[T]) {
        vector::binary_in_place::<T, MulOp>(lhs, rhs);
    }

    fn mul_scalar(lhs: &mut [T], rhs: T) {
        vector::scalar_in_place::<T, MulOp>(lhs, rhs);
    }

    fn div(lhs: &mut [T], rhs: &[T]) {
        <ScalarLoop as Kernel<T>>::div(lhs, rhs);
    }

    fn div_scalar(lhs: &mut [T], rhs: T) {
        <ScalarLoop as Kernel<T>>::div_scalar(lhs, rhs);
    }

    fn dot(lhs: &[T], rhs: &[T]) -> T {
        vector::dot(lhs, rhs)
    }

    fn matmul(lhs: &[T], rhs: &[T], out: &mut [T], dims: MatmulDims) {
        naive_matmul(lhs, rhs, out, dims);
    }

    vector_bitwise_compare!();
}

/// Vector loops and GEMM for `f32` / `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatVector;

impl<T> Kernel<T> for FloatVector
where
    T: SimdCompare + ComplexField,
    AddOp: SimdBinaryOp<T>,
    SubOp: SimdBinaryOp<T>,
    MulOp: SimdBinaryOp<T>,
    DivOp: SimdBinaryOp<T>,
    AndOp: SimdBinaryOp<T>,
    OrOp: SimdBinaryOp<T>,
    XorOp: SimdBinaryOp<T>,
{
    fn add(lhs: &mut [T], rhs: &[T]) {
        vector::binary_in_place::<T, AddOp>(lhs, rhs);
    }

    fn add_scalar(lhs: &mut [T], rhs: T) {
        vector::scalar_in_place::<T, AddOp>(lhs, rhs);
    }

    fn sub(lhs: &mut [T], rhs: &[T]) {
        vector::binary_in_place::<T, SubOp>(lhs, rhs);
    }

    fn sub_scalar(lhs: &mut [T], rhs: T) {
        vector::scalar_in_place::<T, SubOp>(lhs, rhs);
    }

    fn mul(lhs: &mut [T], rhs: &[T]) {
        vector::binary_in_place::<T, MulOp>(lhs, rhs);
    }

    fn mul_scalar(lhs: &mut [T], rhs: T) {
        vector::scalar_in_place::<T, MulOp>(lhs, rhs);
    }

    fn div(lhs: &mut [T], rhs: &[T]) {
        vector::binary_in_place::<T, DivOp>(lhs, rhs);
    }

    fn div_scalar(lhs: &mut [T], rhs: T) {
        vector::scalar_in_place::<T, DivOp>(lhs, rhs);
    }

    fn dot(lhs: &[T], rhs: &[T]) -> T {
        vector::dot(lhs, rhs)
    }

    fn matmul(lhs: &[T], rhs: &[T], out: &mut [T], dims: MatmulDims) {
        if FAER_GEMM {
            log::debug!("matmul {}x{}x{} {}: faer gemm", dims.m, dims.k, dims.n, T::NAME);
            super::gemm_row_major(lhs, rhs, out, dims);
        } else {
            log::debug!("matmul {}x{}x{} {}: tiled kernel", dims.m, dims.k, dims.n, T::NAME);
            tiled::tiled_matmul(lhs, rhs, out, dims);
        }
    }

    vector_bitwise_compare!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_matches_scalar_loop() {
        let a: Vec<i32> = (0..70).map(|i| i * 7 - 100).collect();
        let b: Vec<i32> = (0..70).map(|i| 3 - i).collect();

        for op in 0..3 {
            let mut wide = a.clone();
            let mut reference = a.clone();
            match op {
                0 => {
                    <WideVector as Kernel<i32>>::add(&mut wide, &b);
                    <ScalarLoop as Kernel<i32>>::add(&mut reference, &b);
                }
                1 => {
                    <WideVector as Kernel<i32>>::sub(&mut wide, &b);
                    <ScalarLoop as Kernel<i32>>::sub(&mut reference, &b);
                }
                _ => {
                    <WideVector as Kernel<i32>>::mul(&mut wide, &b);
                    <ScalarLoop as Kernel<i32>>::mul(&mut reference, &b);
                }
            }
            assert_eq!(wide, reference);
        }
    }

    #[test]
    fn test_wide_bitwise_compare_i32() {
        let a: Vec<i32> = (0..41).map(|i| i * 37 - 700).collect();
        let b: Vec<i32> = (0..41).map(|i| 500 - i * 29).collect();

        for op in [BitwiseOp::And, BitwiseOp::Or, BitwiseOp::Xor] {
            let mut wide = a.clone();
            let mut reference = a.clone();
            <WideVector as Kernel<i32>>::bitwise(&mut wide, &b, op);
            <ScalarLoop as Kernel<i32>>::bitwise(&mut reference, &b, op);
            assert_eq!(wide, reference, "{op:?}");
        }

        let mut wide = a.clone();
        <WideVector as Kernel<i32>>::not(&mut wide);
        assert!(wide.iter().zip(&a).all(|(&w, &v)| w == !v));

        for op in [CompareOp::Eq, CompareOp::Ne, CompareOp::Lt, CompareOp::Gt, CompareOp::Le, CompareOp::Ge] {
            let mut wide = vec![0u8; 41];
            let mut reference = vec![0u8; 41];
            <WideVector as Kernel<i32>>::compare(&a, &b, &mut wide, op);
            <ScalarLoop as Kernel<i32>>::compare(&a, &b, &mut reference, op);
            assert_eq!(wide, reference, "{op:?}");
        }
    }

    #[test]
    fn test_float_compare_f32() {
        let a: Vec<f32> = (0..23).map(|i| i as f32 * 0.5).collect();
        let mut out = vec![0u8; 23];
        <FloatVector as Kernel<f32>>::compare_scalar(&a, 5.0, &mut out, CompareOp::Ge);
        for (i, &m) in out.iter().enumerate() {
            assert_eq!(m, if i >= 10 { u8::MAX } else { 0 });
        }
        <FloatVector as Kernel<f32>>::compare(&a, &a, &mut out, CompareOp::Ne);
        assert!(out.iter().all(|&m| m == 0));
    }

    #[test]
    fn test_float_bitwise_on_bits() {
        let mut a = vec![-2.5f32; 19];
        <FloatVector as Kernel<f32>>::bitwise_scalar(&mut a, -0.0, BitwiseOp::Xor);
        assert!(a.iter().all(|&v| v == 2.5));
    }

    #[test]
    fn test_wide_div_is_scalar() {
        let mut a = vec![10u16, 20, 30];
        <WideVector as Kernel<u16>>::div(&mut a, &[3, 4, 7]);
        assert_eq!(a, vec![3, 5, 4]);
    }

    #[test]
    fn test_float_scalar_ops() {
        let mut a = vec![1.0f32; 20];
        <FloatVector as Kernel<f32>>::mul_scalar(&mut a, 3.0);
        <FloatVector as Kernel<f32>>::div_scalar(&mut a, 2.0);
        assert!(a.iter().all(|&v| v == 1.5));
    }

    #[test]
    fn test_float_matmul_rectangular() {
        // [1 2 3; 1 2 3] x [4 5 6 7; 4 5 6 7; 4 5 6 7]
        let a = [1.0f64, 2.0, 3.0, 1.0, 2.0, 3.0];
        let b: Vec<f64> = (0..3).flat_map(|_| [4.0, 5.0, 6.0, 7.0]).collect();
        let mut c = [0.0f64; 8];
        <FloatVector as Kernel<f64>>::matmul(&a, &b, &mut c, MatmulDims::new(2, 3, 4));
        assert_eq!(c, [24.0, 30.0, 36.0, 42.0, 24.0, 30.0, 36.0, 42.0]);
    }
}
