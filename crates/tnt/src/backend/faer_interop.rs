//! Zero-copy GEMM on row-major buffers through faer.
//!
//! # Memory Layout
//!
//! tnt stores matrices row-major while faer's slice views are column-major.
//! A row-major `A(m×k)` read column-major is `Aᵀ(k×m)`, so the product
//! `C = A·B` is computed as `Cᵀ = Bᵀ·Aᵀ` with the operands swapped and no
//! data copied.

use faer::linalg::matmul::matmul;
use faer::{Accum, MatMut, MatRef, Par};
use faer_traits::ComplexField;

use crate::backend::MatmulDims;
use crate::scalar::Element;

/// Overwrite `out(m×n)` with `lhs(m×k) · rhs(k×n)`, all row-major.
pub(crate) fn gemm_row_major<T>(lhs: &[T], rhs: &[T], out: &mut [T], dims: MatmulDims)
where
    T: Element + ComplexField,
{
    let MatmulDims { m, k, n } = dims;

    let lhs_t = MatRef::from_column_major_slice(&rhs[..k * n], n, k);
    let rhs_t = MatRef::from_column_major_slice(&lhs[..m * k], k, m);
    let out_t = MatMut::from_column_major_slice_mut(&mut out[..m * n], n, m);

    matmul(
        out_t,
        Accum::Replace,
        lhs_t,
        rhs_t,
        <T as Element>::one(),
        Par::Seq,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::naive_matmul;

    #[test]
    fn test_gemm_2x2() {
        let a = [1.0f64, 2.0, 3.0, 4.0];
        let b = [5.0f64, 6.0, 7.0, 8.0];
        let mut c = [0.0f64; 4];
        gemm_row_major(&a, &b, &mut c, MatmulDims::new(2, 2, 2));
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_gemm_matches_naive() {
        let dims = MatmulDims::new(5, 7, 3);
        let a: Vec<f32> = (0..35).map(|i| (i % 5) as f32 - 2.0).collect();
        let b: Vec<f32> = (0..21).map(|i| (i % 4) as f32 * 0.5).collect();
        let mut expected = vec![0.0f32; 15];
        let mut actual = vec![0.0f32; 15];
        naive_matmul(&a, &b, &mut expected, dims);
        gemm_row_major(&a, &b, &mut actual, dims);
        for (x, y) in actual.iter().zip(&expected) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gemm_ignores_padding() {
        // Slices longer than the matrices, as handed out by padded buffers.
        let a = [1.0f64, 2.0, 9.0, 9.0];
        let b = [3.0f64, 4.0, 9.0, 9.0];
        let mut c = [0.0f64, 7.0];
        gemm_row_major(&a, &b, &mut c, MatmulDims::new(1, 2, 1));
        assert_eq!(c, [11.0, 7.0]);
    }
}
