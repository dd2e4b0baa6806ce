//! Two-dimensional discrete cosine transform.

use std::f64::consts::PI;

use crate::error::TensorError;
use crate::scalar::{Element, KernelClass};
use crate::tensor::Tensor;

/// Orthonormal DCT-II of a rank-2 tensor, applied along rows and then
/// columns.
///
/// For a length-`N` run `x`,
/// `X[k] = a(k) · Σₙ x[n] · cos(π(2n+1)k / 2N)` with `a(0) = √(1/N)` and
/// `a(k) = √(2/N)` otherwise, so the transform preserves the sum of squares.
///
/// # Errors
///
/// `FeatureNotSupported` for integer element types, `InvalidParameter`
/// unless `tensor` is rank 2.
///
/// ```
/// use tnt::Tensor;
/// use tnt::linalg::dct;
///
/// let out = dct(&Tensor::full([2, 2], 1.0f64)).unwrap();
/// assert!((out.data()[0] - 2.0).abs() < 1e-12);
/// assert!(out.data()[1..].iter().all(|v| v.abs() < 1e-12));
/// ```
pub fn dct<T: Element>(tensor: &Tensor<T>) -> Result<Tensor<T>, TensorError> {
    if T::CLASS != KernelClass::Floating {
        return Err(crate::tensor_error!(
            FeatureNotSupported,
            "tnt::dct()",
            "The discrete cosine transform is not implemented for {}",
            T::NAME
        ));
    }
    crate::ensure!(
        tensor.num_axes() == 2,
        InvalidParameter,
        "tnt::dct()",
        "The discrete cosine transform requires a 2D tensor, got {}",
        tensor.shape()
    );
    let (rows, cols) = (tensor.shape().axes()[0], tensor.shape().axes()[1]);

    let mut work: Vec<f64> = tensor.iter().map(|v| v.to_f64()).collect();
    let mut line = Vec::new();

    let row_basis = basis(cols);
    for r in 0..rows {
        transform(&row_basis, cols, |i| work[r * cols + i], &mut line);
        work[r * cols..(r + 1) * cols].copy_from_slice(&line);
    }

    let col_basis = basis(rows);
    for c in 0..cols {
        transform(&col_basis, rows, |i| work[i * cols + c], &mut line);
        for (i, v) in line.iter().enumerate() {
            work[i * cols + c] = *v;
        }
    }

    let mut out = Tensor::new(tensor.shape());
    for (dst, src) in out.iter_mut().zip(work) {
        *dst = T::from_f64(src);
    }
    Ok(out)
}

/// Row-major `n × n` matrix with `basis[k][i] = a(k) · cos(π(2i+1)k / 2n)`.
fn basis(n: usize) -> Vec<f64> {
    let mut m = Vec::with_capacity(n * n);
    for k in 0..n {
        let a = if k == 0 { (1.0 / n as f64).sqrt() } else { (2.0 / n as f64).sqrt() };
        for i in 0..n {
            m.push(a * (PI * (2 * i + 1) as f64 * k as f64 / (2 * n) as f64).cos());
        }
    }
    m
}

fn transform(basis: &[f64], n: usize, input: impl Fn(usize) -> f64, out: &mut Vec<f64>) {
    out.clear();
    out.extend((0..n).map(|k| (0..n).map(|i| basis[k * n + i] * input(i)).sum::<f64>()));
}
