use crate::backend::{Kernel, MatmulDims, tiled};
use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

fn matmul_dims<T: Element>(
    lhs: &Tensor<T>,
    rhs: &Tensor<T>,
    function: &'static str,
) -> Result<MatmulDims, TensorError> {
    crate::ensure!(
        lhs.num_axes() == 2 && rhs.num_axes() == 2,
        InvalidParameter,
        function,
        "Matrix multiply requires 2 dimensional tensors, got {} and {}",
        lhs.shape(),
        rhs.shape()
    );
    let (m, k) = (lhs.shape().axes()[0], lhs.shape().axes()[1]);
    let (k2, n) = (rhs.shape().axes()[0], rhs.shape().axes()[1]);
    crate::ensure!(
        k == k2,
        InvalidParameter,
        function,
        "Inner dimensions differ: {} vs {}",
        lhs.shape(),
        rhs.shape()
    );
    Ok(MatmulDims::new(m, k, n))
}

/// Matrix product of two rank-2 tensors, `{m, k} · {k, n} → {m, n}`.
///
/// Dispatches to the element type's kernel: faer GEMM for floats (unless
/// the `faer-gemm` feature is off), a plain triple loop for integers.
///
/// # Errors
///
/// `InvalidParameter` if either operand is not rank 2 or the inner
/// dimensions differ.
///
/// ```
/// use tnt::Tensor;
/// use tnt::linalg::matrix_multiply;
///
/// let a = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![5, 6, 7, 8], [2, 2]).unwrap();
/// assert_eq!(matrix_multiply(&a, &b).unwrap().data(), &[19, 22, 43, 50]);
/// ```
pub fn matrix_multiply<T: Element>(lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>, TensorError> {
    let dims = matmul_dims(lhs, rhs, "tnt::matrix_multiply()")?;
    let mut out = Tensor::new([dims.m, dims.n]);
    T::Kernel::matmul(lhs.data(), rhs.data(), out.data_mut(), dims);
    Ok(out)
}

/// Matrix product through the portable cache-blocked kernel, for any
/// element type.
///
/// # Errors
///
/// Same as [`matrix_multiply`].
pub fn tiled_matrix_multiply<T: Element>(
    lhs: &Tensor<T>,
    rhs: &Tensor<T>,
) -> Result<Tensor<T>, TensorError> {
    let dims = matmul_dims(lhs, rhs, "tnt::tiled_matrix_multiply()")?;
    let mut out = Tensor::new([dims.m, dims.n]);
    tiled::tiled_matmul(lhs.data(), rhs.data(), out.data_mut(), dims);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_rectangular() {
        let a = Tensor::from_vec(vec![1.0f64, 2.0, 3.0, 1.0, 2.0, 3.0], [2, 3]).unwrap();
        let b = Tensor::from_vec((1..=12).map(|v| v as f64).collect(), [3, 4]).unwrap();
        let c = matrix_multiply(&a, &b).unwrap();
        assert_eq!(c.shape().axes(), &[2, 4]);
        assert_eq!(c.data(), &[38.0, 44.0, 50.0, 56.0, 38.0, 44.0, 50.0, 56.0]);
    }

    #[test]
    fn test_ones_rectangular() {
        let a = Tensor::full([2, 3], 2i16);
        let b = Tensor::from_vec(vec![1i16, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4], [3, 4]).unwrap();
        let c = matrix_multiply(&a, &b).unwrap();
        assert_eq!(c.data(), &[6, 12, 18, 24, 6, 12, 18, 24]);
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = Tensor::from_vec((0..16).map(|v| v as f32).collect(), [4, 4]).unwrap();
        let eye = Tensor::<f32>::identity([4, 4]).unwrap();
        assert_eq!(matrix_multiply(&eye, &m).unwrap(), m);
        assert_eq!(matrix_multiply(&m, &eye).unwrap(), m);
    }

    #[test]
    fn test_tiled_matches_dispatch() {
        let a = Tensor::from_vec((0..35).map(|v| (v % 7) as u64).collect(), [5, 7]).unwrap();
        let b = Tensor::from_vec((0..63).map(|v| (v % 5) as u64).collect(), [7, 9]).unwrap();
        assert_eq!(tiled_matrix_multiply(&a, &b).unwrap(), matrix_multiply(&a, &b).unwrap());
    }

    #[test]
    fn test_shape_errors() {
        let a: Tensor<f64> = Tensor::new([2, 3]);
        let b: Tensor<f64> = Tensor::new([2, 3]);
        assert_eq!(matrix_multiply(&a, &b).unwrap_err().kind(), ErrorKind::InvalidParameter);

        let c: Tensor<f64> = Tensor::new([2, 3, 1]);
        assert_eq!(matrix_multiply(&c, &b).unwrap_err().kind(), ErrorKind::InvalidParameter);
        assert_eq!(
            tiled_matrix_multiply(&a, &c).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }
}
