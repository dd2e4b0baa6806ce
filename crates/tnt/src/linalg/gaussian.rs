//! Reduced row echelon form by Gauss-Jordan elimination.

use num_traits::Float;

use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

/// Bring a rank-2 matrix into reduced row echelon form, in place.
///
/// Rows are processed top to bottom: the leftmost nonzero entry of the row
/// becomes its pivot, the row is scaled so the pivot is 1 and the pivot
/// column is cleared in every other row. All-zero rows are skipped. Rows are
/// finally ordered by pivot column, all-zero rows last, keeping the relative
/// order of ties.
///
/// # Errors
///
/// `InvalidParameter` unless `matrix` is rank 2.
///
/// ```
/// use tnt::Tensor;
/// use tnt::linalg::gaussian_elimination;
///
/// let mut m = Tensor::from_vec(vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0], [3, 3]).unwrap();
/// gaussian_elimination(&mut m).unwrap();
/// assert_eq!(m.data(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
/// ```
pub fn gaussian_elimination<T: Element + Float>(matrix: &mut Tensor<T>) -> Result<(), TensorError> {
    let (rows, cols) = matrix_dims(matrix)?;
    reduce(matrix.data_mut(), rows, cols, None);
    Ok(())
}

/// Like [`gaussian_elimination`], applying every row operation to `vector`
/// as well. For an invertible matrix the vector ends up holding the
/// solution of `matrix · x = vector`.
///
/// # Errors
///
/// `InvalidParameter` unless `matrix` is rank 2 and `vector` has shape
/// `{rows, 1}`.
pub fn gaussian_elimination_with_vector<T: Element + Float>(
    matrix: &mut Tensor<T>,
    vector: &mut Tensor<T>,
) -> Result<(), TensorError> {
    let (rows, cols) = matrix_dims(matrix)?;
    crate::ensure!(
        vector.shape().axes() == [rows, 1],
        InvalidParameter,
        "tnt::gaussian_elimination()",
        "Solution vector must have shape {{{}x1}}, got {}",
        rows,
        vector.shape()
    );
    reduce(matrix.data_mut(), rows, cols, Some(vector.data_mut()));
    Ok(())
}

fn matrix_dims<T: Element>(matrix: &Tensor<T>) -> Result<(usize, usize), TensorError> {
    crate::ensure!(
        matrix.num_axes() == 2,
        InvalidParameter,
        "tnt::gaussian_elimination()",
        "Gaussian elimination requires a 2 dimensional tensor, got {}",
        matrix.shape()
    );
    Ok((matrix.shape().axes()[0], matrix.shape().axes()[1]))
}

/// Column of the first nonzero entry of `row`, or `cols` if there is none.
fn lead<T: Element>(a: &[T], cols: usize, row: usize) -> usize {
    a[row * cols..(row + 1) * cols]
        .iter()
        .position(|v| !v.is_zero())
        .unwrap_or(cols)
}

fn reduce<T: Element + Float>(a: &mut [T], rows: usize, cols: usize, mut vector: Option<&mut [T]>) {
    for i in 0..rows {
        let pivot_col = lead(a, cols, i);
        if pivot_col == cols {
            continue;
        }

        let pivot = a[i * cols + pivot_col];
        for v in &mut a[i * cols..(i + 1) * cols] {
            *v = *v / pivot;
        }
        if let Some(x) = vector.as_deref_mut() {
            x[i] = x[i] / pivot;
        }

        for r in (0..rows).filter(|&r| r != i) {
            let factor = a[r * cols + pivot_col];
            if Element::is_zero(factor) {
                continue;
            }
            for c in 0..cols {
                a[r * cols + c] = a[r * cols + c] - factor * a[i * cols + c];
            }
            if let Some(x) = vector.as_deref_mut() {
                x[r] = x[r] - factor * x[i];
            }
        }
    }

    // stable insertion sort on pivot column
    for i in 1..rows {
        let mut j = i;
        while j > 0 && lead(a, cols, j) < lead(a, cols, j - 1) {
            swap_rows(a, cols, j, j - 1);
            if let Some(x) = vector.as_deref_mut() {
                x.swap(j, j - 1);
            }
            j -= 1;
        }
    }
}

fn swap_rows<T: Copy>(a: &mut [T], cols: usize, r1: usize, r2: usize) {
    for c in 0..cols {
        a.swap(r1 * cols + c, r2 * cols + c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn matrix(data: &[f64], rows: usize, cols: usize) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), [rows, cols]).unwrap()
    }

    #[test]
    fn test_invertible_reduces_to_identity() {
        let mut m = matrix(&[1.0, 2.0, 3.0, 2.0, 0.0, 1.0, 1.0, 0.0, 1.0], 3, 3);
        gaussian_elimination(&mut m).unwrap();
        assert_eq!(m, Tensor::identity([3, 3]).unwrap());
    }

    #[test]
    fn test_zero_rows_sink() {
        let mut m = matrix(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0], 3, 3);
        gaussian_elimination(&mut m).unwrap();
        assert_eq!(m.data(), &[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rectangular_already_reduced() {
        let mut m = matrix(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0], 3, 2);
        gaussian_elimination(&mut m).unwrap();
        assert_eq!(m.data(), &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vector_follows_row_operations() {
        let mut m = matrix(&[1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0], 3, 3);
        let mut v = Tensor::from_vec(vec![5.0, 6.0, 7.0], [3, 1]).unwrap();
        gaussian_elimination_with_vector(&mut m, &mut v).unwrap();
        assert_eq!(v.data(), &[5.0, 1.0, 7.0]);
    }

    #[test]
    fn test_vector_follows_row_swaps() {
        let mut m = matrix(&[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0], 3, 3);
        let mut v = Tensor::from_vec(vec![5.0, 6.0, 7.0], [3, 1]).unwrap();
        gaussian_elimination_with_vector(&mut m, &mut v).unwrap();
        assert_eq!(m, Tensor::identity([3, 3]).unwrap());
        assert_eq!(v.data(), &[7.0, 5.0, 6.0]);
    }

    #[test]
    fn test_solves_system() {
        // x + 2y = 5, 3x + 4y = 6
        let mut m = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], [2, 2]).unwrap();
        let mut v = Tensor::from_vec(vec![5.0f32, 6.0], [2, 1]).unwrap();
        gaussian_elimination_with_vector(&mut m, &mut v).unwrap();
        assert!((v.data()[0] + 4.0).abs() < 1e-5);
        assert!((v.data()[1] - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_shape_errors() {
        let mut cube: Tensor<f64> = Tensor::new([2, 2, 2]);
        assert_eq!(
            gaussian_elimination(&mut cube).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        let mut m: Tensor<f64> = Tensor::new([3, 3]);
        let mut v: Tensor<f64> = Tensor::new([3]);
        assert_eq!(
            gaussian_elimination_with_vector(&mut m, &mut v).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }
}
