//! Eigenvalues of real matrices by cyclic Jacobi rotations.
//!
//! Each sweep picks the largest off-diagonal entry `a[p][q]` and applies the
//! plane rotation `G` that zeroes it, `A ← Gᵀ·A·G`. Iteration stops once the
//! largest off-diagonal magnitude drops below `eps`. For symmetric input the
//! diagonal then holds the eigenvalues.

use num_traits::Float;

use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

/// Stopping criteria for [`eigenvalues`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenOptions {
    /// Upper bound on the number of rotations.
    pub max_iterations: usize,
    /// Convergence threshold on the largest off-diagonal magnitude.
    pub eps: f64,
}

impl Default for EigenOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            eps: 1e-3,
        }
    }
}

/// How the iteration ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenReport {
    /// Rotations applied.
    pub iterations: usize,
    /// Largest off-diagonal magnitude left in the rotated matrix.
    pub off_diagonal: f64,
    pub converged: bool,
}

/// Eigenvalues of a square matrix, in diagonal order (not sorted).
///
/// # Errors
///
/// `InvalidParameter` unless `tensor` is rank 2 and square.
///
/// ```
/// use tnt::Tensor;
/// use tnt::linalg::{EigenOptions, eigenvalues};
///
/// let m = Tensor::from_vec(vec![2.0, 1.0, 1.0, 2.0], [2, 2]).unwrap();
/// let mut values = eigenvalues(&m, EigenOptions::default()).unwrap().data().to_vec();
/// values.sort_by(|a, b| a.partial_cmp(b).unwrap());
/// assert!((values[0] - 1.0f64).abs() < 1e-6);
/// assert!((values[1] - 3.0f64).abs() < 1e-6);
/// ```
pub fn eigenvalues<T: Element + Float>(
    tensor: &Tensor<T>,
    options: EigenOptions,
) -> Result<Tensor<T>, TensorError> {
    eigenvalues_with_report(tensor, options).map(|(values, _)| values)
}

/// Like [`eigenvalues`], also reporting whether the iteration converged.
///
/// Running out of iterations is not an error: the current diagonal is
/// returned as the best estimate and a warning is logged.
pub fn eigenvalues_with_report<T: Element + Float>(
    tensor: &Tensor<T>,
    options: EigenOptions,
) -> Result<(Tensor<T>, EigenReport), TensorError> {
    crate::ensure!(
        tensor.num_axes() == 2,
        InvalidParameter,
        "tnt::eigenvalues()",
        "Eigenvalues require a 2 dimensional tensor, got {}",
        tensor.shape()
    );
    let n = tensor.shape().axes()[0];
    crate::ensure!(
        tensor.shape().axes()[1] == n,
        InvalidParameter,
        "tnt::eigenvalues()",
        "Eigenvalues require a square matrix, got {}",
        tensor.shape()
    );

    let mut a = tensor.data().to_vec();
    let mut iterations = 0;
    let report = loop {
        let (p, q, largest) = largest_off_diagonal(&a, n);
        let off_diagonal = Element::to_f64(largest);
        if off_diagonal < options.eps {
            break EigenReport {
                iterations,
                off_diagonal,
                converged: true,
            };
        }
        if iterations == options.max_iterations {
            log::warn!(
                "Jacobi eigenvalues did not converge after {iterations} rotations \
                 (off-diagonal {off_diagonal:e}, eps {:e})",
                options.eps
            );
            break EigenReport {
                iterations,
                off_diagonal,
                converged: false,
            };
        }
        rotate(&mut a, n, p, q);
        iterations += 1;
    };

    let mut values = Tensor::new([n]);
    for (i, v) in values.iter_mut().enumerate() {
        *v = a[i * n + i];
    }
    Ok((values, report))
}

/// Position and magnitude of the first largest `|a[r][c]|` with `r != c`.
fn largest_off_diagonal<T: Element + Float>(a: &[T], n: usize) -> (usize, usize, T) {
    let mut best = (0, 0, <T as Element>::zero());
    for r in 0..n {
        for c in 0..n {
            let v = a[r * n + c].abs();
            if r != c && v > best.2 {
                best = (r, c, v);
            }
        }
    }
    best
}

/// `A ← Gᵀ·A·G` with `G[p][p] = G[q][q] = c`, `G[p][q] = s`, `G[q][p] = -s`.
fn rotate<T: Element + Float>(a: &mut [T], n: usize, p: usize, q: usize) {
    let one = <T as Element>::one();
    let two = one + one;

    let tau = (a[q * n + q] - a[p * n + p]) / (two * a[p * n + q]);
    let sign = if tau < <T as Element>::zero() { -one } else { one };
    let t = sign / (tau.abs() + (one + tau * tau).sqrt());
    let c = one / (one + t * t).sqrt();
    let s = t * c;

    // columns: A·G
    for r in 0..n {
        let (ap, aq) = (a[r * n + p], a[r * n + q]);
        a[r * n + p] = c * ap - s * aq;
        a[r * n + q] = s * ap + c * aq;
    }
    // rows: Gᵀ·(A·G)
    for col in 0..n {
        let (bp, bq) = (a[p * n + col], a[q * n + col]);
        a[p * n + col] = c * bp - s * bq;
        a[q * n + col] = s * bp + c * bq;
    }
}
