//! Stride computation utilities.
//!
//! Uses row-major (C) order: the last axis is contiguous.

use std::fmt;
use std::ops::Index;

use crate::error::TensorError;
use crate::shape::{Axes, Shape};

/// Compute row-major strides from axis extents.
///
/// For extents [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use tnt::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), vec![1]);
/// ```
pub fn compute_strides(axes: &[usize]) -> Vec<usize> {
    row_major(axes).into_vec()
}

fn row_major(axes: &[usize]) -> Axes {
    if axes.is_empty() {
        return Axes::from_slice(&[1]);
    }

    let mut strides = Axes::from_elem(1, axes.len());
    for i in (0..axes.len() - 1).rev() {
        strides[i] = strides[i + 1] * axes[i + 1];
    }
    strides
}

/// Convert cartesian indices to a linear offset.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear offset to cartesian indices in row-major order.
pub fn linear_to_cartesian(mut linear: usize, axes: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; axes.len()];

    for (slot, &dim) in indices.iter_mut().zip(axes.iter()).rev() {
        *slot = linear % dim;
        linear /= dim;
    }

    indices
}

/// Per-axis element strides.
///
/// Views keep the stride of the tensor they were sliced from, so a
/// `Stride` need not be row-major for the view's own shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stride {
    strides: Axes,
}

impl Stride {
    /// Row-major strides for `shape`.
    ///
    /// ```
    /// use tnt::{Shape, Stride};
    ///
    /// let stride = Stride::from_shape(&Shape::new(&[2, 3]));
    /// assert_eq!(stride.as_slice(), &[3, 1]);
    /// ```
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            strides: row_major(shape.axes()),
        }
    }

    /// Strides given explicitly.
    pub fn new(strides: &[usize]) -> Self {
        Self {
            strides: Axes::from_slice(strides),
        }
    }

    #[inline]
    pub fn num_axes(&self) -> usize {
        self.strides.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.strides
    }

    /// Stride of axis `i`.
    pub fn get(&self, i: usize) -> Result<usize, TensorError> {
        crate::ensure_bounds!("tnt::Stride::get()", i, 0usize, self.num_axes());
        Ok(self.strides[i])
    }
}

impl From<&Shape> for Stride {
    fn from(shape: &Shape) -> Self {
        Self::from_shape(shape)
    }
}

impl Index<usize> for Stride {
    type Output = usize;

    fn index(&self, i: usize) -> &usize {
        if let Err(e) = self.get(i) {
            panic!("{e}");
        }
        &self.strides[i]
    }
}

impl fmt::Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stride: {{")?;
        for (i, s) in self.strides.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{s}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_compute_strides_3d() {
        assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
    }

    #[test]
    fn test_compute_strides_2d() {
        assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
    }

    #[test]
    fn test_compute_strides_empty() {
        assert_eq!(compute_strides(&[]), vec![1]);
    }

    #[test]
    fn test_cartesian_to_linear() {
        let strides = compute_strides(&[3, 4, 5]);
        // index [i, j, k] -> 20*i + 5*j + k
        assert_eq!(cartesian_to_linear(&[0, 0, 0], &strides), 0);
        assert_eq!(cartesian_to_linear(&[0, 0, 1], &strides), 1);
        assert_eq!(cartesian_to_linear(&[0, 1, 0], &strides), 5);
        assert_eq!(cartesian_to_linear(&[1, 0, 0], &strides), 20);
        assert_eq!(cartesian_to_linear(&[2, 3, 4], &strides), 2 * 20 + 3 * 5 + 4);
    }

    #[test]
    fn test_roundtrip() {
        let axes = [3, 4, 5];
        let strides = compute_strides(&axes);
        for linear in 0..60 {
            let cartesian = linear_to_cartesian(linear, &axes);
            assert_eq!(cartesian_to_linear(&cartesian, &strides), linear);
        }
    }

    #[test]
    fn test_stride_access() {
        let stride = Stride::from_shape(&Shape::new(&[2, 3, 4]));
        assert_eq!(stride[0], 12);
        assert_eq!(stride.get(2).unwrap(), 1);
        assert_eq!(stride.get(3).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
        assert_eq!(Stride::from_shape(&Shape::default()).as_slice(), &[1]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Stride::new(&[3, 1]).to_string(), "Stride: {3,1}");
    }
}
