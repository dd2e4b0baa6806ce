//! Tensor shape.

use std::fmt;
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::error::TensorError;

/// Inline storage for per-axis values.
pub(crate) type Axes = SmallVec<[usize; 6]>;

/// Ordered list of axis extents.
///
/// A `Shape` with no axes describes an empty tensor: its [`total`](Self::total)
/// is 0, not 1.
///
/// Mutating a shape with [`set`](Self::set) never resizes a buffer that was
/// already allocated from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    axes: Axes,
}

impl Shape {
    /// Create a shape from axis extents.
    ///
    /// ```
    /// use tnt::Shape;
    ///
    /// let shape = Shape::new(&[2, 3, 4]);
    /// assert_eq!(shape.num_axes(), 3);
    /// assert_eq!(shape.total(), 24);
    /// ```
    pub fn new(axes: &[usize]) -> Self {
        Self {
            axes: axes.iter().copied().collect(),
        }
    }

    /// Number of axes.
    #[inline]
    pub fn num_axes(&self) -> usize {
        self.axes.len()
    }

    /// Axis extents as a slice.
    #[inline]
    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    /// Product of all extents, or 0 for a shape with no axes.
    #[inline]
    pub fn total(&self) -> usize {
        if self.axes.is_empty() {
            0
        } else {
            self.axes.iter().product()
        }
    }

    /// Product of the extents in `[from, to)`.
    ///
    /// `to = None` means "up to `num_axes()`". An empty range yields 1.
    ///
    /// # Errors
    ///
    /// - `OutOfBoundsAccess` if `from` is not in `[0, num_axes)` or `to` is not
    ///   in `[0, num_axes]`.
    /// - `InvalidParameter` if `from > to`.
    ///
    /// ```
    /// use tnt::Shape;
    ///
    /// let shape = Shape::new(&[1, 2, 3, 4, 5, 6]);
    /// assert_eq!(shape.total_range(2, None).unwrap(), 360);
    /// assert_eq!(shape.total_range(0, Some(1)).unwrap(), 1);
    /// assert!(shape.total_range(6, None).is_err());
    /// ```
    pub fn total_range(&self, from: usize, to: Option<usize>) -> Result<usize, TensorError> {
        let n = self.num_axes();
        let to = to.unwrap_or(n);
        crate::ensure_bounds!("tnt::Shape::total()", from, 0usize, n);
        crate::ensure_bounds!("tnt::Shape::total()", to, 0usize, n + 1);
        crate::ensure!(
            from <= to,
            InvalidParameter,
            "tnt::Shape::total()",
            "Start axis {from} is past end axis {to}"
        );
        Ok(self.axes[from..to].iter().product())
    }

    /// Extent of axis `i`.
    pub fn get(&self, i: usize) -> Result<usize, TensorError> {
        crate::ensure_bounds!("tnt::Shape::get()", i, 0usize, self.num_axes());
        Ok(self.axes[i])
    }

    /// Overwrite the extent of axis `i`.
    pub fn set(&mut self, i: usize, extent: usize) -> Result<(), TensorError> {
        crate::ensure_bounds!("tnt::Shape::set()", i, 0usize, self.num_axes());
        self.axes[i] = extent;
        Ok(())
    }

    /// Append an axis.
    pub fn push(&mut self, extent: usize) {
        self.axes.push(extent);
    }

    /// Shape with axis `axis` removed.
    pub(crate) fn without_axis(&self, axis: usize) -> Self {
        Self {
            axes: self
                .axes
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != axis)
                .map(|(_, &d)| d)
                .collect(),
        }
    }
}

impl From<&Shape> for Shape {
    fn from(shape: &Shape) -> Self {
        shape.clone()
    }
}

impl From<&[usize]> for Shape {
    fn from(axes: &[usize]) -> Self {
        Self::new(axes)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(axes: [usize; N]) -> Self {
        Self::new(&axes)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(axes: Vec<usize>) -> Self {
        Self {
            axes: SmallVec::from_vec(axes),
        }
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            axes: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Shape {
    type Output = usize;

    fn index(&self, i: usize) -> &usize {
        if let Err(e) = self.get(i) {
            panic!("{e}");
        }
        &self.axes[i]
    }
}

impl IndexMut<usize> for Shape {
    fn index_mut(&mut self, i: usize) -> &mut usize {
        if let Err(e) = self.get(i) {
            panic!("{e}");
        }
        &mut self.axes[i]
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape: {{")?;
        for (i, d) in self.axes.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_total() {
        let shape = Shape::new(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(shape.total(), 720);
        assert_eq!(shape.total_range(0, None).unwrap(), 720);
        assert_eq!(shape.total_range(2, None).unwrap(), 360);
        assert_eq!(shape.total_range(0, Some(1)).unwrap(), 1);
        assert_eq!(shape.total_range(2, Some(4)).unwrap(), 12);
    }

    #[test]
    fn test_total_empty() {
        assert_eq!(Shape::default().total(), 0);
        assert_eq!(Shape::new(&[3, 0, 2]).total(), 0);
        assert_eq!(Shape::new(&[3]).total_range(0, Some(0)).unwrap(), 1);
    }

    #[test]
    fn test_total_errors() {
        let shape = Shape::new(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(shape.total_range(6, None).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
        assert_eq!(shape.total_range(2, Some(7)).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
        assert_eq!(shape.total_range(3, Some(2)).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_index_access() {
        let mut shape = Shape::new(&[2, 3]);
        assert_eq!(shape[1], 3);
        shape[1] = 5;
        assert_eq!(shape.get(1).unwrap(), 5);
        shape.set(0, 7).unwrap();
        assert_eq!(shape.axes(), &[7, 5]);
        assert_eq!(shape.get(2).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
    }

    #[test]
    fn test_errors_name_the_accessor() {
        let mut shape = Shape::new(&[2, 3]);
        assert_eq!(shape.get(2).unwrap_err().function(), "tnt::Shape::get()");
        assert_eq!(shape.set(2, 1).unwrap_err().function(), "tnt::Shape::set()");
    }

    #[test]
    #[should_panic(expected = "Out of bounds access")]
    fn test_index_panics() {
        let shape = Shape::new(&[2, 3]);
        let _ = shape[2];
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::new(&[1, 2, 3]).to_string(), "Shape: {1x2x3}");
        assert_eq!(Shape::default().to_string(), "Shape: {}");
    }

    #[test]
    fn test_without_axis() {
        assert_eq!(Shape::new(&[2, 3, 4]).without_axis(1), Shape::new(&[2, 4]));
    }
}
