//! Borrowed, strided windows into a tensor.
//!
//! A view carries its own [`Shape`], the [`Stride`] of the tensor it was cut
//! from, and an element offset into the parent's buffer. Slicing a view
//! composes offsets, so nested views address the original buffer directly.

use std::fmt;
use std::iter::FusedIterator;

use crate::error::TensorError;
use crate::index::Index;
use crate::operations::{self, resolve_window};
use crate::range::Range;
use crate::scalar::Element;
use crate::shape::Shape;
use crate::strides::Stride;
use crate::tensor::{Tensor, write_nested};

/// Iterator over the flat buffer offsets a view covers, in row-major order.
#[derive(Debug, Clone)]
pub struct Positions {
    index: Index,
    stride: Stride,
    offset: usize,
    remaining: usize,
}

impl Positions {
    fn new(shape: &Shape, stride: &Stride, offset: usize) -> Self {
        Self {
            index: Index::new(shape),
            stride: stride.clone(),
            offset,
            remaining: shape.total(),
        }
    }
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let position = self.offset + self.index.offset_unchecked(self.stride.as_slice());
        self.index.increment();
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Positions {}
impl FusedIterator for Positions {}

/// Strided element iterator of a [`TensorView`].
#[derive(Debug, Clone)]
pub struct TensorViewIter<'a, T: Element> {
    data: &'a [T],
    positions: Positions,
}

impl<'a, T: Element> Iterator for TensorViewIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let data = self.data;
        self.positions.next().map(|p| &data[p])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<T: Element> ExactSizeIterator for TensorViewIter<'_, T> {}
impl<T: Element> FusedIterator for TensorViewIter<'_, T> {}

/// Read-only view of a tensor region.
///
/// # Examples
///
/// ```
/// use tnt::{Range, Tensor};
///
/// let t = Tensor::from_vec((1..=9).collect::<Vec<i32>>(), [3, 3]).unwrap();
/// let corner = t.slice(&[Range::new(1, -1), Range::new(1, -1)]).unwrap();
/// assert_eq!(corner.shape().axes(), &[2, 2]);
/// assert_eq!(corner.iter().copied().collect::<Vec<_>>(), vec![5, 6, 8, 9]);
///
/// let row = corner.slice(&[Range::at(1), Range::full()]).unwrap();
/// assert_eq!(row.to_tensor().data(), &[8, 9]);
/// ```
#[derive(Debug, Clone)]
pub struct TensorView<'a, T: Element> {
    shape: Shape,
    stride: Stride,
    offset: usize,
    data: &'a [T],
}

impl<'a, T: Element> TensorView<'a, T> {
    pub(crate) fn new(shape: Shape, stride: Stride, offset: usize, data: &'a [T]) -> Self {
        Self {
            shape,
            stride,
            offset,
            data,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn stride(&self) -> &Stride {
        &self.stride
    }

    /// Offset of the first element in the parent buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole parent buffer.
    #[inline]
    pub fn buffer(&self) -> &'a [T] {
        self.data
    }

    /// Number of elements the view covers.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.total()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> Positions {
        Positions::new(&self.shape, &self.stride, self.offset)
    }

    pub fn iter(&self) -> TensorViewIter<'a, T> {
        TensorViewIter {
            data: self.data,
            positions: self.positions(),
        }
    }

    /// The element at the view's origin.
    ///
    /// # Errors
    ///
    /// `OutOfBoundsAccess` if the view covers no elements.
    pub fn scalar(&self) -> Result<T, TensorError> {
        crate::ensure_bounds!("tnt::TensorView::scalar()", 0usize, 0usize, self.len());
        Ok(self.data[self.offset])
    }

    /// Element at a multi-index relative to the view.
    pub fn get(&self, loc: &[usize]) -> Result<&'a T, TensorError> {
        let position = operations::view_position(&self.shape, &self.stride, self.offset, loc)?;
        crate::ensure_bounds!("tnt::TensorView::get()", position, 0usize, self.data.len());
        Ok(&self.data[position])
    }

    /// Narrow the view further. Ranges resolve against this view's shape.
    pub fn slice(&self, ranges: &[Range]) -> Result<TensorView<'a, T>, TensorError> {
        let window = resolve_window(
            &self.shape,
            &self.stride,
            self.offset,
            ranges,
            "tnt::TensorView::slice()",
        )?;
        Ok(TensorView::new(window.shape, self.stride.clone(), window.offset, self.data))
    }

    /// Copy the covered elements into a new contiguous tensor.
    pub fn to_tensor(&self) -> Tensor<T> {
        let mut out = Tensor::new(&self.shape);
        for (dst, &src) in out.data_mut().iter_mut().zip(self.iter()) {
            *dst = src;
        }
        out
    }

    /// Sum of the covered elements.
    pub fn sum(&self) -> T {
        operations::sum_of(self.iter().copied())
    }

    /// # Errors
    ///
    /// `InvalidParameter` if the view is empty.
    pub fn max(&self) -> Result<T, TensorError> {
        operations::max_of(self.iter().copied(), "tnt::TensorView::max()")
    }

    /// # Errors
    ///
    /// `InvalidParameter` if the view is empty.
    pub fn min(&self) -> Result<T, TensorError> {
        operations::min_of(self.iter().copied(), "tnt::TensorView::min()")
    }

    /// Arithmetic mean, computed in `f64`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the view is empty.
    pub fn mean(&self) -> Result<T, TensorError> {
        operations::mean_of(self.iter().copied(), "tnt::TensorView::mean()")
    }
}

impl<'a, T: Element> IntoIterator for &TensorView<'a, T> {
    type Item = &'a T;
    type IntoIter = TensorViewIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Element> PartialEq for TensorView<'_, T> {
    /// Views are equal when they address the same window of the same buffer.
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.stride == other.stride
            && self.offset == other.offset
            && std::ptr::eq(self.data, other.data)
    }
}

impl<T: Element> fmt::Display for TensorView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TensorView: {{")?;
        writeln!(f, "    {}", self.shape)?;
        writeln!(f, "    {}", self.stride)?;
        writeln!(f, "    Offset: {}", self.offset)?;
        writeln!(f, "    Type: {}", T::NAME)?;
        write!(f, "    Data: {{ ")?;
        write_nested(f, &self.shape, self.iter(), 12)?;
        writeln!(f)?;
        writeln!(f, "    }}")?;
        write!(f, "}}")
    }
}

/// Mutable view of a tensor region.
///
/// ```
/// use tnt::{Range, Tensor};
///
/// let mut t: Tensor<u8> = Tensor::new([3, 3]);
/// t.slice_mut(&[Range::full(), Range::at(1)]).unwrap().fill(7);
/// assert_eq!(t.data(), &[0, 7, 0, 0, 7, 0, 0, 7, 0]);
/// ```
#[derive(Debug)]
pub struct TensorViewMut<'a, T: Element> {
    shape: Shape,
    stride: Stride,
    offset: usize,
    data: &'a mut [T],
}

impl<'a, T: Element> TensorViewMut<'a, T> {
    pub(crate) fn new(shape: Shape, stride: Stride, offset: usize, data: &'a mut [T]) -> Self {
        Self {
            shape,
            stride,
            offset,
            data,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn stride(&self) -> &Stride {
        &self.stride
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn positions(&self) -> Positions {
        Positions::new(&self.shape, &self.stride, self.offset)
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> TensorView<'_, T> {
        TensorView::new(self.shape.clone(), self.stride.clone(), self.offset, &*self.data)
    }

    pub fn get_mut(&mut self, loc: &[usize]) -> Result<&mut T, TensorError> {
        let position = operations::view_position(&self.shape, &self.stride, self.offset, loc)?;
        crate::ensure_bounds!("tnt::TensorView::get()", position, 0usize, self.data.len());
        Ok(&mut self.data[position])
    }

    pub fn set(&mut self, loc: &[usize], value: T) -> Result<(), TensorError> {
        *self.get_mut(loc)? = value;
        Ok(())
    }

    /// Narrow the view, reborrowing it mutably.
    pub fn slice_mut(&mut self, ranges: &[Range]) -> Result<TensorViewMut<'_, T>, TensorError> {
        let window = resolve_window(
            &self.shape,
            &self.stride,
            self.offset,
            ranges,
            "tnt::TensorView::slice()",
        )?;
        Ok(TensorViewMut::new(
            window.shape,
            self.stride.clone(),
            window.offset,
            &mut *self.data,
        ))
    }

    /// Set every covered element to `value`.
    pub fn fill(&mut self, value: T) {
        for p in self.positions() {
            self.data[p] = value;
        }
    }

    /// Apply `f` to every covered element in row-major order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for p in self.positions() {
            f(&mut self.data[p]);
        }
    }

    /// Copy values from `src` into the covered elements.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the shapes differ.
    pub fn assign(&mut self, src: &TensorView<'_, T>) -> Result<(), TensorError> {
        crate::ensure!(
            self.shape == src.shape,
            InvalidParameter,
            "tnt::TensorViewMut::assign()",
            "Cannot assign a view of {} to a view of {}",
            src.shape,
            self.shape
        );
        for (p, &v) in self.positions().zip(src.iter()) {
            self.data[p] = v;
        }
        Ok(())
    }

    pub fn to_tensor(&self) -> Tensor<T> {
        self.as_view().to_tensor()
    }
}

impl<T: Element> fmt::Display for TensorViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_view().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ranges;

    fn grid() -> Tensor<i32> {
        Tensor::from_vec((1..=9).collect(), [3, 3]).unwrap()
    }

    fn values<T: Element>(view: &TensorView<'_, T>) -> Vec<T> {
        view.iter().copied().collect()
    }

    #[test]
    fn test_row_slice() {
        let t = grid();
        let row = t.slice(&ranges![0, Range::new(0, -1)]).unwrap();
        assert_eq!(row.shape().axes(), &[1, 3]);
        assert_eq!(values(&row), vec![1, 2, 3]);
    }

    #[test]
    fn test_column_slice() {
        let t = grid();
        let col = t.slice(&ranges![Range::full(), 1]).unwrap();
        assert_eq!(col.shape().axes(), &[3, 1]);
        assert_eq!(values(&col), vec![2, 5, 8]);
    }

    #[test]
    fn test_nested_slice() {
        let t = grid();
        let corner = t.slice(&ranges![Range::new(1, -1), Range::new(1, -1)]).unwrap();
        assert_eq!(values(&corner), vec![5, 6, 8, 9]);
        let row = corner.slice(&ranges![1, Range::full()]).unwrap();
        assert_eq!(row.shape().axes(), &[1, 2]);
        assert_eq!(values(&row), vec![8, 9]);
        assert_eq!(row.offset(), 7);
    }

    #[test]
    fn test_missing_axes_are_full() {
        let t = grid();
        let view = t.slice(&ranges![2]).unwrap();
        assert_eq!(values(&view), vec![7, 8, 9]);
    }

    #[test]
    fn test_slice_errors() {
        let t = grid();
        assert_eq!(
            t.slice(&ranges![0, 0, 0]).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            t.slice(&ranges![Range::new(0, 5)]).unwrap_err().kind(),
            ErrorKind::OutOfBoundsAccess
        );
        assert_eq!(
            t.slice(&ranges![Range::new(2, 1)]).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_scalar_and_reductions() {
        let t = grid();
        let view = t.slice(&ranges![Range::new(1, -1), Range::new(1, -1)]).unwrap();
        assert_eq!(view.scalar().unwrap(), 5);
        assert_eq!(view.sum(), 28);
        assert_eq!(view.max().unwrap(), 9);
        assert_eq!(view.min().unwrap(), 5);
        assert_eq!(view.mean().unwrap(), 7);

        let empty: Tensor<f32> = Tensor::default();
        assert_eq!(
            empty.view().scalar().unwrap_err().kind(),
            ErrorKind::OutOfBoundsAccess
        );
    }

    #[test]
    fn test_scalar_of_empty_window() {
        let t = grid();
        let rows = t.slice(&ranges![Range::new(1, 1)]).unwrap();
        assert_eq!(rows.shape().axes(), &[0, 3]);
        assert_eq!(rows.scalar().unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
    }

    #[test]
    fn test_view_equality_is_identity() {
        let a = grid();
        let b = grid();
        assert_eq!(a.view(), a.view());
        assert_ne!(a.view(), b.view());
        assert_ne!(a.slice(&ranges![0]).unwrap(), a.slice(&ranges![1]).unwrap());
    }

    #[test]
    fn test_assign_and_fill() {
        let src = grid();
        let mut dst: Tensor<i32> = Tensor::new([3, 3]);
        {
            let from = src.slice(&ranges![Range::full(), 0]).unwrap();
            let mut to = dst.slice_mut(&ranges![Range::full(), 2]).unwrap();
            to.assign(&from).unwrap();
        }
        assert_eq!(dst.data(), &[0, 0, 1, 0, 0, 4, 0, 0, 7]);

        dst.slice_mut(&ranges![1]).unwrap().fill(-1);
        assert_eq!(dst.data(), &[0, 0, 1, -1, -1, -1, 0, 0, 7]);

        let mut row = dst.slice_mut(&ranges![0]).unwrap();
        let err = row.assign(&src.view()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_positions() {
        let t: Tensor<u8> = Tensor::new([2, 3]);
        let view = t.slice(&ranges![Range::full(), Range::new(1, -1)]).unwrap();
        assert_eq!(view.positions().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
        assert_eq!(view.iter().len(), 4);
    }

    #[test]
    fn test_view_get() {
        let t = grid();
        let view = t.slice(&ranges![Range::new(1, -1), Range::new(0, 2)]).unwrap();
        assert_eq!(*view.get(&[1, 1]).unwrap(), 8);
        assert_eq!(view.get(&[2, 0]).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
    }
}
