//! Owning, contiguous, row-major N-dimensional tensor.

use std::fmt;
use std::ops::{Index as IndexOp, IndexMut};

use crate::error::TensorError;
use crate::range::Range;
use crate::scalar::Element;
use crate::shape::Shape;
use crate::storage::AlignedPtr;
use crate::strides::{Stride, cartesian_to_linear};
use crate::view::{TensorView, TensorViewMut};

/// A dense tensor: a [`Shape`] plus an [`AlignedPtr`] of `shape.total()`
/// elements in row-major order.
///
/// The default tensor has no axes and a null buffer.
///
/// # Examples
///
/// ```
/// use tnt::{Shape, Tensor};
///
/// let mut t: Tensor<i32> = Tensor::new([2, 3]);
/// t.set(&[1, 2], 7).unwrap();
/// assert_eq!(t.data(), &[0, 0, 0, 0, 0, 7]);
/// assert_eq!(t.shape(), &Shape::new(&[2, 3]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tensor<T: Element> {
    shape: Shape,
    data: AlignedPtr<T>,
}

impl<T: Element> Tensor<T> {
    /// Zero-filled tensor of the given shape.
    pub fn new(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let data = AlignedPtr::new(shape.total());
        Self { shape, data }
    }

    /// Adopt an existing buffer.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `data.len() != shape.total()`.
    pub fn from_buffer(shape: impl Into<Shape>, data: AlignedPtr<T>) -> Result<Self, TensorError> {
        let shape = shape.into();
        crate::ensure!(
            data.len() == shape.total(),
            InvalidParameter,
            "tnt::Tensor::from_buffer()",
            "Buffer holds {} elements but {} needs {}",
            data.len(),
            shape,
            shape.total()
        );
        Ok(Self { shape, data })
    }

    /// Tensor from row-major data.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `data.len() != shape.total()`.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]).unwrap();
    /// assert_eq!(*t.get(&[0, 1]).unwrap(), 2.0);
    /// assert_eq!(*t.get(&[1, 0]).unwrap(), 4.0);
    /// ```
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self, TensorError> {
        Self::from_buffer(shape, AlignedPtr::from_slice(&data))
    }

    /// Tensor with every element set to `value`.
    pub fn full(shape: impl Into<Shape>, value: T) -> Self {
        let shape = shape.into();
        let data = AlignedPtr::filled(shape.total(), value);
        Self { shape, data }
    }

    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::new(shape)
    }

    pub fn ones(shape: impl Into<Shape>) -> Self {
        Self::full(shape, T::one())
    }

    /// Zero tensor with the shape of `self`.
    pub fn zeros_like(&self) -> Self {
        Self::new(&self.shape)
    }

    /// Tensor of ones with the shape of `self`.
    pub fn ones_like(&self) -> Self {
        Self::ones(&self.shape)
    }

    /// Rank-2 tensor with ones on the main diagonal.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless `shape` has exactly two axes.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let eye = Tensor::<u8>::identity([2, 3]).unwrap();
    /// assert_eq!(eye.data(), &[1, 0, 0, 0, 1, 0]);
    /// assert!(Tensor::<u8>::identity([2]).is_err());
    /// ```
    pub fn identity(shape: impl Into<Shape>) -> Result<Self, TensorError> {
        let shape = shape.into();
        crate::ensure!(
            shape.num_axes() == 2,
            InvalidParameter,
            "tnt::identity()",
            "Can only make the identity of a 2 dimensional tensor, got {}",
            shape
        );
        let (rows, cols) = (shape.axes()[0], shape.axes()[1]);
        let mut tensor = Self::new(shape);
        for i in 0..rows.min(cols) {
            tensor.data[i * cols + i] = T::one();
        }
        Ok(tensor)
    }

    /// Inclusive arithmetic progression `begin, begin + step, ...` of length
    /// `floor((end - begin) / step) + 1`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `end <= begin` or `step <= 0`.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let t = Tensor::arange(0, 10, 3).unwrap();
    /// assert_eq!(t.data(), &[0, 3, 6, 9]);
    /// ```
    pub fn arange(begin: T, end: T, step: T) -> Result<Self, TensorError> {
        crate::ensure!(
            end > begin,
            InvalidParameter,
            "tnt::arange()",
            "End must be greater than start. End: {end} Begin: {begin}"
        );
        crate::ensure!(
            step > T::zero(),
            InvalidParameter,
            "tnt::arange()",
            "Step must be positive, got {step}"
        );

        let len = ((end.to_f64() - begin.to_f64()) / step.to_f64()).floor() as usize + 1;
        let mut tensor = Self::new([len]);
        let mut value = begin;
        for slot in tensor.data.as_mut_slice() {
            *slot = value;
            value = value.wrapping_add(step);
        }
        Ok(tensor)
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Row-major strides of this tensor.
    #[inline]
    pub fn stride(&self) -> Stride {
        Stride::from_shape(&self.shape)
    }

    #[inline]
    pub fn num_axes(&self) -> usize {
        self.shape.num_axes()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The backing buffer.
    #[inline]
    pub fn buffer(&self) -> &AlignedPtr<T> {
        &self.data
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        self.data.as_slice()
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        self.data.as_mut_slice()
    }

    #[inline]
    pub(crate) fn padded(&self) -> &[T] {
        self.data.padded()
    }

    #[inline]
    pub(crate) fn padded_mut(&mut self) -> &mut [T] {
        self.data.padded_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data_mut().iter_mut()
    }

    /// The first element, for tensors used as scalars.
    ///
    /// # Errors
    ///
    /// `OutOfBoundsAccess` if the tensor holds no elements.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// assert_eq!(Tensor::full([1], 4.5f32).scalar().unwrap(), 4.5);
    /// assert!(Tensor::<f32>::default().scalar().is_err());
    /// ```
    pub fn scalar(&self) -> Result<T, TensorError> {
        self.data.get(0).copied()
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    fn linear_offset(&self, loc: &[usize], function: &'static str) -> Result<usize, TensorError> {
        crate::ensure!(
            loc.len() == self.num_axes(),
            InvalidParameter,
            function,
            "Got {} indices for a tensor with {} axes",
            loc.len(),
            self.num_axes()
        );
        for (&i, &extent) in loc.iter().zip(self.shape.axes()) {
            crate::ensure_bounds!(function, i, 0usize, extent);
        }
        let offset = cartesian_to_linear(loc, self.stride().as_slice());
        crate::ensure_bounds!(function, offset, 0usize, self.len());
        Ok(offset)
    }

    /// Element at a multi-index.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` on an axis-count mismatch, `OutOfBoundsAccess` if
    /// any coordinate is past its extent.
    pub fn get(&self, loc: &[usize]) -> Result<&T, TensorError> {
        let offset = self.linear_offset(loc, "tnt::Tensor::get()")?;
        self.data.get(offset)
    }

    pub fn get_mut(&mut self, loc: &[usize]) -> Result<&mut T, TensorError> {
        let offset = self.linear_offset(loc, "tnt::Tensor::get()")?;
        self.data.get_mut(offset)
    }

    pub fn set(&mut self, loc: &[usize], value: T) -> Result<(), TensorError> {
        *self.get_mut(loc)? = value;
        Ok(())
    }

    /// Move the contents out, leaving an empty default tensor.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Elementwise conversion with `as` semantics.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.7f32, -2.2, 300.0], [3]).unwrap();
    /// assert_eq!(t.cast::<i16>().data(), &[1, -2, 300]);
    /// ```
    pub fn cast<U: Element>(&self) -> Tensor<U> {
        let mut out = Tensor::new(&self.shape);
        for (dst, &src) in out.data.as_mut_slice().iter_mut().zip(self.data()) {
            *dst = src.cast();
        }
        out
    }

    /// Replace the shape without touching the data.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the element count would change.
    pub fn reshape(&mut self, shape: impl Into<Shape>) -> Result<(), TensorError> {
        let shape = shape.into();
        crate::ensure!(
            shape.total() == self.shape.total(),
            InvalidParameter,
            "tnt::Tensor::reshape()",
            "Cannot reshape {} elements into {}",
            self.shape.total(),
            shape
        );
        self.shape = shape;
        Ok(())
    }

    /// Matrix transpose.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless the tensor has exactly two axes.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
    /// let tt = t.transpose().unwrap();
    /// assert_eq!(tt.shape().axes(), &[3, 2]);
    /// assert_eq!(tt.data(), &[1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn transpose(&self) -> Result<Self, TensorError> {
        crate::ensure!(
            self.num_axes() == 2,
            InvalidParameter,
            "tnt::Tensor::transpose()",
            "Can only transpose a 2 dimensional tensor, got {}",
            self.shape
        );
        let (rows, cols) = (self.shape.axes()[0], self.shape.axes()[1]);
        let src = self.data();
        let mut out = Self::new([cols, rows]);
        let dst = out.data.as_mut_slice();
        for i in 0..rows {
            for j in 0..cols {
                dst[j * rows + i] = src[i * cols + j];
            }
        }
        Ok(out)
    }

    /// Matrix product, see [`matrix_multiply`](crate::linalg::matrix_multiply).
    pub fn matmul(&self, rhs: &Self) -> Result<Self, TensorError> {
        crate::linalg::matrix_multiply(self, rhs)
    }

    /// View of the whole tensor.
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView::new(self.shape.clone(), self.stride(), 0, self.data())
    }

    pub fn view_mut(&mut self) -> TensorViewMut<'_, T> {
        let shape = self.shape.clone();
        let stride = self.stride();
        TensorViewMut::new(shape, stride, 0, self.data.as_mut_slice())
    }

    /// Borrow a window of the tensor.
    ///
    /// Missing trailing ranges cover the whole axis. Negative bounds count
    /// from the end: `v < 0` resolves to `extent + v + 1`.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if there are more ranges than axes, or a range
    ///   resolves to `begin > end`.
    /// - `OutOfBoundsAccess` if a resolved bound lies outside `[0, extent]`.
    ///
    /// ```
    /// use tnt::{Range, Tensor};
    ///
    /// let t = Tensor::from_vec((1..=9).collect(), [3, 3]).unwrap();
    /// let column = t.slice(&[Range::full(), Range::at(1)]).unwrap();
    /// assert_eq!(column.to_tensor().data(), &[2, 5, 8]);
    /// ```
    pub fn slice(&self, ranges: &[Range]) -> Result<TensorView<'_, T>, TensorError> {
        self.view().slice(ranges)
    }

    /// Mutably borrow a window of the tensor. Ranges resolve as in
    /// [`slice`](Self::slice).
    pub fn slice_mut(&mut self, ranges: &[Range]) -> Result<TensorViewMut<'_, T>, TensorError> {
        let window = crate::operations::resolve_window(
            &self.shape,
            &self.stride(),
            0,
            ranges,
            "tnt::Tensor::slice()",
        )?;
        let stride = self.stride();
        Ok(TensorViewMut::new(
            window.shape,
            stride,
            window.offset,
            self.data.as_mut_slice(),
        ))
    }
}

impl<T: Element> PartialEq for Tensor<T> {
    /// Same shape and byte-identical data.
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.data == other.data
    }
}

impl<T: Element> IndexOp<&[usize]> for Tensor<T> {
    type Output = T;

    fn index(&self, loc: &[usize]) -> &T {
        match self.get(loc) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Element> IndexMut<&[usize]> for Tensor<T> {
    fn index_mut(&mut self, loc: &[usize]) -> &mut T {
        match self.get_mut(loc) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Element, const N: usize> IndexOp<[usize; N]> for Tensor<T> {
    type Output = T;

    fn index(&self, loc: [usize; N]) -> &T {
        &self[&loc[..]]
    }
}

impl<T: Element, const N: usize> IndexMut<[usize; N]> for Tensor<T> {
    fn index_mut(&mut self, loc: [usize; N]) -> &mut T {
        &mut self[&loc[..]]
    }
}

impl<'a, T: Element> IntoIterator for &'a Tensor<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Write `data` as nested brackets, one innermost row per line.
pub(crate) fn write_nested<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    shape: &Shape,
    data: impl Iterator<Item = T>,
    indent: usize,
) -> fmt::Result {
    let axes = shape.axes();
    let total = shape.total();
    if total == 0 {
        return write!(f, "{}", "[]".repeat(axes.len().max(1)));
    }

    // Element counts of the trailing sub-blocks, innermost first.
    let mut blocks = Vec::with_capacity(axes.len());
    let mut size = 1;
    for &extent in axes.iter().rev() {
        size *= extent;
        blocks.push(size);
    }

    write!(f, "{}", "[".repeat(axes.len()))?;
    for (i, v) in data.enumerate() {
        write!(f, "{v}")?;
        let closed = blocks.iter().take_while(|&&b| (i + 1) % b == 0).count();
        write!(f, "{}", "]".repeat(closed))?;
        if i + 1 < total {
            write!(f, ", ")?;
            if closed > 0 {
                write!(f, "{}", "\n".repeat(closed))?;
                write!(f, "{}", " ".repeat(indent + axes.len() - closed))?;
                write!(f, "{}", "[".repeat(closed))?;
            }
        }
    }
    Ok(())
}

impl<T: Element> fmt::Display for Tensor<T> {
    /// ```text
    /// Tensor: {
    ///     Shape: {2x2}
    ///     Type: f32
    ///     Data: { [[1, 2],
    ///               [3, 4]]
    ///     }
    /// }
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tensor: {{")?;
        writeln!(f, "    {}", self.shape)?;
        writeln!(f, "    Type: {}", T::NAME)?;
        write!(f, "    Data: {{ ")?;
        write_nested(f, &self.shape, self.iter(), 12)?;
        writeln!(f)?;
        writeln!(f, "    }}")?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_is_empty() {
        let t: Tensor<f32> = Tensor::default();
        assert_eq!(t.shape(), &Shape::default());
        assert!(t.buffer().is_null());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn test_new_zero_filled() {
        let t: Tensor<u16> = Tensor::new([2, 3, 4]);
        assert_eq!(t.len(), 24);
        assert!(t.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_from_buffer_size_mismatch() {
        let err = Tensor::from_buffer([2, 2], AlignedPtr::<i8>::new(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(Tensor::from_buffer([3], AlignedPtr::<i8>::new(3)).is_ok());
    }

    #[test]
    fn test_clone_is_deep() {
        let a = Tensor::full([3], 2i32);
        let mut b = a.clone();
        b.fill(5);
        assert_eq!(a.data(), &[2, 2, 2]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_take_leaves_default() {
        let mut a = Tensor::ones([2, 2]);
        let b: Tensor<f64> = a.take();
        assert_eq!(a, Tensor::default());
        assert_eq!(b.data(), &[1.0; 4]);
    }

    #[test]
    fn test_identity() {
        let eye = Tensor::<i32>::identity([3, 3]).unwrap();
        assert_eq!(eye.data(), &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
        let wide = Tensor::<f32>::identity([3, 5]).unwrap();
        assert_eq!(wide.iter().filter(|&&v| v == 1.0).count(), 3);
        assert_eq!(Tensor::<u8>::identity([1]).unwrap_err().kind(), ErrorKind::InvalidParameter);
        assert_eq!(
            Tensor::<u8>::identity([2, 2, 2]).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_arange() {
        assert_eq!(Tensor::arange(1u8, 5, 1).unwrap().data(), &[1, 2, 3, 4, 5]);
        assert_eq!(Tensor::arange(0.0f64, 1.0, 0.25).unwrap().len(), 5);
        assert!(Tensor::arange(5i32, 5, 1).is_err());
        assert!(Tensor::arange(0i32, 5, 0).is_err());
    }

    #[test]
    fn test_get_set() {
        let mut t: Tensor<i64> = Tensor::new([2, 3]);
        t.set(&[1, 1], 9).unwrap();
        t[[0, 2]] = 4;
        assert_eq!(t.data(), &[0, 0, 4, 0, 9, 0]);
        assert_eq!(t.get(&[2, 0]).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
        assert_eq!(t.get(&[0]).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_reshape() {
        let mut t: Tensor<u32> = Tensor::arange(0, 5, 1).unwrap();
        t.reshape([2, 3]).unwrap();
        assert_eq!(t.shape().axes(), &[2, 3]);
        assert_eq!(t.reshape([4]).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_transpose() {
        let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
        let tt = t.transpose().unwrap();
        assert_eq!(tt.data(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(tt.transpose().unwrap(), t);
        assert!(Tensor::<i32>::new([2, 2, 2]).transpose().is_err());
    }

    #[test]
    fn test_scalar() {
        assert_eq!(Tensor::full([2, 2], 3u64).scalar().unwrap(), 3);
        assert_eq!(
            Tensor::<u64>::default().scalar().unwrap_err().kind(),
            ErrorKind::OutOfBoundsAccess
        );
    }

    #[test]
    fn test_display() {
        let t = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], [2, 2]).unwrap();
        let expected = format!(
            "Tensor: {{\n    Shape: {{2x2}}\n    Type: f32\n    Data: {{ [[1, 2],\n{}[3, 4]]\n    }}\n}}",
            " ".repeat(13)
        );
        assert_eq!(t.to_string(), expected);
    }
}
