//! Reductions over whole tensors, views and single axes.

use std::cmp::Ordering;

use crate::error::TensorError;
use crate::scalar::Element;
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Wrapping sum; 0 for an empty input.
pub(crate) fn sum_of<T: Element>(values: impl Iterator<Item = T>) -> T {
    values.fold(T::zero(), T::wrapping_add)
}

fn extreme_of<T: Element>(
    mut values: impl Iterator<Item = T>,
    function: &'static str,
    replace: impl Fn(T, T) -> bool,
) -> Result<T, TensorError> {
    let Some(first) = values.next() else {
        return Err(crate::tensor_error!(
            InvalidParameter,
            function,
            "Cannot reduce an empty tensor"
        ));
    };
    Ok(values.fold(first, |best, v| if replace(v, best) { v } else { best }))
}

pub(crate) fn max_of<T: Element>(
    values: impl Iterator<Item = T>,
    function: &'static str,
) -> Result<T, TensorError> {
    extreme_of(values, function, |v, best| v > best)
}

pub(crate) fn min_of<T: Element>(
    values: impl Iterator<Item = T>,
    function: &'static str,
) -> Result<T, TensorError> {
    extreme_of(values, function, |v, best| v < best)
}

/// Mean accumulated in `f64` and converted back with `as` semantics.
pub(crate) fn mean_of<T: Element>(
    values: impl Iterator<Item = T>,
    function: &'static str,
) -> Result<T, TensorError> {
    let (sum, count) = values.fold((0.0f64, 0usize), |(s, n), v| (s + v.to_f64(), n + 1));
    if count == 0 {
        return Err(crate::tensor_error!(
            InvalidParameter,
            function,
            "Cannot reduce an empty tensor"
        ));
    }
    Ok(T::from_f64(sum / count as f64))
}

impl<T: Element> Tensor<T> {
    /// Sum of all elements, wrapping for integers.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// assert_eq!(Tensor::arange(1, 4, 1).unwrap().sum(), 10);
    /// ```
    pub fn sum(&self) -> T {
        sum_of(self.iter().copied())
    }

    /// Largest element.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the tensor is empty.
    pub fn max(&self) -> Result<T, TensorError> {
        max_of(self.iter().copied(), "tnt::max()")
    }

    /// Smallest element.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the tensor is empty.
    pub fn min(&self) -> Result<T, TensorError> {
        min_of(self.iter().copied(), "tnt::min()")
    }

    /// Arithmetic mean, computed in `f64`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the tensor is empty.
    pub fn mean(&self) -> Result<T, TensorError> {
        mean_of(self.iter().copied(), "tnt::mean()")
    }

    /// Middle element in sorted order; the mean of the two middle elements
    /// for an even count.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the tensor is empty.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![4.0, 1.0, 3.0, 2.0], [4]).unwrap();
    /// assert_eq!(t.median().unwrap(), 2.5);
    /// ```
    pub fn median(&self) -> Result<T, TensorError> {
        crate::ensure!(
            !self.is_empty(),
            InvalidParameter,
            "tnt::median()",
            "Cannot reduce an empty tensor"
        );
        let mut sorted = self.data().to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            Ok(sorted[mid])
        } else {
            Ok(T::from_f64((sorted[mid - 1].to_f64() + sorted[mid].to_f64()) / 2.0))
        }
    }

    /// Sum along `axis`, dropping it from the shape.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
    /// assert_eq!(t.sum_axis(0).unwrap().data(), &[5, 7, 9]);
    /// assert_eq!(t.sum_axis(1).unwrap().data(), &[6, 15]);
    /// ```
    pub fn sum_axis(&self, axis: usize) -> Result<Tensor<T>, TensorError> {
        self.reduce_axis(axis, "tnt::sum()", |lane| Ok(sum_of(lane)))
    }

    /// Maximum along `axis`.
    ///
    /// # Errors
    ///
    /// `OutOfBoundsAccess` for a bad axis, `InvalidParameter` if the axis is
    /// empty.
    pub fn max_axis(&self, axis: usize) -> Result<Tensor<T>, TensorError> {
        self.reduce_axis(axis, "tnt::max()", |lane| max_of(lane, "tnt::max()"))
    }

    pub fn min_axis(&self, axis: usize) -> Result<Tensor<T>, TensorError> {
        self.reduce_axis(axis, "tnt::min()", |lane| min_of(lane, "tnt::min()"))
    }

    pub fn mean_axis(&self, axis: usize) -> Result<Tensor<T>, TensorError> {
        self.reduce_axis(axis, "tnt::mean()", |lane| mean_of(lane, "tnt::mean()"))
    }

    /// Apply `reduce` to every lane along `axis`.
    ///
    /// Reducing the only axis of a rank-1 tensor yields shape `{1}`.
    fn reduce_axis<F>(&self, axis: usize, function: &'static str, reduce: F) -> Result<Tensor<T>, TensorError>
    where
        F: Fn(&mut dyn Iterator<Item = T>) -> Result<T, TensorError>,
    {
        crate::ensure_bounds!(function, axis, 0usize, self.num_axes());

        let axes = self.shape().axes();
        let outer: usize = axes[..axis].iter().product();
        let extent = axes[axis];
        let inner: usize = axes[axis + 1..].iter().product();

        let mut shape = self.shape().without_axis(axis);
        if shape.num_axes() == 0 {
            shape = Shape::new(&[1]);
        }

        let data = self.data();
        let mut out = Tensor::new(shape);
        let dst = out.data_mut();
        for o in 0..outer {
            for i in 0..inner {
                let base = o * extent * inner + i;
                let mut lane = (0..extent).map(|a| data[base + a * inner]);
                dst[o * inner + i] = reduce(&mut lane)?;
            }
        }
        Ok(out)
    }
}
