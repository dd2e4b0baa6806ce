//! Multi-axis cursor with odometer increment.

use std::fmt;
use std::ops::Index as IndexOp;

use crate::error::TensorError;
use crate::shape::{Axes, Shape};
use crate::strides::Stride;

/// A position inside a [`Shape`].
///
/// Incrementing advances the last axis first and carries into earlier axes.
/// Carrying out of axis 0 leaves `loc[0] == shape[0]` with every other axis
/// at 0; that state is the one-past-the-end sentinel.
///
/// ```
/// use tnt::{Index, Shape};
///
/// let mut index = Index::new(&Shape::new(&[2, 2]));
/// index.increment();
/// assert_eq!(index.loc(), &[0, 1]);
/// index.increment();
/// assert_eq!(index.loc(), &[1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Index {
    loc: Axes,
    shape: Shape,
}

impl Index {
    /// Index at the origin of `shape`.
    pub fn new(shape: &Shape) -> Self {
        Self {
            loc: Axes::from_elem(0, shape.num_axes()),
            shape: shape.clone(),
        }
    }

    /// Index at an explicit location.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `loc` and `shape` have different axis counts.
    pub fn with_loc(shape: &Shape, loc: &[usize]) -> Result<Self, TensorError> {
        crate::ensure!(
            loc.len() == shape.num_axes(),
            InvalidParameter,
            "tnt::Index::with_loc()",
            "Location has {} axes but shape has {}",
            loc.len(),
            shape.num_axes()
        );
        Ok(Self {
            loc: Axes::from_slice(loc),
            shape: shape.clone(),
        })
    }

    /// The one-past-the-end index of `shape`.
    pub fn end(shape: &Shape) -> Self {
        let mut index = Self::new(shape);
        if let Some(first) = index.loc.first_mut() {
            *first = shape.axes()[0];
        }
        index
    }

    #[inline]
    pub fn loc(&self) -> &[usize] {
        &self.loc
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Coordinate on axis `i`.
    pub fn get(&self, i: usize) -> Result<usize, TensorError> {
        crate::ensure_bounds!("tnt::Index::get()", i, 0usize, self.loc.len());
        Ok(self.loc[i])
    }

    /// Overwrite the coordinate on axis `i`.
    pub fn set(&mut self, i: usize, value: usize) -> Result<(), TensorError> {
        crate::ensure_bounds!("tnt::Index::set()", i, 0usize, self.loc.len());
        self.loc[i] = value;
        Ok(())
    }

    /// Whether the index sits on the end sentinel.
    #[inline]
    pub fn is_end(&self) -> bool {
        match (self.loc.first(), self.shape.axes().first()) {
            (Some(&l), Some(&d)) => l >= d,
            _ => true,
        }
    }

    /// Advance one position (prefix increment).
    pub fn increment(&mut self) -> &mut Self {
        let axes = self.shape.axes();
        for i in (0..self.loc.len()).rev() {
            self.loc[i] += 1;
            if self.loc[i] < axes[i] || i == 0 {
                break;
            }
            self.loc[i] = 0;
        }
        self
    }

    /// Advance one position and return the previous state (postfix increment).
    pub fn post_increment(&mut self) -> Self {
        let previous = self.clone();
        self.increment();
        previous
    }

    /// Flat offset `Σ loc[i] * stride[i]`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `stride` has a different number of axes.
    ///
    /// ```
    /// use tnt::{Index, Shape, Stride};
    ///
    /// let index = Index::with_loc(&Shape::new(&[2, 2, 2]), &[1, 0, 1]).unwrap();
    /// assert_eq!(index.distance(&Stride::new(&[4, 4, 1])).unwrap(), 5);
    /// ```
    pub fn distance(&self, stride: &Stride) -> Result<usize, TensorError> {
        crate::ensure!(
            stride.num_axes() == self.loc.len(),
            InvalidParameter,
            "tnt::Index::distance()",
            "Index has {} axes but stride has {}",
            self.loc.len(),
            stride.num_axes()
        );
        Ok(self.offset_unchecked(stride.as_slice()))
    }

    #[inline]
    pub(crate) fn offset_unchecked(&self, strides: &[usize]) -> usize {
        self.loc.iter().zip(strides).map(|(&l, &s)| l * s).sum()
    }
}

impl IndexOp<usize> for Index {
    type Output = usize;

    fn index(&self, i: usize) -> &usize {
        if let Err(e) = self.get(i) {
            panic!("{e}");
        }
        &self.loc[i]
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index: {{")?;
        for (i, l) in self.loc.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{l}")?;
        }
        write!(f, "}}")
    }
}
