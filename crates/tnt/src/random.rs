//! Random tensor construction.

use rand::Rng;
use rand::distr::Uniform;
use rand::distr::uniform::SampleUniform;

use crate::error::TensorError;
use crate::scalar::{Element, KernelClass};
use crate::shape::Shape;
use crate::tensor::Tensor;

impl<T: Element + SampleUniform> Tensor<T> {
    /// Create a tensor with uniformly distributed values from the thread RNG.
    ///
    /// Integer element types draw from `[low, high]`, floating point element
    /// types from `[low, high)`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the range is empty.
    ///
    /// ```
    /// use tnt::Tensor;
    ///
    /// let t = Tensor::uniform([2, 3], 1u8, 6).unwrap();
    /// assert_eq!(t.len(), 6);
    /// assert!(t.iter().all(|v| (1..=6).contains(v)));
    /// ```
    pub fn uniform(shape: impl Into<Shape>, low: T, high: T) -> Result<Self, TensorError> {
        Self::uniform_with_rng(shape, low, high, &mut rand::rng())
    }

    /// Like [`uniform`](Self::uniform), drawing from `rng`.
    ///
    /// ```
    /// use tnt::Tensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let t1 = Tensor::uniform_with_rng([4], -1.0f64, 1.0, &mut StdRng::seed_from_u64(7)).unwrap();
    /// let t2 = Tensor::uniform_with_rng([4], -1.0f64, 1.0, &mut StdRng::seed_from_u64(7)).unwrap();
    /// assert_eq!(t1, t2);
    /// ```
    pub fn uniform_with_rng<R: Rng>(
        shape: impl Into<Shape>,
        low: T,
        high: T,
        rng: &mut R,
    ) -> Result<Self, TensorError> {
        let floating = T::CLASS == KernelClass::Floating;
        crate::ensure!(
            if floating { low < high } else { low <= high },
            InvalidParameter,
            "tnt::uniform()",
            "Empty sampling range [{}, {}{}",
            low,
            high,
            if floating { ")" } else { "]" }
        );
        let distribution = if floating {
            Uniform::new(low, high)
        } else {
            Uniform::new_inclusive(low, high)
        }
        .map_err(|e| crate::tensor_error!(InvalidParameter, "tnt::uniform()", "{e}"))?;

        let mut tensor = Self::new(shape);
        for v in tensor.iter_mut() {
            *v = rng.sample(&distribution);
        }
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_float_range() {
        let t = Tensor::uniform([100], 2.0f32, 3.0).unwrap();
        assert_eq!(t.shape().axes(), &[100]);
        for v in t.iter() {
            assert!((2.0..3.0).contains(v), "value {} not in [2, 3)", v);
        }
    }

    #[test]
    fn test_integer_range_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(12345);
        let t = Tensor::uniform_with_rng([500], -2i16, 2, &mut rng).unwrap();
        assert!(t.iter().all(|v| (-2..=2).contains(v)));
        assert!(t.iter().any(|&v| v == 2));
        assert!(t.iter().any(|&v| v == -2));

        let single = Tensor::uniform_with_rng([3], 9u64, 9, &mut rng).unwrap();
        assert_eq!(single.data(), &[9, 9, 9]);
    }

    #[test]
    fn test_reproducible() {
        let t1 = Tensor::uniform_with_rng([3, 4], 0i32, 100, &mut StdRng::seed_from_u64(1)).unwrap();
        let t2 = Tensor::uniform_with_rng([3, 4], 0i32, 100, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(t1, t2);
    }

    #[test]
    fn test_empty_range() {
        assert_eq!(
            Tensor::uniform([2], 1.0f64, 1.0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            Tensor::uniform([2], 5u8, 4).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }
}
