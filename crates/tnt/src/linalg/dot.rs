use crate::backend::Kernel;
use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

/// Sum of elementwise products, accumulated in the left operand's type.
///
/// A right operand of another element type is cast to `T` first.
///
/// # Errors
///
/// `InvalidParameter` if the shapes differ.
///
/// ```
/// use tnt::Tensor;
/// use tnt::linalg::dot;
///
/// let a = Tensor::full([2, 3], 1i32);
/// let b = Tensor::full([2, 3], 2u8);
/// assert_eq!(dot(&a, &b).unwrap(), 12);
/// ```
pub fn dot<T: Element, U: Element>(lhs: &Tensor<T>, rhs: &Tensor<U>) -> Result<T, TensorError> {
    crate::ensure!(
        lhs.shape() == rhs.shape(),
        InvalidParameter,
        "tnt::dot()",
        "Shape mismatch: {} vs {}",
        lhs.shape(),
        rhs.shape()
    );

    let rhs: Tensor<T> = rhs.cast();
    Ok(T::Kernel::dot(lhs.data(), rhs.data()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_dot_constant() {
        let a = Tensor::full([4, 5, 3], 1.0f32);
        let b = Tensor::full([4, 5, 3], 2.0f32);
        assert_eq!(dot(&a, &b).unwrap(), 120.0);
    }

    #[test]
    fn test_dot_all_strategies() {
        let a = Tensor::from_vec(vec![1i8, 2, 3], [3]).unwrap();
        assert_eq!(dot(&a, &a).unwrap(), 14);
        let a = Tensor::from_vec(vec![1u16, 2, 3], [3]).unwrap();
        assert_eq!(dot(&a, &a).unwrap(), 14);
        let a = Tensor::from_vec(vec![1.5f64, 2.0, 3.0], [3]).unwrap();
        assert_eq!(dot(&a, &a).unwrap(), 15.25);
    }

    #[test]
    fn test_dot_mixed_types() {
        let a = Tensor::from_vec(vec![1i64, 2, 3], [3]).unwrap();
        let b = Tensor::from_vec(vec![1.9f32, 2.2, 3.7], [3]).unwrap();
        // rhs is truncated to [1, 2, 3]
        assert_eq!(dot(&a, &b).unwrap(), 14);
    }

    #[test]
    fn test_dot_shape_mismatch() {
        let a: Tensor<u32> = Tensor::new([2, 3]);
        let b: Tensor<u32> = Tensor::new([3, 2]);
        assert_eq!(dot(&a, &b).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }
}
