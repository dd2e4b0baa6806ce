use num_traits::Float;

use crate::backend::Kernel;
use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

/// Orthogonal projection of column vector `v` onto the line spanned by `s`,
/// `s · (v·s)/(s·s)`.
///
/// # Errors
///
/// `InvalidParameter` unless both operands have the same `{n, 1}` shape,
/// or if `s` is the zero vector.
///
/// ```
/// use tnt::Tensor;
/// use tnt::linalg::project;
///
/// let v = Tensor::from_vec(vec![2.0, 3.0], [2, 1]).unwrap();
/// let s = Tensor::from_vec(vec![1.0, 0.0], [2, 1]).unwrap();
/// assert_eq!(project(&v, &s).unwrap().data(), &[2.0, 0.0]);
/// ```
pub fn project<T: Element + Float>(v: &Tensor<T>, s: &Tensor<T>) -> Result<Tensor<T>, TensorError> {
    crate::ensure!(
        v.num_axes() == 2 && v.shape().axes()[1] == 1,
        InvalidParameter,
        "tnt::project()",
        "Projection requires a column vector, got {}",
        v.shape()
    );
    crate::ensure!(
        v.shape() == s.shape(),
        InvalidParameter,
        "tnt::project()",
        "Shape mismatch: {} vs {}",
        v.shape(),
        s.shape()
    );

    let norm = T::Kernel::dot(s.data(), s.data());
    crate::ensure!(
        !Element::is_zero(norm),
        InvalidParameter,
        "tnt::project()",
        "Cannot project onto the zero vector"
    );
    let scale = T::Kernel::dot(v.data(), s.data()) / norm;

    let mut out = s.clone();
    T::Kernel::mul_scalar(out.padded_mut(), scale);
    Ok(out)
}
