//! Elementwise arithmetic.
//!
//! The free functions are the fallible API and work in place on the left
//! operand. The `std::ops` impls build on them and panic with the error text
//! when a precondition fails.
//!
//! Add, subtract and multiply run the kernel over the padded buffer so vector
//! loops never need a remainder. Tensor-by-tensor division only touches the
//! logical elements, since the zeroed padding of an integer divisor would
//! trap.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use crate::backend::Kernel;
use crate::error::TensorError;
use crate::scalar::{Element, KernelClass};
use crate::tensor::Tensor;

fn check_same_shape<T: Element, U: Element>(
    lhs: &Tensor<T>,
    rhs: &Tensor<U>,
    function: &'static str,
) -> Result<(), TensorError> {
    crate::ensure!(
        lhs.shape() == rhs.shape(),
        InvalidParameter,
        function,
        "Shape mismatch: {} vs {}",
        lhs.shape(),
        rhs.shape()
    );
    Ok(())
}

/// `lhs += rhs`, elementwise.
///
/// # Errors
///
/// `InvalidParameter` if the shapes differ.
///
/// ```
/// use tnt::Tensor;
/// use tnt::operations::add;
///
/// let mut a = Tensor::full([2, 2], 9u8);
/// add(&mut a, &Tensor::full([2, 2], 127u8)).unwrap();
/// assert_eq!(a.data(), &[136; 4]);
/// ```
pub fn add<T: Element>(lhs: &mut Tensor<T>, rhs: &Tensor<T>) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::add()")?;
    T::Kernel::add(lhs.padded_mut(), rhs.padded());
    Ok(())
}

/// `lhs += rhs` with `rhs` cast to `T` first.
pub fn add_scalar<T: Element, S: Element>(lhs: &mut Tensor<T>, rhs: S) {
    T::Kernel::add_scalar(lhs.padded_mut(), rhs.cast());
}

/// `lhs += rhs` for a right operand of another element type, cast first.
pub fn add_mixed<T: Element, U: Element>(
    lhs: &mut Tensor<T>,
    rhs: &Tensor<U>,
) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::add()")?;
    add(lhs, &rhs.cast())
}

/// `lhs -= rhs`, elementwise.
///
/// # Errors
///
/// `InvalidParameter` if the shapes differ.
pub fn subtract<T: Element>(lhs: &mut Tensor<T>, rhs: &Tensor<T>) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::subtract()")?;
    T::Kernel::sub(lhs.padded_mut(), rhs.padded());
    Ok(())
}

pub fn subtract_scalar<T: Element, S: Element>(lhs: &mut Tensor<T>, rhs: S) {
    T::Kernel::sub_scalar(lhs.padded_mut(), rhs.cast());
}

pub fn subtract_mixed<T: Element, U: Element>(
    lhs: &mut Tensor<T>,
    rhs: &Tensor<U>,
) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::subtract()")?;
    subtract(lhs, &rhs.cast())
}

/// `lhs *= rhs`, elementwise (Hadamard product).
///
/// # Errors
///
/// `InvalidParameter` if the shapes differ.
pub fn multiply<T: Element>(lhs: &mut Tensor<T>, rhs: &Tensor<T>) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::multiply()")?;
    T::Kernel::mul(lhs.padded_mut(), rhs.padded());
    Ok(())
}

pub fn multiply_scalar<T: Element, S: Element>(lhs: &mut Tensor<T>, rhs: S) {
    T::Kernel::mul_scalar(lhs.padded_mut(), rhs.cast());
}

pub fn multiply_mixed<T: Element, U: Element>(
    lhs: &mut Tensor<T>,
    rhs: &Tensor<U>,
) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::multiply()")?;
    multiply(lhs, &rhs.cast())
}

/// `lhs /= rhs`, elementwise.
///
/// Floating division follows IEEE 754, so a zero divisor yields an infinity
/// or NaN.
///
/// # Errors
///
/// - `InvalidParameter` if the shapes differ.
/// - `InvalidParameter` if `T` is an integer type and `rhs` holds a zero.
pub fn divide<T: Element>(lhs: &mut Tensor<T>, rhs: &Tensor<T>) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::divide()")?;
    crate::ensure!(
        T::CLASS == KernelClass::Floating || !rhs.iter().any(|v| v.is_zero()),
        InvalidParameter,
        "tnt::divide()",
        "Cannot divide by 0"
    );
    T::Kernel::div(lhs.data_mut(), rhs.data());
    Ok(())
}

/// `lhs /= rhs` with `rhs` cast to `T` first.
///
/// # Errors
///
/// `InvalidParameter` if the cast divisor is zero.
///
/// ```
/// use tnt::{ErrorKind, Tensor};
/// use tnt::operations::divide_scalar;
///
/// let mut t = Tensor::full([3], 9i32);
/// divide_scalar(&mut t, 2).unwrap();
/// assert_eq!(t.data(), &[4, 4, 4]);
/// assert_eq!(divide_scalar(&mut t, 0.0f32).unwrap_err().kind(), ErrorKind::InvalidParameter);
/// ```
pub fn divide_scalar<T: Element, S: Element>(lhs: &mut Tensor<T>, rhs: S) -> Result<(), TensorError> {
    let rhs: T = rhs.cast();
    crate::ensure!(!rhs.is_zero(), InvalidParameter, "tnt::divide()", "Cannot divide by 0");
    T::Kernel::div_scalar(lhs.padded_mut(), rhs);
    Ok(())
}

pub fn divide_mixed<T: Element, U: Element>(
    lhs: &mut Tensor<T>,
    rhs: &Tensor<U>,
) -> Result<(), TensorError> {
    check_same_shape(lhs, rhs, "tnt::divide()")?;
    divide(lhs, &rhs.cast())
}

#[inline]
fn or_panic<T>(result: Result<T, TensorError>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

macro_rules! impl_tensor_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $func:ident) => {
        impl<T: Element> $trait<&Tensor<T>> for &Tensor<T> {
            type Output = Tensor<T>;

            fn $method(self, rhs: &Tensor<T>) -> Tensor<T> {
                let mut out = self.clone();
                or_panic($func(&mut out, rhs));
                out
            }
        }

        impl<T: Element> $trait<&Tensor<T>> for Tensor<T> {
            type Output = Tensor<T>;

            fn $method(mut self, rhs: &Tensor<T>) -> Tensor<T> {
                or_panic($func(&mut self, rhs));
                self
            }
        }

        impl<T: Element> $assign_trait<&Tensor<T>> for Tensor<T> {
            fn $assign_method(&mut self, rhs: &Tensor<T>) {
                or_panic($func(self, rhs));
            }
        }
    };
}

impl_tensor_op!(Add, add, AddAssign, add_assign, add);
impl_tensor_op!(Sub, sub, SubAssign, sub_assign, subtract);
impl_tensor_op!(Mul, mul, MulAssign, mul_assign, multiply);
impl_tensor_op!(Div, div, DivAssign, div_assign, divide);

macro_rules! impl_scalar_ops {
    ($($scalar:ty),*) => {
        $(
            impl<T: Element> Add<$scalar> for &Tensor<T> {
                type Output = Tensor<T>;

                fn add(self, rhs: $scalar) -> Tensor<T> {
                    let mut out = self.clone();
                    add_scalar(&mut out, rhs);
                    out
                }
            }

            impl<T: Element> AddAssign<$scalar> for Tensor<T> {
                fn add_assign(&mut self, rhs: $scalar) {
                    add_scalar(self, rhs);
                }
            }

            impl<T: Element> Sub<$scalar> for &Tensor<T> {
                type Output = Tensor<T>;

                fn sub(self, rhs: $scalar) -> Tensor<T> {
                    let mut out = self.clone();
                    subtract_scalar(&mut out, rhs);
                    out
                }
            }

            impl<T: Element> SubAssign<$scalar> for Tensor<T> {
                fn sub_assign(&mut self, rhs: $scalar) {
                    subtract_scalar(self, rhs);
                }
            }

            impl<T: Element> Mul<$scalar> for &Tensor<T> {
                type Output = Tensor<T>;

                fn mul(self, rhs: $scalar) -> Tensor<T> {
                    let mut out = self.clone();
                    multiply_scalar(&mut out, rhs);
                    out
                }
            }

            impl<T: Element> MulAssign<$scalar> for Tensor<T> {
                fn mul_assign(&mut self, rhs: $scalar) {
                    multiply_scalar(self, rhs);
                }
            }

            impl<T: Element> Div<$scalar> for &Tensor<T> {
                type Output = Tensor<T>;

                fn div(self, rhs: $scalar) -> Tensor<T> {
                    let mut out = self.clone();
                    or_panic(divide_scalar(&mut out, rhs));
                    out
                }
            }

            impl<T: Element> DivAssign<$scalar> for Tensor<T> {
                fn div_assign(&mut self, rhs: $scalar) {
                    or_panic(divide_scalar(self, rhs));
                }
            }
        )*
    };
}

impl_scalar_ops!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
