//! Bitwise operations on integer tensors.
//!
//! Restricted to integer element types by the `PrimInt` bound. The work is
//! done by the element's kernel over the padded buffer.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use num_traits::PrimInt;

use crate::backend::{BitwiseOp, Kernel};
use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

/// Flip every bit.
///
/// ```
/// use tnt::Tensor;
/// use tnt::operations::bitwise_not;
///
/// let mut t = Tensor::full([2], 0b0000_1111u8);
/// bitwise_not(&mut t);
/// assert_eq!(t.data(), &[0b1111_0000, 0b1111_0000]);
/// ```
pub fn bitwise_not<T: Element + PrimInt>(tensor: &mut Tensor<T>) {
    T::Kernel::not(tensor.padded_mut());
}

fn zip_in_place<T: Element + PrimInt>(
    lhs: &mut Tensor<T>,
    rhs: &Tensor<T>,
    function: &'static str,
    op: BitwiseOp,
) -> Result<(), TensorError> {
    crate::ensure!(
        lhs.shape() == rhs.shape(),
        InvalidParameter,
        function,
        "Shape mismatch: {} vs {}",
        lhs.shape(),
        rhs.shape()
    );
    T::Kernel::bitwise(lhs.padded_mut(), rhs.padded(), op);
    Ok(())
}

/// `lhs &= rhs`, elementwise.
///
/// # Errors
///
/// `InvalidParameter` if the shapes differ.
pub fn bitwise_and<T: Element + PrimInt>(lhs: &mut Tensor<T>, rhs: &Tensor<T>) -> Result<(), TensorError> {
    zip_in_place(lhs, rhs, "tnt::bitwise_and()", BitwiseOp::And)
}

pub fn bitwise_and_scalar<T: Element + PrimInt>(lhs: &mut Tensor<T>, rhs: T) {
    T::Kernel::bitwise_scalar(lhs.padded_mut(), rhs, BitwiseOp::And);
}

/// `lhs |= rhs`, elementwise.
///
/// # Errors
///
/// `InvalidParameter` if the shapes differ.
pub fn bitwise_or<T: Element + PrimInt>(lhs: &mut Tensor<T>, rhs: &Tensor<T>) -> Result<(), TensorError> {
    zip_in_place(lhs, rhs, "tnt::bitwise_or()", BitwiseOp::Or)
}

pub fn bitwise_or_scalar<T: Element + PrimInt>(lhs: &mut Tensor<T>, rhs: T) {
    T::Kernel::bitwise_scalar(lhs.padded_mut(), rhs, BitwiseOp::Or);
}

/// `lhs ^= rhs`, elementwise.
///
/// # Errors
///
/// `InvalidParameter` if the shapes differ.
pub fn bitwise_xor<T: Element + PrimInt>(lhs: &mut Tensor<T>, rhs: &Tensor<T>) -> Result<(), TensorError> {
    zip_in_place(lhs, rhs, "tnt::bitwise_xor()", BitwiseOp::Xor)
}

pub fn bitwise_xor_scalar<T: Element + PrimInt>(lhs: &mut Tensor<T>, rhs: T) {
    T::Kernel::bitwise_scalar(lhs.padded_mut(), rhs, BitwiseOp::Xor);
}

impl<T: Element + PrimInt> Not for &Tensor<T> {
    type Output = Tensor<T>;

    fn not(self) -> Tensor<T> {
        let mut out = self.clone();
        bitwise_not(&mut out);
        out
    }
}

macro_rules! impl_bitwise_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $func:ident) => {
        impl<T: Element + PrimInt> $trait<&Tensor<T>> for &Tensor<T> {
            type Output = Tensor<T>;

            fn $method(self, rhs: &Tensor<T>) -> Tensor<T> {
                let mut out = self.clone();
                if let Err(e) = $func(&mut out, rhs) {
                    panic!("{e}");
                }
                out
            }
        }

        impl<T: Element + PrimInt> $assign_trait<&Tensor<T>> for Tensor<T> {
            fn $assign_method(&mut self, rhs: &Tensor<T>) {
                if let Err(e) = $func(self, rhs) {
                    panic!("{e}");
                }
            }
        }
    };
}

macro_rules! impl_bitwise_scalar_ops {
    ($($int:ty),*) => {
        $(
            impl BitAnd<$int> for &Tensor<$int> {
                type Output = Tensor<$int>;

                fn bitand(self, rhs: $int) -> Tensor<$int> {
                    let mut out = self.clone();
                    bitwise_and_scalar(&mut out, rhs);
                    out
                }
            }

            impl BitAndAssign<$int> for Tensor<$int> {
                fn bitand_assign(&mut self, rhs: $int) {
                    bitwise_and_scalar(self, rhs);
                }
            }

            impl BitOr<$int> for &Tensor<$int> {
                type Output = Tensor<$int>;

                fn bitor(self, rhs: $int) -> Tensor<$int> {
                    let mut out = self.clone();
                    bitwise_or_scalar(&mut out, rhs);
                    out
                }
            }

            impl BitOrAssign<$int> for Tensor<$int> {
                fn bitor_assign(&mut self, rhs: $int) {
                    bitwise_or_scalar(self, rhs);
                }
            }

            impl BitXor<$int> for &Tensor<$int> {
                type Output = Tensor<$int>;

                fn bitxor(self, rhs: $int) -> Tensor<$int> {
                    let mut out = self.clone();
                    bitwise_xor_scalar(&mut out, rhs);
                    out
                }
            }

            impl BitXorAssign<$int> for Tensor<$int> {
                fn bitxor_assign(&mut self, rhs: $int) {
                    bitwise_xor_scalar(self, rhs);
                }
            }
        )*
    };
}

impl_bitwise_op!(BitAnd, bitand, BitAndAssign, bitand_assign, bitwise_and);
impl_bitwise_op!(BitOr, bitor, BitOrAssign, bitor_assign, bitwise_or);
impl_bitwise_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, bitwise_xor);
impl_bitwise_scalar_ops!(i8, u8, i16, u16, i32, u32, i64, u64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_not() {
        let t = Tensor::full([3], 0i16);
        assert_eq!((!&t).data(), &[-1, -1, -1]);
    }

    #[test]
    fn test_and_or_xor() {
        let a = Tensor::from_vec(vec![0b1100u32, 0b1010], [2]).unwrap();
        let b = Tensor::from_vec(vec![0b1010u32, 0b0110], [2]).unwrap();
        assert_eq!((&a & &b).data(), &[0b1000, 0b0010]);
        assert_eq!((&a | &b).data(), &[0b1110, 0b1110]);
        assert_eq!((&a ^ &b).data(), &[0b0110, 0b1100]);
        assert_eq!((&a & 0b1000u32).data(), &[0b1000, 0b1000]);
    }

    #[test]
    fn test_assign_forms() {
        let mut t = Tensor::full([2], 0xF0u8);
        t |= 0x0Fu8;
        assert_eq!(t.data(), &[0xFF, 0xFF]);
        t ^= &Tensor::full([2], 0xFFu8);
        assert_eq!(t.data(), &[0, 0]);
    }

    #[test]
    fn test_every_kernel_class() {
        let mut narrow = Tensor::from_vec((0..19).map(|v| v as i8).collect(), [19]).unwrap();
        narrow &= 0b0110i8;
        assert!(narrow.iter().enumerate().all(|(i, &v)| v == (i as i8) & 0b0110));

        let mut wide = Tensor::from_vec((0..40).collect::<Vec<i32>>(), [5, 8]).unwrap();
        let other = Tensor::from_vec((0..40).map(|v| v * 3).collect::<Vec<i32>>(), [5, 8]).unwrap();
        wide ^= &other;
        assert!(wide.iter().enumerate().all(|(i, &v)| v == (i as i32) ^ (i as i32 * 3)));
        bitwise_not(&mut wide);
        assert!(wide.iter().enumerate().all(|(i, &v)| v == !((i as i32) ^ (i as i32 * 3))));

        let mut half = Tensor::full([17], 0x00F0u16);
        half |= 0x0F00u16;
        assert_eq!(half.data(), &[0x0FF0u16; 17]);
    }

    #[test]
    fn test_shape_mismatch() {
        let mut a: Tensor<i64> = Tensor::new([2]);
        let b: Tensor<i64> = Tensor::new([3]);
        assert_eq!(bitwise_or(&mut a, &b).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }
}
