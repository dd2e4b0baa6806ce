//! Elementwise comparisons producing `u8` masks.
//!
//! Every comparison returns a `Tensor<u8>` of the operand's shape holding
//! 255 (all bits set) where the predicate holds and 0 elsewhere. Right
//! operands of another element type are cast to the left operand's type
//! first.

use crate::backend::{CompareOp, Kernel};
use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

fn mask_scalar<T: Element>(lhs: &Tensor<T>, rhs: T, op: CompareOp) -> Tensor<u8> {
    let mut out = Tensor::new(lhs.shape());
    T::Kernel::compare_scalar(lhs.data(), rhs, out.data_mut(), op);
    out
}

fn mask_tensor<T: Element, U: Element>(
    lhs: &Tensor<T>,
    rhs: &Tensor<U>,
    function: &'static str,
    op: CompareOp,
) -> Result<Tensor<u8>, TensorError> {
    crate::ensure!(
        lhs.shape() == rhs.shape(),
        InvalidParameter,
        function,
        "Shape mismatch: {} vs {}",
        lhs.shape(),
        rhs.shape()
    );
    let rhs: Tensor<T> = rhs.cast();
    let mut out = Tensor::new(lhs.shape());
    T::Kernel::compare(lhs.data(), rhs.data(), out.data_mut(), op);
    Ok(out)
}

macro_rules! define_compare {
    ($($scalar_fn:ident, $tensor_fn:ident, $op:ident, $symbol:literal;)*) => {
        $(
            #[doc = concat!("Mask of `lhs ", $symbol, " rhs` for a scalar `rhs`.")]
            pub fn $scalar_fn<T: Element, S: Element>(lhs: &Tensor<T>, rhs: S) -> Tensor<u8> {
                mask_scalar(lhs, rhs.cast(), CompareOp::$op)
            }

            #[doc = concat!("Mask of `lhs ", $symbol, " rhs`, elementwise.")]
            ///
            /// # Errors
            ///
            /// `InvalidParameter` if the shapes differ.
            pub fn $tensor_fn<T: Element, U: Element>(
                lhs: &Tensor<T>,
                rhs: &Tensor<U>,
            ) -> Result<Tensor<u8>, TensorError> {
                mask_tensor(lhs, rhs, concat!("tnt::", stringify!($scalar_fn), "()"), CompareOp::$op)
            }
        )*
    };
}

define_compare! {
    compare_eq, compare_eq_tensor, Eq, "==";
    compare_ne, compare_ne_tensor, Ne, "!=";
    compare_lt, compare_lt_tensor, Lt, "<";
    compare_gt, compare_gt_tensor, Gt, ">";
    compare_le, compare_le_tensor, Le, "<=";
    compare_ge, compare_ge_tensor, Ge, ">=";
}
