//! Tensor operations.
//!
//! Free functions are the fallible API: they check preconditions and return
//! `Result<_, TensorError>`. Operator impls (`+`, `&`, ...) on [`Tensor`]
//! call these and panic with the error text on failure.
//!
//! [`Tensor`]: crate::Tensor

mod arithmetic;
mod bitwise;
mod compare;
mod reduce;
mod slice;

pub use arithmetic::{
    add, add_mixed, add_scalar, divide, divide_mixed, divide_scalar, multiply, multiply_mixed,
    multiply_scalar, subtract, subtract_mixed, subtract_scalar,
};
pub use bitwise::{
    bitwise_and, bitwise_and_scalar, bitwise_not, bitwise_or, bitwise_or_scalar, bitwise_xor,
    bitwise_xor_scalar,
};
pub use compare::{
    compare_eq, compare_eq_tensor, compare_ge, compare_ge_tensor, compare_gt, compare_gt_tensor,
    compare_le, compare_le_tensor, compare_lt, compare_lt_tensor, compare_ne, compare_ne_tensor,
};

pub(crate) use reduce::{max_of, mean_of, min_of, sum_of};
pub(crate) use slice::{resolve_window, view_position};
