//! Element storage.
//!
//! Tensors own their elements through [`AlignedPtr`], a zero-filled buffer
//! whose allocation is aligned and padded for the vector kernels in
//! [`backend`](crate::backend).

mod aligned;

pub use aligned::AlignedPtr;
