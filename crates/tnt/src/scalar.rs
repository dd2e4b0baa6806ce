//! Element types supported by tnt.
//!
//! Every element type names the kernel strategy that implements its
//! arithmetic through [`Element::Kernel`]:
//!
//! ```text
//! i8, u8, i64, u64    → ScalarLoop   (KernelClass::Narrow)
//! i16, u16, i32, u32  → WideVector   (KernelClass::Wide)
//! f32, f64            → FloatVector  (KernelClass::Floating)
//! ```

use std::fmt::{Debug, Display};

use crate::backend::{FloatVector, Kernel, ScalarLoop, WideVector};

/// Category of an element type, which decides its kernel strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelClass {
    /// 8- and 64-bit integers: plain scalar loops.
    Narrow,
    /// 16- and 32-bit integers: vector loops with double-width multiply.
    Wide,
    /// Floating point: vector loops, GEMM for matrix multiply.
    Floating,
}

mod private {
    pub trait Sealed {}
}

/// Trait for arithmetic element types stored in a tensor.
///
/// The trait is sealed. All implementors are plain-old-data for which the
/// all-zero bit pattern is the value zero, so
/// [`AlignedPtr`](crate::storage::AlignedPtr) can hand out zeroed memory.
///
/// Integer arithmetic wraps on overflow, matching what the vector kernels do
/// lane by lane.
pub trait Element:
    private::Sealed + Copy + Default + PartialEq + PartialOrd + Debug + Display + Send + Sync + 'static
{
    /// The kernel strategy for this type.
    type Kernel: Kernel<Self>;

    /// Kernel category of this type.
    const CLASS: KernelClass;

    /// Short type name used by `Display` (`"f32"`, `"u8"`, ...).
    const NAME: &'static str;

    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Smallest representable value.
    fn min_value() -> Self;

    /// Largest representable value.
    fn max_value() -> Self;

    fn is_zero(self) -> bool {
        self == Self::zero()
    }

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Division. Integer division by zero panics.
    fn wrapping_div(self, rhs: Self) -> Self;

    /// Bitwise operations on the raw bit pattern. Floats act on `to_bits()`.
    fn bit_and(self, rhs: Self) -> Self;
    fn bit_or(self, rhs: Self) -> Self;
    fn bit_xor(self, rhs: Self) -> Self;
    fn bit_not(self) -> Self;

    /// Lossy conversion to `f64`.
    fn to_f64(self) -> f64;

    /// Conversion from `f64` with `as` semantics (saturating for integers).
    fn from_f64(value: f64) -> Self;

    /// Conversion to `i128` with `as` semantics.
    fn to_i128(self) -> i128;

    /// Conversion from `i128` with `as` semantics (truncating for integers).
    fn from_i128(value: i128) -> Self;

    /// Convert to another element type with `as` semantics.
    ///
    /// Integer-to-integer conversions go through `i128` so that 64-bit values
    /// convert exactly; everything else goes through `f64`.
    ///
    /// ```
    /// use tnt::Element;
    ///
    /// assert_eq!(300i32.cast::<u8>(), 44);
    /// assert_eq!(5.7f64.cast::<i32>(), 5);
    /// assert_eq!(u64::MAX.cast::<i64>(), -1);
    /// ```
    #[inline]
    fn cast<U: Element>(self) -> U {
        if Self::CLASS == KernelClass::Floating || U::CLASS == KernelClass::Floating {
            U::from_f64(self.to_f64())
        } else {
            U::from_i128(self.to_i128())
        }
    }
}

macro_rules! impl_integer_element {
    ($($ty:ty => $kernel:ty, $class:ident;)*) => {
        $(
            impl private::Sealed for $ty {}

            impl Element for $ty {
                type Kernel = $kernel;
                const CLASS: KernelClass = KernelClass::$class;
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn min_value() -> Self {
                    <$ty>::MIN
                }

                #[inline]
                fn max_value() -> Self {
                    <$ty>::MAX
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }

                #[inline]
                fn wrapping_mul(self, rhs: Self) -> Self {
                    <$ty>::wrapping_mul(self, rhs)
                }

                #[inline]
                fn wrapping_div(self, rhs: Self) -> Self {
                    <$ty>::wrapping_div(self, rhs)
                }

                #[inline]
                fn bit_and(self, rhs: Self) -> Self {
                    self & rhs
                }

                #[inline]
                fn bit_or(self, rhs: Self) -> Self {
                    self | rhs
                }

                #[inline]
                fn bit_xor(self, rhs: Self) -> Self {
                    self ^ rhs
                }

                #[inline]
                fn bit_not(self) -> Self {
                    !self
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }

                #[inline]
                fn to_i128(self) -> i128 {
                    self as i128
                }

                #[inline]
                fn from_i128(value: i128) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_integer_element! {
    i8 => ScalarLoop, Narrow;
    u8 => ScalarLoop, Narrow;
    i64 => ScalarLoop, Narrow;
    u64 => ScalarLoop, Narrow;
    i16 => WideVector, Wide;
    u16 => WideVector, Wide;
    i32 => WideVector, Wide;
    u32 => WideVector, Wide;
}

macro_rules! impl_float_element {
    ($($ty:ty),*) => {
        $(
            impl private::Sealed for $ty {}

            impl Element for $ty {
                type Kernel = FloatVector;
                const CLASS: KernelClass = KernelClass::Floating;
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn one() -> Self {
                    1.0
                }

                #[inline]
                fn min_value() -> Self {
                    <$ty>::MIN
                }

                #[inline]
                fn max_value() -> Self {
                    <$ty>::MAX
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline]
                fn wrapping_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline]
                fn wrapping_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline]
                fn bit_and(self, rhs: Self) -> Self {
                    <$ty>::from_bits(self.to_bits() & rhs.to_bits())
                }

                #[inline]
                fn bit_or(self, rhs: Self) -> Self {
                    <$ty>::from_bits(self.to_bits() | rhs.to_bits())
                }

                #[inline]
                fn bit_xor(self, rhs: Self) -> Self {
                    <$ty>::from_bits(self.to_bits() ^ rhs.to_bits())
                }

                #[inline]
                fn bit_not(self) -> Self {
                    <$ty>::from_bits(!self.to_bits())
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }

                #[inline]
                fn to_i128(self) -> i128 {
                    self as i128
                }

                #[inline]
                fn from_i128(value: i128) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_float_element!(f32, f64);
