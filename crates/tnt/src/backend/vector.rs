//! Vector engine glue over `pulp`.
//!
//! Kernels are written against [`SimdElement`] and [`SimdBinaryOp`] and run
//! through [`Arch::dispatch`], which picks the widest instruction set the
//! CPU supports at runtime. Slices are split into whole vectors plus a tail;
//! buffers from [`AlignedPtr`](crate::storage::AlignedPtr) are padded to
//! 32-byte blocks, so the tail is empty unless the CPU's vectors are wider.

use std::marker::PhantomData;

use pulp::{Arch, Simd, WithSimd};

use crate::backend::CompareOp;
use crate::scalar::Element;

/// Upper bound on lanes in one vector (512-bit registers of 8-bit lanes).
const MAX_LANES: usize = 64;

/// Element types with a `pulp` vector representation.
pub trait SimdElement: Element {
    /// The vector type for this element (GAT).
    type Simd<S: Simd>: Copy;

    /// Split a slice into whole vectors and a scalar remainder.
    fn as_simd<S: Simd>(slice: &[Self]) -> (&[Self::Simd<S>], &[Self]);
    fn as_mut_simd<S: Simd>(slice: &mut [Self]) -> (&mut [Self::Simd<S>], &mut [Self]);

    /// Broadcast a scalar to every lane.
    fn splat<S: Simd>(simd: S, value: Self) -> Self::Simd<S>;
}

macro_rules! impl_simd_element {
    ($elem:ty, $simd_ty:ident, $as_simd:ident, $as_mut_simd:ident, $splat:ident) => {
        impl SimdElement for $elem {
            type Simd<S: Simd> = S::$simd_ty;

            #[inline(always)]
            fn as_simd<S: Simd>(slice: &[Self]) -> (&[S::$simd_ty], &[Self]) {
                S::$as_simd(slice)
            }

            #[inline(always)]
            fn as_mut_simd<S: Simd>(slice: &mut [Self]) -> (&mut [S::$simd_ty], &mut [Self]) {
                S::$as_mut_simd(slice)
            }

            #[inline(always)]
            fn splat<S: Simd>(simd: S, value: Self) -> S::$simd_ty {
                simd.$splat(value)
            }
        }
    };
}

impl_simd_element!(i16, i16s, as_simd_i16s, as_mut_simd_i16s, splat_i16s);
impl_simd_element!(u16, u16s, as_simd_u16s, as_mut_simd_u16s, splat_u16s);
impl_simd_element!(i32, i32s, as_simd_i32s, as_mut_simd_i32s, splat_i32s);
impl_simd_element!(u32, u32s, as_simd_u32s, as_mut_simd_u32s, splat_u32s);
impl_simd_element!(f32, f32s, as_simd_f32s, as_mut_simd_f32s, splat_f32s);
impl_simd_element!(f64, f64s, as_simd_f64s, as_mut_simd_f64s, splat_f64s);

/// A lane-wise binary operation with a matching scalar form.
pub trait SimdBinaryOp<E: SimdElement>: Copy {
    fn apply_simd_vec<S: Simd>(simd: S, a: E::Simd<S>, b: E::Simd<S>) -> E::Simd<S>;

    fn apply_scalar(a: E, b: E) -> E;
}

macro_rules! define_op_marker {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Copy, Clone)]
            pub struct $name;
        )*
    };
}

define_op_marker!(AddOp, SubOp, MulOp, DivOp, AndOp, OrOp, XorOp);

macro_rules! impl_binary_op {
    ($op:ty, $scalar_fn:ident, $simd_method:ident, $elem:ty) => {
        impl SimdBinaryOp<$elem> for $op {
            #[inline(always)]
            fn apply_simd_vec<S: Simd>(
                simd: S,
                a: <$elem as SimdElement>::Simd<S>,
                b: <$elem as SimdElement>::Simd<S>,
            ) -> <$elem as SimdElement>::Simd<S> {
                simd.$simd_method(a, b)
            }

            #[inline(always)]
            fn apply_scalar(a: $elem, b: $elem) -> $elem {
                Element::$scalar_fn(a, b)
            }
        }
    };
}

impl_binary_op!(AddOp, wrapping_add, add_i16s, i16);
impl_binary_op!(AddOp, wrapping_add, add_u16s, u16);
impl_binary_op!(AddOp, wrapping_add, add_i32s, i32);
impl_binary_op!(AddOp, wrapping_add, add_u32s, u32);
impl_binary_op!(AddOp, wrapping_add, add_f32s, f32);
impl_binary_op!(AddOp, wrapping_add, add_f64s, f64);

impl_binary_op!(SubOp, wrapping_sub, sub_i16s, i16);
impl_binary_op!(SubOp, wrapping_sub, sub_u16s, u16);
impl_binary_op!(SubOp, wrapping_sub, sub_i32s, i32);
impl_binary_op!(SubOp, wrapping_sub, sub_u32s, u32);
impl_binary_op!(SubOp, wrapping_sub, sub_f32s, f32);
impl_binary_op!(SubOp, wrapping_sub, sub_f64s, f64);

// Integer lanes keep the low half of the double-width product.
impl_binary_op!(MulOp, wrapping_mul, mul_i16s, i16);
impl_binary_op!(MulOp, wrapping_mul, mul_u16s, u16);
impl_binary_op!(MulOp, wrapping_mul, mul_i32s, i32);
impl_binary_op!(MulOp, wrapping_mul, mul_u32s, u32);
impl_binary_op!(MulOp, wrapping_mul, mul_f32s, f32);
impl_binary_op!(MulOp, wrapping_mul, mul_f64s, f64);

impl_binary_op!(DivOp, wrapping_div, div_f32s, f32);
impl_binary_op!(DivOp, wrapping_div, div_f64s, f64);

macro_rules! impl_bitwise_ops {
    ($($elem:ty: $and:ident, $or:ident, $xor:ident;)*) => {
        $(
            impl_binary_op!(AndOp, bit_and, $and, $elem);
            impl_binary_op!(OrOp, bit_or, $or, $elem);
            impl_binary_op!(XorOp, bit_xor, $xor, $elem);
        )*
    };
}

impl_bitwise_ops! {
    i16: and_i16s, or_i16s, xor_i16s;
    u16: and_u16s, or_u16s, xor_u16s;
    i32: and_i32s, or_i32s, xor_i32s;
    u32: and_u32s, or_u32s, xor_u32s;
    f32: and_f32s, or_f32s, xor_f32s;
    f64: and_f64s, or_f64s, xor_f64s;
}

/// Element types with lane-wise comparisons.
pub trait SimdCompare: SimdElement {
    /// Lanes hold `one()` where `op` holds and `zero()` elsewhere.
    fn compare_simd<S: Simd>(
        simd: S,
        op: CompareOp,
        a: Self::Simd<S>,
        b: Self::Simd<S>,
    ) -> Self::Simd<S>;
}

macro_rules! impl_simd_compare {
    (
        $elem:ty,
        $eq:ident, $lt:ident, $gt:ident, $le:ident, $ge:ident, $not_mask:ident,
        |$simd:ident, $mask:ident| $to_lanes:expr
    ) => {
        impl SimdCompare for $elem {
            #[inline(always)]
            fn compare_simd<S: Simd>(
                $simd: S,
                op: CompareOp,
                a: <$elem as SimdElement>::Simd<S>,
                b: <$elem as SimdElement>::Simd<S>,
            ) -> <$elem as SimdElement>::Simd<S> {
                let $mask = match op {
                    CompareOp::Eq => $simd.$eq(a, b),
                    CompareOp::Ne => $simd.$not_mask($simd.$eq(a, b)),
                    CompareOp::Lt => $simd.$lt(a, b),
                    CompareOp::Gt => $simd.$gt(a, b),
                    CompareOp::Le => $simd.$le(a, b),
                    CompareOp::Ge => $simd.$ge(a, b),
                };
                $to_lanes
            }
        }
    };
}

// 16-bit lanes have no select; the mask is all ones per lane, so keep bit 0.
impl_simd_compare!(
    i16,
    equal_i16s, less_than_i16s, greater_than_i16s,
    less_than_or_equal_i16s, greater_than_or_equal_i16s, not_m16s,
    |simd, mask| simd.and_i16s(
        simd.transmute_i16s_u16s(simd.transmute_u16s_m16s(mask)),
        simd.splat_i16s(1)
    )
);
impl_simd_compare!(
    u16,
    equal_u16s, less_than_u16s, greater_than_u16s,
    less_than_or_equal_u16s, greater_than_or_equal_u16s, not_m16s,
    |simd, mask| simd.and_u16s(simd.transmute_u16s_m16s(mask), simd.splat_u16s(1))
);
impl_simd_compare!(
    i32,
    equal_i32s, less_than_i32s, greater_than_i32s,
    less_than_or_equal_i32s, greater_than_or_equal_i32s, not_m32s,
    |simd, mask| simd.select_i32s(mask, simd.splat_i32s(1), simd.splat_i32s(0))
);
impl_simd_compare!(
    u32,
    equal_u32s, less_than_u32s, greater_than_u32s,
    less_than_or_equal_u32s, greater_than_or_equal_u32s, not_m32s,
    |simd, mask| simd.select_u32s(mask, simd.splat_u32s(1), simd.splat_u32s(0))
);
impl_simd_compare!(
    f32,
    equal_f32s, less_than_f32s, greater_than_f32s,
    less_than_or_equal_f32s, greater_than_or_equal_f32s, not_m32s,
    |simd, mask| simd.select_f32s(mask, simd.splat_f32s(1.0), simd.splat_f32s(0.0))
);
impl_simd_compare!(
    f64,
    equal_f64s, less_than_f64s, greater_than_f64s,
    less_than_or_equal_f64s, greater_than_or_equal_f64s, not_m64s,
    |simd, mask| simd.select_f64s(mask, simd.splat_f64s(1.0), simd.splat_f64s(0.0))
);

struct BinaryInPlace<'a, E: SimdElement, Op: SimdBinaryOp<E>> {
    lhs: &'a mut [E],
    rhs: &'a [E],
    _op: PhantomData<Op>,
}

impl<E: SimdElement, Op: SimdBinaryOp<E>> WithSimd for BinaryInPlace<'_, E, Op> {
    type Output = ();

    #[inline(always)]
    fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
        let (lhs_simd, lhs_tail) = E::as_mut_simd::<S>(self.lhs);
        let (rhs_simd, rhs_tail) = E::as_simd::<S>(self.rhs);

        for (a, b) in lhs_simd.iter_mut().zip(rhs_simd.iter()) {
            *a = Op::apply_simd_vec(simd, *a, *b);
        }

        for (a, b) in lhs_tail.iter_mut().zip(rhs_tail.iter()) {
            *a = Op::apply_scalar(*a, *b);
        }
    }
}

struct ScalarInPlace<'a, E: SimdElement, Op: SimdBinaryOp<E>> {
    lhs: &'a mut [E],
    rhs: E,
    _op: PhantomData<Op>,
}

impl<E: SimdElement, Op: SimdBinaryOp<E>> WithSimd for ScalarInPlace<'_, E, Op> {
    type Output = ();

    #[inline(always)]
    fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
        let rhs = E::splat(simd, self.rhs);
        let (lhs_simd, lhs_tail) = E::as_mut_simd::<S>(self.lhs);

        for a in lhs_simd.iter_mut() {
            *a = Op::apply_simd_vec(simd, *a, rhs);
        }

        for a in lhs_tail.iter_mut() {
            *a = Op::apply_scalar(*a, self.rhs);
        }
    }
}

struct Dot<'a, E: SimdElement> {
    lhs: &'a [E],
    rhs: &'a [E],
}

impl<E> WithSimd for Dot<'_, E>
where
    E: SimdElement,
    AddOp: SimdBinaryOp<E>,
    MulOp: SimdBinaryOp<E>,
{
    type Output = E;

    #[inline(always)]
    fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
        let (lhs_simd, lhs_tail) = E::as_simd::<S>(self.lhs);
        let (rhs_simd, rhs_tail) = E::as_simd::<S>(self.rhs);

        let mut acc = E::splat(simd, E::zero());
        for (a, b) in lhs_simd.iter().zip(rhs_simd.iter()) {
            let product = MulOp::apply_simd_vec(simd, *a, *b);
            acc = AddOp::apply_simd_vec(simd, acc, product);
        }

        let mut sum = horizontal_sum::<S, E>(acc);
        for (a, b) in lhs_tail.iter().zip(rhs_tail.iter()) {
            sum = sum.wrapping_add(a.wrapping_mul(*b));
        }
        sum
    }
}

/// Right operand of a comparison: another slice or one broadcast value.
#[derive(Clone, Copy)]
enum Operand<'a, E> {
    Slice(&'a [E]),
    Splat(E),
}

struct CompareInto<'a, E: SimdCompare> {
    lhs: &'a [E],
    rhs: Operand<'a, E>,
    out: &'a mut [u8],
    op: CompareOp,
}

impl<E: SimdCompare> WithSimd for CompareInto<'_, E> {
    type Output = ();

    #[inline(always)]
    fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
        let Self { lhs, rhs, out, op } = self;
        let lanes = lanes_of::<S, E>();
        let (lhs_simd, lhs_tail) = E::as_simd::<S>(lhs);
        let head = lhs_simd.len() * lanes;
        let (out_head, out_tail) = out[..lhs.len()].split_at_mut(head);

        match rhs {
            Operand::Slice(rhs) => {
                let (rhs_simd, rhs_tail) = E::as_simd::<S>(rhs);
                for ((a, b), chunk) in lhs_simd.iter().zip(rhs_simd).zip(out_head.chunks_exact_mut(lanes)) {
                    write_mask::<S, E>(E::compare_simd(simd, op, *a, *b), chunk);
                }
                for ((m, &a), &b) in out_tail.iter_mut().zip(lhs_tail).zip(rhs_tail) {
                    *m = op.mask(a, b);
                }
            }
            Operand::Splat(value) => {
                let b = E::splat(simd, value);
                for (a, chunk) in lhs_simd.iter().zip(out_head.chunks_exact_mut(lanes)) {
                    write_mask::<S, E>(E::compare_simd(simd, op, *a, b), chunk);
                }
                for (m, &a) in out_tail.iter_mut().zip(lhs_tail) {
                    *m = op.mask(a, value);
                }
            }
        }
    }
}

#[inline(always)]
fn lanes_of<S: Simd, E: SimdElement>() -> usize {
    (std::mem::size_of::<E::Simd<S>>() / std::mem::size_of::<E>()).min(MAX_LANES)
}

/// Spill one vector of `one()`/`zero()` lanes into mask bytes.
#[inline(always)]
fn write_mask<S: Simd, E: SimdElement>(truth: E::Simd<S>, out: &mut [u8]) {
    let lanes = out.len();
    let mut spill = [E::zero(); MAX_LANES];
    {
        let (vectors, _) = E::as_mut_simd::<S>(&mut spill[..lanes]);
        if let Some(slot) = vectors.first_mut() {
            *slot = truth;
        }
    }
    for (m, v) in out.iter_mut().zip(&spill[..lanes]) {
        *m = if v.is_zero() { 0 } else { u8::MAX };
    }
}

/// Sum the lanes of one vector by spilling it to a scratch array.
#[inline(always)]
fn horizontal_sum<S: Simd, E: SimdElement>(acc: E::Simd<S>) -> E {
    let lanes = lanes_of::<S, E>();
    let mut spill = [E::zero(); MAX_LANES];
    {
        let (vectors, _) = E::as_mut_simd::<S>(&mut spill[..lanes]);
        if let Some(slot) = vectors.first_mut() {
            *slot = acc;
        }
    }
    spill[..lanes]
        .iter()
        .fold(E::zero(), |sum, &v| sum.wrapping_add(v))
}

/// `lhs[i] = op(lhs[i], rhs[i])` over the common length.
#[inline]
pub fn binary_in_place<E: SimdElement, Op: SimdBinaryOp<E>>(lhs: &mut [E], rhs: &[E]) {
    debug_assert_eq!(lhs.len(), rhs.len());
    Arch::new().dispatch(BinaryInPlace::<E, Op> {
        lhs,
        rhs,
        _op: PhantomData,
    });
}

/// `lhs[i] = op(lhs[i], rhs)`.
#[inline]
pub fn scalar_in_place<E: SimdElement, Op: SimdBinaryOp<E>>(lhs: &mut [E], rhs: E) {
    Arch::new().dispatch(ScalarInPlace::<E, Op> {
        lhs,
        rhs,
        _op: PhantomData,
    });
}

/// `Σ lhs[i] * rhs[i]`, accumulated lane-wise then reduced.
#[inline]
pub fn dot<E>(lhs: &[E], rhs: &[E]) -> E
where
    E: SimdElement,
    AddOp: SimdBinaryOp<E>,
    MulOp: SimdBinaryOp<E>,
{
    debug_assert_eq!(lhs.len(), rhs.len());
    Arch::new().dispatch(Dot { lhs, rhs })
}

/// Write the comparison mask of `lhs` against `rhs` into `out`.
#[inline]
pub fn compare<E: SimdCompare>(lhs: &[E], rhs: &[E], out: &mut [u8], op: CompareOp) {
    debug_assert_eq!(lhs.len(), rhs.len());
    Arch::new().dispatch(CompareInto {
        lhs,
        rhs: Operand::Slice(rhs),
        out,
        op,
    });
}

/// Write the comparison mask of `lhs` against one value into `out`.
#[inline]
pub fn compare_scalar<E: SimdCompare>(lhs: &[E], rhs: E, out: &mut [u8], op: CompareOp) {
    Arch::new().dispatch(CompareInto {
        lhs,
        rhs: Operand::Splat(rhs),
        out,
        op,
    });
}
