//! Build-time configuration.
//!
//! Precondition and bounds checks are on unless the crate is built with the
//! `disable-checks` feature. Every check in the crate goes through
//! [`ensure!`](crate::ensure) or [`ensure_bounds!`](crate::ensure_bounds),
//! which read [`CHECKS_ENABLED`].

/// Whether precondition and bounds checks are compiled in.
pub const CHECKS_ENABLED: bool = !cfg!(feature = "disable-checks");

/// Whether floating-point matrix multiply is routed through faer.
pub const FAER_GEMM: bool = cfg!(feature = "faer-gemm");

/// Byte alignment of every [`AlignedPtr`](crate::storage::AlignedPtr) allocation.
pub const SIMD_ALIGNMENT: usize = 32;

/// Returns `true` if checks are compiled in.
///
/// # Example
///
/// ```
/// assert_eq!(tnt::config::checks_enabled(), tnt::config::CHECKS_ENABLED);
/// ```
#[inline]
pub const fn checks_enabled() -> bool {
    CHECKS_ENABLED
}

/// Number of `T` elements in one SIMD block of [`SIMD_ALIGNMENT`] bytes.
///
/// Zero-sized types count as one lane.
#[inline]
pub const fn lane_count<T>() -> usize {
    let size = std::mem::size_of::<T>();
    if size == 0 || size >= SIMD_ALIGNMENT {
        1
    } else {
        SIMD_ALIGNMENT / size
    }
}

/// Number of blocks needed to hold `len` elements of `T`.
#[inline]
pub const fn num_aligned_blocks<T>(len: usize) -> usize {
    len.div_ceil(lane_count::<T>())
}

/// `len` rounded up to a whole number of SIMD blocks.
///
/// # Example
///
/// ```
/// use tnt::config::aligned_buffer_size;
///
/// assert_eq!(aligned_buffer_size::<f32>(1), 8);
/// assert_eq!(aligned_buffer_size::<f32>(8), 8);
/// assert_eq!(aligned_buffer_size::<f64>(5), 8);
/// assert_eq!(aligned_buffer_size::<u8>(0), 0);
/// ```
#[inline]
pub const fn aligned_buffer_size<T>(len: usize) -> usize {
    num_aligned_blocks::<T>(len) * lane_count::<T>()
}
