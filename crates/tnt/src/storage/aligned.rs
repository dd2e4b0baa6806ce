//! Owned, SIMD-aligned element buffer.

use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use crate::config::{SIMD_ALIGNMENT, aligned_buffer_size};
use crate::error::TensorError;
use crate::scalar::Element;

/// Heap buffer of `len` elements, aligned to [`SIMD_ALIGNMENT`] bytes.
///
/// The allocation is rounded up to a whole number of SIMD blocks and is
/// zero-filled, so vector kernels can process the padded capacity without a
/// scalar remainder loop. Only the first `len` elements are observable
/// through the safe API.
///
/// A buffer with `len == 0` holds no allocation and is *null*.
///
/// - `Clone` reallocates and copies the contents.
/// - [`take`](Self::take) moves the allocation out and leaves the source null.
///
/// ```
/// use tnt::storage::AlignedPtr;
///
/// let mut buf: AlignedPtr<f32> = AlignedPtr::new(3);
/// assert_eq!(buf.as_slice(), &[0.0, 0.0, 0.0]);
/// assert_eq!(buf.as_ptr() as usize % 32, 0);
///
/// buf[1] = 2.5;
/// let moved = buf.take();
/// assert!(buf.is_null());
/// assert_eq!(moved[1], 2.5);
/// ```
pub struct AlignedPtr<T: Element> {
    ptr: Option<NonNull<T>>,
    len: usize,
    capacity: usize,
}

// SAFETY: `AlignedPtr` exclusively owns its allocation.
unsafe impl<T: Element> Send for AlignedPtr<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Element> Sync for AlignedPtr<T> {}

fn layout_for<T>(capacity: usize) -> Layout {
    let align = SIMD_ALIGNMENT.max(std::mem::align_of::<T>());
    match std::mem::size_of::<T>()
        .checked_mul(capacity)
        .map(|bytes| Layout::from_size_align(bytes, align))
    {
        Some(Ok(layout)) => layout,
        _ => panic!("AlignedPtr capacity overflow: {capacity} elements"),
    }
}

impl<T: Element> AlignedPtr<T> {
    /// A null buffer with no allocation.
    #[inline]
    pub const fn null() -> Self {
        Self {
            ptr: None,
            len: 0,
            capacity: 0,
        }
    }

    /// Allocate `len` zeroed elements.
    ///
    /// Aborts through [`std::alloc::handle_alloc_error`] if the allocator fails.
    pub fn new(len: usize) -> Self {
        if len == 0 {
            return Self::null();
        }

        let capacity = aligned_buffer_size::<T>(len);
        let layout = layout_for::<T>(capacity);
        // SAFETY: `layout` has non-zero size since `len > 0` and `T` is not zero-sized.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = match NonNull::new(raw as *mut T) {
            Some(p) => p,
            None => alloc::handle_alloc_error(layout),
        };
        log::trace!("allocated {capacity} x {} ({} bytes)", T::NAME, layout.size());

        Self {
            ptr: Some(ptr),
            len,
            capacity,
        }
    }

    /// Allocate and copy `data`.
    pub fn from_slice(data: &[T]) -> Self {
        let mut buf = Self::new(data.len());
        buf.as_mut_slice().copy_from_slice(data);
        buf
    }

    /// Allocate `len` elements set to `value`.
    pub fn filled(len: usize, value: T) -> Self {
        let mut buf = Self::new(len);
        buf.fill(value);
        buf
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements actually allocated, a multiple of the SIMD block size.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the buffer holds no allocation.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Raw pointer to the first element, null if the buffer is null.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.map_or(std::ptr::null(), |p| p.as_ptr() as *const T)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.padded()[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.padded_mut()[..len]
    }

    /// The whole allocation, including padding past `len`.
    #[inline]
    pub(crate) fn padded(&self) -> &[T] {
        match self.ptr {
            // SAFETY: `capacity` elements were allocated and zero-initialized,
            // and every `Element` is valid for any bit pattern written by safe code.
            Some(p) => unsafe { std::slice::from_raw_parts(p.as_ptr(), self.capacity) },
            None => &[],
        }
    }

    #[inline]
    pub(crate) fn padded_mut(&mut self) -> &mut [T] {
        match self.ptr {
            // SAFETY: as in `padded`, and `&mut self` guarantees exclusive access.
            Some(p) => unsafe { std::slice::from_raw_parts_mut(p.as_ptr(), self.capacity) },
            None => &mut [],
        }
    }

    /// Checked element access.
    ///
    /// # Errors
    ///
    /// `OutOfBoundsAccess` if `i >= len`.
    pub fn get(&self, i: usize) -> Result<&T, TensorError> {
        crate::ensure_bounds!("tnt::AlignedPtr::get()", i, 0usize, self.len);
        Ok(&self.as_slice()[i])
    }

    /// Checked mutable element access.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut T, TensorError> {
        crate::ensure_bounds!("tnt::AlignedPtr::get()", i, 0usize, self.len);
        Ok(&mut self.as_mut_slice()[i])
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Move the allocation out, leaving `self` null.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    fn as_bytes(&self) -> &[u8] {
        let slice = self.as_slice();
        // SAFETY: `Element` types are plain numbers without padding bytes.
        unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
    }
}

impl<T: Element> Drop for AlignedPtr<T> {
    fn drop(&mut self) {
        if let Some(p) = self.ptr.take() {
            // SAFETY: `p` came from `alloc_zeroed` with this exact layout.
            unsafe { alloc::dealloc(p.as_ptr() as *mut u8, layout_for::<T>(self.capacity)) };
        }
    }
}

impl<T: Element> Default for AlignedPtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: Element> Clone for AlignedPtr<T> {
    fn clone(&self) -> Self {
        let mut buf = Self::new(self.len);
        buf.padded_mut().copy_from_slice(self.padded());
        buf
    }
}

impl<T: Element> PartialEq for AlignedPtr<T> {
    /// Equal sizes and byte-identical contents. Two null buffers are equal.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.as_bytes() == other.as_bytes()
    }
}

impl<T: Element> Index<usize> for AlignedPtr<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match self.get(i) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Element> IndexMut<usize> for AlignedPtr<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match self.get_mut(i) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'a, T: Element> IntoIterator for &'a AlignedPtr<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Element> fmt::Debug for AlignedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedPtr")
            .field("len", &self.len)
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<T: Element> fmt::Display for AlignedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_is_zeroed_and_aligned() {
        let buf: AlignedPtr<i16> = AlignedPtr::new(5);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.capacity(), 16);
        assert!(buf.padded().iter().all(|&v| v == 0));
        assert_eq!(buf.as_ptr() as usize % SIMD_ALIGNMENT, 0);
    }

    #[test]
    fn test_zero_len_is_null() {
        let buf: AlignedPtr<f64> = AlignedPtr::new(0);
        assert!(buf.is_null());
        assert!(buf.as_ptr().is_null());
        assert_eq!(buf, AlignedPtr::null());
    }

    #[test]
    fn test_clone_is_deep() {
        let a = AlignedPtr::from_slice(&[1u32, 2, 3]);
        let mut b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a.as_ptr(), b.as_ptr());
        b[0] = 9;
        assert_eq!(a[0], 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_take_nulls_source() {
        let mut a = AlignedPtr::filled(4, 7u8);
        let b = a.take();
        assert!(a.is_null());
        assert_eq!(a.len(), 0);
        assert_eq!(b.as_slice(), &[7, 7, 7, 7]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = AlignedPtr::from_slice(&[1.0f32, 2.0]);
        assert_eq!(*buf.get(1).unwrap(), 2.0);
        assert_eq!(buf.get(2).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
        assert_eq!(buf.get_mut(2).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
    }

    #[test]
    #[should_panic(expected = "Index: 3 Range: [0 -> 3)")]
    fn test_index_panics() {
        let buf = AlignedPtr::from_slice(&[1i64, 2, 3]);
        let _ = buf[3];
    }

    #[test]
    fn test_size_mismatch_not_equal() {
        let a = AlignedPtr::from_slice(&[1u8, 2]);
        let b = AlignedPtr::from_slice(&[1u8, 2, 0]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let buf = AlignedPtr::from_slice(&[1, 2, 3]);
        assert_eq!(buf.to_string(), "[1, 2, 3]");
    }
}
