//! Slice ranges.

use std::fmt;

/// Half-open interval `[begin, end)` along one axis.
///
/// Negative bounds are resolved by the slicing code as `extent + v + 1`, so
/// `-1` means "through the last element". [`Range::full`] is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub begin: isize,
    pub end: isize,
}

impl Range {
    #[inline]
    pub const fn new(begin: isize, end: isize) -> Self {
        Self { begin, end }
    }

    /// The whole axis.
    #[inline]
    pub const fn full() -> Self {
        Self::new(0, -1)
    }

    /// A single position.
    #[inline]
    pub const fn at(loc: isize) -> Self {
        Self::new(loc, loc + 1)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::full()
    }
}

impl From<isize> for Range {
    fn from(loc: isize) -> Self {
        Self::at(loc)
    }
}

impl From<i32> for Range {
    fn from(loc: i32) -> Self {
        Self::at(loc as isize)
    }
}

impl From<usize> for Range {
    fn from(loc: usize) -> Self {
        Self::at(loc as isize)
    }
}

impl From<std::ops::Range<isize>> for Range {
    fn from(r: std::ops::Range<isize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<std::ops::RangeFull> for Range {
    fn from(_: std::ops::RangeFull) -> Self {
        Self::full()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range: {{{} -> {}}}", self.begin, self.end)
    }
}

/// Collapse a mixed list of positions and ranges into `Vec<Range>`, in order.
///
/// ```
/// use tnt::range::{Range, make_range_list};
///
/// let list = make_range_list([Range::from(1), Range::full(), Range::new(0, 2)]);
/// assert_eq!(list, vec![Range::new(1, 2), Range::new(0, -1), Range::new(0, 2)]);
/// ```
pub fn make_range_list<I>(items: I) -> Vec<Range>
where
    I: IntoIterator,
    I::Item: Into<Range>,
{
    items.into_iter().map(Into::into).collect()
}

/// Build a `Vec<Range>` from mixed integers and ranges.
///
/// ```
/// use tnt::ranges;
/// use tnt::range::Range;
///
/// assert_eq!(ranges![0, Range::new(0, -1)], vec![Range::new(0, 1), Range::full()]);
/// assert_eq!(ranges![.., 1], vec![Range::full(), Range::new(1, 2)]);
/// ```
#[macro_export]
macro_rules! ranges {
    () => {
        ::std::vec::Vec::<$crate::range::Range>::new()
    };
    ($($item:expr),+ $(,)?) => {
        vec![$($crate::range::Range::from($item)),+]
    };
}
