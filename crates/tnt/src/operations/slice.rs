//! Range resolution for tensor and view slicing.

use crate::error::TensorError;
use crate::range::Range;
use crate::shape::Shape;
use crate::strides::Stride;

/// A resolved sub-window: its shape and the buffer offset of its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Window {
    pub shape: Shape,
    pub offset: usize,
}

/// Resolve one bound against an axis extent. Negative values count from the
/// end so that `-1` maps to `extent`.
#[inline]
fn resolve_bound(value: isize, extent: usize) -> isize {
    if value < 0 {
        extent as isize + value + 1
    } else {
        value
    }
}

/// Resolve `ranges` against `shape` into a window of a parent buffer.
///
/// Axes past the end of `ranges` are taken whole. The window keeps the
/// parent's strides; only the shape and origin change.
pub(crate) fn resolve_window(
    shape: &Shape,
    stride: &Stride,
    offset: usize,
    ranges: &[Range],
    function: &'static str,
) -> Result<Window, TensorError> {
    crate::ensure!(
        ranges.len() <= shape.num_axes(),
        InvalidParameter,
        function,
        "Got {} ranges for a tensor with {} axes",
        ranges.len(),
        shape.num_axes()
    );

    let mut axes = Shape::default();
    let mut origin = offset;

    for (axis, &extent) in shape.axes().iter().enumerate() {
        let range = ranges.get(axis).copied().unwrap_or_default();
        let begin = resolve_bound(range.begin, extent);
        let end = resolve_bound(range.end, extent);
        let limit = extent as isize + 1;

        crate::ensure_bounds!(function, begin, 0isize, limit);
        crate::ensure_bounds!(function, end, 0isize, limit);
        crate::ensure!(
            begin <= end,
            InvalidParameter,
            function,
            "Range on axis {axis} resolves to [{begin} -> {end})"
        );

        axes.push((end - begin) as usize);
        origin += begin as usize * stride.as_slice()[axis];
    }

    Ok(Window {
        shape: axes,
        offset: origin,
    })
}

/// Buffer position of a multi-index inside a strided window.
pub(crate) fn view_position(
    shape: &Shape,
    stride: &Stride,
    offset: usize,
    loc: &[usize],
) -> Result<usize, TensorError> {
    crate::ensure!(
        loc.len() == shape.num_axes(),
        InvalidParameter,
        "tnt::TensorView::get()",
        "Got {} indices for a view with {} axes",
        loc.len(),
        shape.num_axes()
    );
    for (&i, &extent) in loc.iter().zip(shape.axes()) {
        crate::ensure_bounds!("tnt::TensorView::get()", i, 0usize, extent);
    }
    Ok(offset + crate::strides::cartesian_to_linear(loc, stride.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn window(shape: &[usize], ranges: &[Range]) -> Result<Window, TensorError> {
        let shape = Shape::new(shape);
        resolve_window(&shape, &Stride::from_shape(&shape), 0, ranges, "test")
    }

    #[test]
    fn test_negative_bounds() {
        let w = window(&[4, 5], &[Range::new(-3, -1), Range::new(0, -2)]).unwrap();
        assert_eq!(w.shape.axes(), &[2, 4]);
        assert_eq!(w.offset, 2 * 5);
    }

    #[test]
    fn test_missing_axes_are_full() {
        let w = window(&[2, 3, 4], &[Range::at(1)]).unwrap();
        assert_eq!(w.shape.axes(), &[1, 3, 4]);
        assert_eq!(w.offset, 12);
    }

    #[test]
    fn test_empty_range_allowed() {
        let w = window(&[3], &[Range::new(3, 3)]).unwrap();
        assert_eq!(w.shape.axes(), &[0]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            window(&[3], &[Range::new(0, 5)]).unwrap_err().kind(),
            ErrorKind::OutOfBoundsAccess
        );
        assert_eq!(
            window(&[3], &[Range::new(-5, 2)]).unwrap_err().kind(),
            ErrorKind::OutOfBoundsAccess
        );
        assert_eq!(
            window(&[3], &[Range::new(2, 1)]).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            window(&[3], &[Range::full(), Range::full()]).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_view_position() {
        let shape = Shape::new(&[2, 2]);
        let stride = Stride::new(&[3, 1]);
        assert_eq!(view_position(&shape, &stride, 4, &[1, 1]).unwrap(), 8);
        assert!(view_position(&shape, &stride, 4, &[2, 0]).is_err());
    }
}
