//! Integration tests for tensor construction, storage and element access.

use tnt::{AlignedPtr, ErrorKind, Index, Shape, Stride, Tensor};

#[test]
fn test_shape_totals() {
    let shape = Shape::new(&[2, 3, 4]);
    assert_eq!(shape.total(), 24);
    assert_eq!(shape.total_range(1, None).unwrap(), 12);
    assert_eq!(shape.total_range(0, Some(0)).unwrap(), 1);
    assert_eq!(Shape::new(&[]).total(), 0);
}

#[test]
fn test_out_of_bounds_on_every_container() {
    let shape = Shape::new(&[2, 3]);
    assert_eq!(shape.get(2).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);

    let stride = Stride::from_shape(&shape);
    assert_eq!(stride.get(2).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);

    let index = Index::new(&shape);
    assert_eq!(index.get(2).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);

    let ptr = AlignedPtr::<f32>::new(6);
    assert_eq!(ptr.get(6).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);

    let tensor: Tensor<f32> = Tensor::new(shape);
    assert_eq!(tensor.get(&[0, 3]).unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
}

#[test]
fn test_aligned_ptr_copy_and_take() {
    let mut original = AlignedPtr::from_slice(&[1u16, 2, 3, 4, 5]);
    let copy = original.clone();
    assert_eq!(copy, original);
    assert_ne!(copy.as_ptr(), original.as_ptr());

    let moved = original.take();
    assert!(original.is_null());
    assert_eq!(original.len(), 0);
    assert_eq!(moved, copy);
}

#[test]
fn test_storage_is_aligned_and_padded() {
    let t: Tensor<f64> = Tensor::new([3, 3]);
    assert_eq!(t.buffer().as_ptr() as usize % 32, 0);
    assert_eq!(t.buffer().capacity() % 4, 0);
    assert!(t.buffer().capacity() >= 9);
}

#[test]
fn test_value_equality() {
    assert_eq!(Tensor::full([2, 5], 7i8), Tensor::full([2, 5], 7i8));
    assert_ne!(Tensor::full([2, 5], 7i8), Tensor::full([5, 2], 7i8));
    assert_ne!(Tensor::full([2, 5], 7i8), Tensor::full([2, 5], 8i8));
}

#[test]
fn test_constructors() {
    let eye = Tensor::<f32>::identity([3, 3]).unwrap();
    assert_eq!(eye.data(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    let r = Tensor::arange(0.0f64, 1.0, 0.25).unwrap();
    assert_eq!(r.data(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(
        Tensor::arange(3i32, 1, 1).unwrap_err().kind(),
        ErrorKind::InvalidParameter
    );

    let z = Tensor::<u32>::zeros([4]);
    assert_eq!(z.ones_like().data(), &[1, 1, 1, 1]);

    assert_eq!(
        Tensor::from_vec(vec![1, 2, 3], [2, 2]).unwrap_err().kind(),
        ErrorKind::InvalidParameter
    );
}

#[test]
fn test_scalar_extraction() {
    assert_eq!(Tensor::full([1], 4.5f32).scalar().unwrap(), 4.5);
    let empty: Tensor<f32> = Tensor::default();
    assert_eq!(empty.scalar().unwrap_err().kind(), ErrorKind::OutOfBoundsAccess);
}

#[test]
fn test_transpose_involution() {
    let t = Tensor::from_vec((0..12).collect::<Vec<i64>>(), [3, 4]).unwrap();
    let tt = t.transpose().unwrap();
    assert_eq!(tt.shape().axes(), &[4, 3]);
    assert_eq!(tt[[1, 2]], t[[2, 1]]);
    assert_eq!(tt.transpose().unwrap(), t);
}

#[test]
fn test_reshape_and_cast() {
    let mut t = Tensor::arange(1u8, 6, 1).unwrap();
    t.reshape([2, 3]).unwrap();
    assert_eq!(t[[1, 0]], 4);
    assert_eq!(t.reshape([4]).unwrap_err().kind(), ErrorKind::InvalidParameter);

    let f = t.cast::<f32>();
    assert_eq!(f.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_display() {
    let t = Tensor::from_vec(vec![1u8, 2], [2]).unwrap();
    let text = t.to_string();
    assert!(text.contains("Shape: {2}"));
    assert!(text.contains("Type: u8"));
    assert!(text.contains("[1, 2]"));
}
