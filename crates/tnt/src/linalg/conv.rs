use crate::backend::Kernel;
use crate::error::TensorError;
use crate::scalar::Element;
use crate::tensor::Tensor;

/// Padding and stride for [`conv3d`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvOptions<T> {
    /// Cells of padding added on each side of both spatial axes.
    pub pad: usize,
    /// Value read from padding cells.
    pub pad_value: T,
    /// Step between window origins. Must be at least 1.
    pub stride: usize,
}

impl<T: Element> Default for ConvOptions<T> {
    fn default() -> Self {
        Self {
            pad: 0,
            pad_value: T::zero(),
            stride: 1,
        }
    }
}

/// Slide a `{KH, KW, C}` kernel over a `{H, W, C}` tensor.
///
/// Output cell `(y, x)` is the sum over the window starting at
/// `(y·stride - pad, x·stride - pad)` and all channels of
/// `input · kernel`. The output has shape
/// `{(H - KH + 2·pad)/stride + 1, (W - KW + 2·pad)/stride + 1}`.
///
/// # Errors
///
/// `InvalidParameter` if either operand is not rank 3, the channel counts
/// differ, the padded input is smaller than the kernel or `stride` is 0.
///
/// ```
/// use tnt::Tensor;
/// use tnt::linalg::{ConvOptions, conv3d};
///
/// let image = Tensor::from_vec((1..=9).collect(), [3, 3, 1]).unwrap();
/// let kernel = Tensor::full([2, 2, 1], 1);
/// let out = conv3d(&image, &kernel, ConvOptions::default()).unwrap();
/// assert_eq!(out.data(), &[12, 16, 24, 28]);
/// ```
pub fn conv3d<T: Element>(
    tensor: &Tensor<T>,
    kernel: &Tensor<T>,
    options: ConvOptions<T>,
) -> Result<Tensor<T>, TensorError> {
    crate::ensure!(
        tensor.num_axes() == 3,
        InvalidParameter,
        "tnt::conv3d()",
        "3D convolution requires a 3D tensor, got {}",
        tensor.shape()
    );
    crate::ensure!(
        kernel.num_axes() == 3,
        InvalidParameter,
        "tnt::conv3d()",
        "3D convolution requires a 3D kernel, got {}",
        kernel.shape()
    );
    let (h, w, channels) = {
        let axes = tensor.shape().axes();
        (axes[0], axes[1], axes[2])
    };
    let (kh, kw, kernel_channels) = {
        let axes = kernel.shape().axes();
        (axes[0], axes[1], axes[2])
    };
    let ConvOptions { pad, pad_value, stride } = options;
    crate::ensure!(
        channels == kernel_channels,
        InvalidParameter,
        "tnt::conv3d()",
        "Channel counts differ: {} vs {}",
        tensor.shape(),
        kernel.shape()
    );
    crate::ensure!(
        h + 2 * pad >= kh && w + 2 * pad >= kw,
        InvalidParameter,
        "tnt::conv3d()",
        "Padded tensor {} (pad {}) is smaller than kernel {}",
        tensor.shape(),
        pad,
        kernel.shape()
    );
    crate::ensure!(stride >= 1, InvalidParameter, "tnt::conv3d()", "Stride must be at least 1");

    let out_h = (h + 2 * pad - kh) / stride + 1;
    let out_w = (w + 2 * pad - kw) / stride + 1;

    let input = tensor.data();
    let weights = kernel.data();
    let padding = vec![pad_value; channels];
    let mut out = Tensor::new([out_h, out_w]);

    for (cell, value) in out.iter_mut().enumerate() {
        let (oy, ox) = (cell / out_w, cell % out_w);
        let mut acc = T::zero();
        for ky in 0..kh {
            for kx in 0..kw {
                let weight = &weights[(ky * kw + kx) * channels..][..channels];
                let iy = (oy * stride + ky).checked_sub(pad).filter(|&y| y < h);
                let ix = (ox * stride + kx).checked_sub(pad).filter(|&x| x < w);
                let pixel = match (iy, ix) {
                    (Some(y), Some(x)) => &input[(y * w + x) * channels..][..channels],
                    _ => &padding[..],
                };
                acc = acc.wrapping_add(T::Kernel::dot(pixel, weight));
            }
        }
        *value = acc;
    }
    Ok(out)
}
