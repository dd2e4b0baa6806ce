//! Portable blocked matrix multiply.
//!
//! K and M are cut into `TILE_K × TILE_M` blocks. Inside a block, N is
//! streamed in panels of `NR` columns and each `MR × NR` register tile is
//! produced by [`microkernel`]. Rows and columns that do not fill a whole
//! register tile are finished by [`accumulate_block`].

use std::ops::Range;

use crate::backend::MatmulDims;
use crate::scalar::Element;

/// Rows of `lhs` per cache block. A multiple of [`MR`].
pub const TILE_M: usize = 64;
/// Depth of one cache block.
pub const TILE_K: usize = 256;
/// Register tile rows.
pub const MR: usize = 4;
/// Register tile columns.
pub const NR: usize = 8;

/// Overwrite `out(m×n)` with `lhs(m×k) · rhs(k×n)`, all row-major.
pub(crate) fn tiled_matmul<T: Element>(lhs: &[T], rhs: &[T], out: &mut [T], dims: MatmulDims) {
    let MatmulDims { m, k, n } = dims;
    out[..m * n].fill(T::zero());

    let full_n = n - n % NR;

    for k0 in (0..k).step_by(TILE_K) {
        let depth = k0..(k0 + TILE_K).min(k);

        for i0 in (0..m).step_by(TILE_M) {
            let i_end = (i0 + TILE_M).min(m);
            let i_full = i0 + (i_end - i0) / MR * MR;

            for j in (0..full_n).step_by(NR) {
                for i in (i0..i_full).step_by(MR) {
                    microkernel(lhs, rhs, out, dims, i, j, depth.clone());
                }
            }

            // ragged columns
            accumulate_block(lhs, rhs, out, dims, i0..i_full, full_n..n, depth.clone());
            // ragged rows
            accumulate_block(lhs, rhs, out, dims, i_full..i_end, 0..full_n, depth.clone());
            // corner
            accumulate_block(lhs, rhs, out, dims, i_full..i_end, full_n..n, depth.clone());
        }
    }
}

/// `out[i..i+MR, j..j+NR] += lhs[i..i+MR, depth] · rhs[depth, j..j+NR]`.
#[inline]
fn microkernel<T: Element>(
    lhs: &[T],
    rhs: &[T],
    out: &mut [T],
    dims: MatmulDims,
    i: usize,
    j: usize,
    depth: Range<usize>,
) {
    let MatmulDims { k, n, .. } = dims;
    let mut acc = [[T::zero(); NR]; MR];

    for p in depth {
        let b = &rhs[p * n + j..p * n + j + NR];
        for (r, acc_row) in acc.iter_mut().enumerate() {
            let a = lhs[(i + r) * k + p];
            for (c, &bv) in acc_row.iter_mut().zip(b) {
                *c = c.wrapping_add(a.wrapping_mul(bv));
            }
        }
    }

    for (r, acc_row) in acc.iter().enumerate() {
        let row = (i + r) * n + j;
        for (o, &v) in out[row..row + NR].iter_mut().zip(acc_row) {
            *o = o.wrapping_add(v);
        }
    }
}

/// Naive accumulate into `out` over an arbitrary rectangle.
fn accumulate_block<T: Element>(
    lhs: &[T],
    rhs: &[T],
    out: &mut [T],
    dims: MatmulDims,
    rows: Range<usize>,
    cols: Range<usize>,
    depth: Range<usize>,
) {
    if rows.is_empty() || cols.is_empty() {
        return;
    }
    let MatmulDims { k, n, .. } = dims;
    for i in rows {
        for p in depth.clone() {
            let a = lhs[i * k + p];
            for j in cols.clone() {
                out[i * n + j] = out[i * n + j].wrapping_add(a.wrapping_mul(rhs[p * n + j]));
            }
        }
    }
}
