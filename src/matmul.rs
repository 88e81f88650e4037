//! Parallel multiply of a row-major left operand with a pre-transposed right operand.
//!
//! `out[row, col] = dot(left.row(row), right_transposed.row(col))`. Both rows are read
//! contiguously, which is the reason the right operand is transposed first.
//!
//! The `dim²` output cells are numbered `idx = col + row * dim`, the same order they are
//! stored in, and split into one contiguous range per worker. Each worker therefore owns a
//! contiguous sub-slice of `out` and only reads the two inputs.

use log::debug;

use crate::matrix::{MatrixMut, MatrixRef};
use crate::partition::{partition, WorkRange};
use crate::pool::TaskGroup;
use crate::simd::dot;

/// Fills `out` with `left · right` where `right_transposed` holds `rightᵗ`.
///
/// # Panics
///
/// Panics if the three matrices differ in dimension.
pub fn matmul(
    group: &TaskGroup,
    out: &mut MatrixMut<'_>,
    left: MatrixRef<'_>,
    right_transposed: MatrixRef<'_>,
) {
    let dim = out.dim();
    assert_eq!(left.dim(), dim, "left operand has incorrect dimensions");
    assert_eq!(
        right_transposed.dim(),
        dim,
        "right operand has incorrect dimensions"
    );

    let cells = out.as_mut_slice();
    let total = cells.len();

    let mut jobs = Vec::with_capacity(group.workers().get());
    let mut rest = cells;
    for range in partition(total, group.workers()) {
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len);
        rest = tail;
        if !range.is_empty() {
            jobs.push((range, chunk));
        }
    }

    debug!(
        "matmul {0}x{0}: {1} cells over {2} ranges",
        dim,
        total,
        jobs.len()
    );

    group.scope_each(jobs, |(range, chunk)| {
        compute_cells(range, chunk, left, right_transposed);
    });
}

#[inline(always)]
fn compute_cells(
    range: WorkRange,
    chunk: &mut [f32],
    left: MatrixRef<'_>,
    right_transposed: MatrixRef<'_>,
) {
    let dim = left.dim();
    for (idx, cell) in range.as_range().zip(chunk.iter_mut()) {
        let row = idx / dim;
        let col = idx % dim;
        *cell = dot(left.row(row), right_transposed.row(col));
    }
}

/// Naive triple loop `out = left · right` on untransposed operands, used as a reference.
pub fn naive_matmul(out: &mut MatrixMut<'_>, left: MatrixRef<'_>, right: MatrixRef<'_>) {
    let dim = out.dim();
    for row in 0..dim {
        for col in 0..dim {
            let mut sum = 0.0f32;
            for k in 0..dim {
                sum += left.get(row, k) * right.get(k, col);
            }
            out.set(row, col, sum);
        }
    }
}
