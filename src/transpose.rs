//! Parallel in-place transpose of a square matrix.
//!
//! The `T(dim - 1)` off-diagonal swaps are numbered with the strict-lower-triangle offsets
//! from [`crate::triangle`] and split into one contiguous range per worker. A worker
//! resolves its first offset to `(row, col)` once and walks the rest of its range with
//! increment-and-wrap, swapping `(row, col)` with `(col, row)` at each step. Every
//! mirrored pair belongs to exactly one offset, so workers never touch the same cell.

use log::debug;

use crate::matrix::MatrixMut;
use crate::partition::{partition, WorkRange};
use crate::pool::TaskGroup;
use crate::triangle::{off_diagonal_cells, TriangleWalk};

/// Swaps every `(row, col)` with `(col, row)`, leaving the diagonal in place.
pub fn transpose(group: &TaskGroup, matrix: &mut MatrixMut<'_>) {
    let swaps = off_diagonal_cells(matrix.dim());

    let ranges: Vec<WorkRange> = partition(swaps, group.workers())
        .filter(|range| !range.is_empty())
        .collect();

    debug!(
        "transpose {0}x{0}: {1} swaps over {2} ranges",
        matrix.dim(),
        swaps,
        ranges.len()
    );

    let cells = matrix.shared();
    group.scope_each(ranges, |range| {
        for cell in TriangleWalk::new(range) {
            // SAFETY: offsets of different ranges map to different mirrored pairs.
            unsafe { cells.swap_mirrored(cell.row, cell.col) };
        }
    });
}

/// Single-threaded transpose used as a reference.
pub fn scalar_transpose(matrix: &mut MatrixMut<'_>) {
    let dim = matrix.dim();
    for row in 0..dim {
        for col in 0..row {
            let lower = matrix.get(row, col);
            let upper = matrix.get(col, row);
            matrix.set(row, col, upper);
            matrix.set(col, row, lower);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn group(workers: usize) -> TaskGroup {
        TaskGroup::new(NonZeroUsize::new(workers).unwrap())
    }

    fn numbered(dim: usize) -> Vec<f32> {
        (0..dim * dim).map(|v| v as f32).collect()
    }

    #[test]
    fn test_transpose_3x3() {
        let mut data = numbered(3);
        transpose(&group(2), &mut MatrixMut::new(&mut data, 3).unwrap());
        assert_eq!(data, vec![0.0, 3.0, 6.0, 1.0, 4.0, 7.0, 2.0, 5.0, 8.0]);
    }

    #[test]
    fn test_transpose_1x1_is_noop() {
        let mut data = vec![42.0];
        transpose(&group(4), &mut MatrixMut::new(&mut data, 1).unwrap());
        assert_eq!(data, vec![42.0]);
    }

    #[test]
    fn test_matches_scalar_for_any_worker_count() {
        for dim in [2, 3, 5, 8, 13, 31] {
            let mut expected = numbered(dim);
            scalar_transpose(&mut MatrixMut::new(&mut expected, dim).unwrap());

            for workers in [1, 2, 3, 7, 16, 64] {
                let mut data = numbered(dim);
                transpose(&group(workers), &mut MatrixMut::new(&mut data, dim).unwrap());
                assert_eq!(data, expected, "dim {dim}, {workers} workers");
            }
        }
    }

    #[test]
    fn test_involution_and_fixed_diagonal() {
        for dim in 1..=20 {
            let original = numbered(dim);
            let mut data = original.clone();
            let g = group(5);

            transpose(&g, &mut MatrixMut::new(&mut data, dim).unwrap());
            for i in 0..dim {
                assert_eq!(data[i + i * dim], original[i + i * dim]);
            }

            transpose(&g, &mut MatrixMut::new(&mut data, dim).unwrap());
            assert_eq!(data, original, "dim {dim}");
        }
    }
}
