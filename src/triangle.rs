//! Linear offsets into the strict lower triangle of a square matrix.
//!
//! Offsets enumerate the cells below the diagonal row by row, column by column:
//!
//! ```text
//! offset:  0      1      2      3      4      5      6    ...
//! cell:   (1,0)  (2,0)  (2,1)  (3,0)  (3,1)  (3,2)  (4,0)  ...
//! ```
//!
//! Row `r` starts at offset `T(r - 1) = r(r - 1)/2`, so an arbitrary offset is mapped back
//! with the inverse of the triangular numbers, `row = floor((1 + sqrt(1 + 8 * offset)) / 2)`.
//! That square root is taken once per work range; every later cell of the range is reached
//! with [`TriangularPosition::advance`].

use num::integer::Roots;

use crate::partition::WorkRange;

/// The triangular number `T(n) = n(n + 1)/2`.
#[inline(always)]
pub const fn triangular(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Number of cells strictly below the diagonal of a `dim x dim` matrix, `T(dim - 1)`.
#[inline(always)]
pub const fn off_diagonal_cells(dim: usize) -> usize {
    triangular(dim.saturating_sub(1))
}

// Offset of (row, 0).
#[inline(always)]
const fn row_start(row: usize) -> usize {
    row * row.saturating_sub(1) / 2
}

/// A cell `(row, col)` of the strict lower triangle, `col < row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangularPosition {
    pub row: usize,
    pub col: usize,
}

impl TriangularPosition {
    /// Maps a linear offset to its cell.
    pub fn from_offset(offset: usize) -> Self {
        // Exact integer root; u128 keeps 8 * offset from overflowing.
        let discriminant = 1u128 + 8 * offset as u128;
        let mut row = discriminant.sqrt().div_ceil(2) as usize;

        while row_start(row) > offset {
            row -= 1;
        }
        while row_start(row + 1) <= offset {
            row += 1;
        }

        Self {
            row,
            col: offset - row_start(row),
        }
    }

    /// The linear offset of this cell.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        row_start(self.row) + self.col
    }

    /// Moves to the cell at the next offset.
    #[inline(always)]
    pub fn advance(&mut self) {
        self.col += 1;
        if self.col == self.row {
            self.row += 1;
            self.col = 0;
        }
    }
}

/// Iterates the cells of one [`WorkRange`] of triangular offsets.
#[derive(Debug, Clone)]
pub struct TriangleWalk {
    position: TriangularPosition,
    remaining: usize,
}

impl TriangleWalk {
    pub fn new(range: WorkRange) -> Self {
        Self {
            position: TriangularPosition::from_offset(range.start),
            remaining: range.len,
        }
    }
}

impl Iterator for TriangleWalk {
    type Item = TriangularPosition;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.position;
        self.remaining -= 1;
        self.position.advance();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TriangleWalk {}
