//! Square row-major matrices: borrowed views and an owned container.
//!
//! Element `(row, col)` of a `dim x dim` matrix lives at `data[col + row * dim]`.
//! [`MatrixRef`] and [`MatrixMut`] own no memory; they can only be built over a buffer of
//! exactly `dim * dim` elements, so every row and cell they hand out is in bounds.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut, Mul};

use crate::engine::Engine;
use crate::error::{buffer_size_error, checked_area, dimension_mismatch, Result};

fn check_buffer(len: usize, dim: usize, operand: &'static str) -> Result<()> {
    let area = checked_area(dim)?;
    if len != area {
        return Err(buffer_size_error(operand, area, len));
    }
    Ok(())
}

#[inline(always)]
fn cell_index(row: usize, col: usize, dim: usize) -> usize {
    assert!(
        row < dim && col < dim,
        "cell ({row}, {col}) out of bounds for a {dim}x{dim} matrix"
    );
    col + row * dim
}

/// Read-only view of a square row-major matrix.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRef<'a> {
    data: &'a [f32],
    dim: usize,
}

impl<'a> MatrixRef<'a> {
    /// Wraps `data` as a `dim x dim` matrix.
    pub fn new(data: &'a [f32], dim: usize) -> Result<Self> {
        Self::with_operand(data, dim, "matrix")
    }

    pub(crate) fn with_operand(data: &'a [f32], dim: usize, operand: &'static str) -> Result<Self> {
        check_buffer(data.len(), dim, operand)?;
        Ok(Self { data, dim })
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// The `dim` contiguous elements of row `row`.
    #[inline(always)]
    pub fn row(&self, row: usize) -> &'a [f32] {
        let start = row * self.dim;
        &self.data[start..start + self.dim]
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[cell_index(row, col, self.dim)]
    }
}

impl Index<(usize, usize)> for MatrixRef<'_> {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[cell_index(row, col, self.dim)]
    }
}

/// Mutable view of a square row-major matrix.
#[derive(Debug)]
pub struct MatrixMut<'a> {
    data: &'a mut [f32],
    dim: usize,
}

impl<'a> MatrixMut<'a> {
    /// Wraps `data` as a `dim x dim` matrix.
    pub fn new(data: &'a mut [f32], dim: usize) -> Result<Self> {
        Self::with_operand(data, dim, "matrix")
    }

    pub(crate) fn with_operand(
        data: &'a mut [f32],
        dim: usize,
        operand: &'static str,
    ) -> Result<Self> {
        check_buffer(data.len(), dim, operand)?;
        Ok(Self { data, dim })
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn view(&self) -> MatrixRef<'_> {
        MatrixRef {
            data: &*self.data,
            dim: self.dim,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &*self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut *self.data
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[cell_index(row, col, self.dim)]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[cell_index(row, col, self.dim)] = value;
    }

    /// Shares the buffer with several workers for mirrored swaps.
    pub(crate) fn shared(&mut self) -> SharedCells<'_> {
        SharedCells {
            ptr: self.data.as_mut_ptr(),
            dim: self.dim,
            _marker: PhantomData,
        }
    }
}

impl Index<(usize, usize)> for MatrixMut<'_> {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[cell_index(row, col, self.dim)]
    }
}

impl IndexMut<(usize, usize)> for MatrixMut<'_> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[cell_index(row, col, self.dim)]
    }
}

/// A matrix buffer shared by the transpose workers.
///
/// Workers hold disjoint sets of `(row, col)` / `(col, row)` pairs, so no cell is touched
/// by two workers at once. The lifetime ties it to the exclusive borrow it came from.
pub(crate) struct SharedCells<'a> {
    ptr: *mut f32,
    dim: usize,
    _marker: PhantomData<&'a mut [f32]>,
}

unsafe impl Send for SharedCells<'_> {}
unsafe impl Sync for SharedCells<'_> {}

impl SharedCells<'_> {
    /// Swaps `(row, col)` with `(col, row)`.
    ///
    /// # Safety
    ///
    /// No other thread may read or write either cell during the call.
    #[inline(always)]
    pub(crate) unsafe fn swap_mirrored(&self, row: usize, col: usize) {
        let lower = cell_index(row, col, self.dim);
        let upper = cell_index(col, row, self.dim);
        unsafe { std::ptr::swap(self.ptr.add(lower), self.ptr.add(upper)) };
    }
}

/// An owned square row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    dim: usize,
}

impl Matrix {
    /// Takes ownership of a row-major buffer of `dim * dim` elements.
    pub fn from_vec(data: Vec<f32>, dim: usize) -> Result<Self> {
        check_buffer(data.len(), dim, "matrix")?;
        Ok(Self { data, dim })
    }

    /// A `dim x dim` matrix of zeros.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero or `dim * dim` overflows.
    pub fn zeros(dim: usize) -> Self {
        Self::generate(dim, |_, _| 0.0)
    }

    /// The `dim x dim` identity.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero or `dim * dim` overflows.
    pub fn identity(dim: usize) -> Self {
        Self::generate(dim, |row, col| if row == col { 1.0 } else { 0.0 })
    }

    /// Builds a matrix from `f(row, col)`, called in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero or `dim * dim` overflows.
    pub fn generate<F>(dim: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        if let Err(e) = checked_area(dim) {
            panic!("{e}");
        }
        let data = (0..dim)
            .flat_map(|row| (0..dim).map(move |col| (row, col)))
            .map(|(row, col)| f(row, col))
            .collect();
        Self { data, dim }
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn view(&self) -> MatrixRef<'_> {
        MatrixRef {
            data: &self.data,
            dim: self.dim,
        }
    }

    pub fn view_mut(&mut self) -> MatrixMut<'_> {
        MatrixMut {
            data: &mut self.data,
            dim: self.dim,
        }
    }

    /// Transposes in place on `engine`'s workers.
    pub fn transpose(&mut self, engine: &Engine) {
        engine.transpose(&mut self.view_mut());
    }

    /// `self · rhs` on `engine`'s workers. Neither operand is modified.
    pub fn multiply(&self, rhs: &Matrix, engine: &Engine) -> Result<Matrix> {
        if rhs.dim != self.dim {
            return Err(dimension_mismatch("right", self.dim, rhs.dim));
        }

        let mut right_transposed = rhs.clone();
        right_transposed.transpose(engine);

        let mut out = Matrix::zeros(self.dim);
        engine.matmul(
            &mut out.view_mut(),
            self.view(),
            right_transposed.view(),
        )?;
        Ok(out)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[cell_index(row, col, self.dim)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[cell_index(row, col, self.dim)]
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    /// Multiplies on a default-configured [`Engine`].
    ///
    /// # Panics
    ///
    /// Panics if the operands differ in dimension.
    fn mul(self, rhs: &Matrix) -> Self::Output {
        match self.multiply(rhs, &Engine::default()) {
            Ok(product) => product,
            Err(e) => panic!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatmulError;

    #[test]
    fn test_row_major_indexing() {
        // | 1 2 3 |
        // | 4 5 6 |
        // | 7 8 9 |
        let data: Vec<f32> = (1..=9).map(|v| v as f32).collect();
        let view = MatrixRef::new(&data, 3).unwrap();

        assert_eq!(view[(0, 0)], 1.0);
        assert_eq!(view[(0, 2)], 3.0);
        assert_eq!(view[(1, 0)], 4.0);
        assert_eq!(view.get(2, 1), 8.0);
        assert_eq!(view.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_view_rejects_wrong_length() {
        let data = vec![0.0f32; 8];
        assert_eq!(
            MatrixRef::new(&data, 3).unwrap_err(),
            MatmulError::BufferSize {
                operand: "matrix",
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_view_rejects_zero_dimension() {
        let mut data: Vec<f32> = vec![];
        assert_eq!(
            MatrixMut::new(&mut data, 0).unwrap_err(),
            MatmulError::ZeroDimension
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_column_past_edge_panics() {
        let data = vec![0.0f32; 4];
        let view = MatrixRef::new(&data, 2).unwrap();
        // col + row * dim would be 2, a valid buffer index, but the cell does not exist.
        view.get(0, 2);
    }

    #[test]
    fn test_mut_view_set_and_index() {
        let mut data = vec![0.0f32; 4];
        let mut view = MatrixMut::new(&mut data, 2).unwrap();
        view.set(0, 1, 5.0);
        view[(1, 0)] = 7.0;
        assert_eq!(view.view().get(0, 1), 5.0);
        assert_eq!(data, vec![0.0, 5.0, 7.0, 0.0]);
    }

    #[test]
    fn test_shared_swap_mirrored() {
        let mut data: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let mut view = MatrixMut::new(&mut data, 3).unwrap();
        let shared = view.shared();
        unsafe { shared.swap_mirrored(2, 0) };
        assert_eq!(data, vec![0.0, 1.0, 6.0, 3.0, 4.0, 5.0, 2.0, 7.0, 8.0]);
    }

    #[test]
    fn test_generate_and_identity() {
        let m = Matrix::generate(2, |row, col| (row * 10 + col) as f32);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 10.0, 11.0]);

        let eye = Matrix::identity(3);
        assert_eq!(eye[(1, 1)], 1.0);
        assert_eq!(eye[(1, 2)], 0.0);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Matrix::from_vec(vec![1.0; 16], 4).is_ok());
        assert!(Matrix::from_vec(vec![1.0; 15], 4).is_err());
    }

    #[test]
    fn test_mul_operator() {
        // | 1 2 |   | 5 6 |   | 19 22 |
        // | 3 4 | x | 7 8 | = | 43 50 |
        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        let b = Matrix::from_vec(vec![5.0, 6.0, 7.0, 8.0], 2).unwrap();
        let c = &a * &b;
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
        // Operands are untouched.
        assert_eq!(b.as_slice(), &[5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::identity(2);
        let b = Matrix::identity(3);
        let engine = Engine::with_workers(2).unwrap();
        assert_eq!(
            a.multiply(&b, &engine).unwrap_err(),
            MatmulError::DimensionMismatch {
                operand: "right",
                expected: 2,
                actual: 3
            }
        );
    }
}
