//! The public entry point: a fixed worker count plus the three operations.

use std::num::NonZeroUsize;

use log::debug;

use crate::config::EngineConfig;
use crate::error::{dimension_mismatch, Result};
use crate::matrix::{MatrixMut, MatrixRef};
use crate::pool::TaskGroup;
use crate::{matmul, simd, transpose};

/// Runs transposes and multiplications across a fixed number of workers.
///
/// An engine holds no buffers and no threads between calls; each call builds its worker
/// pool, splits the work, and joins before returning.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    config: EngineConfig,
    group: TaskGroup,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        debug!(
            "engine with {} workers, {} backend",
            config.workers(),
            simd::BACKEND
        );
        Self {
            config,
            group: TaskGroup::new(config.workers()),
        }
    }

    /// An engine with exactly `workers` workers.
    pub fn with_workers(workers: usize) -> Result<Self> {
        EngineConfig::with_workers(workers).map(Self::new)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn workers(&self) -> NonZeroUsize {
        self.config.workers()
    }

    /// Transposes `matrix` in place. The diagonal is left untouched.
    pub fn transpose(&self, matrix: &mut MatrixMut<'_>) {
        transpose::transpose(&self.group, matrix);
    }

    /// Writes `left · right` into `out`, given `right_transposed = rightᵗ`.
    ///
    /// Each output cell is one [`simd::dot`] of two rows, so results carry that function's
    /// per-chunk summation order.
    pub fn matmul(
        &self,
        out: &mut MatrixMut<'_>,
        left: MatrixRef<'_>,
        right_transposed: MatrixRef<'_>,
    ) -> Result<()> {
        check_same_dim(out.dim(), left.dim(), "left")?;
        check_same_dim(out.dim(), right_transposed.dim(), "right_transposed")?;

        matmul::matmul(&self.group, out, left, right_transposed);
        Ok(())
    }

    /// Transposes `right` in place, then writes `left · right` into `out`.
    ///
    /// `right` is left transposed on return; transposing it again restores it.
    pub fn multiply(
        &self,
        out: &mut MatrixMut<'_>,
        left: MatrixRef<'_>,
        right: &mut MatrixMut<'_>,
    ) -> Result<()> {
        check_same_dim(out.dim(), left.dim(), "left")?;
        check_same_dim(out.dim(), right.dim(), "right")?;

        self.transpose(right);
        matmul::matmul(&self.group, out, left, right.view());
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn check_same_dim(expected: usize, actual: usize, operand: &'static str) -> Result<()> {
    if expected != actual {
        return Err(dimension_mismatch(operand, expected, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatmulError;
    use crate::matrix::Matrix;

    #[test]
    fn test_with_workers_rejects_zero() {
        assert!(matches!(
            Engine::with_workers(0),
            Err(MatmulError::InvalidConfig { .. })
        ));
        assert_eq!(Engine::with_workers(3).unwrap().workers().get(), 3);
    }

    #[test]
    fn test_matmul_checks_dimensions_before_writing() {
        let engine = Engine::with_workers(2).unwrap();
        let a = Matrix::identity(3);
        let b = Matrix::identity(4);
        let mut c = Matrix::generate(3, |_, _| 7.0);

        let err = engine
            .matmul(&mut c.view_mut(), a.view(), b.view())
            .unwrap_err();

        assert_eq!(err, dimension_mismatch("right_transposed", 3, 4));
        assert!(c.as_slice().iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_multiply_leaves_right_transposed() {
        let engine = Engine::with_workers(4).unwrap();
        let a = Matrix::generate(5, |row, col| (row * 5 + col) as f32);
        let mut b = Matrix::generate(5, |row, col| if col == row + 1 { 1.0 } else { 0.0 });
        let b_original = b.clone();
        let mut c = Matrix::zeros(5);

        engine
            .multiply(&mut c.view_mut(), a.view(), &mut b.view_mut())
            .unwrap();

        // Right-multiplying by the superdiagonal shift moves column k to column k + 1.
        for row in 0..5 {
            assert_eq!(c[(row, 0)], 0.0);
            for col in 1..5 {
                assert_eq!(c[(row, col)], a[(row, col - 1)]);
            }
        }

        b.transpose(&engine);
        assert_eq!(b, b_original);
    }

    #[test]
    fn test_multiply_mismatch_leaves_right_untouched() {
        let engine = Engine::with_workers(2).unwrap();
        let a = Matrix::identity(2);
        let mut b = Matrix::generate(3, |row, col| (row * 3 + col) as f32);
        let b_original = b.clone();
        let mut c = Matrix::zeros(2);

        assert!(engine
            .multiply(&mut c.view_mut(), a.view(), &mut b.view_mut())
            .is_err());
        assert_eq!(b, b_original);
    }
}
