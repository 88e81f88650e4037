//! Parallel, cache-aware multiplication of square `f32` matrices.
//!
//! A product `C = A·B` is computed in two passes, both split across a fixed number of
//! workers:
//!
//! 1. `B` is transposed in place, so that column `j` of `B` becomes contiguous row `j`.
//! 2. Every output cell is the dot product of a row of `A` with a row of `Bᵗ`, computed
//!    with 4-wide packed multiplies (SSE on x86_64, NEON on aarch64, or a portable
//!    fallback, chosen at build time) and a scalar tail for dimensions that are not a
//!    multiple of four.
//!
//! All matrices are row-major: element `(row, col)` lives at `data[col + row * size]`.
//!
//! # Usage
//!
//! ```
//! let size = 3;
//! let a = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
//! let mut b = vec![1.0f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
//! let mut c = vec![0.0f32; size * size];
//!
//! parmul::multiply(&mut c, &a, &mut b, size).unwrap();
//! assert_eq!(c, a);
//! ```
//!
//! For repeated calls with a fixed worker count, build an [`Engine`] once:
//!
//! ```
//! use parmul::{Engine, Matrix};
//!
//! let engine = Engine::with_workers(4).unwrap();
//! let a = Matrix::generate(64, |row, col| (row + col) as f32);
//! let b = Matrix::identity(64);
//!
//! let c = a.multiply(&b, &engine).unwrap();
//! assert_eq!(c, a);
//! ```
//!
//! # Worker count
//!
//! [`EngineConfig::default`] reads `PARMUL_WORKERS` and otherwise uses the available
//! hardware concurrency. Each call builds its own pool of `workers - 1` threads and runs
//! the last share of the work on the calling thread.
//!
//! # Testing
//!
//! The 2048x2048 comparison of 16 workers against one is ignored by default; run it with
//! `cargo test --release -- --ignored`.

pub mod config;
pub mod engine;
pub mod error;
pub mod matmul;
pub mod matrix;
pub mod partition;
pub mod pool;
pub mod simd;
pub mod transpose;
pub mod triangle;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{MatmulError, Result};
pub use matrix::{Matrix, MatrixMut, MatrixRef};

/// Width of the packed vectors used by the dot-product engine.
pub const LANES: usize = 4;

/// Transposes the `size x size` row-major `matrix` in place.
pub fn transpose(matrix: &mut [f32], size: usize) -> Result<()> {
    let mut matrix = MatrixMut::with_operand(matrix, size, "matrix")?;
    Engine::default().transpose(&mut matrix);
    Ok(())
}

/// Writes `left · right` into `out`, where `right_transposed` holds `rightᵗ`.
///
/// All three buffers must hold `size * size` elements.
pub fn matmul(
    out: &mut [f32],
    left: &[f32],
    right_transposed: &[f32],
    size: usize,
) -> Result<()> {
    let mut out = MatrixMut::with_operand(out, size, "out")?;
    let left = MatrixRef::with_operand(left, size, "left")?;
    let right_transposed = MatrixRef::with_operand(right_transposed, size, "right_transposed")?;
    Engine::default().matmul(&mut out, left, right_transposed)
}

/// Writes `left · right` into `out`, transposing `right` in place first.
///
/// `right` is left transposed on return.
pub fn multiply(out: &mut [f32], left: &[f32], right: &mut [f32], size: usize) -> Result<()> {
    let mut out = MatrixMut::with_operand(out, size, "out")?;
    let left = MatrixRef::with_operand(left, size, "left")?;
    let mut right = MatrixMut::with_operand(right, size, "right")?;
    Engine::default().multiply(&mut out, left, &mut right)
}
