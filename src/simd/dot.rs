//! Inner products over contiguous rows.
//!
//! The product of two rows is accumulated one packed chunk at a time: each chunk of
//! [`LANES`] elements is multiplied lane-wise, reduced with a horizontal sum, and the
//! chunk sum is added to a scalar accumulator from left to right. The `len % LANES`
//! tail is multiplied and added element by element.
//!
//! # Reproducibility
//!
//! Grouping the additions per chunk reassociates the sum, so [`dot`] is not bit-identical
//! to the naive left-to-right [`scalar_dot`]; the two agree up to floating-point rounding.
//! All backends share the same grouping, so [`dot`] itself is deterministic for a given
//! input regardless of the instruction set or the number of workers computing it.

use crate::simd::{traits::SimdVec, F32x4};
use crate::LANES;

/// `Σ left[k] * right[k]` using the packed vector type `V`.
///
/// # Panics
///
/// Panics if `left` and `right` differ in length.
#[inline(always)]
pub fn dot_with<V: SimdVec<f32>>(left: &[f32], right: &[f32]) -> f32 {
    assert_eq!(left.len(), right.len(), "Vectors must be the same length");

    let left_chunks = left.chunks_exact(LANES);
    let right_chunks = right.chunks_exact(LANES);
    let tail = left_chunks
        .remainder()
        .iter()
        .zip(right_chunks.remainder());

    let mut sum = 0.0f32;

    for (a, b) in left_chunks.zip(right_chunks) {
        sum += (V::new(a) * V::new(b)).horizontal_sum();
    }

    for (a, b) in tail {
        sum += a * b;
    }

    sum
}

/// `Σ left[k] * right[k]` with the backend chosen at build time.
///
/// # Panics
///
/// Panics if `left` and `right` differ in length.
#[inline(always)]
pub fn dot(left: &[f32], right: &[f32]) -> f32 {
    dot_with::<F32x4>(left, right)
}

/// Naive left-to-right inner product.
pub fn scalar_dot(left: &[f32], right: &[f32]) -> f32 {
    assert_eq!(left.len(), right.len(), "Vectors must be the same length");

    left.iter().zip(right.iter()).map(|(a, b)| a * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback;

    fn ramp(len: usize, scale: f32) -> Vec<f32> {
        (0..len).map(|i| ((i % 17) as f32 - 8.0) * scale).collect()
    }

    #[test]
    fn test_dot_short_lengths() {
        assert_eq!(dot(&[], &[]), 0.0);
        assert_eq!(dot(&[3.0], &[4.0]), 12.0);
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn test_dot_exact_chunk() {
        assert_eq!(dot(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0, 1.0, 1.0]), 10.0);
    }

    #[test]
    fn test_dot_with_tail() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let b = [7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert_eq!(dot(&a, &b), 84.0);
    }

    #[test]
    fn test_dot_matches_scalar_for_all_lengths() {
        for len in 0..=67 {
            let a = ramp(len, 0.37);
            let b = ramp(len, -1.13);
            let expected = scalar_dot(&a, &b);
            let actual = dot(&a, &b);
            let tolerance = 1e-4 * expected.abs().max(1.0);
            assert!(
                (actual - expected).abs() <= tolerance,
                "len {}: dot={}, scalar={}",
                len,
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_backend_matches_fallback_bits() {
        for len in [4, 5, 16, 31, 128, 1001] {
            let a = ramp(len, 0.731);
            let b = ramp(len + 3, 1.917);
            let b = &b[3..];
            assert_eq!(
                dot(&a, b).to_bits(),
                dot_with::<fallback::F32x4>(&a, b).to_bits(),
                "len {}",
                len
            );
        }
    }

    #[test]
    fn test_chunk_grouping_is_visible() {
        // 1e8 + 1 - 1e8 loses the 1 when summed naively but not when paired per chunk.
        let a = [1.0e8f32, 1.0, -1.0e8, 0.0];
        let ones = [1.0f32; 4];
        assert_eq!(scalar_dot(&a, &ones), 0.0);
        assert_eq!(dot(&a, &ones), 1.0);
    }

    #[test]
    #[should_panic(expected = "Vectors must be the same length")]
    fn test_dot_length_mismatch() {
        dot(&[1.0, 2.0], &[1.0]);
    }
}
