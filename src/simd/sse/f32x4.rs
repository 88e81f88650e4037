//! SSE 4-lane f32 SIMD vector.
//!
//! `F32x4` wraps an `__m128`. Everything here is SSE/SSE2, which every x86_64 CPU
//! provides, so no runtime feature check is needed once the build script has picked
//! this backend.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::Mul;

use crate::{simd::traits::SimdVec, LANES};

/// SSE vector containing 4 packed f32 values.
#[derive(Copy, Clone, Debug)]
pub struct F32x4 {
    elements: __m128,
}

impl SimdVec<f32> for F32x4 {
    #[inline(always)]
    fn new(slice: &[f32]) -> Self {
        assert!(slice.len() >= LANES, "Size must be >= {LANES}");
        unsafe { Self::load(slice.as_ptr(), LANES) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32, size: usize) -> Self {
        assert!(!ptr.is_null(), "Pointer must not be null");
        assert!(size == LANES, "Size must be == {LANES}");

        Self {
            elements: unsafe { _mm_loadu_ps(ptr) },
        }
    }

    #[inline(always)]
    fn horizontal_sum(&self) -> f32 {
        unsafe {
            // [v2, v3, v2, v3]
            let high = _mm_movehl_ps(self.elements, self.elements);
            // [v0 + v2, v1 + v3, ..]
            let pairs = _mm_add_ps(self.elements, high);
            let odd = _mm_shuffle_ps::<0b01>(pairs, pairs);
            _mm_cvtss_f32(_mm_add_ss(pairs, odd))
        }
    }
}

impl Mul for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm_mul_ps(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
impl F32x4 {
    pub(crate) fn to_vec(self) -> Vec<f32> {
        let mut out = [0.0f32; LANES];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.elements) };
        out.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback;

    #[test]
    fn test_load_and_mul() {
        let a = F32x4::new(&[1.0, 2.0, 3.0, 4.0]);
        let b = F32x4::new(&[0.5, -1.0, 2.0, 0.25]);
        assert_eq!((a * b).to_vec(), vec![0.5, -2.0, 6.0, 1.0]);
    }

    #[test]
    fn test_horizontal_sum_matches_fallback_bits() {
        let values = [1.0e8f32, 1.0, -1.0e8, 3.0e-3];
        let sse = F32x4::new(&values).horizontal_sum();
        let portable = fallback::F32x4::new(&values).horizontal_sum();
        assert_eq!(sse.to_bits(), portable.to_bits());
    }
}
