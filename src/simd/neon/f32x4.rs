#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::Mul;

use crate::{simd::traits::SimdVec, LANES};

/// A SIMD vector of 4 32-bit floating point values
#[derive(Copy, Clone, Debug)]
pub struct F32x4 {
    elements: float32x4_t,
}

impl SimdVec<f32> for F32x4 {
    #[inline(always)]
    fn new(slice: &[f32]) -> Self {
        assert!(slice.len() >= LANES, "Size must be >= {LANES}");
        unsafe { Self::load(slice.as_ptr(), LANES) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32, size: usize) -> Self {
        // Asserts that the pointer is not null and the size is exactly 4 elements.
        assert!(!ptr.is_null(), "Pointer must not be null");
        assert!(size == LANES, "Size must be == {LANES}");

        Self {
            elements: unsafe { vld1q_f32(ptr) },
        }
    }

    #[inline(always)]
    fn horizontal_sum(&self) -> f32 {
        unsafe {
            // [v0 + v2, v1 + v3]
            let pairs = vadd_f32(vget_low_f32(self.elements), vget_high_f32(self.elements));
            vpadds_f32(pairs)
        }
    }
}

impl Mul for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { vmulq_f32(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
impl F32x4 {
    pub(crate) fn to_vec(self) -> Vec<f32> {
        let mut out = [0.0f32; LANES];
        unsafe { vst1q_f32(out.as_mut_ptr(), self.elements) };
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
        let neon = F32x4::new(&values).horizontal_sum();
        let portable = fallback::F32x4::new(&values).horizontal_sum();
        assert_eq!(neon.to_bits(), portable.to_bits());
    }
}
