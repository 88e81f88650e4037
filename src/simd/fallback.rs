//! Portable 4-lane f32 vector used when no packed instruction set was selected at build
//! time. It is always compiled so the vector backends can be checked against it.

use std::ops::Mul;

use crate::{simd::traits::SimdVec, LANES};

/// Four f32 lanes held in a plain array.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct F32x4 {
    elements: [f32; LANES],
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
            elements: unsafe { std::ptr::read_unaligned(ptr as *const [f32; LANES]) },
        }
    }

    #[inline(always)]
    fn horizontal_sum(&self) -> f32 {
        let e = &self.elements;
        (e[0] + e[2]) + (e[1] + e[3])
    }
}

impl Mul for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        let mut elements = self.elements;
        for (lane, r) in elements.iter_mut().zip(rhs.elements) {
            *lane *= r;
        }
        Self { elements }
    }
}

#[cfg(test)]
impl F32x4 {
    pub(crate) fn to_vec(self) -> Vec<f32> {
        self.elements.to_vec()
    }
}
