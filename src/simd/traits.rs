use std::ops::Mul;

/// A packed vector of [`crate::LANES`] values with the operations the dot engine needs.
///
/// Every backend reduces lanes in the same order, `(v0 + v2) + (v1 + v3)`, so a given
/// input produces the same bits whichever backend the crate was built with.
pub trait SimdVec<T>: Copy + Mul<Output = Self> {
    /// Loads the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` holds fewer than `LANES` elements.
    fn new(slice: &[T]) -> Self;

    /// Loads `size` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` elements. `size` must equal `LANES`.
    unsafe fn load(ptr: *const T, size: usize) -> Self;

    /// Sum of all lanes.
    fn horizontal_sum(&self) -> T;
}
