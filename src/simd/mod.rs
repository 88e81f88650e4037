//! Packed 4-lane f32 vectors and the dot-product engine built on them.
//!
//! The backend is fixed at build time: `build.rs` emits exactly one of `cfg(sse)`,
//! `cfg(neon)` or `cfg(fallback)` and [`F32x4`] resolves to the matching type.

#[cfg(all(sse, target_arch = "x86_64"))]
pub mod sse;

#[cfg(all(neon, target_arch = "aarch64"))]
pub mod neon;

pub mod dot;
pub mod fallback;
pub mod traits;

pub use dot::{dot, dot_with, scalar_dot};
pub use traits::SimdVec;

#[cfg(all(sse, target_arch = "x86_64"))]
pub use sse::f32x4::F32x4;

#[cfg(all(neon, target_arch = "aarch64"))]
pub use neon::f32x4::F32x4;

#[cfg(not(any(all(sse, target_arch = "x86_64"), all(neon, target_arch = "aarch64"))))]
pub use fallback::F32x4;

/// Name of the packed backend this build uses.
#[cfg(all(sse, target_arch = "x86_64"))]
pub const BACKEND: &str = "sse";

#[cfg(all(neon, target_arch = "aarch64"))]
pub const BACKEND: &str = "neon";

#[cfg(not(any(all(sse, target_arch = "x86_64"), all(neon, target_arch = "aarch64"))))]
pub const BACKEND: &str = "fallback";
