//! ARM NEON implementation of the packed f32 vector.
//!
//! NEON (Advanced SIMD) is mandatory on AArch64, so this backend is selected for every
//! aarch64 target by the build script, including Apple Silicon and AWS Graviton.
//!
//! - **Vector Width**: 128 bits (4 × f32)
//! - **Memory Alignment**: unaligned loads (`vld1q_f32`) only

pub mod f32x4;
