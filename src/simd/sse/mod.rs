//! SSE implementation of the packed f32 vector, selected on x86_64 by the build script.
//!
//! Only 128-bit instructions from the x86_64 baseline are used, so the backend runs on
//! every x86_64 CPU without `-C target-feature` flags.

pub mod f32x4;
