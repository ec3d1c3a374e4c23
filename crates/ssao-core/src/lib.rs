//! Core data for ssao-rs.
//!
//! This crate holds everything the SSAO effect needs that does not touch the GPU:
//! - [`SsaoConfig`] with JSON persistence
//! - the hemisphere sample kernel and rotation noise generators
//! - screen-quad geometry shared by all passes

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Index-to-float conversions are bounded by KERNEL_SIZE
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::pub_underscore_fields)]

pub mod config;
pub mod error;
pub mod kernel;
pub mod noise;
pub mod screen_quad;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use config::{SsaoConfig, MAX_BLUR_LEVEL};
pub use error::{Result, SsaoError};
pub use kernel::{generate_kernel, kernel_samples, lerp, KernelSample, KERNEL_SIZE};
pub use noise::generate_noise;
pub use screen_quad::{ScreenQuadVertex, SCREEN_QUAD_INDICES, SCREEN_QUAD_VERTICES};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3};

/// Builds the RNG for kernel and noise generation.
///
/// A fixed seed gives reproducible output; `None` seeds from system entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
