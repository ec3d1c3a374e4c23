//! ssao-rs: screen-space ambient occlusion for wgpu renderers.
//!
//! The effect takes a view-space G-buffer (positions and normals) and produces a
//! single-channel ambient mask: 1 where a surface is open, darker where nearby
//! geometry occludes it. Three passes run per frame:
//!
//! 1. occlusion estimation with a 64-sample hemisphere kernel
//! 2. horizontal box blur
//! 3. vertical box blur
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ssao::*;
//!
//! fn main() -> Result<()> {
//!     let gpu = HeadlessGpu::new()?;
//!     let resources = Arc::new(SsaoResources::new(&gpu.device, Some(1)));
//!     let mut effect = SsaoEffect::new(
//!         &gpu.device,
//!         &gpu.queue,
//!         resources,
//!         800,
//!         600,
//!         SsaoConfig::new(2, 0.5),
//!     )?;
//!
//!     // positions / normals come from the host's G-buffer pass
//!     # let positions: wgpu::TextureView = unimplemented!();
//!     # let normals: wgpu::TextureView = unimplemented!();
//!     let mut encoder = gpu.device.create_command_encoder(&Default::default());
//!     let _mask = effect.render(
//!         &gpu.device,
//!         &gpu.queue,
//!         &mut encoder,
//!         &positions,
//!         &normals,
//!         Mat4::perspective_rh(1.0, 800.0 / 600.0, 0.1, 100.0),
//!     );
//!     gpu.queue.submit(Some(encoder.finish()));
//!     Ok(())
//! }
//! ```

pub mod gbuffer;
pub mod headless;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

// Re-export core types
pub use ssao_core::{
    generate_kernel, generate_noise, KernelSample, SsaoConfig, SsaoError, KERNEL_SIZE,
    MAX_BLUR_LEVEL,
};
pub use ssao_core::{Mat4, Vec3};

// Re-export render types
pub use ssao_render::{
    RenderError, RenderTarget, ScreenSizeDispatcher, ScreenSizeListener, SsaoEffect,
    SsaoResources, OCCLUSION_FORMAT,
};

pub use gbuffer::GBuffer;
pub use headless::HeadlessGpu;

/// Errors surfaced by the ssao-rs facade.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or data error.
    #[error(transparent)]
    Config(#[from] SsaoError),

    /// GPU error.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Writing an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Pixel data does not match the image size.
    #[error("mask has {actual} pixels, expected {expected}")]
    MaskSize { expected: usize, actual: usize },
}

/// A specialized Result type for ssao-rs.
pub type Result<T> = std::result::Result<T, Error>;

/// Initializes `env_logger` once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Runs the effect once over a CPU G-buffer and returns the mask bytes.
///
/// Creates fresh shared resources and an effect instance on `gpu`; meant for
/// tests and offline previews rather than per-frame use. `config.seed` seeds
/// both the kernel and the noise.
pub fn render_mask(gpu: &HeadlessGpu, gbuffer: &GBuffer, config: &SsaoConfig) -> Result<Vec<u8>> {
    let resources = Arc::new(SsaoResources::new(&gpu.device, config.seed));
    let mut effect = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        resources,
        gbuffer.width,
        gbuffer.height,
        config.clone(),
    )?;

    let positions = gpu.upload_rgba32f(
        "G-Buffer Positions",
        gbuffer.width,
        gbuffer.height,
        &gbuffer.positions,
    );
    let normals = gpu.upload_rgba32f(
        "G-Buffer Normals",
        gbuffer.width,
        gbuffer.height,
        &gbuffer.normals,
    );

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("ssao encoder"),
        });
    effect.render(
        &gpu.device,
        &gpu.queue,
        &mut encoder,
        &positions.view,
        &normals.view,
        gbuffer.projection,
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    Ok(gpu.read_occlusion(effect.result_texture())?)
}

/// Saves a mask as an 8-bit grayscale PNG.
pub fn save_mask_png(path: impl AsRef<Path>, mask: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = (width * height) as usize;
    let image = image::GrayImage::from_raw(width, height, mask.to_vec()).ok_or(Error::MaskSize {
        expected,
        actual: mask.len(),
    })?;
    image.save(path)?;
    Ok(())
}
