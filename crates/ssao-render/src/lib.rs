//! Rendering backend for ssao-rs.
//!
//! This crate provides the wgpu side of the effect:
//! - shared pipelines, WGSL shaders and the kernel uniform buffer
//! - the per-instance [`SsaoEffect`] with its render targets and noise
//! - screen-size change notification

pub mod buffer;
pub mod error;
pub mod listener;
pub mod resources;
pub mod screen_quad;
pub mod ssao_effect;
pub mod textures;

pub use error::{RenderError, RenderResult};
pub use listener::{ScreenSizeDispatcher, ScreenSizeListener};
pub use resources::{SsaoResources, OCCLUSION_FORMAT};
pub use screen_quad::{screen_quad_layout, ScreenQuad};
pub use ssao_effect::{SsaoBlurUniforms, SsaoEffect, SsaoUniforms};
pub use textures::RenderTarget;
