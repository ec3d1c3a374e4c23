//! SSAO (Screen Space Ambient Occlusion) effect.
//!
//! One instance owns the window-sized render targets and per-instance
//! settings; pipelines and the kernel come from a shared [`SsaoResources`].
//! Each frame runs up to three passes:
//!
//! 1. occlusion estimation into the raw target
//! 2. horizontal box blur into the blur target
//! 3. vertical box blur into the output target
//!
//! With a blur level of zero only the first pass runs.

use std::sync::Arc;

use glam::Mat4;
use ssao_core::{generate_noise, make_rng, SsaoConfig};

use crate::buffer::{create_uniform_buffer, update_uniform};
use crate::error::RenderResult;
use crate::listener::ScreenSizeListener;
use crate::resources::SsaoResources;
use crate::textures::{create_noise_texture, create_occlusion_target, RenderTarget};

/// GPU representation of the occlusion pass uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct SsaoUniforms {
    pub projection: [[f32; 4]; 4],
    pub radius: f32,
    pub bias: f32,
    pub _padding: [f32; 2],
}

impl SsaoUniforms {
    fn new(projection: Mat4, config: &SsaoConfig) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            radius: config.hemisphere_radius,
            bias: config.bias,
            _padding: [0.0; 2],
        }
    }
}

/// SSAO blur uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct SsaoBlurUniforms {
    /// Blur half-width in texels.
    pub size: f32,
    pub _padding: [f32; 3],
}

impl SsaoBlurUniforms {
    #[allow(clippy::cast_precision_loss)]
    fn new(blur_level: u32) -> Self {
        Self {
            size: blur_level as f32,
            _padding: [0.0; 3],
        }
    }
}

/// A screen-space ambient occlusion effect bound to one output size.
pub struct SsaoEffect {
    resources: Arc<SsaoResources>,
    config: SsaoConfig,
    width: u32,
    height: u32,
    projection: Mat4,
    ssao_uniform_buffer: wgpu::Buffer,
    blur_uniform_buffer: wgpu::Buffer,
    // Raw occlusion, horizontal blur result, vertical blur result
    occlusion: RenderTarget,
    blur: RenderTarget,
    output: RenderTarget,
    noise: RenderTarget,
}

fn clamp_size(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        log::warn!("SSAO target size {width}x{height} clamped to at least 1x1");
    }
    (width.max(1), height.max(1))
}

impl SsaoEffect {
    /// Creates an effect sized `width` x `height`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        resources: Arc<SsaoResources>,
        width: u32,
        height: u32,
        config: SsaoConfig,
    ) -> RenderResult<Self> {
        config.validate()?;
        let (width, height) = clamp_size(width, height);

        let projection = Mat4::IDENTITY;
        let ssao_uniform_buffer = create_uniform_buffer(
            device,
            &SsaoUniforms::new(projection, &config),
            Some("SSAO Uniform Buffer"),
        );
        let blur_uniform_buffer = create_uniform_buffer(
            device,
            &SsaoBlurUniforms::new(config.blur_level),
            Some("SSAO Blur Uniform Buffer"),
        );

        let noise = Self::create_noise(device, queue, &config);

        log::debug!(
            "created SSAO effect {width}x{height}, blur level {}, radius {}",
            config.blur_level,
            config.hemisphere_radius
        );

        Ok(Self {
            resources,
            width,
            height,
            projection,
            ssao_uniform_buffer,
            blur_uniform_buffer,
            occlusion: create_occlusion_target(device, "SSAO Occlusion Texture", width, height),
            blur: create_occlusion_target(device, "SSAO Blur Texture", width, height),
            output: create_occlusion_target(device, "SSAO Output Texture", width, height),
            noise,
            config,
        })
    }

    fn create_noise(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &SsaoConfig,
    ) -> RenderTarget {
        let dimension = config.noise_dimension();
        // Offset the seed so noise and kernel don't draw the same sequence
        let seed = config.seed.map(|s| s.wrapping_add(1));
        let texels = generate_noise(&mut make_rng(seed), dimension);
        create_noise_texture(device, queue, &texels, dimension)
    }

    /// Runs the effect over the given view-space G-buffer.
    ///
    /// `projection` must be the matrix the G-buffer was rendered with.
    /// Returns the view holding the final occlusion mask: the raw pass output
    /// when the blur level is zero, the vertically blurred target otherwise.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        positions: &wgpu::TextureView,
        normals: &wgpu::TextureView,
        projection: Mat4,
    ) -> &wgpu::TextureView {
        if projection != self.projection {
            self.projection = projection;
            self.write_ssao_uniforms(queue);
        }

        let ssao_bind_group = self.resources.create_ssao_bind_group(
            device,
            positions,
            normals,
            &self.noise.view,
            &self.ssao_uniform_buffer,
        );
        self.draw_pass(
            encoder,
            "SSAO Pass",
            self.resources.ssao_pipeline(),
            &ssao_bind_group,
            &self.occlusion.view,
        );

        if self.config.blur_level == 0 {
            return &self.occlusion.view;
        }

        let horizontal_bind_group = self.resources.create_blur_bind_group(
            device,
            &self.occlusion.view,
            &self.blur_uniform_buffer,
        );
        self.draw_pass(
            encoder,
            "SSAO Horizontal Blur Pass",
            self.resources.blur_horizontal_pipeline(),
            &horizontal_bind_group,
            &self.blur.view,
        );

        let vertical_bind_group =
            self.resources
                .create_blur_bind_group(device, &self.blur.view, &self.blur_uniform_buffer);
        self.draw_pass(
            encoder,
            "SSAO Vertical Blur Pass",
            self.resources.blur_vertical_pipeline(),
            &vertical_bind_group,
            &self.output.view,
        );

        &self.output.view
    }

    /// Clears `target` to zero and draws the screen quad into it.
    fn draw_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
        target: &wgpu::TextureView,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        self.resources.screen_quad().draw(&mut render_pass);
    }

    /// Recreates the render targets at a new size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = clamp_size(width, height);
        if (width, height) == (self.width, self.height) {
            return;
        }

        self.destroy_targets();
        self.occlusion = create_occlusion_target(device, "SSAO Occlusion Texture", width, height);
        self.blur = create_occlusion_target(device, "SSAO Blur Texture", width, height);
        self.output = create_occlusion_target(device, "SSAO Output Texture", width, height);
        self.width = width;
        self.height = height;

        log::debug!("resized SSAO effect to {width}x{height}");
    }

    /// Changes the hemisphere radius.
    pub fn set_hemisphere_radius(&mut self, queue: &wgpu::Queue, radius: f32) -> RenderResult<()> {
        let config = self.config.clone().with_hemisphere_radius(radius);
        config.validate()?;
        self.config = config;
        self.write_ssao_uniforms(queue);
        Ok(())
    }

    /// Changes the blur level.
    ///
    /// The noise tile size follows the blur level, so the noise texture is
    /// regenerated when its dimension changes.
    pub fn set_blur_level(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        blur_level: u32,
    ) -> RenderResult<()> {
        let config = self.config.clone().with_blur_level(blur_level);
        config.validate()?;

        let old_dimension = self.config.noise_dimension();
        self.config = config;
        update_uniform(
            queue,
            &self.blur_uniform_buffer,
            &SsaoBlurUniforms::new(blur_level),
        );

        if self.config.noise_dimension() != old_dimension {
            self.noise.texture.destroy();
            self.noise = Self::create_noise(device, queue, &self.config);
        }
        Ok(())
    }

    fn write_ssao_uniforms(&self, queue: &wgpu::Queue) {
        update_uniform(
            queue,
            &self.ssao_uniform_buffer,
            &SsaoUniforms::new(self.projection, &self.config),
        );
    }

    fn destroy_targets(&self) {
        self.occlusion.texture.destroy();
        self.blur.texture.destroy();
        self.output.texture.destroy();
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SsaoConfig {
        &self.config
    }

    /// Current target size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The noise texture used to rotate the kernel.
    #[must_use]
    pub fn noise_texture(&self) -> &wgpu::Texture {
        &self.noise.texture
    }

    /// View of the noise texture.
    #[must_use]
    pub fn noise_view(&self) -> &wgpu::TextureView {
        &self.noise.view
    }

    /// Raw, unblurred occlusion target.
    #[must_use]
    pub fn occlusion_texture(&self) -> &wgpu::Texture {
        &self.occlusion.texture
    }

    /// View of the raw occlusion target.
    #[must_use]
    pub fn occlusion_view(&self) -> &wgpu::TextureView {
        &self.occlusion.view
    }

    /// Final (vertically blurred) target.
    #[must_use]
    pub fn output_texture(&self) -> &wgpu::Texture {
        &self.output.texture
    }

    /// View of the final target.
    #[must_use]
    pub fn output_view(&self) -> &wgpu::TextureView {
        &self.output.view
    }

    /// The texture [`render`](Self::render) writes its result to.
    #[must_use]
    pub fn result_texture(&self) -> &wgpu::Texture {
        if self.config.blur_level == 0 {
            &self.occlusion.texture
        } else {
            &self.output.texture
        }
    }
}

impl ScreenSizeListener for SsaoEffect {
    fn screen_size_changed(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.resize(device, width, height);
    }
}

impl Drop for SsaoEffect {
    fn drop(&mut self) {
        self.destroy_targets();
        self.noise.texture.destroy();
    }
}
