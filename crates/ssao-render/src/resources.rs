//! GPU state shared by every SSAO effect instance.
//!
//! Shaders, pipelines, the sample kernel and the screen quad do not depend on
//! window size or per-instance settings, so several [`SsaoEffect`](crate::SsaoEffect)s
//! can share one [`SsaoResources`] behind an `Arc`.

use ssao_core::{kernel_samples, make_rng, KernelSample};

use crate::buffer::create_uniform_array_buffer;
use crate::screen_quad::{screen_quad_layout, ScreenQuad};

/// Format of every occlusion render target.
pub const OCCLUSION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;

/// Shared shaders, pipelines, kernel buffer and screen quad.
pub struct SsaoResources {
    ssao_pipeline: wgpu::RenderPipeline,
    ssao_bind_group_layout: wgpu::BindGroupLayout,
    blur_horizontal_pipeline: wgpu::RenderPipeline,
    blur_vertical_pipeline: wgpu::RenderPipeline,
    blur_bind_group_layout: wgpu::BindGroupLayout,
    kernel_buffer: wgpu::Buffer,
    kernel: Vec<KernelSample>,
    screen_quad: ScreenQuad,
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Builds a screen-quad pipeline writing one occlusion channel.
/// Depth testing and blending stay off for every pass.
fn create_pass_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[screen_quad_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: OCCLUSION_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl SsaoResources {
    /// Compiles the shaders, builds the pipelines and uploads the kernel.
    ///
    /// `seed` fixes the kernel; `None` draws it from system entropy.
    #[must_use]
    pub fn new(device: &wgpu::Device, seed: Option<u64>) -> Self {
        let ssao_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("SSAO Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/ssao.wgsl").into()),
        });

        let blur_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("SSAO Blur Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/ssao_blur.wgsl").into()),
        });

        let ssao_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("SSAO Bind Group Layout"),
                entries: &[
                    // View-space positions
                    texture_entry(0),
                    // View-space normals
                    texture_entry(1),
                    // Rotation noise
                    texture_entry(2),
                    // Hemisphere kernel
                    uniform_entry(3),
                    // Per-instance params
                    uniform_entry(4),
                ],
            });

        let blur_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("SSAO Blur Bind Group Layout"),
                entries: &[texture_entry(0), uniform_entry(1)],
            });

        let ssao_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("SSAO Pipeline Layout"),
            bind_group_layouts: &[&ssao_bind_group_layout],
            push_constant_ranges: &[],
        });

        let blur_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("SSAO Blur Pipeline Layout"),
            bind_group_layouts: &[&blur_bind_group_layout],
            push_constant_ranges: &[],
        });

        let ssao_pipeline = create_pass_pipeline(
            device,
            "SSAO Pipeline",
            &ssao_pipeline_layout,
            &ssao_shader,
            "fs_main",
        );
        let blur_horizontal_pipeline = create_pass_pipeline(
            device,
            "SSAO Horizontal Blur Pipeline",
            &blur_pipeline_layout,
            &blur_shader,
            "fs_horizontal",
        );
        let blur_vertical_pipeline = create_pass_pipeline(
            device,
            "SSAO Vertical Blur Pipeline",
            &blur_pipeline_layout,
            &blur_shader,
            "fs_vertical",
        );

        let kernel = kernel_samples(&mut make_rng(seed));
        let kernel_buffer =
            create_uniform_array_buffer(device, &kernel, Some("SSAO Kernel Buffer"));

        log::debug!("created SSAO resources ({} kernel samples)", kernel.len());

        Self {
            ssao_pipeline,
            ssao_bind_group_layout,
            blur_horizontal_pipeline,
            blur_vertical_pipeline,
            blur_bind_group_layout,
            kernel_buffer,
            kernel,
            screen_quad: ScreenQuad::new(device),
        }
    }

    /// The uploaded kernel samples.
    #[must_use]
    pub fn kernel(&self) -> &[KernelSample] {
        &self.kernel
    }

    /// Creates the bind group for the occlusion pass.
    #[must_use]
    pub fn create_ssao_bind_group(
        &self,
        device: &wgpu::Device,
        positions: &wgpu::TextureView,
        normals: &wgpu::TextureView,
        noise: &wgpu::TextureView,
        params: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SSAO Bind Group"),
            layout: &self.ssao_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(positions),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(normals),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(noise),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.kernel_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: params.as_entire_binding(),
                },
            ],
        })
    }

    /// Creates the bind group for a blur pass reading `source`.
    #[must_use]
    pub fn create_blur_bind_group(
        &self,
        device: &wgpu::Device,
        source: &wgpu::TextureView,
        blur_params: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SSAO Blur Bind Group"),
            layout: &self.blur_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: blur_params.as_entire_binding(),
                },
            ],
        })
    }

    pub(crate) fn ssao_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.ssao_pipeline
    }

    pub(crate) fn blur_horizontal_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.blur_horizontal_pipeline
    }

    pub(crate) fn blur_vertical_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.blur_vertical_pipeline
    }

    pub(crate) fn screen_quad(&self) -> &ScreenQuad {
        &self.screen_quad
    }
}
