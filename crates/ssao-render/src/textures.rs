//! Texture creation for the SSAO effect.

use crate::resources::OCCLUSION_FORMAT;

/// A texture together with its default view.
pub struct RenderTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Creates a single-channel occlusion render target.
///
/// Targets can be sampled by later passes and copied out for readback.
pub(crate) fn create_occlusion_target(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
) -> RenderTarget {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OCCLUSION_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    RenderTarget { texture, view }
}

/// Creates the square rotation-noise texture and uploads `texels` into it.
pub(crate) fn create_noise_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texels: &[[f32; 4]],
    dimension: u32,
) -> RenderTarget {
    let size = wgpu::Extent3d {
        width: dimension,
        height: dimension,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("SSAO Noise Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba32Float,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytemuck::cast_slice(texels),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            // 4 channels x 4 bytes
            bytes_per_row: Some(16 * dimension),
            rows_per_image: Some(dimension),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    RenderTarget { texture, view }
}
