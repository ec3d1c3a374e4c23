//! GPU buffers for the full-screen quad.

use ssao_core::{ScreenQuadVertex, SCREEN_QUAD_INDICES, SCREEN_QUAD_VERTICES};

use crate::buffer::{create_index_buffer, create_vertex_buffer};

/// Vertex attributes: position at location 0, uv at location 1.
const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

/// Vertex buffer layout matching [`ScreenQuadVertex`].
pub fn screen_quad_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ScreenQuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// The quad every SSAO pass draws.
pub struct ScreenQuad {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl ScreenQuad {
    /// Uploads the quad geometry.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            vertex_buffer: create_vertex_buffer(
                device,
                &SCREEN_QUAD_VERTICES,
                Some("Screen Quad Vertex Buffer"),
            ),
            index_buffer: create_index_buffer(
                device,
                &SCREEN_QUAD_INDICES,
                Some("Screen Quad Index Buffer"),
            ),
        }
    }

    /// Number of indices drawn.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        SCREEN_QUAD_INDICES.len() as u32
    }

    /// Binds the quad buffers and issues the indexed draw.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count(), 0, 0..1);
    }
}
