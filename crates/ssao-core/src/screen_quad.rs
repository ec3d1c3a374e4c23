//! Full-screen quad geometry shared by every pass.

/// Screen quad vertex: clip-space position and texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenQuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Quad corners covering all of clip space.
pub const SCREEN_QUAD_VERTICES: [ScreenQuadVertex; 4] = [
    ScreenQuadVertex {
        position: [-1.0, -1.0, 0.0],
        uv: [0.0, 0.0],
    },
    ScreenQuadVertex {
        position: [1.0, -1.0, 0.0],
        uv: [1.0, 0.0],
    },
    ScreenQuadVertex {
        position: [-1.0, 1.0, 0.0],
        uv: [0.0, 1.0],
    },
    ScreenQuadVertex {
        position: [1.0, 1.0, 0.0],
        uv: [1.0, 1.0],
    },
];

/// Two triangles.
pub const SCREEN_QUAD_INDICES: [u32; 6] = [0, 1, 2, 3, 2, 1];
