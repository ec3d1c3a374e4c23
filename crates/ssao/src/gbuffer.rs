//! CPU-built view-space G-buffers.
//!
//! Hosts normally render positions and normals themselves. These scenes exist
//! so the effect can be exercised without a scene renderer.

use glam::{Mat4, Vec3};

/// View-space positions and normals, one RGBA32F texel each, rows top to bottom.
///
/// Texels with no geometry hold zero in both buffers.
#[derive(Debug, Clone)]
pub struct GBuffer {
    pub width: u32,
    pub height: u32,
    pub projection: Mat4,
    pub positions: Vec<[f32; 4]>,
    pub normals: Vec<[f32; 4]>,
}

/// An infinite plane in view space.
#[derive(Debug, Clone, Copy)]
struct Plane {
    point: Vec3,
    normal: Vec3,
}

impl Plane {
    /// Distance along `dir` from the eye to the plane, if in front and facing the eye.
    fn intersect(&self, dir: Vec3) -> Option<f32> {
        let denom = self.normal.dot(dir);
        if denom >= 0.0 {
            return None;
        }
        let t = self.point.dot(self.normal) / denom;
        (t > 0.0).then_some(t)
    }
}

impl GBuffer {
    /// A floor meeting a back wall, seen from the eye at the origin.
    ///
    /// The floor is `y = -1` and the wall `z = -4`, so the crease sits in the
    /// lower half of the image and is the only occluded region.
    #[must_use]
    pub fn corner_scene(width: u32, height: u32, fov_y: f32) -> Self {
        let planes = [
            Plane {
                point: Vec3::new(0.0, -1.0, 0.0),
                normal: Vec3::Y,
            },
            Plane {
                point: Vec3::new(0.0, 0.0, -4.0),
                normal: Vec3::Z,
            },
        ];
        Self::raycast(width, height, fov_y, &planes)
    }

    #[allow(clippy::cast_precision_loss)]
    fn raycast(width: u32, height: u32, fov_y: f32, planes: &[Plane]) -> Self {
        let aspect = width as f32 / height as f32;
        let projection = Mat4::perspective_rh(fov_y, aspect, 0.1, 100.0);
        let tan_half = (fov_y * 0.5).tan();

        let count = (width * height) as usize;
        let mut positions = Vec::with_capacity(count);
        let mut normals = Vec::with_capacity(count);

        for py in 0..height {
            for px in 0..width {
                let ndc_x = (px as f32 + 0.5) / width as f32 * 2.0 - 1.0;
                let ndc_y = 1.0 - (py as f32 + 0.5) / height as f32 * 2.0;
                let dir = Vec3::new(ndc_x * tan_half * aspect, ndc_y * tan_half, -1.0);

                let hit = planes
                    .iter()
                    .filter_map(|plane| plane.intersect(dir).map(|t| (t, plane.normal)))
                    .min_by(|a, b| a.0.total_cmp(&b.0));

                match hit {
                    Some((t, normal)) => {
                        positions.push((dir * t).extend(1.0).to_array());
                        normals.push(normal.extend(0.0).to_array());
                    }
                    None => {
                        positions.push([0.0; 4]);
                        normals.push([0.0; 4]);
                    }
                }
            }
        }

        Self {
            width,
            height,
            projection,
            positions,
            normals,
        }
    }

    /// Index of texel (`x`, `y`).
    #[must_use]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corner_scene_sizes() {
        let g = GBuffer::corner_scene(64, 32, std::f32::consts::FRAC_PI_2);
        assert_eq!(g.positions.len(), 64 * 32);
        assert_eq!(g.normals.len(), 64 * 32);
    }

    #[test]
    fn test_top_rows_hit_wall_and_bottom_rows_hit_floor() {
        let g = GBuffer::corner_scene(32, 32, std::f32::consts::FRAC_PI_2);
        let top = g.index(16, 0);
        assert!((g.positions[top][2] + 4.0).abs() < 1e-4);
        assert_eq!(g.normals[top], [0.0, 0.0, 1.0, 0.0]);

        let bottom = g.index(16, 31);
        assert!((g.positions[bottom][1] + 1.0).abs() < 1e-4);
        assert_eq!(g.normals[bottom], [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_positions_project_back_to_their_pixel() {
        let g = GBuffer::corner_scene(40, 30, 1.0);
        let (x, y) = (7, 22);
        let p = g.positions[g.index(x, y)];
        let clip = g.projection * Vec3::new(p[0], p[1], p[2]).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let px = (ndc.x * 0.5 + 0.5) * 40.0;
        let py = (0.5 - ndc.y * 0.5) * 30.0;
        assert!((px - 7.5).abs() < 1e-3);
        assert!((py - 22.5).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn every_texel_hits_in_front_of_the_eye(w in 1u32..24, h in 1u32..24) {
            let g = GBuffer::corner_scene(w, h, 1.2);
            for (p, n) in g.positions.iter().zip(&g.normals) {
                prop_assert!(p[2] < 0.0);
                let len = Vec3::new(n[0], n[1], n[2]).length();
                prop_assert!((len - 1.0).abs() < 1e-5);
            }
        }
    }
}
