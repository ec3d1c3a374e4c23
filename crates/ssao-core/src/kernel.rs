//! Hemisphere sample kernel.
//!
//! Samples live in tangent space: +z points away from the surface, so every
//! sample stays in the upper hemisphere once the shader rotates it onto the
//! surface normal.

use glam::Vec3;
use rand::Rng;

/// Number of hemisphere samples. The occlusion shader hard-codes the same value.
pub const KERNEL_SIZE: usize = 64;

/// One kernel sample as uploaded to the GPU (std140 array stride of 16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KernelSample {
    pub position: [f32; 3],
    pub _padding: f32,
}

impl From<Vec3> for KernelSample {
    fn from(v: Vec3) -> Self {
        Self {
            position: v.to_array(),
            _padding: 0.0,
        }
    }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Generates the sample kernel.
///
/// Each sample is a random direction in the +z hemisphere scaled by a random
/// length, then pulled towards the origin by an accelerating curve so nearby
/// geometry contributes more.
pub fn generate_kernel<R: Rng>(rng: &mut R) -> [Vec3; KERNEL_SIZE] {
    let mut samples = [Vec3::ZERO; KERNEL_SIZE];
    for (i, sample) in samples.iter_mut().enumerate() {
        let direction = loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(0.0..1.0),
            );
            if let Some(n) = v.try_normalize() {
                break n;
            }
        };

        let scale = i as f32 / KERNEL_SIZE as f32;
        *sample = direction * rng.gen_range(0.0..1.0f32) * lerp(0.1, 1.0, scale * scale);
    }
    samples
}

/// Generates the kernel in its padded upload form.
pub fn kernel_samples<R: Rng>(rng: &mut R) -> Vec<KernelSample> {
    generate_kernel(rng)
        .into_iter()
        .map(KernelSample::from)
        .collect()
}
