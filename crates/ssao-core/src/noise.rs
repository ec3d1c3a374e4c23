//! Rotation noise for tilting the sample kernel per pixel.

use rand::Rng;

/// Generates `dimension * dimension` RGBA32F noise texels.
///
/// Only x and y are random; z stays zero so the rotation never flips the
/// hemisphere away from the surface.
pub fn generate_noise<R: Rng>(rng: &mut R, dimension: u32) -> Vec<[f32; 4]> {
    let count = (dimension * dimension) as usize;
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                0.0,
                0.0,
            ]
        })
        .collect()
}
