//! Headless SSAO integration tests.
//!
//! These tests need a GPU adapter (real or software fallback). When none is
//! available each test prints a note and returns early.

use std::sync::Arc;

use ssao::*;

const SIZE: u32 = 128;

fn gpu() -> Option<HeadlessGpu> {
    init_logging();
    match HeadlessGpu::new() {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            eprintln!("Skipping headless test: no GPU adapter available ({e})");
            None
        }
    }
}

/// Mean mask value over rows `rows` (all columns).
fn band_mean(mask: &[u8], width: u32, rows: std::ops::Range<u32>) -> f32 {
    let mut sum = 0u64;
    let mut count = 0u64;
    for y in rows {
        for x in 0..width {
            sum += u64::from(mask[(y * width + x) as usize]);
            count += 1;
        }
    }
    sum as f32 / count as f32
}

/// With a 90 degree field of view the floor/wall crease projects to row 5/8 of the image.
fn corner_scene() -> GBuffer {
    GBuffer::corner_scene(SIZE, SIZE, std::f32::consts::FRAC_PI_2)
}

fn crease_row() -> u32 {
    SIZE * 5 / 8
}

/// Renders `scene` once through `effect` and reads back the raw occlusion and the final output.
fn render_passes(gpu: &HeadlessGpu, effect: &mut SsaoEffect, scene: &GBuffer) -> (Vec<u8>, Vec<u8>) {
    let positions = gpu.upload_rgba32f("positions", scene.width, scene.height, &scene.positions);
    let normals = gpu.upload_rgba32f("normals", scene.width, scene.height, &scene.normals);
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    effect.render(
        &gpu.device,
        &gpu.queue,
        &mut encoder,
        &positions.view,
        &normals.view,
        scene.projection,
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    let occlusion = gpu
        .read_occlusion(effect.occlusion_texture())
        .expect("occlusion readback failed");
    let output = gpu
        .read_occlusion(effect.output_texture())
        .expect("output readback failed");
    (occlusion, output)
}

/// One edge-clamped box blur pass along x (`horizontal`) or y, quantized to 8 bits.
fn box_blur_pass(src: &[u8], width: u32, height: u32, size: u32, horizontal: bool) -> Vec<u8> {
    let (w, h, k) = (width as i64, height as i64, size as i64);
    let mut dst = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for i in -k..=k {
                let (sx, sy) = if horizontal {
                    ((x + i).clamp(0, w - 1), y)
                } else {
                    (x, (y + i).clamp(0, h - 1))
                };
                sum += f32::from(src[(sy * w + sx) as usize]) / 255.0;
            }
            let mean = sum / (2 * k + 1) as f32;
            dst[(y * w + x) as usize] = (mean * 255.0).round() as u8;
        }
    }
    dst
}

fn box_blur(src: &[u8], width: u32, height: u32, size: u32) -> Vec<u8> {
    let horizontal = box_blur_pass(src, width, height, size, true);
    box_blur_pass(&horizontal, width, height, size, false)
}

/// Asserts that `actual` is within 2 steps of `expected` at every texel in `region`.
fn assert_close(
    actual: &[u8],
    expected: &[u8],
    width: u32,
    region: impl Iterator<Item = (u32, u32)>,
) {
    for (x, y) in region {
        let i = (y * width + x) as usize;
        let diff = (i16::from(actual[i]) - i16::from(expected[i])).abs();
        assert!(
            diff <= 2,
            "texel ({x}, {y}): got {}, expected {}",
            actual[i],
            expected[i]
        );
    }
}

#[test]
fn headless_corner_is_darker_than_open_wall() {
    let Some(gpu) = gpu() else { return };

    let config = SsaoConfig::new(0, 0.5).with_seed(7);
    let mask = render_mask(&gpu, &corner_scene(), &config).expect("render failed");
    assert_eq!(mask.len(), (SIZE * SIZE) as usize);

    let crease = crease_row();
    let corner = band_mean(&mask, SIZE, crease - 2..crease + 1);
    let open = band_mean(&mask, SIZE, 8..24);

    assert!(open > 240.0, "open wall should be unoccluded, got {open}");
    assert!(
        corner + 10.0 < open,
        "crease ({corner}) should be darker than open wall ({open})"
    );
}

#[test]
fn headless_flat_wall_is_fully_open_without_bias() {
    let Some(gpu) = gpu() else { return };

    // Samples landing on the wall see exactly the fragment's own depth
    for bias in [0.0, 0.025] {
        let config = SsaoConfig::new(0, 0.5).with_bias(bias).with_seed(7);
        let mask = render_mask(&gpu, &corner_scene(), &config).expect("render failed");
        for y in 8..24 {
            for x in 0..SIZE {
                assert_eq!(
                    mask[(y * SIZE + x) as usize],
                    255,
                    "open wall texel ({x}, {y}) with bias {bias}"
                );
            }
        }
    }
}

#[test]
fn headless_blur_matches_cpu_box_blur() {
    let Some(gpu) = gpu() else { return };

    let blur = 3;
    let scene = corner_scene();
    let resources = Arc::new(SsaoResources::new(&gpu.device, Some(21)));
    let mut effect = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        resources,
        SIZE,
        SIZE,
        SsaoConfig::new(blur, 0.5).with_seed(21),
    )
    .expect("effect creation failed");

    let (occlusion, output) = render_passes(&gpu, &mut effect, &scene);
    let expected = box_blur(&occlusion, SIZE, SIZE, blur);

    let all = (0..SIZE).flat_map(|y| (0..SIZE).map(move |x| (x, y)));
    assert_close(&output, &expected, SIZE, all);

    // The crease is where the raw mask actually varies, so the comparison is not trivially 255
    let crease = crease_row();
    assert!(occlusion[(crease * SIZE) as usize..((crease + 1) * SIZE) as usize]
        .iter()
        .any(|&v| v < 250));
}

#[test]
fn headless_blur_clamps_at_image_borders() {
    let Some(gpu) = gpu() else { return };

    // Blur wider than the image along y so every vertical tap window hits an edge
    let (width, height, blur) = (40, 12, 8);
    let scene = GBuffer::corner_scene(width, height, std::f32::consts::FRAC_PI_2);
    let resources = Arc::new(SsaoResources::new(&gpu.device, Some(4)));
    let mut effect = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        resources,
        width,
        height,
        SsaoConfig::new(blur, 0.5).with_seed(4),
    )
    .expect("effect creation failed");

    let (occlusion, output) = render_passes(&gpu, &mut effect, &scene);
    let expected = box_blur(&occlusion, width, height, blur);

    let columns = (0..blur).chain(width - blur..width);
    let border = columns
        .flat_map(|x| (0..height).map(move |y| (x, y)))
        .chain((0..width).flat_map(|x| [(x, 0), (x, height - 1)]));
    assert_close(&output, &expected, width, border);

    let all = (0..height).flat_map(|y| (0..width).map(move |x| (x, y)));
    assert_close(&output, &expected, width, all);
}

#[test]
fn headless_blurred_mask_keeps_the_crease() {
    let Some(gpu) = gpu() else { return };

    let config = SsaoConfig::new(2, 0.5).with_seed(7);
    let mask = render_mask(&gpu, &corner_scene(), &config).expect("render failed");
    assert_eq!(mask.len(), (SIZE * SIZE) as usize);

    let crease = crease_row();
    let corner = band_mean(&mask, SIZE, crease - 2..crease + 1);
    let open = band_mean(&mask, SIZE, 8..24);
    assert!(corner + 10.0 < open);
}

#[test]
fn headless_mask_is_reproducible_with_seed() {
    let Some(gpu) = gpu() else { return };

    let config = SsaoConfig::new(1, 0.5).with_seed(99);
    let scene = corner_scene();
    let a = render_mask(&gpu, &scene, &config).expect("render failed");
    let b = render_mask(&gpu, &scene, &config).expect("render failed");
    assert_eq!(a, b);
}

#[test]
fn headless_config_seed_reproduces_noise_on_shared_resources() {
    let Some(gpu) = gpu() else { return };

    // Kernel comes from the shared resources, noise from each effect's own seed
    let resources = Arc::new(SsaoResources::new(&gpu.device, Some(8)));
    let scene = corner_scene();
    let mut masks = Vec::new();
    for _ in 0..2 {
        let mut effect = SsaoEffect::new(
            &gpu.device,
            &gpu.queue,
            Arc::clone(&resources),
            SIZE,
            SIZE,
            SsaoConfig::new(0, 0.5).with_seed(11),
        )
        .expect("effect creation failed");
        masks.push(render_passes(&gpu, &mut effect, &scene).0);
    }
    assert_eq!(masks[0], masks[1]);
}

#[test]
fn headless_resize_recreates_targets() {
    let Some(gpu) = gpu() else { return };

    let resources = Arc::new(SsaoResources::new(&gpu.device, Some(3)));
    let mut effect = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        resources,
        64,
        64,
        SsaoConfig::new(1, 0.5),
    )
    .expect("effect creation failed");
    assert_eq!(effect.size(), (64, 64));

    effect.resize(&gpu.device, 32, 16);
    assert_eq!(effect.size(), (32, 16));
    assert_eq!(effect.output_texture().width(), 32);
    assert_eq!(effect.output_texture().height(), 16);
    assert_eq!(effect.occlusion_texture().width(), 32);

    let scene = GBuffer::corner_scene(32, 16, 1.0);
    let positions = gpu.upload_rgba32f("positions", 32, 16, &scene.positions);
    let normals = gpu.upload_rgba32f("normals", 32, 16, &scene.normals);
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    effect.render(
        &gpu.device,
        &gpu.queue,
        &mut encoder,
        &positions.view,
        &normals.view,
        scene.projection,
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    let mask = gpu
        .read_occlusion(effect.result_texture())
        .expect("readback failed");
    assert_eq!(mask.len(), 32 * 16);

    // Zero-sized windows clamp instead of failing
    effect.resize(&gpu.device, 0, 0);
    assert_eq!(effect.size(), (1, 1));
}

#[test]
fn headless_noise_follows_blur_level() {
    let Some(gpu) = gpu() else { return };

    let resources = Arc::new(SsaoResources::new(&gpu.device, None));
    let mut effect = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        resources,
        32,
        32,
        SsaoConfig::new(3, 0.5),
    )
    .expect("effect creation failed");
    assert_eq!(effect.noise_texture().width(), 6);
    assert_eq!(effect.noise_texture().height(), 6);

    effect.set_blur_level(&gpu.device, &gpu.queue, 0).unwrap();
    assert_eq!(effect.config().blur_level, 0);
    assert_eq!(effect.noise_texture().width(), 2);

    effect.set_blur_level(&gpu.device, &gpu.queue, 1).unwrap();
    assert_eq!(effect.noise_texture().width(), 2);

    assert!(effect
        .set_blur_level(&gpu.device, &gpu.queue, MAX_BLUR_LEVEL + 1)
        .is_err());
    assert_eq!(effect.config().blur_level, 1);
}

#[test]
fn headless_invalid_config_is_rejected() {
    let Some(gpu) = gpu() else { return };

    let resources = Arc::new(SsaoResources::new(&gpu.device, None));
    let result = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        Arc::clone(&resources),
        32,
        32,
        SsaoConfig::new(1, -1.0),
    );
    assert!(matches!(result, Err(RenderError::Config(_))));

    let mut effect = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        resources,
        32,
        32,
        SsaoConfig::default(),
    )
    .expect("effect creation failed");
    assert!(effect.set_hemisphere_radius(&gpu.queue, 0.0).is_err());
    effect.set_hemisphere_radius(&gpu.queue, 1.25).unwrap();
    assert_eq!(effect.config().hemisphere_radius, 1.25);
}

#[test]
fn headless_effects_share_resources_and_resize_together() {
    let Some(gpu) = gpu() else { return };

    let resources = Arc::new(SsaoResources::new(&gpu.device, Some(5)));
    assert_eq!(resources.kernel().len(), KERNEL_SIZE);

    let mut a = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        Arc::clone(&resources),
        16,
        16,
        SsaoConfig::new(0, 0.5),
    )
    .expect("effect creation failed");
    let mut b = SsaoEffect::new(
        &gpu.device,
        &gpu.queue,
        Arc::clone(&resources),
        16,
        16,
        SsaoConfig::new(4, 1.0),
    )
    .expect("effect creation failed");
    assert_eq!(Arc::strong_count(&resources), 3);

    let mut dispatcher = ScreenSizeDispatcher::new();
    assert!(dispatcher.is_empty());
    dispatcher.add_listener(&mut a);
    dispatcher.add_listener(&mut b);
    assert_eq!(dispatcher.len(), 2);
    dispatcher.dispatch(&gpu.device, 48, 24);

    assert_eq!(a.size(), (48, 24));
    assert_eq!(b.size(), (48, 24));

    // Built again for the next resize, then both effects render at the new size
    ScreenSizeDispatcher::new()
        .with_listener(&mut a)
        .with_listener(&mut b)
        .dispatch(&gpu.device, 20, 10);
    let scene = GBuffer::corner_scene(20, 10, 1.0);
    for effect in [&mut a, &mut b] {
        let (occlusion, output) = render_passes(&gpu, effect, &scene);
        assert_eq!(occlusion.len(), 20 * 10);
        assert_eq!(output.len(), 20 * 10);
    }

    drop(a);
    drop(b);
    assert_eq!(Arc::strong_count(&resources), 1);
}
