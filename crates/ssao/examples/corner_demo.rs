//! Renders the occlusion mask of a floor-and-wall corner to a PNG.
//!
//! Usage: `cargo run --example corner_demo -- [config.json] [output.png]`

use ssao::*;

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SsaoConfig::load(path)?,
        None => SsaoConfig::new(2, 0.5).with_seed(1),
    };
    let output = args.next().unwrap_or_else(|| "ssao_corner.png".to_string());

    let (width, height) = (640, 480);
    let gbuffer = GBuffer::corner_scene(width, height, std::f32::consts::FRAC_PI_3);

    let gpu = HeadlessGpu::new()?;
    let mask = render_mask(&gpu, &gbuffer, &config)?;
    save_mask_png(&output, &mask, width, height)?;

    log::info!("wrote {output}");
    Ok(())
}
