use crate::{Result, VisualTestError};
use layout_raster::prelude::*;
use std::path::PathBuf;

/// Configuration for capturing a scene
pub struct CaptureConfig {
    /// Name of the scene to render
    pub scene_name: String,
    /// Path where the rendered frame will be saved
    pub output_path: PathBuf,
}

/// Names of every scene [`capture_scene`] knows how to draw.
pub const SCENES: &[&str] = &[
    "sample_frame",
    "rectangles",
    "borders",
    "clipping",
    "image_tint",
];

const WIDTH: u32 = 320;
const HEIGHT: u32 = 200;

/// Render a named scene through the software backend and save it as PNG.
pub fn capture_scene(config: &CaptureConfig) -> Result<()> {
    let mut backend = SoftwareBackend::new(WIDTH, HEIGHT)?;
    backend.set_clear_color(Rgba8::WHITE);
    backend.clear();

    let mut renderer = Renderer::default();
    let stats = match config.scene_name.as_str() {
        "sample_frame" => renderer.render(&mut backend, &sample_frame())?,
        "rectangles" => renderer.render(&mut backend, &rectangles())?,
        "borders" => renderer.render(&mut backend, &borders())?,
        "clipping" => renderer.render(&mut backend, &clipping())?,
        "image_tint" => {
            let checker = checkerboard(&mut backend)?;
            renderer.render(&mut backend, &image_tint(checker))?
        }
        other => return Err(VisualTestError::UnknownScene(other.to_string())),
    };
    renderer.shutdown();

    if stats.clip_depth != 0 {
        return Err(VisualTestError::Capture(format!(
            "Scene '{}' left {} clip region(s) open",
            config.scene_name, stats.clip_depth
        )));
    }

    if let Some(parent) = config.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    backend.save_png(&config.output_path)?;

    if !config.output_path.exists() {
        return Err(VisualTestError::Capture(format!(
            "Frame was not written to {}",
            config.output_path.display()
        )));
    }
    Ok(())
}

fn centered_text<'a>(
    measurer: &TextMeasurer,
    text: &'a [u8],
    y: f32,
    font_size: f32,
    color: Color,
) -> RenderCommand<'a> {
    let size = measurer.measure_lossy(text, font_size, 0.0);
    let x = (WIDTH as f32 - size.width) / 2.0;
    RenderCommand::text(
        BoundingBox::new(x, y, size.width, size.height),
        text,
        font_size,
        0.0,
        color,
    )
}

// Scenes keep to whole-pixel edges, square corners, unscaled textures and
// integer text scales, so the committed references are exact.

fn sample_frame() -> Vec<RenderCommand<'static>> {
    let measurer = TextMeasurer::default();
    vec![
        centered_text(&measurer, b"CChat", 70.0, 20.0, Color::BLACK),
        centered_text(&measurer, b"Sample text", 95.0, 40.0, Color::RED),
    ]
}

fn rectangles() -> Vec<RenderCommand<'static>> {
    vec![
        RenderCommand::rectangle(
            BoundingBox::new(10.0, 10.0, 100.0, 50.0),
            Color::from_hex(0x3366cc),
            0.0,
        ),
        RenderCommand::rectangle(
            BoundingBox::new(120.0, 10.0, 100.0, 50.0),
            Color::from_hex(0x228833),
            0.0,
        ),
        // Later commands paint over earlier ones.
        RenderCommand::rectangle(BoundingBox::new(60.0, 40.0, 100.0, 40.0), Color::RED, 0.0),
        RenderCommand::rectangle(
            BoundingBox::new(230.0, 10.0, 80.0, 80.0),
            Color::from_hex(0xffcc00),
            0.0,
        ),
        // Fractional boxes snap to whole pixels.
        RenderCommand::rectangle(
            BoundingBox::new(10.4, 100.6, 99.5, 49.5),
            Color::BLACK,
            0.0,
        ),
    ]
}

fn borders() -> Vec<RenderCommand<'static>> {
    vec![
        RenderCommand::border(
            BoundingBox::new(10.0, 10.0, 140.0, 80.0),
            BorderWidth::all(2),
            Color::BLACK,
            0.0,
        ),
        RenderCommand::border(
            BoundingBox::new(170.0, 10.0, 140.0, 80.0),
            BorderWidth::all(4),
            Color::from_hex(0x228833),
            0.0,
        ),
        RenderCommand::border(
            BoundingBox::new(10.0, 110.0, 300.0, 80.0),
            BorderWidth::new(1, 6, 2, 8),
            Color::RED,
            0.0,
        ),
    ]
}

fn clipping() -> Vec<RenderCommand<'static>> {
    let full = BoundingBox::new(0.0, 0.0, WIDTH as f32, HEIGHT as f32);
    vec![
        RenderCommand::scissor_start(BoundingBox::new(20.0, 20.0, 200.0, 120.0)),
        RenderCommand::rectangle(full, Color::from_hex(0xdddddd), 0.0),
        RenderCommand::scissor_start(BoundingBox::new(100.0, 60.0, 200.0, 120.0)),
        RenderCommand::rectangle(full, Color::from_hex(0x3366cc), 0.0),
        RenderCommand::text(
            BoundingBox::new(90.0, 90.0, 200.0, 20.0),
            b"clipped text",
            20.0,
            1.0,
            Color::WHITE,
        ),
        RenderCommand::scissor_end(),
        RenderCommand::scissor_end(),
        RenderCommand::rectangle(BoundingBox::new(240.0, 150.0, 60.0, 30.0), Color::RED, 0.0),
    ]
}

fn checkerboard(backend: &mut SoftwareBackend) -> Result<TextureHandle> {
    const SIZE: u32 = 64;
    const CELL: u32 = 8;
    let mut pixels = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let shade = if (x / CELL + y / CELL) % 2 == 0 { 255 } else { 96 };
            pixels.extend_from_slice(&[shade, shade, shade, 255]);
        }
    }
    Ok(backend.load_texture_rgba8(SIZE, SIZE, &pixels)?)
}

fn image_tint(texture: TextureHandle) -> Vec<RenderCommand<'static>> {
    vec![
        // All-zero tint draws the texture untouched.
        RenderCommand::image(
            BoundingBox::new(10.0, 10.0, 64.0, 64.0),
            texture,
            Color::TRANSPARENT,
        ),
        RenderCommand::image(
            BoundingBox::new(110.0, 10.0, 64.0, 64.0),
            texture,
            Color::rgb(255.0, 128.0, 0.0),
        ),
        RenderCommand::image(
            BoundingBox::new(210.0, 10.0, 64.0, 64.0),
            texture,
            Color::rgb(64.0, 160.0, 255.0),
        ),
        RenderCommand::image(
            BoundingBox::new(110.0, 100.0, 64.0, 64.0),
            texture,
            Color::BLACK,
        ),
    ]
}
