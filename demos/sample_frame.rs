//! Renders the two-line sample frame to a PNG.
//!
//! Run with `cargo run --example sample_frame -- [output.png]`.

use layout_raster::prelude::*;

const WIDTH: u32 = 600;
const HEIGHT: u32 = 400;
const PADDING: f32 = 20.0;

struct TextLine {
    text: &'static [u8],
    font_size: f32,
    color: Color,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_frame.png".to_string());

    let measure = TextMeasurer::default().layout_callback();

    let lines = [
        TextLine {
            text: b"CChat",
            font_size: 24.0,
            color: Color::BLACK,
        },
        TextLine {
            text: b"Sample text",
            font_size: 64.0,
            color: Color::RED,
        },
    ];

    // Column layout: children centered on both axes inside the padded root.
    let sizes: Vec<Dimensions> = lines
        .iter()
        .map(|line| {
            let config = TextElementConfig {
                font_size: line.font_size,
                letter_spacing: 0.0,
                color: line.color,
            };
            measure(line.text, &config)
        })
        .collect();

    let content_width = WIDTH as f32 - 2.0 * PADDING;
    let content_height = HEIGHT as f32 - 2.0 * PADDING;
    let column_height: f32 = sizes.iter().map(|s| s.height).sum();

    let mut commands = Vec::with_capacity(lines.len());
    let mut y = PADDING + (content_height - column_height) / 2.0;
    for (line, size) in lines.iter().zip(&sizes) {
        let x = PADDING + (content_width - size.width) / 2.0;
        let bounding_box = BoundingBox::new(x, y, size.width, size.height);
        commands.push(
            RenderCommand::text(bounding_box, line.text, line.font_size, 0.0, line.color)
                .with_id(commands.len() as u32 + 1),
        );
        y += size.height;
    }

    let mut backend = SoftwareBackend::new(WIDTH, HEIGHT)?;
    backend.set_clear_color(Rgba8::WHITE);
    backend.clear();

    let mut renderer = Renderer::default();
    let stats = renderer.render_or_exit(&mut backend, &commands);
    log::info!("Drew {} commands ({} text)", stats.commands, stats.texts);
    renderer.shutdown();

    backend.save_png(&output)?;
    Ok(())
}
