use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::font::BitmapFont;
use crate::geometry::Dimensions;

/// How the measured height of a text run relates to its line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineHeightMode {
    /// Height is the font size no matter how many lines the run spans. This
    /// matches the sizes existing layouts were built against.
    #[default]
    SingleLine,
    /// Height is the font size times the number of lines.
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasureConfig {
    pub line_height: LineHeightMode,
}

impl MeasureConfig {
    pub fn line_height(mut self, mode: LineHeightMode) -> Self {
        self.line_height = mode;
        self
    }
}

/// Per text element configuration the layout engine hands to the measure
/// callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextElementConfig {
    pub font_size: f32,
    pub letter_spacing: f32,
    pub color: Color,
}

/// Measures text runs against a bitmap font's glyph table.
///
/// Register [`TextMeasurer::layout_callback`] with the layout engine before
/// the first layout pass.
#[derive(Debug, Clone, Default)]
pub struct TextMeasurer {
    font: BitmapFont,
    config: MeasureConfig,
}

impl TextMeasurer {
    pub fn new(font: BitmapFont) -> Self {
        Self {
            font,
            config: MeasureConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MeasureConfig) -> Self {
        self.config = config;
        self
    }

    pub fn font(&self) -> &BitmapFont {
        &self.font
    }

    /// Measure a text run. Fails on the first byte that has no glyph.
    pub fn measure(&self, text: &[u8], font_size: f32, letter_spacing: f32) -> Result<Dimensions> {
        self.measure_with(text, font_size, letter_spacing, true)
    }

    /// Measure for the layout engine, which cannot handle failures. Bytes
    /// without a glyph measure as zero width.
    pub fn measure_lossy(&self, text: &[u8], font_size: f32, letter_spacing: f32) -> Dimensions {
        match self.measure_with(text, font_size, letter_spacing, true) {
            Ok(size) => size,
            Err(err) => {
                log::warn!("Text measurement: {}", err);
                self.measure_with(text, font_size, letter_spacing, false)
                    .unwrap_or_default()
            }
        }
    }

    /// Wrap the measurer in the callback shape the layout engine expects.
    pub fn layout_callback(self) -> impl Fn(&[u8], &TextElementConfig) -> Dimensions {
        move |text: &[u8], config: &TextElementConfig| {
            self.measure_lossy(text, config.font_size, config.letter_spacing)
        }
    }

    fn measure_with(
        &self,
        text: &[u8],
        size: f32,
        spacing: f32,
        strict: bool,
    ) -> Result<Dimensions> {
        measure_bytes(&self.font, self.config, text, size, spacing, strict)
    }
}

/// Measure `text` with the glyph table of `font`.
///
/// Width is the widest line scaled from the font's native size, plus letter
/// spacing for the characters of the last line.
pub fn measure_text(
    font: &BitmapFont,
    text: &[u8],
    font_size: f32,
    letter_spacing: f32,
) -> Result<Dimensions> {
    let config = MeasureConfig::default();
    measure_bytes(font, config, text, font_size, letter_spacing, true)
}

fn measure_bytes(
    font: &BitmapFont,
    config: MeasureConfig,
    text: &[u8],
    font_size: f32,
    letter_spacing: f32,
    strict: bool,
) -> Result<Dimensions> {
    let scale = font_size / font.base_size() as f32;

    let mut max_line_width = 0.0f32;
    let mut line_width = 0.0f32;
    let mut line_chars = 0usize;
    let mut line_count = 1usize;

    for (position, &byte) in text.iter().enumerate() {
        if byte == b'\n' {
            max_line_width = max_line_width.max(line_width);
            line_width = 0.0;
            // The newline itself is counted toward the next line's spacing.
            line_chars = 1;
            line_count += 1;
            continue;
        }

        match font.glyph(byte) {
            Some(glyph) => line_width += glyph.measure_advance(),
            None if strict => return Err(RenderError::InvalidGlyph { byte, position }),
            None => {}
        }
        line_chars += 1;
    }
    max_line_width = max_line_width.max(line_width);

    let height = match config.line_height {
        LineHeightMode::SingleLine => font_size,
        LineHeightMode::Stacked => font_size * line_count as f32,
    };

    Ok(Dimensions::new(
        max_line_width * scale + line_chars as f32 * letter_spacing,
        height,
    ))
}
