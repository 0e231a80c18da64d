//! Fixed bitmap font metrics for printable ASCII.
//!
//! The glyph table covers codepoints `32..=126`; glyph `i` describes the
//! character `32 + i`. Glyph advances may be zero, in which case the width of
//! the glyph's bitmap rectangle stands in for it.

use crate::color::Rgba8;

/// First codepoint covered by the glyph table.
pub const FIRST_GLYPH: u8 = 32;
/// Last codepoint covered by the glyph table.
pub const LAST_GLYPH: u8 = 126;
/// Number of glyphs in a full printable-ASCII table.
pub const GLYPH_COUNT: usize = (LAST_GLYPH - FIRST_GLYPH) as usize + 1;

/// Native pixel size of the built-in font.
pub const DEFAULT_BASE_SIZE: i32 = 10;

/// Bitmap widths of the built-in glyphs, codepoints 32 to 126.
const DEFAULT_GLYPH_WIDTHS: [u8; GLYPH_COUNT] = [
    3, 1, 4, 6, 5, 7, 6, 2, 3, 3, 5, 5, 2, 4, 1, 7, 5, 2, 5, 5, 5, 5, 5, 5, 5, 5, 1, 1, 3, 4, 3, 6,
    7, 6, 6, 6, 6, 6, 6, 6, 6, 3, 5, 6, 5, 7, 6, 6, 6, 6, 6, 6, 7, 6, 7, 7, 6, 6, 6, 2, 7, 2, 3, 5,
    2, 5, 5, 5, 5, 5, 4, 5, 5, 1, 2, 5, 2, 5, 5, 5, 5, 5, 5, 5, 4, 5, 5, 5, 5, 5, 5, 3, 1, 3, 4,
];

/// Width of the generated atlas used by [`BitmapFont::default`].
const DEFAULT_ATLAS_WIDTH: u32 = 128;
const DEFAULT_ATLAS_PADDING: u32 = 1;

/// Location of a glyph bitmap inside the font atlas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphInfo {
    /// Codepoint this glyph renders.
    pub value: u8,
    /// Horizontal cursor movement in font units. Zero when the font carries no
    /// advance metadata for the glyph.
    pub advance_x: i32,
    /// Horizontal bearing.
    pub offset_x: i32,
    pub offset_y: i32,
    pub rect: GlyphRect,
}

impl GlyphInfo {
    /// Advance used for text measurement: the declared advance, or the bitmap
    /// width plus bearing when the advance is zero.
    pub fn measure_advance(&self) -> f32 {
        if self.advance_x != 0 {
            self.advance_x as f32
        } else {
            self.rect.width + self.offset_x as f32
        }
    }

    /// Advance used when laying glyphs out for drawing, in font units.
    pub fn draw_advance(&self) -> f32 {
        if self.advance_x != 0 {
            self.advance_x as f32
        } else {
            self.rect.width
        }
    }
}

/// Straight-alpha RGBA pixels holding the glyph bitmaps of a [`BitmapFont`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba8>,
}

impl FontAtlas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::default(); (width * height) as usize],
        }
    }

    /// Raw bytes of the atlas in `RGBA` order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn fill(&mut self, rect: GlyphRect, color: Rgba8) {
        let x0 = rect.x as u32;
        let y0 = rect.y as u32;
        for y in y0..(y0 + rect.height as u32).min(self.height) {
            for x in x0..(x0 + rect.width as u32).min(self.width) {
                self.pixels[(y * self.width + x) as usize] = color;
            }
        }
    }
}

/// A bitmap font: native size, glyph table, and optionally the glyph bitmaps.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapFont {
    base_size: i32,
    glyphs: Vec<GlyphInfo>,
    atlas: Option<FontAtlas>,
}

impl BitmapFont {
    /// Build a font from a glyph table starting at codepoint 32.
    ///
    /// Tables longer than the printable range are truncated. A `base_size`
    /// below 1 is raised to 1 so scale factors stay finite.
    pub fn new(base_size: i32, mut glyphs: Vec<GlyphInfo>) -> Self {
        glyphs.truncate(GLYPH_COUNT);
        if base_size < 1 {
            log::warn!("Font base size {} is not positive, using 1", base_size);
        }
        Self {
            base_size: base_size.max(1),
            glyphs,
            atlas: None,
        }
    }

    pub fn with_atlas(mut self, atlas: FontAtlas) -> Self {
        self.atlas = Some(atlas);
        self
    }

    pub fn base_size(&self) -> i32 {
        self.base_size
    }

    pub fn glyphs(&self) -> &[GlyphInfo] {
        &self.glyphs
    }

    pub fn atlas(&self) -> Option<&FontAtlas> {
        self.atlas.as_ref()
    }

    /// Look up the glyph for a byte. Bytes outside the table yield `None`.
    pub fn glyph(&self, byte: u8) -> Option<&GlyphInfo> {
        let index = byte.checked_sub(FIRST_GLYPH)? as usize;
        self.glyphs.get(index)
    }
}

impl Default for BitmapFont {
    /// The built-in font: base size 10, zero advances, and an atlas of solid
    /// block glyphs so text is visible without loading any assets.
    fn default() -> Self {
        let mut glyphs = Vec::with_capacity(GLYPH_COUNT);
        let mut x = DEFAULT_ATLAS_PADDING;
        let mut y = DEFAULT_ATLAS_PADDING;
        let row_height = DEFAULT_BASE_SIZE as u32 + DEFAULT_ATLAS_PADDING;

        for (i, width) in DEFAULT_GLYPH_WIDTHS.iter().copied().enumerate() {
            let width = width as u32;
            if x + width + DEFAULT_ATLAS_PADDING > DEFAULT_ATLAS_WIDTH {
                x = DEFAULT_ATLAS_PADDING;
                y += row_height;
            }
            glyphs.push(GlyphInfo {
                value: FIRST_GLYPH + i as u8,
                advance_x: 0,
                offset_x: 0,
                offset_y: 0,
                rect: GlyphRect {
                    x: x as f32,
                    y: y as f32,
                    width: width as f32,
                    height: DEFAULT_BASE_SIZE as f32,
                },
            });
            x += width + DEFAULT_ATLAS_PADDING;
        }

        let mut atlas = FontAtlas::new(DEFAULT_ATLAS_WIDTH, y + row_height);
        for glyph in glyphs.iter().filter(|g| g.value != b' ') {
            // Body of the block sits between the cap line and the baseline.
            let body = GlyphRect {
                y: glyph.rect.y + 1.0,
                height: glyph.rect.height - 3.0,
                ..glyph.rect
            };
            atlas.fill(body, Rgba8::WHITE);
        }

        Self::new(DEFAULT_BASE_SIZE, glyphs).with_atlas(atlas)
    }
}
