//! CPU rasterizer backend on tiny-skia.
//!
//! Draws into an in-memory pixmap, so frames can be rendered headlessly and
//! written out as PNG. Textures are kept in premultiplied form, keyed by the
//! id of the [`TextureHandle`] issued when they were loaded.

use std::collections::HashMap;
use std::ffi::CStr;
use std::path::Path;

use resvg::tiny_skia::{
    self, ColorU8, FillRule, FilterQuality, Mask, Paint, PathBuilder, Pattern, Pixmap,
    PremultipliedColorU8, Rect, SpreadMode, Transform,
};

use crate::color::Rgba8;
use crate::error::TextureError;
use crate::font::{BitmapFont, FontAtlas};
use crate::geometry::{BoundingBox, IntRect, Vector2};

use super::backend::{Backend, TextureHandle};

/// Maximum distance between a tessellated arc and the true circle, used when
/// the caller asks for an automatic segment count.
const SMOOTH_CIRCLE_ERROR_RATE: f32 = 0.5;

pub struct SoftwareBackend {
    pixmap: Pixmap,
    clear_color: Rgba8,
    anti_alias: bool,
    font: BitmapFont,
    font_atlas: Option<Pixmap>,
    textures: HashMap<u32, Pixmap>,
    next_texture_id: u32,
    clip_stack: Vec<IntRect>,
    clip_mask: Option<Mask>,
}

impl SoftwareBackend {
    /// Create a `width` x `height` target cleared to opaque white, drawing
    /// text with the built-in font.
    pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(TextureError::InvalidDimensions { width, height })?;

        let mut backend = Self {
            pixmap,
            clear_color: Rgba8::WHITE,
            anti_alias: true,
            font: BitmapFont::default(),
            font_atlas: None,
            textures: HashMap::new(),
            next_texture_id: 1,
            clip_stack: Vec::new(),
            clip_mask: None,
        };
        backend.font_atlas = backend.font.atlas().and_then(atlas_pixmap);
        backend.clear();

        log::debug!("Software backend created: {}x{}", width, height);
        Ok(backend)
    }

    /// Replace the font used by [`Backend::draw_text`]. A font without an
    /// atlas has metrics only and draws nothing.
    pub fn with_font(mut self, font: BitmapFont) -> Self {
        self.font_atlas = font.atlas().and_then(atlas_pixmap);
        if self.font_atlas.is_none() {
            log::warn!("Font has no usable atlas, text will not be drawn");
        }
        self.font = font;
        self
    }

    /// Anti-alias curved edges (rounded rects and rings). On by default.
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn set_clear_color(&mut self, color: Rgba8) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Rgba8 {
        self.clear_color
    }

    /// Fill the target with the clear color and drop any clip regions left
    /// over from the previous frame.
    pub fn clear(&mut self) {
        if !self.clip_stack.is_empty() {
            log::warn!(
                "Clearing with {} clip region(s) still pushed",
                self.clip_stack.len()
            );
            self.clip_stack.clear();
            self.clip_mask = None;
        }
        let c = self.clear_color;
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn font(&self) -> &BitmapFont {
        &self.font
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha color of one target pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.pixmap.pixel(x, y).map(demultiply)
    }

    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    /// Copy the target out as a straight-alpha image.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let color = self.pixel(x, y).unwrap_or_default();
            image::Rgba(color.into())
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), TextureError> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Saved frame to {}", path.display());
        Ok(())
    }

    /// Load a texture from tightly packed, straight-alpha RGBA8 pixels.
    pub fn load_texture_rgba8(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle, TextureError> {
        let pixmap = pixmap_from_rgba8(width, height, pixels)?;
        Ok(self.insert_texture(pixmap))
    }

    /// Decode an encoded raster image (PNG, JPEG, GIF, WebP).
    pub fn load_texture_from_bytes(&mut self, bytes: &[u8]) -> Result<TextureHandle, TextureError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        self.load_texture_rgba8(width, height, rgba.as_raw())
    }

    pub fn load_texture_from_path(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, TextureError> {
        let bytes = std::fs::read(path)?;
        self.load_texture_from_bytes(&bytes)
    }

    /// Rasterize an SVG document at `scale` times its intrinsic size.
    pub fn load_svg(&mut self, bytes: &[u8], scale: f32) -> Result<TextureHandle, TextureError> {
        let tree = resvg::usvg::Tree::from_data(bytes, &resvg::usvg::Options::default())
            .map_err(|e| TextureError::Svg(e.to_string()))?;

        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(TextureError::InvalidDimensions { width, height })?;

        let transform = Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(self.insert_texture(pixmap))
    }

    /// Drop a texture. Returns whether the handle was known.
    pub fn unload_texture(&mut self, texture: TextureHandle) -> bool {
        self.textures.remove(&texture.id).is_some()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn insert_texture(&mut self, pixmap: Pixmap) -> TextureHandle {
        let handle = TextureHandle::new(self.next_texture_id, pixmap.width(), pixmap.height());
        self.next_texture_id += 1;
        log::debug!(
            "Loaded texture {} ({}x{})",
            handle.id,
            handle.width,
            handle.height
        );
        self.textures.insert(handle.id, pixmap);
        handle
    }

    fn rebuild_clip_mask(&mut self) {
        let Some((first, rest)) = self.clip_stack.split_first() else {
            self.clip_mask = None;
            return;
        };
        let clip = rest.iter().fold(*first, |acc, r| acc.intersect(r));

        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            self.clip_mask = None;
            return;
        };
        if let Some(rect) = int_rect_to_skia(clip) {
            let path = PathBuilder::from_rect(rect);
            mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
        }
        self.clip_mask = Some(mask);
    }

    fn fill_path(&mut self, path: &tiny_skia::Path, color: Rgba8) {
        let paint = solid_paint(color, self.anti_alias);
        self.pixmap.fill_path(
            path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.clip_mask.as_ref(),
        );
    }
}

impl Backend for SoftwareBackend {
    fn fill_rect(&mut self, rect: IntRect, color: Rgba8) {
        let Some(rect) = int_rect_to_skia(rect) else {
            return;
        };
        let paint = solid_paint(color, false);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), self.clip_mask.as_ref());
    }

    fn fill_rounded_rect(
        &mut self,
        rect: BoundingBox,
        roundness: f32,
        segments: i32,
        color: Rgba8,
    ) {
        if roundness <= 0.0 || rect.width < 1.0 || rect.height < 1.0 {
            self.fill_rect(rect.to_int_rect(), color);
            return;
        }

        let radius = roundness.min(1.0) * rect.min_side() / 2.0;
        let segments = resolve_segments(segments, radius, 90.0);
        let (left, right) = (rect.x + radius, rect.x + rect.width - radius);
        let (top, bottom) = (rect.y + radius, rect.y + rect.height - radius);

        let mut pb = PathBuilder::new();
        pb.move_to(left, rect.y);
        arc_to(&mut pb, right, top, radius, 270.0, 360.0, segments);
        arc_to(&mut pb, right, bottom, radius, 0.0, 90.0, segments);
        arc_to(&mut pb, left, bottom, radius, 90.0, 180.0, segments);
        arc_to(&mut pb, left, top, radius, 180.0, 270.0, segments);
        pb.close();

        if let Some(path) = pb.finish() {
            self.fill_path(&path, color);
        }
    }

    fn fill_ring(
        &mut self,
        center: Vector2,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        segments: i32,
        color: Rgba8,
    ) {
        let (inner, outer) = if inner_radius > outer_radius {
            (outer_radius, inner_radius)
        } else {
            (inner_radius, outer_radius)
        };
        if outer <= 0.0 {
            return;
        }
        let (start, end) = if start_angle > end_angle {
            (end_angle, start_angle)
        } else {
            (start_angle, end_angle)
        };
        let segments = resolve_segments(segments, outer, end - start);

        let mut pb = PathBuilder::new();
        let (sx, sy) = polar(center, outer, start);
        pb.move_to(sx, sy);
        arc_to(&mut pb, center.x, center.y, outer, start, end, segments);
        if inner > 0.0 {
            arc_to(&mut pb, center.x, center.y, inner, end, start, segments);
        } else {
            pb.line_to(center.x, center.y);
        }
        pb.close();

        if let Some(path) = pb.finish() {
            self.fill_path(&path, color);
        }
    }

    fn draw_texture(
        &mut self,
        texture: TextureHandle,
        source: BoundingBox,
        dest: BoundingBox,
        tint: Rgba8,
    ) {
        let Some(pixmap) = self.textures.get(&texture.id) else {
            log::warn!("Draw of unknown texture {}", texture.id);
            return;
        };
        if source.width <= 0.0 || source.height <= 0.0 {
            return;
        }
        let Some(rect) = Rect::from_xywh(dest.x, dest.y, dest.width, dest.height) else {
            return;
        };

        let scale_x = dest.width / source.width;
        let scale_y = dest.height / source.height;
        if !scale_x.is_finite() || !scale_y.is_finite() {
            return;
        }
        let transform = Transform::from_row(
            scale_x,
            0.0,
            0.0,
            scale_y,
            dest.x - source.x * scale_x,
            dest.y - source.y * scale_y,
        );

        let tinted;
        let source_pixmap = if tint.is_opaque_white() {
            pixmap
        } else {
            tinted = tint_pixmap(pixmap, tint);
            &tinted
        };

        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            source_pixmap.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            1.0,
            transform,
        );
        paint.anti_alias = false;

        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), self.clip_mask.as_ref());
    }

    fn draw_text(
        &mut self,
        text: &CStr,
        x: i32,
        y: i32,
        font_size: f32,
        spacing: f32,
        color: Rgba8,
    ) {
        let Some(atlas) = self.font_atlas.as_ref() else {
            return;
        };
        let atlas = tint_pixmap(atlas, color);
        let scale = font_size / self.font.base_size() as f32;

        let mut cursor_x = 0.0f32;
        let mut cursor_y = 0.0f32;
        for &byte in text.to_bytes() {
            if byte == b'\n' {
                cursor_x = 0.0;
                cursor_y += font_size;
                continue;
            }

            let Some(glyph) = self.font.glyph(byte).or_else(|| self.font.glyph(b'?')) else {
                continue;
            };

            if byte != b' ' && byte != b'\t' {
                let dest_x = x as f32 + cursor_x + glyph.offset_x as f32 * scale;
                let dest_y = y as f32 + cursor_y + glyph.offset_y as f32 * scale;
                let dest = Rect::from_xywh(
                    dest_x,
                    dest_y,
                    glyph.rect.width * scale,
                    glyph.rect.height * scale,
                );
                if let Some(dest) = dest {
                    let mut paint = Paint::default();
                    paint.shader = Pattern::new(
                        atlas.as_ref(),
                        SpreadMode::Pad,
                        FilterQuality::Nearest,
                        1.0,
                        Transform::from_row(
                            scale,
                            0.0,
                            0.0,
                            scale,
                            dest_x - glyph.rect.x * scale,
                            dest_y - glyph.rect.y * scale,
                        ),
                    );
                    paint.anti_alias = false;
                    self.pixmap.fill_rect(
                        dest,
                        &paint,
                        Transform::identity(),
                        self.clip_mask.as_ref(),
                    );
                }
            }

            cursor_x += glyph.draw_advance() * scale + spacing;
        }
    }

    fn push_clip(&mut self, rect: IntRect) {
        self.clip_stack.push(rect);
        self.rebuild_clip_mask();
    }

    fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_none() {
            log::warn!("Clip pop without matching push");
            return;
        }
        self.rebuild_clip_mask();
    }
}

fn solid_paint(color: Rgba8, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = anti_alias;
    paint
}

fn int_rect_to_skia(rect: IntRect) -> Option<Rect> {
    Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

fn demultiply(pixel: PremultipliedColorU8) -> Rgba8 {
    let c = pixel.demultiply();
    Rgba8::new(c.red(), c.green(), c.blue(), c.alpha())
}

fn pixmap_from_rgba8(width: u32, height: u32, pixels: &[u8]) -> Result<Pixmap, TextureError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(TextureError::InvalidDimensions { width, height });
    }
    let mut pixmap =
        Pixmap::new(width, height).ok_or(TextureError::InvalidDimensions { width, height })?;

    let source: &[[u8; 4]] = bytemuck::cast_slice(pixels);
    for (dst, &[r, g, b, a]) in pixmap.pixels_mut().iter_mut().zip(source) {
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn atlas_pixmap(atlas: &FontAtlas) -> Option<Pixmap> {
    match pixmap_from_rgba8(atlas.width, atlas.height, atlas.as_bytes()) {
        Ok(pixmap) => Some(pixmap),
        Err(err) => {
            log::warn!("Font atlas unusable: {}", err);
            None
        }
    }
}

/// Copy of `pixmap` with every texel multiplied by `tint`.
fn tint_pixmap(pixmap: &Pixmap, tint: Rgba8) -> Pixmap {
    let mut tinted = pixmap.clone();
    let ta = tint.a as f32 / 255.0;
    let factors = [
        tint.r as f32 / 255.0 * ta,
        tint.g as f32 / 255.0 * ta,
        tint.b as f32 / 255.0 * ta,
        ta,
    ];
    let scale = |v: u8, f: f32| (v as f32 * f).round() as u8;

    for px in tinted.pixels_mut() {
        let a = scale(px.alpha(), factors[3]);
        let r = scale(px.red(), factors[0]).min(a);
        let g = scale(px.green(), factors[1]).min(a);
        let b = scale(px.blue(), factors[2]).min(a);
        *px = PremultipliedColorU8::from_rgba(r, g, b, a)
            .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }
    tinted
}

fn polar(center: Vector2, radius: f32, degrees: f32) -> (f32, f32) {
    let rad = degrees.to_radians();
    (center.x + rad.cos() * radius, center.y + rad.sin() * radius)
}

/// Append line segments tracing an arc around `(cx, cy)`, including both
/// end points. Angles are in degrees, y pointing down.
fn arc_to(
    pb: &mut PathBuilder,
    cx: f32,
    cy: f32,
    radius: f32,
    start: f32,
    end: f32,
    segments: i32,
) {
    let center = Vector2::new(cx, cy);
    let step = (end - start) / segments as f32;
    for i in 0..=segments {
        let (px, py) = polar(center, radius, start + step * i as f32);
        pb.line_to(px, py);
    }
}

/// Segment count for an arc spanning `sweep` degrees. Non-positive requests
/// get a count that keeps the error under [`SMOOTH_CIRCLE_ERROR_RATE`].
fn resolve_segments(requested: i32, radius: f32, sweep: f32) -> i32 {
    if requested > 0 {
        return requested;
    }
    if radius <= SMOOTH_CIRCLE_ERROR_RATE {
        return 4;
    }
    let th = (2.0 * (1.0 - SMOOTH_CIRCLE_ERROR_RATE / radius).powi(2) - 1.0).acos();
    let full_circle = (std::f32::consts::TAU / th).ceil();
    ((sweep.abs() / 360.0 * full_circle).ceil() as i32).max(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
    const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);

    fn backend(width: u32, height: u32) -> SoftwareBackend {
        SoftwareBackend::new(width, height).unwrap()
    }

    // Bilinear sampling may be off by one step per channel.
    fn assert_near(actual: Option<Rgba8>, expected: Rgba8) {
        let actual: [u8; 4] = actual.unwrap().into();
        let expected: [u8; 4] = expected.into();
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff(e) <= 1, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_zero_size_target_is_rejected() {
        assert!(matches!(
            SoftwareBackend::new(0, 10),
            Err(TextureError::InvalidDimensions {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn test_clear_uses_clear_color() {
        let mut b = backend(4, 4);
        assert_eq!(b.pixel(0, 0), Some(Rgba8::WHITE));
        b.set_clear_color(BLACK);
        b.clear();
        assert_eq!(b.pixel(3, 3), Some(BLACK));
    }

    #[test]
    fn test_fill_rect_covers_exact_pixels() {
        let mut b = backend(10, 10);
        b.fill_rect(IntRect::new(2, 2, 3, 3), RED);
        assert_eq!(b.pixel(2, 2), Some(RED));
        assert_eq!(b.pixel(4, 4), Some(RED));
        assert_eq!(b.pixel(5, 5), Some(Rgba8::WHITE));
        assert_eq!(b.pixel(1, 1), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_negative_rect_draws_nothing() {
        let mut b = backend(10, 10);
        b.fill_rect(IntRect::new(2, 2, 3, -4), RED);
        assert!(b.to_image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_clip_limits_drawing() {
        let mut b = backend(10, 10);
        b.push_clip(IntRect::new(0, 0, 5, 5));
        b.fill_rect(IntRect::new(0, 0, 10, 10), RED);
        assert_eq!(b.pixel(2, 2), Some(RED));
        assert_eq!(b.pixel(6, 6), Some(Rgba8::WHITE));

        b.pop_clip();
        assert_eq!(b.clip_depth(), 0);
        b.fill_rect(IntRect::new(0, 0, 10, 10), RED);
        assert_eq!(b.pixel(6, 6), Some(RED));
    }

    #[test]
    fn test_nested_clips_intersect() {
        let mut b = backend(12, 12);
        b.push_clip(IntRect::new(0, 0, 6, 6));
        b.push_clip(IntRect::new(4, 4, 6, 6));
        b.fill_rect(IntRect::new(0, 0, 12, 12), RED);

        assert_eq!(b.pixel(5, 5), Some(RED));
        assert_eq!(b.pixel(2, 2), Some(Rgba8::WHITE));
        assert_eq!(b.pixel(7, 7), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_disjoint_clips_hide_everything() {
        let mut b = backend(10, 10);
        b.push_clip(IntRect::new(0, 0, 3, 3));
        b.push_clip(IntRect::new(6, 6, 3, 3));
        b.fill_rect(IntRect::new(0, 0, 10, 10), RED);
        assert!(b.to_image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_unmatched_pop_is_ignored() {
        let mut b = backend(4, 4);
        b.pop_clip();
        assert_eq!(b.clip_depth(), 0);
        b.fill_rect(IntRect::new(0, 0, 4, 4), RED);
        assert_eq!(b.pixel(3, 3), Some(RED));
    }

    #[test]
    fn test_rounded_rect_leaves_corners() {
        let mut b = backend(20, 20);
        b.fill_rounded_rect(BoundingBox::new(0.0, 0.0, 20.0, 20.0), 1.0, 8, RED);
        assert_eq!(b.pixel(0, 0), Some(Rgba8::WHITE));
        assert_eq!(b.pixel(19, 19), Some(Rgba8::WHITE));
        assert_eq!(b.pixel(10, 10), Some(RED));
        assert_eq!(b.pixel(10, 1), Some(RED));
    }

    #[test]
    fn test_full_ring_has_hole() {
        let mut b = backend(20, 20);
        b.fill_ring(Vector2::new(10.0, 10.0), 5.0, 9.0, 0.0, 360.0, 36, RED);
        assert_eq!(b.pixel(10, 10), Some(Rgba8::WHITE));
        assert_eq!(b.pixel(10, 17), Some(RED));
    }

    #[test]
    fn test_quarter_ring_stays_in_quadrant() {
        let mut b = backend(20, 20);
        b.fill_ring(Vector2::new(10.0, 10.0), 0.0, 9.0, 180.0, 270.0, 10, RED);
        assert_eq!(b.pixel(4, 4), Some(RED));
        assert_eq!(b.pixel(15, 15), Some(Rgba8::WHITE));
        assert_eq!(b.pixel(15, 4), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_automatic_segment_count() {
        assert_eq!(resolve_segments(10, 50.0, 90.0), 10);
        assert_eq!(resolve_segments(0, 0.2, 90.0), 4);
        assert!(resolve_segments(0, 200.0, 360.0) > resolve_segments(0, 10.0, 360.0));
    }

    #[test]
    fn test_texture_is_scaled_into_dest() {
        let mut b = backend(8, 8);
        let texture = b
            .load_texture_rgba8(2, 2, &[255u8, 0, 0, 255].repeat(4))
            .unwrap();
        assert_eq!(texture.width, 2);

        b.draw_texture(
            texture,
            texture.source_rect(),
            BoundingBox::new(0.0, 0.0, 4.0, 4.0),
            Rgba8::WHITE,
        );
        assert_near(b.pixel(3, 3), RED);
        assert_eq!(b.pixel(5, 5), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_texture_tint_multiplies() {
        let mut b = backend(4, 4);
        let texture = b.load_texture_rgba8(1, 1, &[255, 255, 255, 255]).unwrap();
        b.draw_texture(
            texture,
            texture.source_rect(),
            BoundingBox::new(0.0, 0.0, 4.0, 4.0),
            RED,
        );
        assert_near(b.pixel(1, 1), RED);
    }

    #[test]
    fn test_unknown_texture_is_skipped() {
        let mut b = backend(4, 4);
        let missing = TextureHandle::new(99, 4, 4);
        b.draw_texture(
            missing,
            missing.source_rect(),
            BoundingBox::new(0.0, 0.0, 4.0, 4.0),
            Rgba8::WHITE,
        );
        assert_eq!(b.pixel(0, 0), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_rgba_length_mismatch() {
        let mut b = backend(4, 4);
        let err = b.load_texture_rgba8(2, 2, &[0; 12]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::InvalidDimensions {
                width: 2,
                height: 2
            }
        ));
    }

    #[test]
    fn test_load_encoded_png() {
        let source = image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 255, 255]));
        let mut bytes = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut bytes);
        source
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();

        let mut b = backend(4, 4);
        let texture = b.load_texture_from_bytes(&bytes).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(b.texture_count(), 1);
        assert!(b.unload_texture(texture));
        assert!(!b.unload_texture(texture));
    }

    #[test]
    fn test_load_svg_scaled() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4">
            <rect width="8" height="4" fill="#00ff00"/>
        </svg>"##;
        let mut b = backend(4, 4);
        let texture = b.load_svg(svg, 2.0).unwrap();
        assert_eq!((texture.width, texture.height), (16, 8));
        assert!(matches!(
            b.load_svg(b"not svg", 1.0),
            Err(TextureError::Svg(_))
        ));
    }

    #[test]
    fn test_text_draws_glyph_body() {
        let mut b = backend(20, 12);
        b.set_clear_color(BLACK);
        b.clear();
        b.draw_text(c"A", 0, 0, 10.0, 1.0, Rgba8::WHITE);

        // Glyph row 0 is padding, the block body starts one row down.
        assert_eq!(b.pixel(0, 0), Some(BLACK));
        assert_eq!(b.pixel(0, 3), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut b = backend(20, 12);
        b.draw_text(c"   ", 0, 0, 10.0, 1.0, RED);
        assert!(b.to_image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_metrics_only_font_draws_nothing() {
        let glyphs = BitmapFont::default().glyphs().to_vec();
        let mut b = backend(20, 12).with_font(BitmapFont::new(10, glyphs));
        b.draw_text(c"AAA", 0, 0, 10.0, 1.0, RED);
        assert!(b.to_image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_save_png_round_trips_size() {
        let mut b = backend(5, 3);
        b.fill_rect(IntRect::new(0, 0, 1, 1), RED);
        let path = std::env::temp_dir().join("layout_raster_software_save.png");
        b.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (5, 3));
        assert_eq!(loaded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        let _ = std::fs::remove_file(path);
    }
}
