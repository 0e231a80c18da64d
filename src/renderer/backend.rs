//! The drawing primitives a rasterizer exposes to the [`Renderer`](super::Renderer).

use std::ffi::CStr;

use crate::color::Rgba8;
use crate::geometry::{BoundingBox, IntRect, Vector2};

/// Reference to a texture owned by a backend.
///
/// Handles are issued by the backend that owns the pixels. Commands and the
/// interpreter copy them around freely and never free the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureHandle {
    pub const fn new(id: u32, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Rectangle covering the whole texture.
    pub fn source_rect(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

/// Primitive operations of a 2D rasterizer.
///
/// Calls arrive in paint order. Clip regions nest: every draw issued between
/// a [`push_clip`](Backend::push_clip) and its matching
/// [`pop_clip`](Backend::pop_clip) is clipped to the intersection of all
/// regions currently pushed.
pub trait Backend {
    /// Fill an axis aligned rectangle.
    fn fill_rect(&mut self, rect: IntRect, color: Rgba8);

    /// Fill a rectangle with rounded corners.
    ///
    /// `roundness` is in `0.0..=1.0`: the corner radius is
    /// `roundness * min(width, height) / 2`.
    fn fill_rounded_rect(&mut self, rect: BoundingBox, roundness: f32, segments: i32, color: Rgba8);

    /// Fill a sector of an annulus. Angles are in degrees, clockwise from the
    /// positive x axis in screen space.
    #[allow(clippy::too_many_arguments)]
    fn fill_ring(
        &mut self,
        center: Vector2,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        segments: i32,
        color: Rgba8,
    );

    /// Draw the `source` region of a texture scaled into `dest`, with every
    /// texel multiplied by `tint`.
    fn draw_texture(
        &mut self,
        texture: TextureHandle,
        source: BoundingBox,
        dest: BoundingBox,
        tint: Rgba8,
    );

    /// Draw text with the backend's default font, top-left at `(x, y)`.
    fn draw_text(
        &mut self,
        text: &CStr,
        x: i32,
        y: i32,
        font_size: f32,
        spacing: f32,
        color: Rgba8,
    );

    fn push_clip(&mut self, rect: IntRect);

    fn pop_clip(&mut self);
}
