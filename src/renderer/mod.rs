pub mod backend;
pub mod commands;
pub mod recording;
pub mod scratch;
pub mod software;
mod text_measurer;

use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::geometry::{BoundingBox, IntRect, Vector2};

use self::commands::{
    BorderRenderData, ImageRenderData, RectangleRenderData, RenderCommand, RenderCommandType,
    RenderData, TextRenderData,
};
use self::scratch::FrameScratchBuffer;

pub use backend::{Backend, TextureHandle};
pub use recording::{DrawCall, RecordingBackend};
pub use software::SoftwareBackend;
pub use text_measurer::{
    measure_text, LineHeightMode, MeasureConfig, TextElementConfig, TextMeasurer,
};

/// Segments used to tessellate each quarter ring of a rounded border.
pub const BORDER_ARC_SEGMENTS: i32 = 10;

/// Start angle of the bottom-right border arc. Kept just off zero degrees.
const BOTTOM_RIGHT_ARC_START: f32 = 0.1;

/// What to do with [`RenderData::Custom`] commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomCommandPolicy {
    /// Skip the command and keep drawing.
    #[default]
    Ignore,
    /// Stop the frame with [`RenderError::CustomCommandRejected`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    pub custom_commands: CustomCommandPolicy,
    /// Segments per corner for rounded rectangle fills
    pub rounded_rect_segments: i32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            custom_commands: CustomCommandPolicy::Ignore,
            rounded_rect_segments: 8,
        }
    }
}

impl RendererConfig {
    pub fn custom_commands(mut self, policy: CustomCommandPolicy) -> Self {
        self.custom_commands = policy;
        self
    }

    pub fn rounded_rect_segments(mut self, segments: i32) -> Self {
        self.rounded_rect_segments = segments;
        self
    }
}

/// Counters for one call to [`Renderer::render`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameStats {
    pub commands: usize,
    pub rectangles: usize,
    pub borders: usize,
    pub texts: usize,
    pub images: usize,
    pub clips_pushed: usize,
    pub clips_popped: usize,
    pub custom_skipped: usize,
    /// Clip nesting after the last command. Zero for a well-formed frame.
    pub clip_depth: i32,
    pub max_clip_depth: i32,
}

/// A quarter ring closing one rounded corner of a border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerArc {
    pub center: Vector2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

/// Primitives making up a border: side strips (left, right, top, bottom)
/// then corner arcs (top-left, top-right, bottom-left, bottom-right).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderGeometry {
    pub sides: [Option<IntRect>; 4],
    pub arcs: [Option<CornerArc>; 4],
}

impl BorderGeometry {
    /// Derive the border primitives from an already rounded bounding box.
    ///
    /// Each side strip is shortened by the radii of the two corners it meets.
    /// Arc inner radii are clamped at zero.
    pub fn new(bb: &BoundingBox, border: &BorderRenderData) -> Self {
        let w = border.width;
        let r = border.corner_radius;

        let left = (w.left > 0).then(|| {
            IntRect::new(
                bb.x.round() as i32,
                (bb.y + r.top_left).round() as i32,
                w.left as i32,
                (bb.height - r.top_left - r.bottom_left).round() as i32,
            )
        });
        let right = (w.right > 0).then(|| {
            IntRect::new(
                (bb.x + bb.width - w.right as f32).round() as i32,
                (bb.y + r.top_right).round() as i32,
                w.right as i32,
                (bb.height - r.top_right - r.bottom_right).round() as i32,
            )
        });
        let top = (w.top > 0).then(|| {
            IntRect::new(
                (bb.x + r.top_left).round() as i32,
                bb.y.round() as i32,
                (bb.width - r.top_left - r.top_right).round() as i32,
                w.top as i32,
            )
        });
        let bottom = (w.bottom > 0).then(|| {
            IntRect::new(
                (bb.x + r.bottom_left).round() as i32,
                (bb.y + bb.height - w.bottom as f32).round() as i32,
                (bb.width - r.bottom_left - r.bottom_right).round() as i32,
                w.bottom as i32,
            )
        });

        let arc = |radius: f32, side: u16, cx: f32, cy: f32, start: f32, end: f32| {
            (radius > 0.0).then(|| CornerArc {
                center: Vector2::new(cx.round(), cy.round()),
                inner_radius: (radius - side as f32).round().max(0.0),
                outer_radius: radius,
                start_angle: start,
                end_angle: end,
            })
        };

        let top_left = arc(
            r.top_left,
            w.top,
            bb.x + r.top_left,
            bb.y + r.top_left,
            180.0,
            270.0,
        );
        let top_right = arc(
            r.top_right,
            w.top,
            bb.x + bb.width - r.top_right,
            bb.y + r.top_right,
            270.0,
            360.0,
        );
        let bottom_left = arc(
            r.bottom_left,
            w.bottom,
            bb.x + r.bottom_left,
            bb.y + bb.height - r.bottom_left,
            90.0,
            180.0,
        );
        let bottom_right = arc(
            r.bottom_right,
            w.bottom,
            bb.x + bb.width - r.bottom_right,
            bb.y + bb.height - r.bottom_right,
            BOTTOM_RIGHT_ARC_START,
            90.0,
        );

        Self {
            sides: [left, right, top, bottom],
            arcs: [top_left, top_right, bottom_left, bottom_right],
        }
    }
}

/// Roundness for filling `bb` with rounded corners of `top_left_radius`,
/// or `None` when a plain fill should be used.
pub fn rounded_rect_roundness(bb: &BoundingBox, top_left_radius: f32) -> Option<f32> {
    let min_side = bb.min_side();
    (top_left_radius > 0.0 && min_side > 0.0).then(|| (2.0 * top_left_radius) / min_side)
}

/// Interprets a frame's render commands against a [`Backend`].
///
/// Owns the scratch buffer used to hand text to the backend, so one renderer
/// should be kept for the lifetime of the window rather than created per frame.
#[derive(Debug, Default)]
pub struct Renderer {
    config: RendererConfig,
    scratch: FrameScratchBuffer,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            scratch: FrameScratchBuffer::new(),
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn scratch(&self) -> &FrameScratchBuffer {
        &self.scratch
    }

    /// Draw every command in order.
    ///
    /// Stops at the first command that cannot be drawn; commands after it are
    /// not executed. Clip pushes and pops are forwarded exactly as they appear,
    /// pairing them is the producer's job.
    pub fn render<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        commands: &[RenderCommand<'_>],
    ) -> Result<FrameStats> {
        let mut stats = FrameStats::default();

        for (index, command) in commands.iter().enumerate() {
            let bounding_box = command.bounding_box.rounded();
            log::trace!(
                "Render command {} ({:?}) id={} at {:?}",
                index,
                command.command_type(),
                command.id,
                bounding_box
            );

            match &command.data {
                RenderData::Text(text) => {
                    self.draw_text(backend, &bounding_box, text);
                    stats.texts += 1;
                }
                RenderData::Rectangle(rect) => {
                    self.fill_rectangle(backend, &bounding_box, rect);
                    stats.rectangles += 1;
                }
                RenderData::Image(image) => {
                    draw_image(backend, &bounding_box, image);
                    stats.images += 1;
                }
                RenderData::Border(border) => {
                    draw_border(backend, &bounding_box, border);
                    stats.borders += 1;
                }
                RenderData::ScissorStart => {
                    backend.push_clip(bounding_box.to_int_rect());
                    stats.clips_pushed += 1;
                    stats.clip_depth += 1;
                    stats.max_clip_depth = stats.max_clip_depth.max(stats.clip_depth);
                }
                RenderData::ScissorEnd => {
                    backend.pop_clip();
                    stats.clips_popped += 1;
                    stats.clip_depth -= 1;
                }
                RenderData::Custom(_) => match self.config.custom_commands {
                    CustomCommandPolicy::Ignore => {
                        log::debug!("Skipping custom command {} (id={})", index, command.id);
                        stats.custom_skipped += 1;
                    }
                    CustomCommandPolicy::Reject => {
                        return Err(RenderError::CustomCommandRejected { index });
                    }
                },
                RenderData::None => {
                    return Err(RenderError::UnhandledCommand {
                        index,
                        command_type: RenderCommandType::None,
                    });
                }
            }
            stats.commands += 1;
        }

        if stats.clip_depth != 0 {
            log::warn!(
                "Frame ended with clip depth {} ({} pushed, {} popped)",
                stats.clip_depth,
                stats.clips_pushed,
                stats.clips_popped
            );
        }
        log::debug!("Rendered frame: {:?}", stats);

        Ok(stats)
    }

    /// Like [`render`](Self::render), but an undrawable command ends the
    /// process: the error goes to stderr and the exit status is 1.
    pub fn render_or_exit<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        commands: &[RenderCommand<'_>],
    ) -> FrameStats {
        match self.render(backend, commands) {
            Ok(stats) => stats,
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        }
    }

    /// Free the scratch buffer. Call once when the window closes.
    pub fn shutdown(&mut self) {
        log::debug!(
            "Renderer shutdown, releasing {} scratch bytes",
            self.scratch.capacity()
        );
        self.scratch.release();
    }

    fn draw_text<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        bb: &BoundingBox,
        text: &TextRenderData<'_>,
    ) {
        let staged = self.scratch.stage_c_str(text.text);
        backend.draw_text(
            staged,
            bb.x as i32,
            bb.y as i32,
            text.font_size,
            text.letter_spacing,
            text.color.to_rgba8(),
        );
    }

    fn fill_rectangle<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        bb: &BoundingBox,
        rect: &RectangleRenderData,
    ) {
        let color = rect.background_color.to_rgba8();
        match rounded_rect_roundness(bb, rect.corner_radius.top_left) {
            Some(roundness) => {
                backend.fill_rounded_rect(*bb, roundness, self.config.rounded_rect_segments, color)
            }
            None => backend.fill_rect(bb.to_int_rect(), color),
        }
    }
}

fn draw_image<B: Backend + ?Sized>(backend: &mut B, bb: &BoundingBox, image: &ImageRenderData) {
    let tint = Color::resolve_tint(image.tint).to_rgba8();
    backend.draw_texture(image.texture, image.texture.source_rect(), *bb, tint);
}

fn draw_border<B: Backend + ?Sized>(backend: &mut B, bb: &BoundingBox, border: &BorderRenderData) {
    let color = border.color.to_rgba8();
    let geometry = BorderGeometry::new(bb, border);

    for side in geometry.sides.into_iter().flatten() {
        backend.fill_rect(side, color);
    }
    for arc in geometry.arcs.into_iter().flatten() {
        backend.fill_ring(
            arc.center,
            arc.inner_radius,
            arc.outer_radius,
            arc.start_angle,
            arc.end_angle,
            BORDER_ARC_SEGMENTS,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BorderWidth, CornerRadius};

    fn border(width: BorderWidth, radius: CornerRadius) -> BorderRenderData {
        BorderRenderData {
            width,
            color: Color::BLACK,
            corner_radius: radius,
        }
    }

    #[test]
    fn test_roundness_uses_shorter_side() {
        let bb = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(rounded_rect_roundness(&bb, 10.0), Some(0.4));
        assert_eq!(rounded_rect_roundness(&bb, 0.0), None);

        let tall = BoundingBox::new(0.0, 0.0, 20.0, 80.0);
        assert_eq!(rounded_rect_roundness(&tall, 5.0), Some(0.5));
    }

    #[test]
    fn test_roundness_on_degenerate_box() {
        let bb = BoundingBox::new(0.0, 0.0, 100.0, 0.0);
        assert_eq!(rounded_rect_roundness(&bb, 10.0), None);
    }

    #[test]
    fn test_square_border_has_no_arcs() {
        let bb = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        let data = border(BorderWidth::all(2), CornerRadius::default());
        let geometry = BorderGeometry::new(&bb, &data);

        assert_eq!(
            geometry.sides,
            [
                Some(IntRect::new(10, 20, 2, 50)),
                Some(IntRect::new(108, 20, 2, 50)),
                Some(IntRect::new(10, 20, 100, 2)),
                Some(IntRect::new(10, 68, 100, 2)),
            ]
        );
        assert!(geometry.arcs.iter().all(Option::is_none));
    }

    #[test]
    fn test_sides_are_inset_by_adjacent_radii() {
        let bb = BoundingBox::new(0.0, 0.0, 100.0, 60.0);
        let radius = CornerRadius::new(4.0, 6.0, 8.0, 10.0);
        let geometry = BorderGeometry::new(&bb, &border(BorderWidth::all(1), radius));

        let [left, right, top, bottom] = geometry.sides;
        assert_eq!(left, Some(IntRect::new(0, 4, 1, 48)));
        assert_eq!(right, Some(IntRect::new(99, 6, 1, 44)));
        assert_eq!(top, Some(IntRect::new(4, 0, 90, 1)));
        assert_eq!(bottom, Some(IntRect::new(8, 59, 82, 1)));
    }

    #[test]
    fn test_zero_width_sides_are_skipped() {
        let bb = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let data = border(BorderWidth::new(0, 0, 3, 0), CornerRadius::default());
        let geometry = BorderGeometry::new(&bb, &data);
        assert_eq!(geometry.sides.iter().flatten().count(), 1);
        assert_eq!(geometry.sides[2], Some(IntRect::new(0, 0, 50, 3)));
    }

    #[test]
    fn test_corner_arcs() {
        let bb = BoundingBox::new(0.0, 0.0, 100.0, 60.0);
        let geometry = BorderGeometry::new(
            &bb,
            &border(BorderWidth::new(1, 1, 2, 3), CornerRadius::all(10.0)),
        );

        let [tl, tr, bl, br] = geometry.arcs.map(Option::unwrap);
        assert_eq!(tl.center, Vector2::new(10.0, 10.0));
        assert_eq!((tl.start_angle, tl.end_angle), (180.0, 270.0));
        assert_eq!(tl.inner_radius, 8.0);
        assert_eq!(tl.outer_radius, 10.0);

        assert_eq!(tr.center, Vector2::new(90.0, 10.0));
        assert_eq!((tr.start_angle, tr.end_angle), (270.0, 360.0));
        assert_eq!(tr.inner_radius, 8.0);

        assert_eq!(bl.center, Vector2::new(10.0, 50.0));
        assert_eq!((bl.start_angle, bl.end_angle), (90.0, 180.0));
        assert_eq!(bl.inner_radius, 7.0);

        assert_eq!(br.center, Vector2::new(90.0, 50.0));
        assert_eq!((br.start_angle, br.end_angle), (0.1, 90.0));
        assert_eq!(br.inner_radius, 7.0);
    }

    #[test]
    fn test_inner_radius_clamped_at_zero() {
        let bb = BoundingBox::new(0.0, 0.0, 40.0, 40.0);
        let data = border(BorderWidth::all(8), CornerRadius::all(3.0));
        let geometry = BorderGeometry::new(&bb, &data);
        for arc in geometry.arcs.iter().flatten() {
            assert_eq!(arc.inner_radius, 0.0);
        }
    }

    #[test]
    fn test_config_builder() {
        let config = RendererConfig::default()
            .custom_commands(CustomCommandPolicy::Reject)
            .rounded_rect_segments(16);
        assert_eq!(config.custom_commands, CustomCommandPolicy::Reject);
        assert_eq!(config.rounded_rect_segments, 16);
        assert_eq!(Renderer::new(config).config(), &config);
    }
}
