//! A backend that records primitives instead of drawing them.
//!
//! Useful for tests and for inspecting what a frame would draw.

use std::ffi::{CStr, CString};

use crate::color::Rgba8;
use crate::geometry::{BoundingBox, IntRect, Vector2};

use super::backend::{Backend, TextureHandle};

/// One primitive call, as received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect {
        rect: IntRect,
        color: Rgba8,
    },
    FillRoundedRect {
        rect: BoundingBox,
        roundness: f32,
        segments: i32,
        color: Rgba8,
    },
    FillRing {
        center: Vector2,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        segments: i32,
        color: Rgba8,
    },
    DrawTexture {
        texture: TextureHandle,
        source: BoundingBox,
        dest: BoundingBox,
        tint: Rgba8,
    },
    DrawText {
        text: CString,
        x: i32,
        y: i32,
        font_size: f32,
        spacing: f32,
        color: Rgba8,
    },
    PushClip(IntRect),
    PopClip,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<DrawCall>,
    clip_depth: i32,
    max_clip_depth: i32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Current clip nesting. Negative after more pops than pushes.
    pub fn clip_depth(&self) -> i32 {
        self.clip_depth
    }

    pub fn max_clip_depth(&self) -> i32 {
        self.max_clip_depth
    }

    /// Forget recorded calls and clip state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Backend for RecordingBackend {
    fn fill_rect(&mut self, rect: IntRect, color: Rgba8) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn fill_rounded_rect(
        &mut self,
        rect: BoundingBox,
        roundness: f32,
        segments: i32,
        color: Rgba8,
    ) {
        self.calls.push(DrawCall::FillRoundedRect {
            rect,
            roundness,
            segments,
            color,
        });
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
        self.calls.push(DrawCall::FillRing {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            segments,
            color,
        });
    }

    fn draw_texture(
        &mut self,
        texture: TextureHandle,
        source: BoundingBox,
        dest: BoundingBox,
        tint: Rgba8,
    ) {
        self.calls.push(DrawCall::DrawTexture {
            texture,
            source,
            dest,
            tint,
        });
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
        self.calls.push(DrawCall::DrawText {
            text: text.to_owned(),
            x,
            y,
            font_size,
            spacing,
            color,
        });
    }

    fn push_clip(&mut self, rect: IntRect) {
        self.clip_depth += 1;
        self.max_clip_depth = self.max_clip_depth.max(self.clip_depth);
        self.calls.push(DrawCall::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.clip_depth -= 1;
        self.calls.push(DrawCall::PopClip);
    }
}
