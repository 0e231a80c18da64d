//! Render command definitions, as produced by the layout engine each frame.

use crate::color::Color;
use crate::error::RenderError;
use crate::geometry::{BorderWidth, BoundingBox, CornerRadius};

use super::backend::TextureHandle;

/// Wire tag of a render command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RenderCommandType {
    #[default]
    None = 0,
    Rectangle = 1,
    Border = 2,
    Text = 3,
    Image = 4,
    ScissorStart = 5,
    ScissorEnd = 6,
    Custom = 7,
}

impl TryFrom<u8> for RenderCommandType {
    type Error = RenderError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Ok(match tag {
            0 => Self::None,
            1 => Self::Rectangle,
            2 => Self::Border,
            3 => Self::Text,
            4 => Self::Image,
            5 => Self::ScissorStart,
            6 => Self::ScissorEnd,
            7 => Self::Custom,
            _ => return Err(RenderError::UnknownCommandType { tag }),
        })
    }
}

/// Text payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRenderData<'a> {
    /// Text bytes, borrowed from the layout engine's frame arena. Only valid
    /// until the next layout pass begins.
    pub text: &'a [u8],
    /// Font size in pixels
    pub font_size: f32,
    /// Extra spacing between characters in pixels
    pub letter_spacing: f32,
    pub color: Color,
}

/// Filled rectangle payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectangleRenderData {
    pub background_color: Color,
    /// Only `top_left` affects how a plain rectangle is filled.
    pub corner_radius: CornerRadius,
}

/// Border outline payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderRenderData {
    pub width: BorderWidth,
    pub color: Color,
    pub corner_radius: CornerRadius,
}

/// Image payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRenderData {
    /// Backend texture to draw. Not owned by the command.
    pub texture: TextureHandle,
    /// Tint multiplied into the texture. [`Color::TRANSPARENT`] means no tint.
    pub tint: Color,
}

/// Payload of a user-defined command. Passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CustomRenderData {
    pub background_color: Color,
    pub corner_radius: CornerRadius,
    /// Opaque value owned by whoever declared the element
    pub user_data: u64,
}

/// Type specific payload of a [`RenderCommand`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderData<'a> {
    /// Placeholder tag. Never valid in a command array.
    None,
    Rectangle(RectangleRenderData),
    Border(BorderRenderData),
    Text(TextRenderData<'a>),
    Image(ImageRenderData),
    /// Start clipping to the command's bounding box.
    ScissorStart,
    /// Stop clipping to the most recent scissor region.
    ScissorEnd,
    Custom(CustomRenderData),
}

/// A single drawing instruction produced by a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand<'a> {
    /// Where to draw, in device pixels
    pub bounding_box: BoundingBox,
    pub data: RenderData<'a>,
    /// Id of the element that produced this command
    pub id: u32,
    /// Stacking order the producer sorted by. Not interpreted here.
    pub z_index: i16,
}

impl<'a> RenderCommand<'a> {
    pub fn new(bounding_box: BoundingBox, data: RenderData<'a>) -> Self {
        Self {
            bounding_box,
            data,
            id: 0,
            z_index: 0,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_z_index(mut self, z_index: i16) -> Self {
        self.z_index = z_index;
        self
    }

    /// Create a filled rectangle.
    pub fn rectangle(
        bounding_box: BoundingBox,
        background_color: Color,
        corner_radius: impl Into<CornerRadius>,
    ) -> Self {
        Self::new(
            bounding_box,
            RenderData::Rectangle(RectangleRenderData {
                background_color,
                corner_radius: corner_radius.into(),
            }),
        )
    }

    /// Create a border outline.
    pub fn border(
        bounding_box: BoundingBox,
        width: BorderWidth,
        color: Color,
        corner_radius: impl Into<CornerRadius>,
    ) -> Self {
        Self::new(
            bounding_box,
            RenderData::Border(BorderRenderData {
                width,
                color,
                corner_radius: corner_radius.into(),
            }),
        )
    }

    /// Create a text run.
    pub fn text(
        bounding_box: BoundingBox,
        text: &'a [u8],
        font_size: f32,
        letter_spacing: f32,
        color: Color,
    ) -> Self {
        Self::new(
            bounding_box,
            RenderData::Text(TextRenderData {
                text,
                font_size,
                letter_spacing,
                color,
            }),
        )
    }

    /// Create an image.
    pub fn image(bounding_box: BoundingBox, texture: TextureHandle, tint: Color) -> Self {
        Self::new(
            bounding_box,
            RenderData::Image(ImageRenderData { texture, tint }),
        )
    }

    pub fn scissor_start(bounding_box: BoundingBox) -> Self {
        Self::new(bounding_box, RenderData::ScissorStart)
    }

    pub fn scissor_end() -> Self {
        Self::new(BoundingBox::default(), RenderData::ScissorEnd)
    }

    pub fn custom(bounding_box: BoundingBox, data: CustomRenderData) -> Self {
        Self::new(bounding_box, RenderData::Custom(data))
    }

    pub fn command_type(&self) -> RenderCommandType {
        match self.data {
            RenderData::None => RenderCommandType::None,
            RenderData::Rectangle(_) => RenderCommandType::Rectangle,
            RenderData::Border(_) => RenderCommandType::Border,
            RenderData::Text(_) => RenderCommandType::Text,
            RenderData::Image(_) => RenderCommandType::Image,
            RenderData::ScissorStart => RenderCommandType::ScissorStart,
            RenderData::ScissorEnd => RenderCommandType::ScissorEnd,
            RenderData::Custom(_) => RenderCommandType::Custom,
        }
    }
}
