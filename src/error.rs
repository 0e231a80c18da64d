use std::fmt;

use thiserror::Error;

use crate::renderer::commands::RenderCommandType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A raw command tag that is not part of [`RenderCommandType`]. The
    /// producer and this interpreter disagree on the command set.
    #[error("Unhandled Render Command: unknown command type tag {tag}")]
    UnknownCommandType { tag: u8 },
    /// A command the interpreter has no drawing routine for.
    #[error("Unhandled Render Command: {command_type:?} at index {index}")]
    UnhandledCommand {
        index: usize,
        command_type: RenderCommandType,
    },
    #[error("Custom render command at index {index} rejected by configuration")]
    CustomCommandRejected { index: usize },
    /// A text byte outside the font's printable glyph table.
    #[error("No glyph for byte 0x{byte:02x} at position {position}")]
    InvalidGlyph { byte: u8, position: usize },
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to parse SVG: {0}")]
    Svg(String),
    #[error("Invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Category of a recoverable layout configuration problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutErrorKind {
    TextMeasurementNotProvided,
    ArenaCapacityExceeded,
    ElementsCapacityExceeded,
    DuplicateId,
    FloatingContainerParentNotFound,
    PercentageOver1,
    InternalError,
}

/// A layout configuration problem reported by the layout engine. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutError {
    pub kind: LayoutErrorKind,
    pub message: String,
}

impl LayoutError {
    pub fn new(kind: LayoutErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Callback registered with the layout engine at startup.
pub type LayoutErrorHandler = Box<dyn FnMut(LayoutError)>;

/// Default handler: report through the `log` facade and carry on.
pub fn log_layout_errors() -> LayoutErrorHandler {
    Box::new(|error: LayoutError| log::error!("Layout error: {}", error))
}
