//! Draw the output of an immediate-mode UI layout engine.
//!
//! The layout engine produces a flat list of [`RenderCommand`]s each frame.
//! A [`Renderer`] walks that list in order and turns every command into
//! primitive calls on a [`Backend`]. [`TextMeasurer`] answers the layout
//! engine's text size queries from the same bitmap font metrics the backend
//! draws with.
//!
//! ```no_run
//! use layout_raster::prelude::*;
//!
//! let measurer = TextMeasurer::default();
//! let size = measurer.measure(b"Sample text", 64.0, 0.0).unwrap();
//!
//! let commands = [
//!     RenderCommand::rectangle(BoundingBox::new(0.0, 0.0, 600.0, 400.0), Color::WHITE, 0.0),
//!     RenderCommand::text(
//!         BoundingBox::new(20.0, 20.0, size.width, size.height),
//!         b"Sample text",
//!         64.0,
//!         0.0,
//!         Color::RED,
//!     ),
//! ];
//!
//! let mut backend = SoftwareBackend::new(600, 400).unwrap();
//! let mut renderer = Renderer::default();
//! renderer.render(&mut backend, &commands).unwrap();
//! backend.save_png("frame.png").unwrap();
//! ```

pub mod color;
pub mod error;
pub mod font;
pub mod geometry;
pub mod renderer;

pub use color::{Color, Rgba8};
pub use error::{RenderError, Result, TextureError};
pub use renderer::commands::{RenderCommand, RenderCommandType, RenderData};
pub use renderer::{Backend, Renderer, RendererConfig, SoftwareBackend, TextMeasurer};

pub mod prelude {
    pub use crate::color::{Color, Rgba8};
    pub use crate::error::{
        log_layout_errors, LayoutError, LayoutErrorHandler, LayoutErrorKind, RenderError,
        TextureError,
    };
    pub use crate::font::BitmapFont;
    pub use crate::geometry::{
        BorderWidth, BoundingBox, CornerRadius, Dimensions, IntRect, Vector2,
    };
    pub use crate::renderer::commands::{
        BorderRenderData, CustomRenderData, ImageRenderData, RectangleRenderData, RenderCommand,
        RenderCommandType, RenderData, TextRenderData,
    };
    pub use crate::renderer::{
        Backend, CustomCommandPolicy, FrameStats, LineHeightMode, MeasureConfig, RecordingBackend,
        Renderer, RendererConfig, SoftwareBackend, TextElementConfig, TextMeasurer, TextureHandle,
    };
}
