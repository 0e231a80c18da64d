//! Colors as produced by the layout engine and as consumed by backends.

/// Per-channel tolerance used when checking for the "no tint" sentinel.
pub const TINT_SENTINEL_EPSILON: f32 = 1e-9;

/// An RGBA color with components in the `0.0..=255.0` range.
///
/// Components stay floating point all the way through the interpreter and are
/// only rounded when handed to a backend, see [`Color::to_rgba8`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 255.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32,
            g: ((hex >> 8) & 0xFF) as f32,
            b: (hex & 0xFF) as f32,
            a: 255.0,
        }
    }

    pub const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(255.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Round every channel to the nearest byte.
    ///
    /// This is the only place a [`Color`] loses precision. Out of range values
    /// saturate at `0` and `255`.
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8 {
            r: self.r.round() as u8,
            g: self.g.round() as u8,
            b: self.b.round() as u8,
            a: self.a.round() as u8,
        }
    }

    /// Whether this is the all-zero image tint, which means "draw the texture
    /// with its own colors" rather than transparent black.
    pub fn is_no_tint(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| c.abs() <= TINT_SENTINEL_EPSILON)
    }

    /// Resolve an image tint, substituting opaque white for the sentinel.
    pub fn resolve_tint(self) -> Self {
        if self.is_no_tint() {
            Self::WHITE
        } else {
            self
        }
    }
}

/// A color as emitted to a backend: one byte per channel, straight alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque_white(&self) -> bool {
        *self == Self::WHITE
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(value: [u8; 4]) -> Self {
        bytemuck::cast(value)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(value: Rgba8) -> Self {
        bytemuck::cast(value)
    }
}
