use serde::{Deserialize, Serialize};

use crate::foundation::error::{ChartError, ChartResult};

/// Straight-alpha RGBA8 color; every channel is `0..=255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Construct a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return this color with its alpha replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Return this color with alpha set from a `0..1` opacity, rounded to the nearest byte.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.with_alpha(a)
    }

    /// Channels as a byte array in RGBA order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Opaque RGB triple as produced by [`hex_to_rgb`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Attach an alpha channel.
    pub const fn with_alpha(self, a: u8) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, a)
    }

    /// Attach a fully opaque alpha channel.
    pub const fn opaque(self) -> Rgba8 {
        self.with_alpha(255)
    }
}

/// Parse `#RGB` or `#RRGGBB` (leading `#` optional, case-insensitive).
///
/// The three-digit form expands each digit (`#abc` is `#aabbcc`).
pub fn hex_to_rgb(hex: &str) -> ChartResult<Rgb> {
    let s = hex.trim();
    let s = s.strip_prefix('#').unwrap_or(s).trim();

    fn nibble(c: u8) -> ChartResult<u8> {
        char::from(c)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| ChartError::validation(format!("invalid hex digit '{}'", char::from(c))))
    }

    let bytes = s.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Ok(Rgb {
                r: r * 17,
                g: g * 17,
                b: b * 17,
            })
        }
        6 => {
            let pair = |i: usize| -> ChartResult<u8> {
                Ok(nibble(bytes[i])? * 16 + nibble(bytes[i + 1])?)
            };
            Ok(Rgb {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
            })
        }
        _ => Err(ChartError::validation(format!(
            "hex color must be #RGB or #RRGGBB, got \"{hex}\""
        ))),
    }
}
