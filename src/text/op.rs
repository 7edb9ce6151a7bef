use serde::{Deserialize, Serialize};

use crate::raster::color::Rgba8;

/// Smallest font size the native renderer draws.
pub const MIN_FONT_SIZE_PX: f32 = 10.0;
/// Largest font size the native renderer draws.
pub const MAX_FONT_SIZE_PX: f32 = 96.0;

/// Horizontal anchoring of a [`TextOp`] relative to its `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// `x` is the left edge.
    #[default]
    Left,
    /// `x` is the right edge.
    Right,
}

/// Drop shadow beneath a text run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextShadow {
    /// Horizontal offset in pixels.
    pub dx: f32,
    /// Vertical offset in pixels.
    pub dy: f32,
    /// Blur extent in pixels; `0` draws a hard shadow.
    pub blur_px: f32,
    /// Shadow color.
    pub color: Rgba8,
}

/// One queued text draw. `(x, y)` is the anchor edge (per `align`) and the top of the line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextOp {
    /// Text to draw; empty text is skipped.
    pub text: String,
    /// Anchor x in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Horizontal anchoring.
    pub align: TextAlign,
    /// Fill color.
    pub color: Rgba8,
    /// Requested font size in pixels.
    pub font_size_px: f32,
    /// Requested CSS-style font weight.
    pub font_weight: u16,
    /// Optional drop shadow.
    pub shadow: Option<TextShadow>,
}

impl TextOp {
    /// Left-aligned, white, 12px regular text at `(x, y)`.
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            align: TextAlign::Left,
            color: Rgba8::WHITE,
            font_size_px: 12.0,
            font_weight: 400,
            shadow: None,
        }
    }

    /// Set the horizontal anchoring.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    /// Set the requested size and weight.
    pub fn with_font(mut self, size_px: f32, weight: u16) -> Self {
        self.font_size_px = size_px;
        self.font_weight = weight;
        self
    }

    /// Attach a drop shadow.
    pub fn with_shadow(mut self, shadow: TextShadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Font size clamped to the drawable range; non-finite sizes use the minimum.
    pub fn clamped_size_px(&self) -> f32 {
        if self.font_size_px.is_finite() {
            self.font_size_px.clamp(MIN_FONT_SIZE_PX, MAX_FONT_SIZE_PX)
        } else {
            MIN_FONT_SIZE_PX
        }
    }

    /// Font weight clamped to `[100, 900]`.
    pub fn clamped_weight(&self) -> u16 {
        self.font_weight.clamp(100, 900)
    }

    /// CSS-style font shorthand, used in diagnostics.
    pub fn font_string(&self, family: &str) -> String {
        format!(
            "{} {}px \"{family}\"",
            self.clamped_weight(),
            self.clamped_size_px()
        )
    }
}
