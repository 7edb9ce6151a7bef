use crate::raster::buffer::PixelBuffer;
use crate::raster::color::Rgba8;
use crate::raster::composite::source_over;
use crate::text::layer::TextRenderer;
use crate::text::op::{TextAlign, TextOp};

/// Glyph cell width in font units.
pub const GLYPH_W: u32 = 5;
/// Glyph cell height in font units.
pub const GLYPH_H: u32 = 7;
/// Horizontal advance per character in font units (one column of spacing).
pub const GLYPH_ADVANCE: u32 = 6;

/// Rows of a 5x7 glyph, top to bottom; bit 4 is the leftmost column.
type Glyph = [u8; GLYPH_H as usize];

const UNKNOWN: Glyph = [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04];

/// Glyph for `c` after upper-casing; characters outside the table draw as `?`.
pub fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        ' ' => [0x00; 7],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '$' => [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        _ => UNKNOWN,
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width_px(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    n.saturating_mul(GLYPH_ADVANCE).saturating_mul(scale.max(1))
}

/// Fixed-size blocky text: every set glyph bit becomes a `scale x scale` square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapTextRenderer {
    scale: u32,
}

impl Default for BitmapTextRenderer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl BitmapTextRenderer {
    /// Renderer at an integer pixel scale; `0` is treated as `1`.
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    /// Pixel scale in use.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Draw one op. Shadows are ignored.
    pub fn draw_op(&self, op: &TextOp, buffer: &mut PixelBuffer) {
        if op.text.is_empty() || !op.x.is_finite() || !op.y.is_finite() {
            return;
        }
        let scale = self.scale as i32;
        let width = text_width_px(&op.text, self.scale).min(i32::MAX as u32) as i32;
        let x0 = op.x.round() as i32;
        let left = match op.align {
            TextAlign::Left => x0,
            TextAlign::Right => x0.saturating_sub(width),
        };
        let top = op.y.round() as i32;

        for (i, c) in op.text.chars().enumerate() {
            let gx = left.saturating_add((i as i32).saturating_mul(GLYPH_ADVANCE as i32 * scale));
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (0x10 >> col) == 0 {
                        continue;
                    }
                    let px = gx.saturating_add(col as i32 * scale);
                    let py = top.saturating_add(row as i32 * scale);
                    blend_square(buffer, px, py, scale, op.color);
                }
            }
        }
    }
}

fn blend_square(buffer: &mut PixelBuffer, x: i32, y: i32, size: i32, color: Rgba8) {
    for yy in y..y.saturating_add(size) {
        for xx in x..x.saturating_add(size) {
            if let Some(dst) = buffer.pixel(xx, yy) {
                let out = source_over(dst.to_array(), color.to_array());
                buffer.set_pixel(xx, yy, Rgba8::new(out[0], out[1], out[2], out[3]));
            }
        }
    }
}

impl TextRenderer for BitmapTextRenderer {
    fn name(&self) -> &'static str {
        "bitmap"
    }

    fn render_text(&self, ops: &[TextOp], buffer: &mut PixelBuffer) -> bool {
        for op in ops {
            self.draw_op(op, buffer);
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/bitmap.rs"]
mod tests;
