use crate::foundation::error::{ChartError, ChartResult};
use crate::raster::color::Rgba8;

/// Straight-alpha RGBA8 pixel grid, row-major and tightly packed.
///
/// A buffer is owned by exactly one render call. Every primitive writes pixels directly (no
/// blending) and silently ignores coordinates outside `[0, width) x [0, height)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> ChartResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChartError::validation("pixel buffer dimensions must be > 0"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| ChartError::validation("pixel buffer dimensions overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    /// Read one pixel; `None` when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        let i = self.index(x, y)?;
        let p = &self.data[i..i + 4];
        Some(Rgba8::new(p[0], p[1], p[2], p[3]))
    }

    /// Overwrite one pixel. Out-of-bounds coordinates are a no-op.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba8) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Fill the axis-aligned rectangle `[x, x + w) x [y, y + h)`, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba8) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width.min(i32::MAX as u32) as i32);
        let y1 = y.saturating_add(h).min(self.height.min(i32::MAX as u32) as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let px = color.to_array();
        let stride = self.width as usize * 4;
        for yy in y0..y1 {
            let row = yy as usize * stride;
            let start = row + x0 as usize * 4;
            let end = row + x1 as usize * 4;
            for dst in self.data[start..end].chunks_exact_mut(4) {
                dst.copy_from_slice(&px);
            }
        }
    }

    /// Draw a 1px line from `(x0, y0)` to `(x1, y1)` inclusive using Bresenham's algorithm.
    ///
    /// The segment is clipped to the buffer first, so the walk is bounded by the buffer size no
    /// matter how far off-canvas the endpoints are.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba8) {
        let Some(((mut x, mut y), (x1, y1))) = self.clip_segment(x0, y0, x1, y1) else {
            return;
        };
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Liang-Barsky clip of a segment to `[0, width) x [0, height)`, endpoints rounded back to
    /// pixels. `None` when no part of the segment is inside.
    fn clip_segment(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    ) -> Option<((i32, i32), (i32, i32))> {
        let max_x = f64::from(self.width - 1);
        let max_y = f64::from(self.height - 1);
        let (fx, fy) = (f64::from(x0), f64::from(y0));
        let (dx, dy) = (f64::from(x1) - fx, f64::from(y1) - fy);

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, fx), (dx, max_x - fx), (-dy, fy), (dy, max_y - fy)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| {
            (
                (fx + t * dx).round().clamp(0.0, max_x) as i32,
                (fy + t * dy).round().clamp(0.0, max_y) as i32,
            )
        };
        Some((at(t0), at(t1)))
    }

    /// Draw a horizontal run from `x0` to `x1` on row `y`, alternating `dash_px` drawn pixels and
    /// `gap_px` skipped pixels, starting with a dash at the left end.
    pub fn draw_dashed_hline(
        &mut self,
        x0: i32,
        x1: i32,
        y: i32,
        dash_px: u32,
        gap_px: u32,
        color: Rgba8,
    ) {
        if y < 0 || y as u32 >= self.height {
            return;
        }
        let (start, end) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let dash = i64::from(dash_px.max(1));
        let period = dash + i64::from(gap_px);
        let start_i = i64::from(start);
        let first = start_i.max(0);
        let last = i64::from(end).min(i64::from(self.width) - 1);
        for x in first..=last {
            if (x - start_i) % period < dash {
                self.set_pixel(x as i32, y, color);
            }
        }
    }

    /// Fill a disc of radius `r` centered at `(cx, cy)`, scanning one row at a time.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgba8) {
        if r < 0 {
            return;
        }
        let rr = i64::from(r) * i64::from(r);
        for dy in -r..=r {
            let yy = cy.saturating_add(dy);
            if yy < 0 || yy as u32 >= self.height {
                continue;
            }
            let dy64 = i64::from(dy);
            let span = ((rr - dy64 * dy64).max(0) as f64).sqrt().floor() as i32;
            let left = cx.saturating_sub(span);
            let width = span.saturating_mul(2).saturating_add(1);
            self.fill_rect(left, yy, width, 1, color);
        }
    }

    /// Fill the whole buffer with one color.
    pub fn clear(&mut self, color: Rgba8) {
        let px = color.to_array();
        for dst in self.data.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
