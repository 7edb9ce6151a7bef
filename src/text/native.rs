use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::fonts::backend::{FaceRequest, FontBackend, LoadedFace};
use crate::fonts::layout::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::diag::soft_failure;
use crate::foundation::error::{ChartError, ChartResult};
use crate::raster::blur::{ShadowBlur, blur_rgba8_premul_in_place};
use crate::raster::buffer::PixelBuffer;
use crate::raster::color::Rgba8;
use crate::raster::composite::{
    alpha_sum, premul_over_in_place, source_over_in_place, unpremultiply_in_place,
};
use crate::text::layer::TextRenderer;
use crate::text::op::{TextAlign, TextOp};

struct NativeState {
    layout: TextLayoutEngine,
    fonts: HashMap<(usize, u32), (Arc<Vec<u8>>, vello_cpu::peniko::FontData)>,
}

/// Anti-aliased text through the font backend, Parley shaping and `vello_cpu` rasterization.
///
/// Ops are drawn into a transparent layer the size of the target. The batch counts as failed
/// when the backend has no face or the finished layer has no coverage at all; the target is only
/// touched on success.
pub struct NativeTextRenderer {
    backend: Arc<dyn FontBackend>,
    family: Option<String>,
    state: Mutex<NativeState>,
}

impl std::fmt::Debug for NativeTextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeTextRenderer")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

struct PlacedText {
    layout: parley::Layout<TextBrushRgba8>,
    font: vello_cpu::peniko::FontData,
    left: f64,
    top: f64,
}

impl NativeTextRenderer {
    /// Renderer over `backend`, preferring `family` when it is registered.
    pub fn new(backend: Arc<dyn FontBackend>, family: Option<String>) -> Self {
        Self {
            backend,
            family,
            state: Mutex::new(NativeState {
                layout: TextLayoutEngine::new(),
                fonts: HashMap::new(),
            }),
        }
    }

    fn font_data(state: &mut NativeState, face: &LoadedFace) -> vello_cpu::peniko::FontData {
        let key = (Arc::as_ptr(&face.data) as usize, face.index);
        state
            .fonts
            .entry(key)
            .or_insert_with(|| {
                let font = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.data.as_ref().clone()),
                    face.index,
                );
                (face.data.clone(), font)
            })
            .1
            .clone()
    }

    /// Resolve, measure and lay out one op. The generic face is used when the preferred family
    /// measures as empty.
    fn place(&self, state: &mut NativeState, op: &TextOp) -> ChartResult<PlacedText> {
        let size = op.clamped_size_px();
        let weight = op.clamped_weight();

        let preferred = self.backend.resolve_face(&FaceRequest {
            family: self.family.as_deref(),
            weight,
        });
        let measured = preferred.and_then(|face| {
            let width = state.layout.measure(&op.text, &face, size, weight).ok()?;
            (width.is_finite() && width > 0.0).then_some((face, width))
        });
        let (face, width) = match measured {
            Some(found) => found,
            None => {
                let face = self
                    .backend
                    .resolve_face(&FaceRequest {
                        family: None,
                        weight,
                    })
                    .ok_or_else(|| ChartError::font("no font face available"))?;
                let width = state
                    .layout
                    .measure(&op.text, &face, size, weight)
                    .unwrap_or(0.0);
                (face, if width.is_finite() { width } else { 0.0 })
            }
        };

        let brush = TextBrushRgba8 {
            r: op.color.r,
            g: op.color.g,
            b: op.color.b,
            a: op.color.a,
        };
        let layout = state
            .layout
            .layout_line(&op.text, &face, size, weight, brush)?;
        let font = Self::font_data(state, &face);
        let left = match op.align {
            TextAlign::Left => f64::from(op.x),
            TextAlign::Right => f64::from(op.x) - f64::from(width),
        };
        Ok(PlacedText {
            layout,
            font,
            left,
            top: f64::from(op.y),
        })
    }

    fn draw_batch(&self, ops: &[TextOp], width: u32, height: u32) -> ChartResult<Vec<u8>> {
        let w = u16::try_from(width).map_err(|_| ChartError::render("layer width exceeds u16"))?;
        let h = u16::try_from(height).map_err(|_| ChartError::render("layer height exceeds u16"))?;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        let mut layer = vec![0u8; (width as usize) * (height as usize) * 4];

        for op in ops.iter().filter(|op| drawable(op)) {
            let placed = self.place(&mut state, op)?;

            if let Some(shadow) = op.shadow.filter(|s| s.color.a > 0) {
                let origin = (
                    placed.left + f64::from(shadow.dx),
                    placed.top + f64::from(shadow.dy),
                );
                rasterize(&mut ctx, &mut pixmap, &placed, origin, Some(shadow.color));
                let blur = ShadowBlur::from_blur_px(shadow.blur_px);
                blur_rgba8_premul_in_place(pixmap.data_as_u8_slice_mut(), width, height, blur)?;
                premul_over_in_place(&mut layer, pixmap.data_as_u8_slice())?;
            }

            let origin = (placed.left, placed.top);
            rasterize(&mut ctx, &mut pixmap, &placed, origin, None);
            premul_over_in_place(&mut layer, pixmap.data_as_u8_slice())?;
        }

        unpremultiply_in_place(&mut layer);
        Ok(layer)
    }
}

fn drawable(op: &TextOp) -> bool {
    !op.text.is_empty() && op.x.is_finite() && op.y.is_finite()
}

/// Rasterize `placed` with its top-left at `origin`. `paint` overrides the layout brush.
fn rasterize(
    ctx: &mut vello_cpu::RenderContext,
    pixmap: &mut vello_cpu::Pixmap,
    placed: &PlacedText,
    origin: (f64, f64),
    paint: Option<Rgba8>,
) {
    ctx.reset();
    pixmap.data_as_u8_slice_mut().fill(0);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
    for line in placed.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let c = paint.unwrap_or_else(|| {
                let b = run.style().brush;
                Rgba8::new(b.r, b.g, b.b, b.a)
            });
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&placed.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();
    ctx.render_to_pixmap(pixmap);
}

impl TextRenderer for NativeTextRenderer {
    fn name(&self) -> &'static str {
        "native"
    }

    fn render_text(&self, ops: &[TextOp], buffer: &mut PixelBuffer) -> bool {
        let layer = match self.draw_batch(ops, buffer.width(), buffer.height()) {
            Ok(layer) => layer,
            Err(e) => {
                soft_failure!("native_text_error", error = %e, "native text batch failed");
                return false;
            }
        };

        if alpha_sum(&layer) == 0 {
            let family = self.family.as_deref().unwrap_or("sans-serif");
            let font = ops
                .first()
                .map(|op| op.font_string(family))
                .unwrap_or_default();
            soft_failure!(
                "native_text_blank",
                ops = ops.len(),
                font = %font,
                "native text layer drew nothing"
            );
            return false;
        }

        match source_over_in_place(buffer.data_mut(), &layer) {
            Ok(()) => true,
            Err(e) => {
                soft_failure!("native_text_error", error = %e, "native text composite failed");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/native.rs"]
mod tests;
