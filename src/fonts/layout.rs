use std::collections::HashMap;
use std::sync::Arc;

use crate::fonts::backend::LoadedFace;
use crate::foundation::error::{ChartError, ChartResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Parley family registered from one face's bytes. The `Arc` keeps the cache key's allocation
/// alive so the pointer cannot be reused by a different face.
struct RegisteredFace {
    _bytes: Arc<Vec<u8>>,
    family: String,
}

/// Stateful helper for building Parley text layouts from resolved faces.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<(usize, u32), RegisteredFace>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &LoadedFace) -> ChartResult<String> {
        let key = (Arc::as_ptr(&face.data) as usize, face.index);
        if let Some(reg) = self.registered.get(&key) {
            return Ok(reg.family.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.data.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ChartError::font("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ChartError::font("registered font family has no name"))?
            .to_string();

        self.registered.insert(
            key,
            RegisteredFace {
                _bytes: face.data.clone(),
                family: family.clone(),
            },
        );
        Ok(family)
    }

    /// Shape and lay out a single line of plain text in `face`.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        face: &LoadedFace,
        size_px: f32,
        weight: u16,
        brush: TextBrushRgba8,
    ) -> ChartResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ChartError::validation("text size_px must be finite and > 0"));
        }
        let family = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width of `text` in `face`.
    pub(crate) fn measure(
        &mut self,
        text: &str,
        face: &LoadedFace,
        size_px: f32,
        weight: u16,
    ) -> ChartResult<f32> {
        let layout = self.layout_line(text, face, size_px, weight, TextBrushRgba8::default())?;
        Ok(layout.width())
    }
}
