use crate::fonts::provision::FontProvisioner;
use crate::raster::buffer::PixelBuffer;
use crate::text::bitmap::BitmapTextRenderer;
use crate::text::native::NativeTextRenderer;
use crate::text::op::TextOp;

/// One strategy for drawing a batch of text ops onto a buffer.
pub trait TextRenderer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Draw `ops` onto `buffer`; `false` means nothing was drawn and the caller should fall back.
    fn render_text(&self, ops: &[TextOp], buffer: &mut PixelBuffer) -> bool;
}

/// Outcome of [`TextLayer::draw_text_ops`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextDrawReport {
    /// `true` when the native renderer drew the batch.
    pub drew_with_canvas: bool,
}

/// Two-tier text drawing: a native renderer when one is available, then the bitmap font.
pub struct TextLayer {
    native: Option<Box<dyn TextRenderer>>,
    fallback: BitmapTextRenderer,
}

impl std::fmt::Debug for TextLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayer")
            .field("native", &self.native.as_ref().map(|r| r.name()))
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl TextLayer {
    /// Layer with an explicit primary renderer (or none) and a bitmap fallback at `bitmap_scale`.
    pub fn new(native: Option<Box<dyn TextRenderer>>, bitmap_scale: u32) -> Self {
        Self {
            native,
            fallback: BitmapTextRenderer::new(bitmap_scale),
        }
    }

    /// Bitmap text only.
    pub fn bitmap_only(bitmap_scale: u32) -> Self {
        Self::new(None, bitmap_scale)
    }

    /// Native renderer over the provisioner's backend and resolved family.
    pub fn from_provisioner(provisioner: &FontProvisioner, bitmap_scale: u32) -> Self {
        let native = NativeTextRenderer::new(provisioner.backend(), provisioner.resolved_family());
        Self::new(Some(Box::new(native)), bitmap_scale)
    }

    /// Draw `ops`, falling back to the bitmap font when the native path is missing or fails.
    pub fn draw_text_ops(&self, buffer: &mut PixelBuffer, ops: &[TextOp]) -> TextDrawReport {
        if let Some(native) = &self.native
            && native.render_text(ops, buffer)
        {
            tracing::debug!(renderer = native.name(), ops = ops.len(), "text drawn");
            return TextDrawReport {
                drew_with_canvas: true,
            };
        }
        self.fallback.render_text(ops, buffer);
        tracing::debug!(
            renderer = self.fallback.name(),
            ops = ops.len(),
            "text drawn"
        );
        TextDrawReport {
            drew_with_canvas: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layer.rs"]
mod tests;
