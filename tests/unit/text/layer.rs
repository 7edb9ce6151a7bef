use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::raster::color::Rgba8;

struct Scripted {
    succeed: bool,
    calls: Arc<AtomicUsize>,
}

impl TextRenderer for Scripted {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn render_text(&self, _ops: &[TextOp], buffer: &mut PixelBuffer) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            buffer.set_pixel(0, 0, Rgba8::new(1, 2, 3, 255));
        }
        self.succeed
    }
}

fn ops() -> Vec<TextOp> {
    vec![TextOp::new("HI", 2.0, 2.0)]
}

fn count_lit(buf: &PixelBuffer) -> usize {
    buf.data().chunks_exact(4).filter(|p| p[3] != 0).count()
}

#[test]
fn missing_native_renderer_uses_bitmap() {
    let layer = TextLayer::bitmap_only(1);
    let mut buf = PixelBuffer::new(32, 16).unwrap();
    let report = layer.draw_text_ops(&mut buf, &ops());
    assert!(!report.drew_with_canvas);
    assert!(count_lit(&buf) > 0);
}

#[test]
fn native_success_skips_bitmap() {
    let calls = Arc::new(AtomicUsize::new(0));
    let layer = TextLayer::new(
        Some(Box::new(Scripted {
            succeed: true,
            calls: calls.clone(),
        })),
        1,
    );
    let mut buf = PixelBuffer::new(32, 16).unwrap();
    let report = layer.draw_text_ops(&mut buf, &ops());
    assert!(report.drew_with_canvas);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(count_lit(&buf), 1);
}

#[test]
fn native_failure_falls_back_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let layer = TextLayer::new(
        Some(Box::new(Scripted {
            succeed: false,
            calls: calls.clone(),
        })),
        1,
    );
    let mut buf = PixelBuffer::new(32, 16).unwrap();
    let report = layer.draw_text_ops(&mut buf, &ops());
    assert!(!report.drew_with_canvas);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let mut expected = PixelBuffer::new(32, 16).unwrap();
    TextLayer::bitmap_only(1).draw_text_ops(&mut expected, &ops());
    assert_eq!(buf, expected);
}

#[test]
fn empty_font_backend_degrades_to_bitmap() {
    let backend: Arc<dyn crate::fonts::backend::FontBackend> =
        Arc::new(crate::fonts::backend::FontdbBackend::new());
    let native = NativeTextRenderer::new(backend, None);
    let layer = TextLayer::new(Some(Box::new(native)), 2);
    let mut buf = PixelBuffer::new(64, 32).unwrap();
    let report = layer.draw_text_ops(&mut buf, &ops());
    assert!(!report.drew_with_canvas);
    assert!(count_lit(&buf) > 0);
}
