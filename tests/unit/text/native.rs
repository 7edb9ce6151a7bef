use std::path::Path;

use super::*;
use crate::fonts::backend::FontdbBackend;
use crate::text::op::TextShadow;

struct BrokenFaceBackend;

impl FontBackend for BrokenFaceBackend {
    fn family_names(&self) -> Vec<String> {
        vec!["Broken".to_owned()]
    }

    fn register_font_file(&self, _path: &Path) -> ChartResult<()> {
        Ok(())
    }

    fn register_font_bytes(&self, _bytes: Vec<u8>) -> ChartResult<()> {
        Ok(())
    }

    fn load_system_fonts(&self) {}

    fn resolve_face(&self, _request: &FaceRequest<'_>) -> Option<LoadedFace> {
        Some(LoadedFace {
            family: "Broken".to_owned(),
            data: Arc::new(vec![0u8; 32]),
            index: 0,
        })
    }

    fn measure_text(&self, _: &str, _: Option<&str>, _: f32, _: u16) -> ChartResult<f32> {
        Ok(10.0)
    }
}

fn background() -> PixelBuffer {
    let mut buf = PixelBuffer::new(120, 40).unwrap();
    buf.clear(Rgba8::new(11, 16, 32, 255));
    buf
}

#[test]
fn no_registered_face_fails_without_touching_target() {
    let renderer = NativeTextRenderer::new(Arc::new(FontdbBackend::new()), None);
    let mut buf = background();
    let before = buf.clone();
    assert!(!renderer.render_text(&[TextOp::new("BTC", 4.0, 4.0)], &mut buf));
    assert_eq!(buf, before);
}

#[test]
fn unusable_face_bytes_fail_the_batch() {
    let renderer = NativeTextRenderer::new(Arc::new(BrokenFaceBackend), Some("Broken".into()));
    let mut buf = background();
    let before = buf.clone();
    assert!(!renderer.render_text(&[TextOp::new("BTC", 4.0, 4.0)], &mut buf));
    assert_eq!(buf, before);
}

#[test]
fn empty_batch_has_zero_coverage() {
    let renderer = NativeTextRenderer::new(Arc::new(BrokenFaceBackend), None);
    let mut buf = background();
    assert!(!renderer.render_text(&[TextOp::new("", 4.0, 4.0)], &mut buf));
}

#[test]
fn oversized_target_is_rejected() {
    let renderer = NativeTextRenderer::new(Arc::new(FontdbBackend::new()), None);
    let mut buf = PixelBuffer::new(70_000, 1).unwrap();
    assert!(!renderer.render_text(&[TextOp::new("X", 0.0, 0.0)], &mut buf));
}

#[test]
fn draws_with_system_font_when_available() {
    let backend = FontdbBackend::new();
    backend.load_system_fonts();
    if !backend.family_names().iter().any(|f| f == "DejaVu Sans") {
        return;
    }
    let renderer = NativeTextRenderer::new(Arc::new(backend), Some("DejaVu Sans".into()));
    let mut buf = background();
    let before = buf.clone();
    let op = TextOp::new("BTCUSD", 4.0, 4.0)
        .with_font(20.0, 700)
        .with_shadow(TextShadow {
            dx: 0.0,
            dy: 2.0,
            blur_px: 4.0,
            color: Rgba8::new(0, 0, 0, 170),
        });
    assert!(renderer.render_text(&[op], &mut buf));
    assert_ne!(buf, before);
    assert!(buf.data().chunks_exact(4).all(|p| p[3] == 255));
}
