use super::*;

fn lit(buf: &PixelBuffer) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..buf.height() as i32 {
        for x in 0..buf.width() as i32 {
            if buf.pixel(x, y).is_some_and(|p| p.a != 0) {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn every_table_glyph_fits_five_columns() {
    let chars = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ .,:-+/%()$_";
    for c in chars.chars() {
        for row in glyph(c) {
            assert!(row < 0x20, "glyph {c:?} overflows 5 columns");
        }
    }
}

#[test]
fn lowercase_maps_to_uppercase_and_unknown_to_question_mark() {
    assert_eq!(glyph('b'), glyph('B'));
    assert_eq!(glyph('~'), glyph('?'));
    assert_eq!(glyph('é'), UNKNOWN);
}

#[test]
fn width_is_six_units_per_char() {
    assert_eq!(text_width_px("ABC", 2), 36);
    assert_eq!(text_width_px("", 3), 0);
    assert_eq!(text_width_px("A", 0), 6);
}

#[test]
fn single_scale_glyph_matches_table() {
    let mut buf = PixelBuffer::new(8, 8).unwrap();
    BitmapTextRenderer::new(1).draw_op(&TextOp::new("-", 0.0, 0.0), &mut buf);
    assert_eq!(lit(&buf), vec![(0, 3), (1, 3), (2, 3), (3, 3), (4, 3)]);
}

#[test]
fn scale_expands_each_bit_to_a_square() {
    let mut buf = PixelBuffer::new(16, 16).unwrap();
    BitmapTextRenderer::new(2).draw_op(&TextOp::new(".", 0.0, 0.0), &mut buf);
    // '.' sets columns 1..=2 of rows 5..=6.
    let pixels = lit(&buf);
    assert_eq!(pixels.len(), 16);
    assert!(pixels.iter().all(|&(x, y)| (2..6).contains(&x) && (10..14).contains(&y)));
}

#[test]
fn right_alignment_ends_at_anchor() {
    let mut buf = PixelBuffer::new(40, 10).unwrap();
    let op = TextOp::new("H", 30.0, 0.0).with_align(TextAlign::Right);
    BitmapTextRenderer::new(1).draw_op(&op, &mut buf);
    let pixels = lit(&buf);
    let min_x = pixels.iter().map(|p| p.0).min().unwrap();
    let max_x = pixels.iter().map(|p| p.0).max().unwrap();
    assert_eq!(min_x, 24);
    assert_eq!(max_x, 28);
}

#[test]
fn shadow_is_ignored_and_color_is_blended() {
    let mut buf = PixelBuffer::new(8, 8).unwrap();
    buf.clear(Rgba8::BLACK);
    let op = TextOp::new("-", 0.0, 0.0)
        .with_color(Rgba8::new(255, 255, 255, 128))
        .with_shadow(crate::text::op::TextShadow {
            dx: 1.0,
            dy: 1.0,
            blur_px: 0.0,
            color: Rgba8::new(255, 0, 0, 255),
        });
    BitmapTextRenderer::new(1).draw_op(&op, &mut buf);
    assert_eq!(buf.pixel(0, 3), Some(Rgba8::new(128, 128, 128, 255)));
    assert_eq!(buf.pixel(1, 4), Some(Rgba8::BLACK));
}

#[test]
fn out_of_bounds_text_is_clipped() {
    let mut buf = PixelBuffer::new(4, 4).unwrap();
    let ok = BitmapTextRenderer::new(3).render_text(
        &[
            TextOp::new("WIDE TEXT", -10.0, -5.0),
            TextOp::new("", 0.0, 0.0),
            TextOp::new("X", f32::NAN, 0.0),
        ],
        &mut buf,
    );
    assert!(ok);
}
