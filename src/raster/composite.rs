use crate::foundation::error::{ChartError, ChartResult};
use crate::foundation::math::mul_div255_u8;

/// Straight-alpha RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];
/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of one straight-alpha pixel onto another.
///
/// A fully transparent source is the identity on `dst`, byte for byte.
pub fn source_over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let a_s = f64::from(src[3]) / 255.0;
    let a_d = f64::from(dst[3]) / 255.0;
    let out_a = a_s + a_d * (1.0 - a_s);
    if out_a <= 0.0 {
        return dst;
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (f64::from(src[c]) * a_s + f64::from(dst[c]) * a_d * (1.0 - a_s)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

/// Composite a straight-alpha layer onto `dst` in place with [`source_over`].
pub fn source_over_in_place(dst: &mut [u8], layer: &[u8]) -> ChartResult<()> {
    if dst.len() != layer.len() || !dst.len().is_multiple_of(4) {
        return Err(ChartError::render(
            "source_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = source_over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Premultiplied source-over, used while building a text layer.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> ChartResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ChartError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = (s[3]).saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = s[c].saturating_add(dc);
        }
    }
    Ok(())
}

/// Convert premultiplied RGBA8 to straight alpha in place.
pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in 0..3 {
            let v = (u32::from(px[c]) * 255 + a / 2) / a;
            px[c] = v.min(255) as u8;
        }
    }
}

/// Sum of every alpha byte in an RGBA8 buffer.
pub(crate) fn alpha_sum(rgba: &[u8]) -> u64 {
    rgba.chunks_exact(4).map(|px| u64::from(px[3])).sum()
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
