pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Round a finite `f64` pixel coordinate to `i32`, saturating at the type bounds.
///
/// Non-finite input maps to `i32::MIN`, which every primitive treats as out of bounds.
pub(crate) fn round_px(v: f64) -> i32 {
    if !v.is_finite() {
        return i32::MIN;
    }
    v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
