use crate::foundation::error::{ChartError, ChartResult};

/// Gaussian blur parameters derived from a canvas-style `shadowBlur` value in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ShadowBlur {
    pub(crate) radius: u32,
    pub(crate) sigma: f32,
}

impl ShadowBlur {
    /// Canvas semantics: `sigma = blur / 2`, kernel radius `ceil(3 * sigma)`.
    pub(crate) fn from_blur_px(blur_px: f32) -> Self {
        if !blur_px.is_finite() || blur_px <= 0.0 {
            return Self {
                radius: 0,
                sigma: 0.0,
            };
        }
        let sigma = blur_px / 2.0;
        let radius = (3.0 * sigma).ceil().clamp(0.0, 64.0) as u32;
        Self { radius, sigma }
    }
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ChartResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ChartError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ChartError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Separable blur of a premultiplied RGBA8 image in place.
pub(crate) fn blur_rgba8_premul_in_place(
    data: &mut [u8],
    width: u32,
    height: u32,
    blur: ShadowBlur,
) -> ChartResult<()> {
    let expected = (width as usize) * (height as usize) * 4;
    if data.len() != expected {
        return Err(ChartError::render("blur buffer length mismatch"));
    }
    let kernel = gaussian_kernel_q16(blur.radius, blur.sigma)?;
    if kernel.len() == 1 {
        return Ok(());
    }
    let mut tmp = vec![0u8; data.len()];
    horizontal_blur_q16(data, &mut tmp, width, height, &kernel);
    vertical_blur_q16(&tmp, data, width, height, &kernel);
    Ok(())
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        let row = (y * w) as usize * 4;
        if src[row..row + w as usize * 4].chunks_exact(4).all(|p| p[3] == 0) {
            dst[row..row + w as usize * 4].fill(0);
            continue;
        }
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = row + sx as usize * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = row + x as usize * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}
