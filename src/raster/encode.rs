use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{ChartError, ChartResult};
use crate::raster::buffer::PixelBuffer;

/// Encode a finished buffer as a PNG byte sequence.
pub fn encode_png(buffer: &PixelBuffer) -> ChartResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec())
        .ok_or_else(|| ChartError::encode("pixel buffer does not match its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}
