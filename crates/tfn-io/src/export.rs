//! PNG export of palettes and pre-integration tables.

use std::path::Path;

use image::{ImageBuffer, Rgba};
use tfn_core::{Palette, PreIntegrationTable, TfnError, point::quantize_channel};

use crate::error::GatewayResult;

/// Write `palette` as a `len × height` RGBA8 PNG, one column per sample.
pub fn write_palette_png(palette: &Palette, height: u32, path: &Path) -> GatewayResult<()> {
    if height == 0 || palette.is_empty() {
        return Err(TfnError::InvalidArgument(format!(
            "cannot export a {}x{height} palette image",
            palette.len()
        ))
        .into());
    }
    let width = u32::try_from(palette.len())
        .map_err(|_| TfnError::InvalidArgument(format!("palette too wide: {}", palette.len())))?;

    let samples = palette.samples();
    let img = ImageBuffer::from_fn(width, height, |x, _| {
        Rgba(samples[x as usize].map(quantize_channel))
    });
    img.save(path)?;
    tracing::info!("wrote {width}x{height} palette to {}", path.display());
    Ok(())
}

/// Write a pre-integrated table as a square RGBA8 PNG. Pixel `(x, y)` holds
/// the segment with front sample `y` and back sample `x`.
pub fn write_pre_integration_png(table: &PreIntegrationTable, path: &Path) -> GatewayResult<()> {
    let size = u32::try_from(table.size())
        .map_err(|_| TfnError::InvalidArgument(format!("table too large: {}", table.size())))?;
    let img = ImageBuffer::from_fn(size, size, |x, y| {
        let s = table.get(y as usize, x as usize).unwrap_or_default();
        Rgba(s.map(quantize_channel))
    });
    img.save(path)?;
    tracing::info!("wrote {size}x{size} pre-integration table to {}", path.display());
    Ok(())
}
