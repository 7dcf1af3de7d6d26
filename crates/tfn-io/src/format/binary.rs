//! Binary `.tfn` files.
//!
//! All fields are little-endian:
//!
//! | field             | type               |
//! |-------------------|--------------------|
//! | version           | `u32` (= 1)        |
//! | name length       | `u64`              |
//! | name              | UTF-8 bytes        |
//! | color count       | `u64`              |
//! | opacity count     | `u64`              |
//! | data min, max     | `f64`, `f64`       |
//! | opacity scaling   | `f32`              |
//! | colors            | `[f32; 3]` each    |
//! | opacities         | `[f32; 2]` each, `(value, alpha)` |
//!
//! Colors carry no positions and are spread evenly on load.

use super::{RawColor, RawTransferFunction};
use crate::error::{GatewayError, GatewayResult};

pub const VERSION: u32 = 1;

const COLOR_BYTES: usize = 3 * 4;
const OPACITY_BYTES: usize = 2 * 4;

/// Bounds-checked little-endian cursor.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take<const N: usize>(&mut self, what: &str) -> GatewayResult<[u8; N]> {
        let end = self.offset + N;
        let chunk = self.bytes.get(self.offset..end).ok_or_else(|| {
            GatewayError::Parse(format!("truncated file: missing {what} at byte {}", self.offset))
        })?;
        self.offset = end;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    fn u32(&mut self, what: &str) -> GatewayResult<u32> {
        self.take::<4>(what).map(u32::from_le_bytes)
    }

    fn u64(&mut self, what: &str) -> GatewayResult<u64> {
        self.take::<8>(what).map(u64::from_le_bytes)
    }

    fn f32(&mut self, what: &str) -> GatewayResult<f32> {
        self.take::<4>(what).map(f32::from_le_bytes)
    }

    fn f64(&mut self, what: &str) -> GatewayResult<f64> {
        self.take::<8>(what).map(f64::from_le_bytes)
    }

    /// Read a length field and check that `len * stride` bytes could follow.
    fn count(&mut self, what: &str, stride: usize) -> GatewayResult<usize> {
        let raw = self.u64(what)?;
        let count = usize::try_from(raw)
            .ok()
            .filter(|n| n.checked_mul(stride).is_some_and(|b| b <= self.remaining()))
            .ok_or_else(|| {
                GatewayError::Parse(format!(
                    "truncated file: {what} of {raw} exceeds the {} remaining bytes",
                    self.remaining()
                ))
            })?;
        Ok(count)
    }
}

pub fn decode(bytes: &[u8]) -> GatewayResult<RawTransferFunction> {
    let mut r = Reader::new(bytes);

    let version = r.u32("version")?;
    if version != VERSION {
        return Err(GatewayError::Parse(format!(
            "unsupported file version {version} (expected {VERSION})"
        )));
    }

    let name_len = r.count("name length", 1)?;
    let start = r.offset;
    r.offset += name_len;
    let name = std::str::from_utf8(&bytes[start..r.offset])
        .map_err(|e| GatewayError::Parse(format!("name is not UTF-8: {e}")))?
        .to_string();

    let num_colors = r.u64("color count")?;
    let num_opacities = r.u64("opacity count")?;
    let data_min = r.f64("data min")?;
    let data_max = r.f64("data max")?;
    let opacity_scaling = r.f32("opacity scaling")?;

    let fits = usize::try_from(num_colors)
        .ok()
        .zip(usize::try_from(num_opacities).ok())
        .and_then(|(c, o)| c.checked_mul(COLOR_BYTES)?.checked_add(o.checked_mul(OPACITY_BYTES)?))
        .is_some_and(|n| n <= r.remaining());
    if !fits {
        return Err(GatewayError::Parse(format!(
            "truncated file: {num_colors} colors and {num_opacities} opacities \
             do not fit in {} bytes",
            r.remaining()
        )));
    }

    let mut colors = Vec::with_capacity(num_colors as usize);
    for _ in 0..num_colors {
        let rgb = [r.f32("color")?, r.f32("color")?, r.f32("color")?];
        colors.push(RawColor {
            position: None,
            rgb,
        });
    }
    let mut opacities = Vec::with_capacity(num_opacities as usize);
    for _ in 0..num_opacities {
        opacities.push([r.f32("opacity value")?, r.f32("opacity alpha")?]);
    }

    if r.remaining() > 0 {
        tracing::warn!("ignoring {} trailing bytes after '{name}'", r.remaining());
    }

    Ok(RawTransferFunction {
        name,
        colors,
        opacities,
        data_range: Some([data_min, data_max]),
        opacity_scaling,
    })
}

/// Encode `raw`. Color positions are dropped; the caller supplies evenly
/// spaced colors.
pub fn encode(raw: &RawTransferFunction) -> Vec<u8> {
    let [data_min, data_max] = raw.data_range.unwrap_or([0.0, 1.0]);
    let mut out = Vec::with_capacity(
        4 + 8 + raw.name.len() + 8 + 8 + 16 + 4
            + raw.colors.len() * COLOR_BYTES
            + raw.opacities.len() * OPACITY_BYTES,
    );
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&(raw.name.len() as u64).to_le_bytes());
    out.extend_from_slice(raw.name.as_bytes());
    out.extend_from_slice(&(raw.colors.len() as u64).to_le_bytes());
    out.extend_from_slice(&(raw.opacities.len() as u64).to_le_bytes());
    out.extend_from_slice(&data_min.to_le_bytes());
    out.extend_from_slice(&data_max.to_le_bytes());
    out.extend_from_slice(&raw.opacity_scaling.to_le_bytes());
    for c in &raw.colors {
        for ch in c.rgb {
            out.extend_from_slice(&ch.to_le_bytes());
        }
    }
    for o in &raw.opacities {
        for v in o {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}
