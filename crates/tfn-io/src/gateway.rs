//! Loading and saving transfer functions.

use std::path::Path;

use tfn_core::{TransferFunction, TransferFunctionCollection};

use crate::error::GatewayResult;
use crate::format::{self, Format, LoadedTransferFunction};

/// Options for [`save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Resolution used when a binary file needs colors resampled onto an
    /// even grid.
    pub color_resolution: usize,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            color_resolution: 256,
        }
    }
}

/// Read a transfer function file, choosing the format from its extension.
pub fn load(path: &Path) -> GatewayResult<LoadedTransferFunction> {
    let format = Format::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let mut loaded = load_from_bytes(&bytes, format)?;
    if loaded.name.is_empty() {
        loaded.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    tracing::info!(
        "loaded '{}' from {} ({} colors, {} opacities)",
        loaded.name,
        path.display(),
        loaded.colors.len(),
        loaded.opacities.len()
    );
    Ok(loaded)
}

pub fn load_from_bytes(bytes: &[u8], format: Format) -> GatewayResult<LoadedTransferFunction> {
    let raw = match format {
        Format::Json => format::json::decode(bytes)?,
        Format::Binary => format::binary::decode(bytes)?,
    };
    format::normalize(raw)
}

/// Load `path` into `collection` as a read-only entry and select it.
///
/// On any error the collection is left untouched.
pub fn load_into(collection: &mut TransferFunctionCollection, path: &Path) -> GatewayResult<usize> {
    let function = load(path)?.into_transfer_function()?;
    Ok(collection.push_loaded(function, path.to_path_buf()))
}

/// Write `tfn` to `path`, choosing the format from its extension.
///
/// JSON keeps color positions. The binary format only stores evenly spaced
/// colors, so uneven curves are resampled at `options.color_resolution`.
pub fn save(path: &Path, tfn: &TransferFunction, options: &SaveOptions) -> GatewayResult<()> {
    let format = Format::from_path(path)?;
    let bytes = match format {
        Format::Json => format::json::encode(&format::to_raw(tfn, true, options.color_resolution))?,
        Format::Binary => {
            format::binary::encode(&format::to_raw(tfn, false, options.color_resolution))
        }
    };
    std::fs::write(path, bytes)?;
    tracing::info!("saved '{}' to {}", tfn.name(), path.display());
    Ok(())
}
