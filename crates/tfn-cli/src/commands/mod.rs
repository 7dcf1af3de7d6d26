//! CLI command implementations

pub mod bake;
pub mod convert;
pub mod edit;
pub mod info;
pub mod presets;

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tfn_core::{Preset, TransferFunction};
use tfn_io::SaveOptions;

use crate::Source;

/// Load a transfer function file
pub fn load_function(path: &Path) -> Result<TransferFunction> {
    let loaded =
        tfn_io::load(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    loaded
        .into_transfer_function()
        .with_context(|| format!("Invalid transfer function: {}", path.display()))
}

/// Save a transfer function file
pub fn save_function(path: &Path, tfn: &TransferFunction, options: &SaveOptions) -> Result<()> {
    tfn_io::save(path, tfn, options).with_context(|| format!("Failed to save: {}", path.display()))
}

pub fn find_preset(name: &str) -> Result<Preset> {
    Preset::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
        anyhow!("unknown preset '{name}' (known: {})", known.join(", "))
    })
}

/// Resolve a `Source` argument group into a transfer function
pub fn resolve(source: &Source) -> Result<TransferFunction> {
    match (&source.input, &source.preset) {
        (Some(path), _) => load_function(path),
        (None, Some(name)) => Ok(find_preset(name)?.build()),
        (None, None) => Err(anyhow!("either an input file or --preset is required")),
    }
}
