//! Editor configuration shared by the library front ends.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfnError};
use crate::evaluate::SampleSpacing;
use crate::preset::Preset;

/// Palette resolution most renderers request.
pub const DEFAULT_NUM_SAMPLES: usize = 256;

/// Tunables for palette evaluation and saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Palette length produced on every publish.
    pub num_samples: usize,
    /// How palette samples map onto the curve domain.
    pub sample_spacing: SampleSpacing,
    /// Preset selected at startup.
    pub default_preset: Preset,
    /// Evenly spaced color samples written when a format cannot carry
    /// explicit color positions.
    pub save_color_resolution: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            sample_spacing: SampleSpacing::Inclusive,
            default_preset: Preset::Default,
            save_color_resolution: DEFAULT_NUM_SAMPLES,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!("loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(TfnError::InvalidArgument(
                "num_samples must be at least 1".into(),
            ));
        }
        if self.save_color_resolution < 2 {
            return Err(TfnError::InvalidArgument(
                "save_color_resolution must be at least 2".into(),
            ));
        }
        Ok(())
    }
}
