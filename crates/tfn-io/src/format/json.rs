//! JSON transfer function documents.
//!
//! ```json
//! {
//!   "version": 1,
//!   "name": "Bone",
//!   "data_range": [0.0, 4095.0],
//!   "colors": [{ "rgb": [0, 0, 0] }, { "rgb": [1, 1, 1] }],
//!   "opacities": [{ "value": 0.0, "alpha": 0.0 }, { "value": 4095.0, "alpha": 1.0 }]
//! }
//! ```
//!
//! `position` on color entries is optional but must appear on all or none.

use serde::{Deserialize, Serialize};

use super::{RawColor, RawTransferFunction};
use crate::error::{GatewayError, GatewayResult};

pub const VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonDocument {
    version: u32,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_range: Option<[f64; 2]>,
    #[serde(default = "unit_scaling", skip_serializing_if = "is_unit_scaling")]
    opacity_scaling: f32,
    colors: Vec<JsonColor>,
    opacities: Vec<JsonOpacity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonColor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<f32>,
    rgb: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonOpacity {
    value: f32,
    alpha: f32,
}

fn unit_scaling() -> f32 {
    1.0
}

fn is_unit_scaling(s: &f32) -> bool {
    *s == 1.0
}

pub fn decode(bytes: &[u8]) -> GatewayResult<RawTransferFunction> {
    let doc: JsonDocument =
        serde_json::from_slice(bytes).map_err(|e| GatewayError::Parse(e.to_string()))?;
    if doc.version != VERSION {
        return Err(GatewayError::Parse(format!(
            "unsupported document version {} (expected {VERSION})",
            doc.version
        )));
    }
    Ok(RawTransferFunction {
        name: doc.name,
        colors: doc
            .colors
            .into_iter()
            .map(|c| RawColor {
                position: c.position,
                rgb: c.rgb,
            })
            .collect(),
        opacities: doc.opacities.into_iter().map(|o| [o.value, o.alpha]).collect(),
        data_range: doc.data_range,
        opacity_scaling: doc.opacity_scaling,
    })
}

pub fn encode(raw: &RawTransferFunction) -> GatewayResult<Vec<u8>> {
    let doc = JsonDocument {
        version: VERSION,
        name: raw.name.clone(),
        data_range: raw.data_range,
        opacity_scaling: raw.opacity_scaling,
        colors: raw
            .colors
            .iter()
            .map(|c| JsonColor {
                position: c.position,
                rgb: c.rgb,
            })
            .collect(),
        opacities: raw
            .opacities
            .iter()
            .map(|&[value, alpha]| JsonOpacity { value, alpha })
            .collect(),
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}
