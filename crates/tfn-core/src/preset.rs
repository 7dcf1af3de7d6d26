//! Built-in transfer function presets.
//!
//! The color tables are the common ParaView-style scientific maps. Apart from
//! [`Preset::Default`], the presets carry no opacity of their own and get a
//! linear `0 → 1` opacity ramp.

use serde::{Deserialize, Serialize};

use crate::point::{ColorPoint, OpacityPoint};
use crate::sequence::{ColorPoints, OpacityPoints};
use crate::transfer_function::TransferFunction;

/// The fixed catalog of built-in transfer functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Blue → cyan → yellow → red with a quarter-step opacity ramp.
    #[default]
    Default,
    Jet,
    IceFire,
    CoolWarm,
    BlueRed,
    Grayscale,
}

impl Preset {
    /// All presets, in menu order.
    pub const ALL: &[Preset] = &[
        Self::Default,
        Self::Jet,
        Self::IceFire,
        Self::CoolWarm,
        Self::BlueRed,
        Self::Grayscale,
    ];

    /// Human-readable label for menus and file names.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Jet => "Jet",
            Self::IceFire => "Ice Fire",
            Self::CoolWarm => "Cool Warm",
            Self::BlueRed => "Blue Red",
            Self::Grayscale => "Grayscale",
        }
    }

    /// Look a preset up by its label or snake_case identifier, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().to_ascii_lowercase() == wanted)
    }

    /// Build a fresh, dirty transfer function for this preset.
    pub fn build(self) -> TransferFunction {
        let (color, opacity) = match self {
            Self::Default => (
                vec![
                    ColorPoint::new(0.0, 0.0, 0.0, 1.0),
                    ColorPoint::new(0.3, 0.0, 1.0, 1.0),
                    ColorPoint::new(0.6, 1.0, 1.0, 0.0),
                    ColorPoint::new(1.0, 1.0, 0.0, 0.0),
                ],
                vec![
                    OpacityPoint::new(0.00, 0.00),
                    OpacityPoint::new(0.25, 0.25),
                    OpacityPoint::new(0.50, 0.50),
                    OpacityPoint::new(0.75, 0.75),
                    OpacityPoint::new(1.00, 1.00),
                ],
            ),
            Self::Jet => (evenly_spaced(JET), linear_ramp()),
            Self::IceFire => (evenly_spaced(ICE_FIRE), linear_ramp()),
            Self::CoolWarm => (evenly_spaced(COOL_WARM), linear_ramp()),
            Self::BlueRed => (evenly_spaced(BLUE_RED), linear_ramp()),
            Self::Grayscale => (evenly_spaced(GRAYSCALE), linear_ramp()),
        };

        // The tables above are static and always satisfy the sequence invariants.
        let color = ColorPoints::new(color).unwrap_or_else(|e| unreachable!("{e}"));
        let opacity = OpacityPoints::new(opacity).unwrap_or_else(|e| unreachable!("{e}"));
        TransferFunction::new(self.name(), color, opacity)
    }
}

/// Place `rgb` entries at `i / (n - 1)`, pinning the last one to exactly 1.
pub fn evenly_spaced(rgb: &[[f32; 3]]) -> Vec<ColorPoint> {
    let last = rgb.len().saturating_sub(1).max(1);
    rgb.iter()
        .enumerate()
        .map(|(i, c)| {
            let position = if i == last { 1.0 } else { i as f32 / last as f32 };
            ColorPoint {
                position,
                rgb: *c,
            }
        })
        .collect()
}

fn linear_ramp() -> Vec<OpacityPoint> {
    vec![OpacityPoint::new(0.0, 0.0), OpacityPoint::new(1.0, 1.0)]
}

// ─── Color tables ─────────────────────────────────────────────────────

const JET: &[[f32; 3]] = &[
    [0.0, 0.0, 0.562493],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.500008, 1.0, 0.500008],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.500008, 0.0, 0.0],
];

const ICE_FIRE: &[[f32; 3]] = &[
    [0.0, 0.0, 0.0],
    [0.0, 0.120394, 0.302678],
    [0.0, 0.216587, 0.524575],
    [0.0552529, 0.345022, 0.659495],
    [0.128054, 0.492592, 0.720287],
    [0.188952, 0.641306, 0.792096],
    [0.327672, 0.784939, 0.873426],
    [0.60824, 0.892164, 0.935546],
    [0.881376, 0.912184, 0.818097],
    [0.9514, 0.835615, 0.449271],
    [0.904479, 0.690486, 0.0],
    [0.854063, 0.510857, 0.0],
    [0.777096, 0.330175, 0.000885023],
    [0.672862, 0.139086, 0.00270085],
    [0.508812, 0.0, 0.0],
    [0.299413, 0.000366217, 0.000549325],
    [0.0157473, 0.00332647, 0.0],
];

const COOL_WARM: &[[f32; 3]] = &[
    [0.231373, 0.298039, 0.752941],
    [0.865003, 0.865003, 0.865003],
    [0.705882, 0.0156863, 0.14902],
];

const BLUE_RED: &[[f32; 3]] = &[[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];

const GRAYSCALE: &[[f32; 3]] = &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_every_preset_builds() {
        for preset in Preset::ALL {
            let tfn = preset.build();
            assert_eq!(tfn.name(), preset.name());
            assert!(tfn.color().len() >= 2);
            assert!(tfn.opacity().len() >= 2);
            assert!(tfn.is_dirty());
        }
    }

    #[test]
    fn test_jet_is_evenly_spaced() {
        let tfn = Preset::Jet.build();
        let points = tfn.color().points();
        assert_eq!(points.len(), 7);
        for (i, p) in points.iter().enumerate() {
            assert!((p.position - i as f32 / 6.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_from_name_accepts_labels_and_identifiers() {
        assert_eq!(Preset::from_name("Ice Fire"), Some(Preset::IceFire));
        assert_eq!(Preset::from_name("cool_warm"), Some(Preset::CoolWarm));
        assert_eq!(Preset::from_name("blue-red"), Some(Preset::BlueRed));
        assert_eq!(Preset::from_name("viridis"), None);
    }
}
