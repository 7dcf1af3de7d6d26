//! Palette evaluation: discretizes a transfer function into RGBA samples.
//!
//! The render host consumes the result either as an RGBA8 texture
//! ([`Palette::to_rgba8`]) or as full-precision floats ([`Palette::samples`]).

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfnError};
use crate::point::quantize_channel;
use crate::transfer_function::TransferFunction;

/// How sample `k` of `n` maps onto the `[0, 1]` curve domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSpacing {
    /// `p = k / (n - 1)`: the first and last samples sit exactly on the
    /// boundary knots.
    #[default]
    Inclusive,
    /// `p = k / n`: texel-start sampling; the last sample approaches but
    /// never reaches position 1.
    HalfOpen,
}

impl SampleSpacing {
    /// Curve position of sample `k` out of `n`, clamped to `[0, 1]`.
    pub fn position(self, k: usize, n: usize) -> f32 {
        let p = match self {
            Self::Inclusive => k as f32 / (n.saturating_sub(1)).max(1) as f32,
            Self::HalfOpen => k as f32 / n.max(1) as f32,
        };
        p.clamp(0.0, 1.0)
    }
}

/// A sampled transfer function: `len()` RGBA values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Spacing the samples were taken with.
    pub spacing: SampleSpacing,
    samples: Vec<[f32; 4]>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Full-precision RGBA samples.
    pub fn samples(&self) -> &[[f32; 4]] {
        &self.samples
    }

    /// Raw native-endian bytes of the float samples, ready for a float texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.samples)
    }

    /// Texture-ready RGBA8 bytes (`4 × len()`), each channel `round(c × 255)`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.samples
            .iter()
            .flat_map(|s| s.map(quantize_channel))
            .collect()
    }

    /// RGB per sample, without opacity.
    pub fn colors(&self) -> Vec<[f32; 3]> {
        self.samples.iter().map(|s| [s[0], s[1], s[2]]).collect()
    }

    /// `(position, alpha)` per sample.
    pub fn opacity_pairs(&self) -> Vec<[f32; 2]> {
        let n = self.samples.len();
        self.samples
            .iter()
            .enumerate()
            .map(|(k, s)| [self.spacing.position(k, n), s[3]])
            .collect()
    }
}

/// Evaluate `tfn` at `num_samples` positions.
///
/// Color and opacity are located and interpolated independently; the three
/// color channels share one located segment per sample. Nothing is cached:
/// callers re-evaluate whenever the function reports itself dirty.
pub fn evaluate(
    tfn: &TransferFunction,
    num_samples: usize,
    spacing: SampleSpacing,
) -> Result<Palette> {
    if num_samples == 0 {
        return Err(TfnError::InvalidArgument(
            "palette needs at least one sample".into(),
        ));
    }

    let samples = (0..num_samples)
        .map(|k| {
            let p = spacing.position(k, num_samples);
            let [r, g, b] = tfn.color().sample(p);
            let a = tfn.opacity().sample(p);
            [r, g, b, a]
        })
        .collect();

    tracing::debug!(
        "evaluated '{}' into {} samples ({:?})",
        tfn.name(),
        num_samples,
        spacing
    );

    Ok(Palette { spacing, samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Preset;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_spacing_positions() {
        assert_eq!(SampleSpacing::Inclusive.position(0, 4), 0.0);
        assert_eq!(SampleSpacing::Inclusive.position(3, 4), 1.0);
        assert_eq!(SampleSpacing::HalfOpen.position(3, 4), 0.75);
        assert_eq!(SampleSpacing::Inclusive.position(0, 1), 0.0);
        assert_eq!(SampleSpacing::HalfOpen.position(0, 1), 0.0);
    }

    #[test]
    fn test_default_preset_four_samples_alpha() {
        let tfn = Preset::Default.build();
        let palette = evaluate(&tfn, 4, SampleSpacing::Inclusive).unwrap();
        assert_eq!(palette.len(), 4);
        let expected = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        for (sample, alpha) in palette.samples().iter().zip(expected) {
            assert!((sample[3] - alpha).abs() < EPSILON, "{sample:?} vs {alpha}");
        }
    }

    #[test]
    fn test_endpoints_match_boundary_knots() {
        let tfn = Preset::Default.build();
        let palette = evaluate(&tfn, 256, SampleSpacing::Inclusive).unwrap();
        assert_eq!(palette.samples()[0], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(palette.samples()[255], [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_half_open_last_sample_approaches_end() {
        let tfn = Preset::Default.build();
        let palette = evaluate(&tfn, 100, SampleSpacing::HalfOpen).unwrap();
        assert_eq!(palette.len(), 100);
        assert_eq!(palette.samples()[0], [0.0, 0.0, 1.0, 0.0]);
        let last = palette.samples()[99];
        assert!((last[3] - 0.99).abs() < EPSILON);
        assert!(last[3] < 1.0);
    }

    #[test]
    fn test_zero_samples_is_error() {
        let tfn = Preset::Default.build();
        assert!(matches!(
            evaluate(&tfn, 0, SampleSpacing::Inclusive),
            Err(TfnError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rgba8_layout() {
        let tfn = Preset::Default.build();
        let palette = evaluate(&tfn, 4, SampleSpacing::Inclusive).unwrap();
        let bytes = palette.to_rgba8();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &[0, 0, 255, 0]);
        assert_eq!(&bytes[12..16], &[255, 0, 0, 255]);
        assert_eq!(bytes[7], 85);
    }

    #[test]
    fn test_float_bytes_length() {
        let tfn = Preset::Grayscale.build();
        let palette = evaluate(&tfn, 8, SampleSpacing::Inclusive).unwrap();
        assert_eq!(palette.as_bytes().len(), 8 * 4 * 4);
    }

    #[test]
    fn test_colors_and_opacity_pairs() {
        let tfn = Preset::Grayscale.build();
        let palette = evaluate(&tfn, 3, SampleSpacing::Inclusive).unwrap();
        let colors = palette.colors();
        assert_eq!(colors.len(), 3);
        assert!((colors[1][0] - 0.5).abs() < EPSILON);
        let pairs = palette.opacity_pairs();
        assert_eq!(pairs[2], [1.0, 1.0]);
        assert!((pairs[1][0] - 0.5).abs() < EPSILON);
    }
}
