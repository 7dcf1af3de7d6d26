//! On-disk transfer function formats.
//!
//! Both formats decode into a [`RawTransferFunction`]: color entries with
//! optional positions and opacity entries in data space. [`normalize`] turns
//! that into curves on the `[0, 1]` domain.

pub mod binary;
pub mod json;

use std::path::Path;

use tfn_core::{ColorPoint, ColorPoints, OpacityPoint, OpacityPoints, TransferFunction};

use crate::error::{Channel, GatewayError, GatewayResult};

/// Supported file formats, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Versioned JSON document (`.json`).
    Json,
    /// Versioned little-endian binary layout (`.tfn`).
    Binary,
}

impl Format {
    pub fn from_path(path: &Path) -> GatewayResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("tfn") => Ok(Self::Binary),
            _ => Err(GatewayError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A color entry as stored in a file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawColor {
    pub position: Option<f32>,
    pub rgb: [f32; 3],
}

/// File contents before domain normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransferFunction {
    pub name: String,
    pub colors: Vec<RawColor>,
    /// `(data value, alpha)` pairs.
    pub opacities: Vec<[f32; 2]>,
    pub data_range: Option<[f64; 2]>,
    /// Stored for round-trips; evaluation does not apply it.
    pub opacity_scaling: f32,
}

/// A transfer function read from a file, with curves on the `[0, 1]` domain.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTransferFunction {
    pub name: String,
    pub colors: Vec<ColorPoint>,
    pub opacities: Vec<OpacityPoint>,
    pub data_range: Option<[f64; 2]>,
    pub opacity_scaling: f32,
}

impl LoadedTransferFunction {
    pub fn into_transfer_function(self) -> GatewayResult<TransferFunction> {
        let color = ColorPoints::new(self.colors)?;
        let opacity = OpacityPoints::new(self.opacities)?;
        let tfn = TransferFunction::new(self.name, color, opacity)
            .with_opacity_scaling(self.opacity_scaling)?;
        Ok(match self.data_range {
            Some([min, max]) if min < max => tfn.with_data_range(min, max)?,
            _ => tfn,
        })
    }
}

/// Map raw file contents onto the normalized domain.
///
/// - Color entries without positions are spread evenly: `i / (n - 1)`.
/// - Opacity values are rescaled from `data_range` when it is non-empty.
/// - Positions are clamped to `[0, 1]`; a curve that stops short of either
///   end gets a boundary knot repeating its end value.
/// - RGB and alpha are clamped to `[0, 1]`; non-finite values are rejected.
pub fn normalize(raw: RawTransferFunction) -> GatewayResult<LoadedTransferFunction> {
    if raw.colors.len() < 2 {
        return Err(GatewayError::InsufficientPoints {
            channel: Channel::Color,
            count: raw.colors.len(),
        });
    }
    if raw.opacities.len() < 2 {
        return Err(GatewayError::InsufficientPoints {
            channel: Channel::Opacity,
            count: raw.opacities.len(),
        });
    }

    check_values(&raw)?;
    let mut clamped = 0usize;
    let mut clamp = |v: f32| {
        let c = v.clamp(0.0, 1.0);
        if c != v {
            clamped += 1;
        }
        c
    };

    let raw_colors: Vec<RawColor> = raw
        .colors
        .iter()
        .map(|c| RawColor {
            position: c.position,
            rgb: c.rgb.map(&mut clamp),
        })
        .collect();
    let raw_opacities: Vec<[f32; 2]> = raw
        .opacities
        .iter()
        .map(|&[value, alpha]| [value, clamp(alpha)])
        .collect();
    if clamped > 0 {
        tracing::warn!("'{}': clamped {clamped} color/alpha values into [0, 1]", raw.name);
    }

    let colors = normalize_colors(&raw_colors)?;

    let rescale = match raw.data_range {
        Some([min, max]) if min.is_finite() && max.is_finite() && min < max => {
            Some((min, max - min))
        }
        _ => None,
    };
    let opacities: Vec<OpacityPoint> = raw_opacities
        .iter()
        .map(|&[value, alpha]| {
            let position = match rescale {
                Some((min, span)) => ((f64::from(value) - min) / span) as f32,
                None => value,
            };
            OpacityPoint::new(position.clamp(0.0, 1.0), alpha)
        })
        .collect();
    let opacities = pad_boundaries(opacities, |p, a| OpacityPoint::new(p, a.alpha));

    check_order(Channel::Color, colors.iter().map(|c| c.position))?;
    check_order(Channel::Opacity, opacities.iter().map(|o| o.position))?;

    Ok(LoadedTransferFunction {
        name: raw.name,
        colors,
        opacities,
        data_range: raw.data_range,
        opacity_scaling: raw.opacity_scaling,
    })
}

fn check_values(raw: &RawTransferFunction) -> GatewayResult<()> {
    if let Some(i) = raw
        .colors
        .iter()
        .position(|c| !c.rgb.iter().all(|v| v.is_finite()))
    {
        return Err(GatewayError::Parse(format!(
            "color entry {i} has a non-finite channel"
        )));
    }
    if let Some(i) = raw
        .opacities
        .iter()
        .position(|o| !o[0].is_finite() || !o[1].is_finite())
    {
        return Err(GatewayError::Parse(format!(
            "opacity entry {i} has a non-finite value"
        )));
    }
    if !raw.opacity_scaling.is_finite() {
        return Err(GatewayError::Parse(format!(
            "opacity scaling {} is not finite",
            raw.opacity_scaling
        )));
    }
    Ok(())
}

fn normalize_colors(raw: &[RawColor]) -> GatewayResult<Vec<ColorPoint>> {
    let with_position = raw.iter().filter(|c| c.position.is_some()).count();
    if with_position == 0 {
        let rgb: Vec<[f32; 3]> = raw.iter().map(|c| c.rgb).collect();
        return Ok(tfn_core::preset::evenly_spaced(&rgb));
    }
    if with_position != raw.len() {
        return Err(GatewayError::Parse(
            "color positions must be given for every entry or for none".into(),
        ));
    }
    let colors = raw
        .iter()
        .map(|c| ColorPoint {
            position: c.position.unwrap_or_default().clamp(0.0, 1.0),
            rgb: c.rgb,
        })
        .collect();
    Ok(pad_boundaries(colors, |p, c| ColorPoint {
        position: p,
        rgb: c.rgb,
    }))
}

/// Add knots at 0 and 1 when the curve stops short, copying the end values.
fn pad_boundaries<P: tfn_core::ControlPoint>(
    mut points: Vec<P>,
    at: impl Fn(f32, &P) -> P,
) -> Vec<P> {
    if let Some(first) = points.first().copied() {
        if first.position() > 0.0 {
            points.insert(0, at(0.0, &first));
        }
    }
    if let Some(last) = points.last().copied() {
        if last.position() < 1.0 {
            points.push(at(1.0, &last));
        }
    }
    points
}

fn check_order(channel: Channel, positions: impl Iterator<Item = f32>) -> GatewayResult<()> {
    let mut previous: Option<f32> = None;
    for (i, p) in positions.enumerate() {
        if !p.is_finite() {
            return Err(GatewayError::Parse(format!(
                "{channel} point {i} has a non-finite position"
            )));
        }
        if let Some(prev) = previous {
            if p <= prev {
                return Err(GatewayError::Parse(format!(
                    "{channel} positions are not strictly increasing at point {i}"
                )));
            }
        }
        previous = Some(p);
    }
    Ok(())
}

/// Flatten a transfer function into file form.
///
/// `explicit_color_positions` keeps color positions; otherwise colors are
/// written evenly spaced, resampling at `color_resolution` when the knots are
/// not already evenly spaced.
pub(crate) fn to_raw(
    tfn: &TransferFunction,
    explicit_color_positions: bool,
    color_resolution: usize,
) -> RawTransferFunction {
    let points = tfn.color().points();
    let colors = if explicit_color_positions {
        points
            .iter()
            .map(|c| RawColor {
                position: Some(c.position),
                rgb: c.rgb,
            })
            .collect()
    } else if is_evenly_spaced(points) {
        points
            .iter()
            .map(|c| RawColor {
                position: None,
                rgb: c.rgb,
            })
            .collect()
    } else {
        tracing::warn!(
            "'{}' has unevenly spaced colors; resampling at {color_resolution} points",
            tfn.name()
        );
        tfn.color()
            .bake(color_resolution.max(2), tfn_core::SampleSpacing::Inclusive)
            .into_iter()
            .map(|rgb| RawColor {
                position: None,
                rgb,
            })
            .collect()
    };

    let opacities = tfn
        .opacity()
        .points()
        .iter()
        .map(|o| {
            let value = match tfn.data_range() {
                Some([min, max]) => (min + f64::from(o.position) * (max - min)) as f32,
                None => o.position,
            };
            [value, o.alpha]
        })
        .collect();

    RawTransferFunction {
        name: tfn.name().to_string(),
        colors,
        opacities,
        data_range: tfn.data_range(),
        opacity_scaling: tfn.opacity_scaling(),
    }
}

fn is_evenly_spaced(points: &[ColorPoint]) -> bool {
    let last = (points.len() - 1).max(1) as f32;
    points
        .iter()
        .enumerate()
        .all(|(i, c)| (c.position - i as f32 / last).abs() < 1e-5)
}
