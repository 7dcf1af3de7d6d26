//! Control point types for the color and opacity curves.
//!
//! Both point kinds share the [`ControlPoint`] trait so a single
//! [`ControlPoints`](crate::sequence::ControlPoints) implementation can store,
//! search, and edit either of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Positions closer than this are treated as coincident when blending.
pub const POSITION_EPSILON: f32 = 1e-4;

/// A knot on one of the transfer function's piecewise-linear curves.
pub trait ControlPoint: Copy + PartialEq + fmt::Debug {
    /// The payload carried at each knot (`[r, g, b]` or alpha).
    type Value: Copy + PartialEq + fmt::Debug;

    fn new(position: f32, value: Self::Value) -> Self;
    fn position(&self) -> f32;
    fn set_position(&mut self, position: f32);
    fn value(&self) -> Self::Value;
    fn set_value(&mut self, value: Self::Value);

    /// Blend two values with factor `t`, channel by channel.
    fn mix(left: Self::Value, right: Self::Value, t: f32) -> Self::Value;

    /// Clamp every channel of `value` into `[0, 1]`.
    fn clamp_value(value: Self::Value) -> Self::Value;

    fn value_is_finite(value: Self::Value) -> bool;
}

/// Blend factor of `p` between knots at `pl` and `pr`.
///
/// Coincident knots (closer than [`POSITION_EPSILON`]) yield `0`, i.e. the
/// left value.
#[inline]
pub fn blend_factor(pl: f32, pr: f32, p: f32) -> f32 {
    if (pr - pl).abs() > POSITION_EPSILON {
        (p - pl) / (pr - pl)
    } else {
        0.0
    }
}

/// Linear blend of `left` (at `pl`) and `right` (at `pr`) evaluated at `p`.
///
/// ```text
/// t = (pr - pl) > ε ? (p - pl) / (pr - pl) : 0
/// result = left × (1 - t) + right × t
/// ```
#[inline]
pub fn interpolate(left: f32, right: f32, pl: f32, pr: f32, p: f32) -> f32 {
    lerp(left, right, blend_factor(pl, pr, p))
}

#[inline]
fn lerp(left: f32, right: f32, t: f32) -> f32 {
    left * (1.0 - t) + right * t
}

/// A color knot: position in `[0, 1]` and a linear RGB triple in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPoint {
    pub position: f32,
    pub rgb: [f32; 3],
}

impl ColorPoint {
    pub const fn new(position: f32, r: f32, g: f32, b: f32) -> Self {
        Self {
            position,
            rgb: [r, g, b],
        }
    }

    /// Packed `0xAABBGGRR` value with opaque alpha, the layout ImGui-style
    /// hosts use for handle colors.
    pub fn to_abgr_u32(&self) -> u32 {
        let [r, g, b] = self.rgb.map(quantize_channel);
        (0xff << 24) | (u32::from(b) << 16) | (u32::from(g) << 8) | u32::from(r)
    }
}

impl ControlPoint for ColorPoint {
    type Value = [f32; 3];

    fn new(position: f32, value: [f32; 3]) -> Self {
        Self {
            position,
            rgb: value,
        }
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn set_position(&mut self, position: f32) {
        self.position = position;
    }

    fn value(&self) -> [f32; 3] {
        self.rgb
    }

    fn set_value(&mut self, value: [f32; 3]) {
        self.rgb = value;
    }

    fn mix(left: [f32; 3], right: [f32; 3], t: f32) -> [f32; 3] {
        [
            lerp(left[0], right[0], t),
            lerp(left[1], right[1], t),
            lerp(left[2], right[2], t),
        ]
    }

    fn clamp_value(value: [f32; 3]) -> [f32; 3] {
        value.map(|c| c.clamp(0.0, 1.0))
    }

    fn value_is_finite(value: [f32; 3]) -> bool {
        value.iter().all(|c| c.is_finite())
    }
}

/// An opacity knot: position in `[0, 1]` and alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityPoint {
    pub position: f32,
    pub alpha: f32,
}

impl OpacityPoint {
    pub const fn new(position: f32, alpha: f32) -> Self {
        Self { position, alpha }
    }
}

impl ControlPoint for OpacityPoint {
    type Value = f32;

    fn new(position: f32, value: f32) -> Self {
        Self {
            position,
            alpha: value,
        }
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn set_position(&mut self, position: f32) {
        self.position = position;
    }

    fn value(&self) -> f32 {
        self.alpha
    }

    fn set_value(&mut self, value: f32) {
        self.alpha = value;
    }

    fn mix(left: f32, right: f32, t: f32) -> f32 {
        lerp(left, right, t)
    }

    fn clamp_value(value: f32) -> f32 {
        value.clamp(0.0, 1.0)
    }

    fn value_is_finite(value: f32) -> bool {
        value.is_finite()
    }
}

/// `round(c × 255)` clamped to `[0, 255]`.
#[inline]
pub fn quantize_channel(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}
