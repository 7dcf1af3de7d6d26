//! Piecewise-linear 2D transfer function tables.
//!
//! The render host looks colors and opacities up by scalar value (x axis) and
//! gradient magnitude (y axis). A 1D palette is the special case of a
//! one-row table. Both grids are stored row-major.
//!
//! # Pre-integration
//! For a ray segment whose front and back samples map to `sf` and `sb`, the
//! pre-integrated table stores the mean color and opacity of the curve over
//! `[sf, sb]`. Means come from trapezoidal prefix sums, so building the
//! `N × N` table is O(N²) with O(1) work per entry.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfnError};
use crate::evaluate::Palette;

/// Color and opacity grids with bilinear lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Linear2DTableFields")]
pub struct Linear2DTable {
    color_width: usize,
    color_height: usize,
    colors: Vec<[f32; 3]>,
    opacity_width: usize,
    opacity_height: usize,
    opacities: Vec<f32>,
    grad_range: [f32; 2],
    pre_integration: bool,
}

/// Unvalidated serde form of [`Linear2DTable`].
#[derive(Deserialize)]
struct Linear2DTableFields {
    color_width: usize,
    color_height: usize,
    colors: Vec<[f32; 3]>,
    opacity_width: usize,
    opacity_height: usize,
    opacities: Vec<f32>,
    #[serde(default = "unit_range")]
    grad_range: [f32; 2],
    #[serde(default)]
    pre_integration: bool,
}

fn unit_range() -> [f32; 2] {
    [0.0, 1.0]
}

impl TryFrom<Linear2DTableFields> for Linear2DTable {
    type Error = TfnError;

    fn try_from(f: Linear2DTableFields) -> Result<Self> {
        let [min, max] = f.grad_range;
        Ok(Self::new(
            f.color_width,
            f.color_height,
            f.colors,
            f.opacity_width,
            f.opacity_height,
            f.opacities,
        )?
        .with_grad_range(min, max)?
        .with_pre_integration(f.pre_integration))
    }
}

impl Linear2DTable {
    /// Build a table from row-major grids. Grid sizes must match their
    /// declared dimensions and be non-empty.
    pub fn new(
        color_width: usize,
        color_height: usize,
        colors: Vec<[f32; 3]>,
        opacity_width: usize,
        opacity_height: usize,
        opacities: Vec<f32>,
    ) -> Result<Self> {
        check_grid("color", color_width, color_height, colors.len())?;
        check_grid("opacity", opacity_width, opacity_height, opacities.len())?;
        Ok(Self {
            color_width,
            color_height,
            colors,
            opacity_width,
            opacity_height,
            opacities,
            grad_range: [0.0, 1.0],
            pre_integration: false,
        })
    }

    /// One-row table holding a sampled 1D transfer function.
    pub fn from_palette(palette: &Palette) -> Result<Self> {
        let width = palette.len();
        let opacities = palette.samples().iter().map(|s| s[3]).collect();
        Self::new(width, 1, palette.colors(), width, 1, opacities)
    }

    /// Gradient magnitudes mapped onto the y axis. Requires finite `min < max`.
    pub fn with_grad_range(mut self, min: f32, max: f32) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(TfnError::InvalidArgument(format!(
                "gradient range [{min}, {max}] is empty or non-finite"
            )));
        }
        self.grad_range = [min, max];
        Ok(self)
    }

    pub fn with_pre_integration(mut self, enabled: bool) -> Self {
        self.pre_integration = enabled;
        self
    }

    pub fn color_size(&self) -> (usize, usize) {
        (self.color_width, self.color_height)
    }

    pub fn opacity_size(&self) -> (usize, usize) {
        (self.opacity_width, self.opacity_height)
    }

    pub fn grad_range(&self) -> [f32; 2] {
        self.grad_range
    }

    pub fn pre_integration(&self) -> bool {
        self.pre_integration
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    /// RGBA at normalized scalar `value` and raw gradient magnitude `gradient`.
    pub fn sample(&self, value: f32, gradient: f32) -> [f32; 4] {
        let u = unit(value);
        let v = unit((gradient - self.grad_range[0]) / (self.grad_range[1] - self.grad_range[0]));

        let c = GridCoords::new(self.color_width, self.color_height, u, v);
        let rgb = c.bilerp(|i| self.colors[i]);
        let o = GridCoords::new(self.opacity_width, self.opacity_height, u, v);
        let alpha = o.bilerp(|i| [self.opacities[i], 0.0, 0.0])[0];

        [rgb[0], rgb[1], rgb[2], alpha]
    }

    /// Pre-integrated segment table for the row at `gradient`, or `None`
    /// when pre-integration is disabled.
    pub fn pre_integrated(&self, gradient: f32) -> Option<PreIntegrationTable> {
        if !self.pre_integration {
            return None;
        }
        let size = self.color_width.max(self.opacity_width);
        let row: Vec<[f32; 4]> = (0..size)
            .map(|i| self.sample(i as f32 / (size - 1).max(1) as f32, gradient))
            .collect();
        Some(PreIntegrationTable::from_row(&row))
    }
}

fn check_grid(what: &str, width: usize, height: usize, len: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TfnError::MalformedTransferFunction(format!(
            "{what} grid has zero size ({width}x{height})"
        )));
    }
    if width.checked_mul(height) != Some(len) {
        return Err(TfnError::MalformedTransferFunction(format!(
            "{what} grid is {width}x{height} but holds {len} entries"
        )));
    }
    Ok(())
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
fn unit(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Bilinear sample footprint in a `width × height` grid.
struct GridCoords {
    width: usize,
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    fx: f32,
    fy: f32,
}

impl GridCoords {
    fn new(width: usize, height: usize, u: f32, v: f32) -> Self {
        let x = u * (width - 1) as f32;
        let y = v * (height - 1) as f32;
        let x0 = (x.floor() as usize).min(width - 1);
        let y0 = (y.floor() as usize).min(height - 1);
        Self {
            width,
            x0,
            x1: (x0 + 1).min(width - 1),
            y0,
            y1: (y0 + 1).min(height - 1),
            fx: x - x0 as f32,
            fy: y - y0 as f32,
        }
    }

    fn bilerp(&self, fetch: impl Fn(usize) -> [f32; 3]) -> [f32; 3] {
        let at = |x: usize, y: usize| fetch(y * self.width + x);
        let top = mix3(at(self.x0, self.y0), at(self.x1, self.y0), self.fx);
        let bottom = mix3(at(self.x0, self.y1), at(self.x1, self.y1), self.fx);
        mix3(top, bottom, self.fy)
    }
}

fn mix3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] * (1.0 - t) + b[0] * t,
        a[1] * (1.0 - t) + b[1] * t,
        a[2] * (1.0 - t) + b[2] * t,
    ]
}

/// Mean RGBA over every `(front, back)` sample pair of one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct PreIntegrationTable {
    size: usize,
    entries: Vec<[f32; 4]>,
}

impl PreIntegrationTable {
    fn from_row(row: &[[f32; 4]]) -> Self {
        let size = row.len();
        // prefix[i] = trapezoidal integral of the row from sample 0 to sample i.
        let mut prefix = vec![[0.0_f32; 4]; size];
        for i in 1..size {
            for c in 0..4 {
                prefix[i][c] = prefix[i - 1][c] + 0.5 * (row[i - 1][c] + row[i][c]);
            }
        }

        let mut entries = Vec::with_capacity(size * size);
        for front in 0..size {
            for back in 0..size {
                let entry = if front == back {
                    row[front]
                } else {
                    let (lo, hi) = (front.min(back), front.max(back));
                    let span = (hi - lo) as f32;
                    std::array::from_fn(|c| (prefix[hi][c] - prefix[lo][c]) / span)
                };
                entries.push(entry);
            }
        }
        Self { size, entries }
    }

    /// Samples per axis.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, front: usize, back: usize) -> Option<[f32; 4]> {
        if front >= self.size || back >= self.size {
            return None;
        }
        Some(self.entries[front * self.size + back])
    }

    /// Nearest entry for normalized scalar values at the segment ends.
    pub fn lookup(&self, front: f32, back: f32) -> [f32; 4] {
        let index = |s: f32| (unit(s) * (self.size - 1) as f32).round() as usize;
        self.entries[index(front) * self.size + index(back)]
    }
}
