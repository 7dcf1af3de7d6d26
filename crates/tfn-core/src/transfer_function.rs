//! A named pair of color and opacity curves.
//!
//! `TransferFunction` is the unit the editor mutates and the evaluator reads.
//! Every mutation that changes a knot raises the dirty flag; the consumer that
//! re-samples the palette clears it with [`TransferFunction::take_dirty`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfnError};
use crate::point::{ColorPoint, OpacityPoint};
use crate::sequence::{ColorPoints, EditOutcome, OpacityPoints};

/// Piecewise-linear color and opacity curves over the normalized scalar domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransferFunctionFields")]
pub struct TransferFunction {
    name: String,
    color: ColorPoints,
    opacity: OpacityPoints,
    /// Data-space range the normalized domain maps onto, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    data_range: Option<[f64; 2]>,
    /// Stored with the function for file round-trips; evaluation ignores it.
    #[serde(skip_serializing_if = "is_unit_scaling")]
    opacity_scaling: f32,
    #[serde(skip)]
    dirty: bool,
}

fn unit_scaling() -> f32 {
    1.0
}

fn is_unit_scaling(s: &f32) -> bool {
    *s == 1.0
}

/// Unvalidated serde form of [`TransferFunction`].
#[derive(Deserialize)]
struct TransferFunctionFields {
    name: String,
    color: ColorPoints,
    opacity: OpacityPoints,
    #[serde(default)]
    data_range: Option<[f64; 2]>,
    #[serde(default = "unit_scaling")]
    opacity_scaling: f32,
}

impl TryFrom<TransferFunctionFields> for TransferFunction {
    type Error = TfnError;

    fn try_from(fields: TransferFunctionFields) -> Result<Self> {
        let tfn = Self::new(fields.name, fields.color, fields.opacity)
            .with_opacity_scaling(fields.opacity_scaling)?;
        match fields.data_range {
            Some([min, max]) => tfn.with_data_range(min, max),
            None => Ok(tfn),
        }
    }
}

impl TransferFunction {
    /// Create a function from validated curves. It starts dirty so the first
    /// palette gets produced.
    pub fn new(name: impl Into<String>, color: ColorPoints, opacity: OpacityPoints) -> Self {
        Self {
            name: name.into(),
            color,
            opacity,
            data_range: None,
            opacity_scaling: 1.0,
            dirty: true,
        }
    }

    /// Create a function from raw points, validating both curves.
    pub fn from_points(
        name: impl Into<String>,
        color: Vec<ColorPoint>,
        opacity: Vec<OpacityPoint>,
    ) -> Result<Self> {
        Ok(Self::new(
            name,
            ColorPoints::new(color)?,
            OpacityPoints::new(opacity)?,
        ))
    }

    /// Attach the data-space range. Requires finite `min < max`.
    pub fn with_data_range(mut self, min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(TfnError::InvalidArgument(format!(
                "data range [{min}, {max}] is empty or non-finite"
            )));
        }
        self.data_range = Some([min, max]);
        Ok(self)
    }

    /// Attach the opacity scaling stored by volume file formats. Must be finite.
    pub fn with_opacity_scaling(mut self, scaling: f32) -> Result<Self> {
        if !scaling.is_finite() {
            return Err(TfnError::InvalidArgument(format!(
                "opacity scaling {scaling} is not finite"
            )));
        }
        self.opacity_scaling = scaling;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn color(&self) -> &ColorPoints {
        &self.color
    }

    pub fn opacity(&self) -> &OpacityPoints {
        &self.opacity
    }

    pub fn data_range(&self) -> Option<[f64; 2]> {
        self.data_range
    }

    pub fn opacity_scaling(&self) -> f32 {
        self.opacity_scaling
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Force a re-sample on the next publish.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn insert_color(&mut self, position: f32) -> Result<EditOutcome> {
        let outcome = self.color.insert(position)?;
        self.record(format_args!("insert color at {position}"), outcome)
    }

    pub fn insert_color_with(&mut self, position: f32, rgb: [f32; 3]) -> Result<EditOutcome> {
        let outcome = self.color.insert_with(position, rgb)?;
        self.record(format_args!("insert color at {position}"), outcome)
    }

    pub fn insert_opacity(&mut self, position: f32) -> Result<EditOutcome> {
        let outcome = self.opacity.insert(position)?;
        self.record(format_args!("insert opacity at {position}"), outcome)
    }

    pub fn insert_opacity_with(&mut self, position: f32, alpha: f32) -> Result<EditOutcome> {
        let outcome = self.opacity.insert_with(position, alpha)?;
        self.record(format_args!("insert opacity at {position}"), outcome)
    }

    pub fn remove_color(&mut self, index: usize) -> Result<EditOutcome> {
        let outcome = self.color.remove(index)?;
        self.record(format_args!("remove color #{index}"), outcome)
    }

    pub fn remove_opacity(&mut self, index: usize) -> Result<EditOutcome> {
        let outcome = self.opacity.remove(index)?;
        self.record(format_args!("remove opacity #{index}"), outcome)
    }

    pub fn move_color(&mut self, index: usize, position: f32, rgb: [f32; 3]) -> Result<EditOutcome> {
        let outcome = self.color.move_point(index, position, rgb)?;
        self.record(format_args!("move color #{index} to {position}"), outcome)
    }

    pub fn move_opacity(&mut self, index: usize, position: f32, alpha: f32) -> Result<EditOutcome> {
        let outcome = self.opacity.move_point(index, position, alpha)?;
        self.record(format_args!("move opacity #{index} to {position}"), outcome)
    }

    pub fn set_color(&mut self, index: usize, rgb: [f32; 3]) -> Result<EditOutcome> {
        let outcome = self.color.set_value(index, rgb)?;
        self.record(format_args!("set color #{index}"), outcome)
    }

    pub fn set_opacity(&mut self, index: usize, alpha: f32) -> Result<EditOutcome> {
        let outcome = self.opacity.set_value(index, alpha)?;
        self.record(format_args!("set opacity #{index}"), outcome)
    }

    fn record(&mut self, action: fmt::Arguments<'_>, outcome: EditOutcome) -> Result<EditOutcome> {
        match outcome {
            EditOutcome::Applied { index } => {
                self.dirty = true;
                tracing::debug!("{action} -> index {index} on '{}'", self.name);
            }
            EditOutcome::Ignored => {
                tracing::debug!("{action} ignored on '{}'", self.name);
            }
        }
        Ok(outcome)
    }
}
