//! Ordered control-point sequences with clamped point-level edits.
//!
//! A sequence always holds at least two points: the boundary knots at
//! position 0 and position 1. Boundary knots may change value but never
//! position and are never removed. Interior knots stay strictly between
//! their neighbours, so edits never require a re-sort.
//!
//! # Complexity
//! - Locate / sample: O(log N) binary search + O(1) interpolation
//! - Insert / remove: O(N)
//! - Bake: O(size × log N)

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfnError};
use crate::evaluate::SampleSpacing;
use crate::point::{ColorPoint, ControlPoint, OpacityPoint, blend_factor};

/// Smallest gap kept between a moved knot and its neighbours.
const MIN_POINT_GAP: f32 = 1e-6;

/// What an edit did to the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    /// The sequence changed; `index` is the affected point.
    Applied { index: usize },
    /// The request was valid but protected or out of domain; nothing changed.
    Ignored,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Color knots sorted by position.
pub type ColorPoints = ControlPoints<ColorPoint>;
/// Opacity knots sorted by position.
pub type OpacityPoints = ControlPoints<OpacityPoint>;

/// A validated, strictly ascending sequence of control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<P>", into = "Vec<P>")]
pub struct ControlPoints<P: ControlPoint> {
    points: Vec<P>,
}

impl<P: ControlPoint> ControlPoints<P> {
    /// Build a sequence, checking every structural invariant.
    ///
    /// Requires at least two points, the first at position 0, the last at
    /// position 1, strictly increasing positions, and finite components with
    /// every value channel in `[0, 1]`.
    pub fn new(points: Vec<P>) -> Result<Self> {
        if points.len() < 2 {
            return Err(TfnError::MalformedTransferFunction(format!(
                "a curve needs at least 2 control points, got {}",
                points.len()
            )));
        }
        for (i, point) in points.iter().enumerate() {
            if !point.position().is_finite() || !P::value_is_finite(point.value()) {
                return Err(TfnError::MalformedTransferFunction(format!(
                    "control point {i} has a non-finite component"
                )));
            }
            if P::clamp_value(point.value()) != point.value() {
                return Err(TfnError::MalformedTransferFunction(format!(
                    "control point {i} has a value outside [0, 1]: {:?}",
                    point.value()
                )));
            }
        }
        let first = points[0].position();
        let last = points[points.len() - 1].position();
        if first != 0.0 || last != 1.0 {
            return Err(TfnError::MalformedTransferFunction(format!(
                "boundary points must sit at 0 and 1, found {first} and {last}"
            )));
        }
        if let Some(i) = points
            .windows(2)
            .position(|w| w[0].position() >= w[1].position())
        {
            return Err(TfnError::MalformedTransferFunction(format!(
                "positions must be strictly increasing (points {i} and {})",
                i + 1
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` for a validated sequence.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.points.get(index)
    }

    /// Index of the first point whose position is greater than `p`.
    ///
    /// Returns `0` when `p` lies before the first point and `len()` when `p`
    /// is at or beyond the last point. Interpolation reads the neighbours
    /// `locate(p) - 1` and `locate(p)`.
    pub fn locate(&self, p: f32) -> usize {
        self.points.partition_point(|point| point.position() <= p)
    }

    /// Evaluate the curve at `p`.
    ///
    /// Values outside the knot range clamp to the first/last knot's value.
    pub fn sample(&self, p: f32) -> P::Value {
        let ir = self.locate(p);
        if ir == 0 {
            return self.points[0].value();
        }
        if ir >= self.points.len() {
            return self.points[self.points.len() - 1].value();
        }
        self.blend(ir - 1, ir, p)
    }

    fn blend(&self, il: usize, ir: usize, p: f32) -> P::Value {
        let left = &self.points[il];
        let right = &self.points[ir];
        let t = blend_factor(left.position(), right.position(), p);
        P::mix(left.value(), right.value(), t)
    }

    /// Insert a knot at `p` whose value lies on the current curve, so the
    /// curve's shape is unchanged at the moment of insertion.
    pub fn insert(&mut self, p: f32) -> Result<EditOutcome> {
        self.ensure_well_formed()?;
        if !Self::is_interior_position(p) {
            return Ok(EditOutcome::Ignored);
        }
        let value = self.sample(p);
        self.insert_at(p, value)
    }

    /// Insert a knot at `p` carrying an explicit `value` (clamped to `[0, 1]`).
    pub fn insert_with(&mut self, p: f32, value: P::Value) -> Result<EditOutcome> {
        self.ensure_well_formed()?;
        if !Self::is_interior_position(p) || !P::value_is_finite(value) {
            return Ok(EditOutcome::Ignored);
        }
        self.insert_at(p, P::clamp_value(value))
    }

    fn is_interior_position(p: f32) -> bool {
        p.is_finite() && p > 0.0 && p < 1.0
    }

    fn insert_at(&mut self, p: f32, value: P::Value) -> Result<EditOutcome> {
        let index = self.locate(p);
        // `p` is strictly inside (0, 1), so index is in 1..len and the left
        // neighbour exists.
        if self.points[index - 1].position() == p {
            return Ok(EditOutcome::Ignored);
        }
        self.points.insert(index, P::new(p, value));
        Ok(EditOutcome::Applied { index })
    }

    /// Remove the knot at `index`. Boundary knots are protected.
    pub fn remove(&mut self, index: usize) -> Result<EditOutcome> {
        self.ensure_index(index)?;
        if self.is_boundary(index) {
            return Ok(EditOutcome::Ignored);
        }
        self.points.remove(index);
        Ok(EditOutcome::Applied { index })
    }

    /// Move the knot at `index` to `position` and give it `value`.
    ///
    /// Interior knots are clamped strictly between their neighbours; boundary
    /// knots keep their position and only take the new value. Value channels
    /// are clamped to `[0, 1]`.
    pub fn move_point(
        &mut self,
        index: usize,
        position: f32,
        value: P::Value,
    ) -> Result<EditOutcome> {
        self.ensure_index(index)?;
        if !position.is_finite() || !P::value_is_finite(value) {
            return Err(TfnError::InvalidArgument(format!(
                "non-finite move target for control point {index}"
            )));
        }

        let current = self.points[index];
        let new_position = if self.is_boundary(index) {
            current.position()
        } else {
            let lo = self.points[index - 1].position();
            let hi = self.points[index + 1].position();
            let gap = MIN_POINT_GAP.min((hi - lo) * 0.25);
            let clamped = position.max(lo + gap).min(hi - gap);
            if clamped > lo && clamped < hi {
                clamped
            } else {
                current.position()
            }
        };

        let updated = P::new(new_position, P::clamp_value(value));
        if updated == current {
            return Ok(EditOutcome::Ignored);
        }
        self.points[index] = updated;
        Ok(EditOutcome::Applied { index })
    }

    /// Change only the value of the knot at `index`.
    pub fn set_value(&mut self, index: usize, value: P::Value) -> Result<EditOutcome> {
        self.ensure_index(index)?;
        let position = self.points[index].position();
        self.move_point(index, position, value)
    }

    /// Sample the curve at `size` positions laid out by `spacing`.
    pub fn bake(&self, size: usize, spacing: SampleSpacing) -> Vec<P::Value> {
        (0..size)
            .map(|k| self.sample(spacing.position(k, size)))
            .collect()
    }

    fn is_boundary(&self, index: usize) -> bool {
        index == 0 || index == self.points.len() - 1
    }

    fn ensure_well_formed(&self) -> Result<()> {
        if self.points.len() < 2 {
            return Err(TfnError::MalformedTransferFunction(format!(
                "sequence holds {} control points, at least 2 required",
                self.points.len()
            )));
        }
        Ok(())
    }

    fn ensure_index(&self, index: usize) -> Result<()> {
        self.ensure_well_formed()?;
        if index >= self.points.len() {
            return Err(TfnError::InvalidIndex {
                index,
                len: self.points.len(),
            });
        }
        Ok(())
    }
}

impl<P: ControlPoint> TryFrom<Vec<P>> for ControlPoints<P> {
    type Error = TfnError;

    fn try_from(points: Vec<P>) -> Result<Self> {
        Self::new(points)
    }
}

impl<P: ControlPoint> From<ControlPoints<P>> for Vec<P> {
    fn from(sequence: ControlPoints<P>) -> Self {
        sequence.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn opacity_ramp() -> OpacityPoints {
        ControlPoints::new(vec![
            OpacityPoint::new(0.0, 0.0),
            OpacityPoint::new(0.25, 0.25),
            OpacityPoint::new(0.5, 0.5),
            OpacityPoint::new(0.75, 0.75),
            OpacityPoint::new(1.0, 1.0),
        ])
        .unwrap()
    }

    fn default_colors() -> ColorPoints {
        ControlPoints::new(vec![
            ColorPoint::new(0.0, 0.0, 0.0, 1.0),
            ColorPoint::new(0.3, 0.0, 1.0, 1.0),
            ColorPoint::new(0.6, 1.0, 1.0, 0.0),
            ColorPoint::new(1.0, 1.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    fn assert_strictly_sorted<P: ControlPoint>(seq: &ControlPoints<P>) {
        for w in seq.points().windows(2) {
            assert!(
                w[0].position() < w[1].position(),
                "unsorted: {:?} then {:?}",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn test_new_rejects_too_few_points() {
        let err = ControlPoints::new(vec![OpacityPoint::new(0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, TfnError::MalformedTransferFunction(_)));
    }

    #[test]
    fn test_new_rejects_missing_boundaries() {
        let err = ControlPoints::new(vec![
            OpacityPoint::new(0.1, 0.0),
            OpacityPoint::new(1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TfnError::MalformedTransferFunction(_)));
    }

    #[test]
    fn test_new_rejects_duplicate_positions() {
        let err = ControlPoints::new(vec![
            OpacityPoint::new(0.0, 0.0),
            OpacityPoint::new(0.5, 0.2),
            OpacityPoint::new(0.5, 0.4),
            OpacityPoint::new(1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TfnError::MalformedTransferFunction(_)));
    }

    #[test]
    fn test_new_rejects_out_of_range_values() {
        let err = ControlPoints::new(vec![
            OpacityPoint::new(0.0, -4.0),
            OpacityPoint::new(1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TfnError::MalformedTransferFunction(_)));

        let err = ControlPoints::new(vec![
            ColorPoint::new(0.0, 0.0, 0.0, 0.0),
            ColorPoint::new(1.0, 7.0, -3.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TfnError::MalformedTransferFunction(_)));

        let json = r#"[{"position":0.0,"alpha":0.0},{"position":1.0,"alpha":9.0}]"#;
        assert!(serde_json::from_str::<OpacityPoints>(json).is_err());
    }

    #[test]
    fn test_new_rejects_nan() {
        let err = ControlPoints::new(vec![
            OpacityPoint::new(0.0, f32::NAN),
            OpacityPoint::new(1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TfnError::MalformedTransferFunction(_)));
    }

    #[test]
    fn test_locate_edges_and_interior() {
        let seq = opacity_ramp();
        assert_eq!(seq.locate(-0.5), 0);
        assert_eq!(seq.locate(0.0), 1);
        assert_eq!(seq.locate(0.1), 1);
        assert_eq!(seq.locate(0.25), 2);
        assert_eq!(seq.locate(0.7), 3);
        assert_eq!(seq.locate(1.0), seq.len());
        assert_eq!(seq.locate(3.0), seq.len());
    }

    #[test]
    fn test_locate_matches_linear_scan() {
        let seq = default_colors();
        for k in 0..=200 {
            let p = k as f32 / 200.0 * 1.2 - 0.1;
            let expected = seq
                .points()
                .iter()
                .position(|pt| pt.position > p)
                .unwrap_or(seq.len());
            assert_eq!(seq.locate(p), expected, "p = {p}");
        }
    }

    #[test]
    fn test_sample_is_exact_at_knots() {
        let seq = default_colors();
        for point in seq.points() {
            let v = seq.sample(point.position);
            for c in 0..3 {
                assert!((v[c] - point.rgb[c]).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_sample_clamps_outside_range() {
        let seq = opacity_ramp();
        assert_eq!(seq.sample(-1.0), 0.0);
        assert_eq!(seq.sample(2.0), 1.0);
    }

    #[test]
    fn test_insert_color_interpolates_neighbours() {
        let mut seq = default_colors();
        let outcome = seq.insert(0.5).unwrap();
        assert_eq!(outcome, EditOutcome::Applied { index: 2 });
        assert_eq!(seq.len(), 5);
        assert_strictly_sorted(&seq);

        let t = (0.5 - 0.3) / (0.6 - 0.3);
        let inserted = seq.get(2).unwrap();
        assert!((inserted.position - 0.5).abs() < EPSILON);
        assert!((inserted.rgb[0] - t).abs() < EPSILON);
        assert!((inserted.rgb[1] - 1.0).abs() < EPSILON);
        assert!((inserted.rgb[2] - (1.0 - t)).abs() < EPSILON);
    }

    #[test]
    fn test_insert_rejects_boundaries_and_duplicates() {
        let mut seq = opacity_ramp();
        assert_eq!(seq.insert(0.0).unwrap(), EditOutcome::Ignored);
        assert_eq!(seq.insert(1.0).unwrap(), EditOutcome::Ignored);
        assert_eq!(seq.insert(-0.2).unwrap(), EditOutcome::Ignored);
        assert_eq!(seq.insert(f32::NAN).unwrap(), EditOutcome::Ignored);
        assert_eq!(seq.insert(0.5).unwrap(), EditOutcome::Ignored);
        assert_eq!(seq, opacity_ramp());
    }

    #[test]
    fn test_insert_with_clamps_value() {
        let mut seq = opacity_ramp();
        let outcome = seq.insert_with(0.6, 3.0).unwrap();
        assert_eq!(outcome, EditOutcome::Applied { index: 3 });
        assert_eq!(seq.get(3).unwrap().alpha, 1.0);
    }

    #[test]
    fn test_insert_then_remove_restores_sequence() {
        let original = default_colors();
        let mut seq = original.clone();
        for p in [0.05, 0.31, 0.45, 0.99] {
            let EditOutcome::Applied { index } = seq.insert(p).unwrap() else {
                panic!("insert at {p} ignored");
            };
            seq.remove(index).unwrap();
            assert_eq!(seq, original);
        }
    }

    #[test]
    fn test_remove_boundary_is_ignored() {
        let mut seq = opacity_ramp();
        assert_eq!(seq.remove(0).unwrap(), EditOutcome::Ignored);
        assert_eq!(seq.remove(seq.len() - 1).unwrap(), EditOutcome::Ignored);
        assert_eq!(seq, opacity_ramp());
    }

    #[test]
    fn test_remove_out_of_range_is_error() {
        let mut seq = opacity_ramp();
        let err = seq.remove(9).unwrap_err();
        assert!(matches!(err, TfnError::InvalidIndex { index: 9, len: 5 }));
    }

    #[test]
    fn test_move_clamps_between_neighbours() {
        let mut seq = opacity_ramp();
        seq.move_point(2, 0.9, 0.5).unwrap();
        let moved = seq.get(2).unwrap().position;
        assert!(moved > 0.25 && moved < 0.75, "moved to {moved}");
        assert_strictly_sorted(&seq);

        seq.move_point(2, -4.0, 0.5).unwrap();
        let moved = seq.get(2).unwrap().position;
        assert!(moved > 0.25 && moved < 0.75, "moved to {moved}");
        assert_strictly_sorted(&seq);
    }

    #[test]
    fn test_move_never_breaks_order_for_any_delta() {
        let mut seq = default_colors();
        seq.insert(0.45).unwrap();
        let deltas = [-2.0, -0.3, -0.01, 0.0, 0.02, 0.15, 0.5, 3.0];
        for _ in 0..4 {
            for index in 0..seq.len() {
                for delta in deltas {
                    let point = *seq.get(index).unwrap();
                    seq.move_point(index, point.position + delta, point.rgb).unwrap();
                    assert_strictly_sorted(&seq);
                }
            }
        }
    }

    #[test]
    fn test_move_boundary_keeps_position() {
        let mut seq = opacity_ramp();
        let outcome = seq.move_point(0, 0.4, 0.8).unwrap();
        assert_eq!(outcome, EditOutcome::Applied { index: 0 });
        assert_eq!(seq.get(0).unwrap().position, 0.0);
        assert_eq!(seq.get(0).unwrap().alpha, 0.8);

        let last = seq.len() - 1;
        seq.move_point(last, 0.1, 0.2).unwrap();
        assert_eq!(seq.get(last).unwrap().position, 1.0);
        assert_eq!(seq.get(last).unwrap().alpha, 0.2);
    }

    #[test]
    fn test_move_unchanged_is_ignored() {
        let mut seq = opacity_ramp();
        assert_eq!(seq.move_point(1, 0.25, 0.25).unwrap(), EditOutcome::Ignored);
    }

    #[test]
    fn test_move_rejects_non_finite() {
        let mut seq = opacity_ramp();
        let err = seq.move_point(1, f32::INFINITY, 0.5).unwrap_err();
        assert!(matches!(err, TfnError::InvalidArgument(_)));
    }

    #[test]
    fn test_bake_inclusive_hits_both_ends() {
        let seq = opacity_ramp();
        let values = seq.bake(5, SampleSpacing::Inclusive);
        assert_eq!(values.len(), 5);
        for (k, v) in values.iter().enumerate() {
            assert!((v - k as f32 * 0.25).abs() < EPSILON);
        }
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let bad = r#"[{"position":0.0,"alpha":0.0}]"#;
        assert!(serde_json::from_str::<OpacityPoints>(bad).is_err());

        let good = r#"[{"position":0.0,"alpha":0.0},{"position":1.0,"alpha":1.0}]"#;
        let seq: OpacityPoints = serde_json::from_str(good).unwrap();
        assert_eq!(seq.len(), 2);
    }
}
