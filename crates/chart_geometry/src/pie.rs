//! Pie layout calculations
//!
//! Slice angles are whole degrees measured clockwise from three o'clock,
//! matching canvas arc conventions with the y axis pointing down.

use crate::error::{ChartError, ChartResult};
use crate::geometry::{Point, Rect};
use crate::model::PieSlice;
use serde::{Deserialize, Serialize};

/// Assign start and end angles proportional to each slice's share of `total`.
///
/// Each sweep is truncated to whole degrees and the last slice always ends
/// at exactly 360, absorbing the truncation error. A non-positive total
/// collapses every slice to zero degrees.
pub fn layout_pie(slices: &mut [PieSlice], total: f64) -> ChartResult<()> {
    if slices.is_empty() {
        return Ok(());
    }

    if !(total > 0.0) {
        for slice in slices.iter_mut() {
            slice.start_angle = 0;
            slice.end_angle = 0;
        }
        return Err(ChartError::DegenerateInput(format!(
            "pie total is {total}, slices collapsed"
        )));
    }

    let last = slices.len() - 1;
    let mut start = 0;
    for (i, slice) in slices.iter_mut().enumerate() {
        slice.start_angle = start;
        slice.end_angle = if i == last {
            360
        } else {
            start + (slice.value * 360.0 / total) as i32
        };
        start = slice.end_angle;
    }
    Ok(())
}

/// Drawing start angle and sweep for a slice at reveal `fraction`.
///
/// Slices unroll from a fixed origin: clockwise they start at
/// `start * f`, counter-clockwise at `360 - end * f`.
pub fn reveal_angles(slice: &PieSlice, fraction: f64, open_clockwise: bool) -> (f64, f64) {
    let sweep = slice.sweep() as f64 * fraction;
    let start = if open_clockwise {
        slice.start_angle as f64 * fraction
    } else {
        360.0 - slice.end_angle as f64 * fraction
    };
    (start, sweep)
}

/// Recompute the highlighted color of every slice
pub fn apply_highlight(slices: &mut [PieSlice], strength: f64) {
    for slice in slices.iter_mut() {
        slice.highlighted_color = slice.color.highlighted(strength);
    }
}

/// Radii and centre of a pie inside its bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PieGeometry {
    pub center: Point,
    pub outer_radius: f64,
    /// Radius of the doughnut cutout, zero for a full pie
    pub inner_radius: f64,
    /// Outer edge of the highlight ring around the cutout
    pub highlight_radius: f64,
}

impl PieGeometry {
    /// `inner_padding` and `outline` are percentages of the outer radius.
    pub fn new(bounds: Rect, padding: f64, inner_padding: f64, outline: f64) -> Self {
        let outer_radius = (bounds.width.min(bounds.height) / 2.0 - padding).max(0.0);
        let inner_radius = outer_radius * inner_padding / 100.0;
        let highlight_radius = if inner_padding > 0.0 {
            (outer_radius * (inner_padding + outline) / 100.0).min(outer_radius)
        } else {
            inner_radius
        };
        Self {
            center: bounds.center(),
            outer_radius,
            inner_radius,
            highlight_radius,
        }
    }
}

/// Clockwise angle in degrees [0, 360) of `point` around `center`
fn angle_of(center: Point, point: Point) -> f64 {
    let degrees = (point.y - center.y).atan2(point.x - center.x).to_degrees();
    degrees.rem_euclid(360.0)
}

/// Index of the slice under `point`, if it lies on the ring.
pub fn slice_at(slices: &[PieSlice], geometry: &PieGeometry, point: Point, open_clockwise: bool) -> Option<usize> {
    let distance = geometry.center.distance_to(point);
    if distance > geometry.outer_radius || distance < geometry.inner_radius {
        return None;
    }

    let mut angle = angle_of(geometry.center, point);
    if !open_clockwise {
        angle = (360.0 - angle).rem_euclid(360.0);
    }
    slices
        .iter()
        .position(|s| angle >= s.start_angle as f64 && angle < s.end_angle as f64)
}
