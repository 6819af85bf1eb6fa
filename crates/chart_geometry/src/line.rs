//! Line series layout calculations
//!
//! Scales every series of a line chart onto a shared value range, places
//! the points, and builds a straight or smoothed path through them.
//! Negative values shift the whole chart up so that the lowest point sits
//! on the bottom edge and the zero line floats above it.

use crate::error::{ChartError, ChartResult};
use crate::geometry::{Point, Rect};
use crate::model::{LegendLabel, LinePath, LineSeries, PathSegment, StandardValue};
use serde::{Deserialize, Serialize};

/// Options for a line layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Compress the value range to accentuate small fluctuations
    pub dynamic_scaling: bool,
    pub scaling_factor: f64,
    /// Smooth the path with cubic segments
    pub cubic: bool,
    /// Control point weight of the cubic path, 0.0..=1.0
    pub curve_smoothness: f64,
    /// Legend labels are supplied separately instead of coming from points
    pub custom_legend: bool,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            dynamic_scaling: false,
            scaling_factor: 0.96,
            cubic: false,
            curve_smoothness: 0.33,
            custom_legend: false,
        }
    }
}

/// Value range and pixel scale shared by all series of a line chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineScale {
    pub max_value: f64,
    pub min_value: f64,
    /// Most negative data value, zero when there is none
    pub negative_value: f64,
    pub has_negative_values: bool,
    /// Pixels the drawing is lifted by to make room below the zero line
    pub negative_offset: f64,
    pub height_multiplier: f64,
    /// Reference values at 25, 50 and 75 percent of the range
    pub axis_values: [f64; 3],
    pub usable_height: f64,
}

impl LineScale {
    /// Y of the reveal anchor: the bottom edge, or the zero line when values go negative
    pub fn baseline_y(&self) -> f64 {
        self.usable_height - self.negative_offset
    }

    /// Pixel y of `value`
    pub fn y_for(&self, value: f64) -> f64 {
        self.baseline_y() - (value - self.min_value) * self.height_multiplier
    }

    /// Pixel y of the gridline labelled `axis_values[index]`
    pub fn axis_y(&self, index: usize) -> f64 {
        self.usable_height * (1.0 - AXIS_FRACTIONS[index.min(AXIS_FRACTIONS.len() - 1)])
    }
}

/// Heights of the axis gridlines as fractions of the usable height
pub const AXIS_FRACTIONS: [f64; 3] = [0.25, 0.5, 0.75];

/// Scan all series and resolve the shared value scale.
pub fn calculate_scale(series: &[LineSeries], usable_height: f64, config: &LineConfig) -> Option<LineScale> {
    let mut values = series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
    let first = values.next()?;
    let (mut min_value, mut max_value) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let negative_value = min_value.min(0.0);

    if config.dynamic_scaling {
        min_value *= config.scaling_factor;
        max_value *= (1.0 - config.scaling_factor) + 1.0;
    } else {
        min_value = 0.0;
    }

    let has_negative_values = negative_value < 0.0;
    if has_negative_values {
        max_value += negative_value.abs();
        min_value = 0.0;
    }

    let range = max_value - min_value;
    let height_multiplier = if range > 0.0 { usable_height / range } else { 0.0 };
    let axis_values = AXIS_FRACTIONS.map(|fraction| range * fraction + min_value);

    Some(LineScale {
        max_value,
        min_value,
        negative_value,
        has_negative_values,
        negative_offset: negative_value.abs() * height_multiplier,
        height_multiplier,
        axis_values,
        usable_height,
    })
}

/// Lay out every series of a line chart.
///
/// Point legend bounds are written for the first series only, and only
/// when it has more than one point. Without a custom legend the first and
/// last point labels are ignored.
pub fn layout_series(
    series: &mut [LineSeries],
    graph_width: f64,
    usable_height: f64,
    legend_area: Rect,
    config: &LineConfig,
) -> ChartResult<LineScale> {
    let Some(scale) = calculate_scale(series, usable_height, config) else {
        for s in series.iter_mut() {
            s.width_offset = 0.0;
            s.path = LinePath::default();
        }
        return Err(ChartError::DegenerateInput("line chart has no points".to_string()));
    };

    for (index, s) in series.iter_mut().enumerate() {
        let count = s.points.len();
        if count == 0 {
            s.width_offset = 0.0;
            s.path = LinePath::default();
            continue;
        }

        // Inflate the spacing so rounding does not leave the last point short.
        let mut width_offset = graph_width / count as f64;
        width_offset += width_offset / count as f64;
        s.width_offset = width_offset;

        for (i, point) in s.points.iter_mut().enumerate() {
            let mut x = i as f64 * width_offset;
            if count > 1 && i == count - 1 && x < graph_width {
                x = graph_width;
            }
            point.coordinates = Point::new(x, scale.y_for(point.value));
        }

        if index == 0 && count > 1 && !config.custom_legend {
            for (i, point) in s.points.iter_mut().enumerate() {
                let legend = &mut point.legend;
                legend.bounds = Rect::new(
                    point.coordinates.x - width_offset / 2.0,
                    legend_area.y,
                    width_offset,
                    legend_area.height,
                );
                legend.ignore = i == 0 || i == count - 1;
            }
        }

        let coordinates: Vec<Point> = s.points.iter().map(|p| p.coordinates).collect();
        s.path = if config.cubic {
            cubic_path(&coordinates, graph_width, config.curve_smoothness)
        } else {
            straight_path(&coordinates)
        };
        if count < 2 {
            tracing::debug!(series = %s.label, "series has a single point, no path drawn");
        }
    }

    tracing::debug!(
        min = scale.min_value,
        max = scale.max_value,
        negative_offset = scale.negative_offset,
        "line layout computed"
    );
    Ok(scale)
}

/// Poly-line through the points; empty with fewer than two points
pub fn straight_path(points: &[Point]) -> LinePath {
    let Some(&start) = points.first() else {
        return LinePath::default();
    };
    LinePath {
        start,
        segments: points[1..].iter().map(|&to| PathSegment::LineTo { to }).collect(),
    }
}

/// Smoothed cubic path through the points.
///
/// Each segment's control points follow the neighbouring points, scaled
/// by `smoothness` (Catmull-Rom at 1/3). The segment past the last point
/// uses `graph_width` as the far neighbour so the curve never overshoots
/// the right edge. Endpoints are exactly the first and last points.
pub fn cubic_path(points: &[Point], graph_width: f64, smoothness: f64) -> LinePath {
    let Some(&start) = points.first() else {
        return LinePath::default();
    };
    let n = points.len();
    let mut segments = Vec::with_capacity(n.saturating_sub(1));

    for i in 0..n.saturating_sub(1) {
        let p1 = points[i];
        let p2 = points[i + 1];
        let p0 = if i == 0 { p1 } else { points[i - 1] };
        let p3 = if i + 2 < n {
            points[i + 2]
        } else {
            Point::new(graph_width, p2.y)
        };

        let c1 = Point::new(
            p1.x + smoothness * (p2.x - p0.x) / 2.0,
            p1.y + smoothness * (p2.y - p0.y) / 2.0,
        );
        let c2 = Point::new(
            p2.x - smoothness * (p3.x - p1.x) / 2.0,
            p2.y - smoothness * (p3.y - p1.y) / 2.0,
        );
        segments.push(PathSegment::CubicTo { c1, c2, to: p2 });
    }

    LinePath { start, segments }
}

/// Spread caller-supplied legend labels evenly across the graph width
pub fn layout_custom_legend(labels: &mut [LegendLabel], graph_width: f64, legend_area: Rect) {
    if labels.is_empty() {
        return;
    }
    let width = graph_width / labels.len() as f64;
    for (i, label) in labels.iter_mut().enumerate() {
        label.bounds = Rect::new(i as f64 * width, legend_area.y, width, legend_area.height);
    }
}

/// Resolve the pixel y of each reference line
pub fn layout_standard_values(values: &mut [StandardValue], scale: &LineScale) {
    for standard in values.iter_mut() {
        standard.y = scale.y_for(standard.value);
    }
}

/// Index of the point of `series` horizontally closest to `x`
pub fn point_at(series: &LineSeries, x: f64) -> Option<usize> {
    series
        .points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (a.coordinates.x - x).abs();
            let db = (b.coordinates.x - x).abs();
            da.total_cmp(&db)
        })
        .map(|(i, _)| i)
}
