//! Chart model types
//!
//! This module defines the records the layout engines work on: bars,
//! stacked bars, pie slices, line series and their legend labels. Callers
//! fill in the data fields; the engines fill in the geometry fields.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (fully opaque)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Convert to hex string (without # prefix)
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to CSS color string
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }

    /// Multiply the HSV value channel by `strength`, keeping hue and saturation.
    ///
    /// Values above 1.0 brighten, values below darken. The value channel is
    /// clamped to 1.0, so a color that is already at full brightness stays put.
    pub fn highlighted(&self, strength: f64) -> Color {
        let max = self.r.max(self.g).max(self.b);
        if max == 0 {
            return *self;
        }
        let value = max as f64 / 255.0;
        let target = (value * strength).clamp(0.0, 1.0);
        let factor = target / value;
        let scale = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        Color::rgba(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    // Predefined colors
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Chart orientation, set explicitly on bar charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Bars grow upwards from the bottom edge
    #[default]
    Vertical,
    /// Bars grow rightwards from the left edge
    Horizontal,
}

/// Legend label state attached to every labelled record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendLabel {
    /// Label text
    pub text: String,
    /// Area the label belongs to; must be set before legend layout runs
    pub bounds: Rect,
    /// Whether the label survived collision avoidance
    pub show_label: bool,
    /// Left x of the label text
    pub label_x: f64,
    /// Measured text rectangle at its final position
    pub text_bounds: Rect,
    /// Excluded from legend layout entirely
    pub ignore: bool,
}

impl LegendLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Records that carry a legend label
pub trait HasLegend {
    fn legend(&self) -> &LegendLabel;
    fn legend_mut(&mut self) -> &mut LegendLabel;
}

impl HasLegend for LegendLabel {
    fn legend(&self) -> &LegendLabel {
        self
    }

    fn legend_mut(&mut self) -> &mut LegendLabel {
        self
    }
}

/// A single bar of a bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub value: f64,
    pub color: Color,
    /// Bar body, computed by layout
    pub bounds: Rect,
    /// Where the value text goes, when values are shown
    pub value_label: Option<Rect>,
    pub legend: LegendLabel,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64, color: Color) -> Self {
        Self {
            value,
            color,
            bounds: Rect::default(),
            value_label: None,
            legend: LegendLabel::new(label),
        }
    }
}

impl HasLegend for Bar {
    fn legend(&self) -> &LegendLabel {
        &self.legend
    }

    fn legend_mut(&mut self) -> &mut LegendLabel {
        &mut self.legend
    }
}

/// One segment of a stacked bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSegment {
    pub value: f64,
    pub color: Color,
    pub bounds: Rect,
    /// Present only if the value text fits inside the segment
    pub value_label: Option<Rect>,
}

impl BarSegment {
    pub fn new(value: f64, color: Color) -> Self {
        Self {
            value,
            color,
            bounds: Rect::default(),
            value_label: None,
        }
    }
}

/// A stack of segments; insertion order is stacking order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedBar {
    pub segments: Vec<BarSegment>,
    pub legend: LegendLabel,
    /// Union of the segment bounds
    pub bounds: Rect,
}

impl StackedBar {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            segments: Vec::new(),
            legend: LegendLabel::new(label),
            bounds: Rect::default(),
        }
    }

    /// Builder-style segment append
    pub fn with_segment(mut self, segment: BarSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn add_segment(&mut self, segment: BarSegment) {
        self.segments.push(segment);
    }

    /// Sum of all segment values
    pub fn total(&self) -> f64 {
        self.segments.iter().map(|s| s.value).sum()
    }
}

impl HasLegend for StackedBar {
    fn legend(&self) -> &LegendLabel {
        &self.legend
    }

    fn legend_mut(&mut self) -> &mut LegendLabel {
        &mut self.legend
    }
}

/// A wedge of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Color,
    /// Derived from `color` and the chart's highlight strength
    pub highlighted_color: Color,
    /// Degrees in [0, 360)
    pub start_angle: i32,
    /// Degrees, the last slice always ends at 360
    pub end_angle: i32,
}

impl PieSlice {
    pub fn new(label: impl Into<String>, value: f64, color: Color) -> Self {
        Self {
            label: label.into(),
            value,
            color,
            highlighted_color: color,
            start_angle: 0,
            end_angle: 0,
        }
    }

    /// Angular extent in degrees
    pub fn sweep(&self) -> i32 {
        self.end_angle - self.start_angle
    }
}

/// A single value of a line series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub value: f64,
    /// Pixel position, computed by layout
    pub coordinates: Point,
    pub legend: LegendLabel,
}

impl LinePoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            value,
            coordinates: Point::default(),
            legend: LegendLabel::new(label),
        }
    }
}

impl HasLegend for LinePoint {
    fn legend(&self) -> &LegendLabel {
        &self.legend
    }

    fn legend_mut(&mut self) -> &mut LegendLabel {
        &mut self.legend
    }
}

/// A path segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PathSegment {
    LineTo { to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
}

impl PathSegment {
    pub fn end(&self) -> Point {
        match *self {
            PathSegment::LineTo { to } | PathSegment::CubicTo { to, .. } => to,
        }
    }

    fn map(&self, f: impl Fn(Point) -> Point) -> PathSegment {
        match *self {
            PathSegment::LineTo { to } => PathSegment::LineTo { to: f(to) },
            PathSegment::CubicTo { c1, c2, to } => PathSegment::CubicTo {
                c1: f(c1),
                c2: f(c2),
                to: f(to),
            },
        }
    }
}

/// A poly-line or cubic path through the points of a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinePath {
    pub start: Point,
    pub segments: Vec<PathSegment>,
}

impl LinePath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last point of the path
    pub fn end(&self) -> Point {
        self.segments.last().map(|s| s.end()).unwrap_or(self.start)
    }

    /// Vertically scale the whole path about `anchor_y`
    pub fn scaled_y(&self, anchor_y: f64, factor: f64) -> LinePath {
        if factor == 1.0 {
            return self.clone();
        }
        let f = |p: Point| p.scale_y_about(anchor_y, factor);
        LinePath {
            start: f(self.start),
            segments: self.segments.iter().map(|s| s.map(f)).collect(),
        }
    }

    /// Shift the whole path
    pub fn translated(&self, dx: f64, dy: f64) -> LinePath {
        let f = |p: Point| Point::new(p.x + dx, p.y + dy);
        LinePath {
            start: f(self.start),
            segments: self.segments.iter().map(|s| s.map(f)).collect(),
        }
    }

    /// SVG path data
    pub fn to_svg_data(&self) -> String {
        let mut d = format!("M {} {}", self.start.x, self.start.y);
        for segment in &self.segments {
            match segment {
                PathSegment::LineTo { to } => d.push_str(&format!(" L {} {}", to.x, to.y)),
                PathSegment::CubicTo { c1, c2, to } => d.push_str(&format!(
                    " C {} {} {} {} {} {}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                )),
            }
        }
        d
    }
}

/// A line chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub label: String,
    pub color: Color,
    pub points: Vec<LinePoint>,
    /// Horizontal spacing between points, computed by layout
    pub width_offset: f64,
    pub path: LinePath,
}

impl LineSeries {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            points: Vec::new(),
            width_offset: 0.0,
            path: LinePath::default(),
        }
    }

    /// Builder-style point append
    pub fn with_point(mut self, point: LinePoint) -> Self {
        self.points.push(point);
        self
    }

    pub fn add_point(&mut self, point: LinePoint) {
        self.points.push(point);
    }
}

/// A horizontal reference line drawn across a line chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardValue {
    pub value: f64,
    pub color: Color,
    /// Pixel y of the line, computed by layout
    #[serde(default)]
    pub y: f64,
}

impl StandardValue {
    pub fn new(value: f64, color: Color) -> Self {
        Self { value, color, y: 0.0 }
    }
}
