//! Chart components
//!
//! A chart owns its data and settings, recomputes its layout whenever
//! either changes, and describes a frame as drawables for a given reveal
//! value. Layout problems that only mean "nothing to show" are logged and
//! produce an empty frame.

use crate::bar_chart::{BarChart, StackedBarChart};
use crate::error::ChartResult;
use crate::geometry::{Point, Size};
use crate::line_chart::LineChart;
use crate::pie_chart::PieChart;
use crate::render::Drawable;
use serde::{Deserialize, Serialize};

/// Chart family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    StackedBar,
    Pie,
    Line,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::StackedBar => "stacked_bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
        }
    }
}

/// Listener receiving the index of a tapped or focused item
pub type IndexListener = Box<dyn FnMut(usize)>;

/// Common surface of every chart
pub trait ChartView {
    fn kind(&self) -> ChartKind;

    /// Recompute all geometry for a widget of `size`
    fn compute_layout(&mut self, size: Size) -> ChartResult<()>;

    /// Drawables of one frame; `reveal` runs from 0 (hidden) to 1 (complete)
    fn produce_drawables(&self, reveal: f64) -> Vec<Drawable>;

    /// Index of the item under `point`, in widget coordinates
    fn hit_test(&self, point: Point) -> Option<usize>;

    /// Hit test and notify the chart's listener. Returns the hit index.
    fn handle_tap(&mut self, point: Point) -> Option<usize>;
}

/// Any of the chart types, dispatching to the concrete chart
pub enum AnyChart {
    Bar(BarChart),
    StackedBar(StackedBarChart),
    Pie(PieChart),
    Line(LineChart),
}

impl AnyChart {
    fn view(&self) -> &dyn ChartView {
        match self {
            AnyChart::Bar(chart) => chart,
            AnyChart::StackedBar(chart) => chart,
            AnyChart::Pie(chart) => chart,
            AnyChart::Line(chart) => chart,
        }
    }

    fn view_mut(&mut self) -> &mut dyn ChartView {
        match self {
            AnyChart::Bar(chart) => chart,
            AnyChart::StackedBar(chart) => chart,
            AnyChart::Pie(chart) => chart,
            AnyChart::Line(chart) => chart,
        }
    }
}

impl ChartView for AnyChart {
    fn kind(&self) -> ChartKind {
        self.view().kind()
    }

    fn compute_layout(&mut self, size: Size) -> ChartResult<()> {
        self.view_mut().compute_layout(size)
    }

    fn produce_drawables(&self, reveal: f64) -> Vec<Drawable> {
        self.view().produce_drawables(reveal)
    }

    fn hit_test(&self, point: Point) -> Option<usize> {
        self.view().hit_test(point)
    }

    fn handle_tap(&mut self, point: Point) -> Option<usize> {
        self.view_mut().handle_tap(point)
    }
}

impl From<BarChart> for AnyChart {
    fn from(chart: BarChart) -> Self {
        AnyChart::Bar(chart)
    }
}

impl From<StackedBarChart> for AnyChart {
    fn from(chart: StackedBarChart) -> Self {
        AnyChart::StackedBar(chart)
    }
}

impl From<PieChart> for AnyChart {
    fn from(chart: PieChart) -> Self {
        AnyChart::Pie(chart)
    }
}

impl From<LineChart> for AnyChart {
    fn from(chart: LineChart) -> Self {
        AnyChart::Line(chart)
    }
}

/// Swallow a degenerate-input error after logging it.
///
/// Returns whether the layout is drawable.
pub(crate) fn accept_layout(kind: ChartKind, result: ChartResult<()>) -> ChartResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_degenerate() => {
            tracing::debug!(chart = kind.name(), "nothing to draw: {}", e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Value text with at most two decimals
pub fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// Baseline y that vertically centres text of `size` on `center_y`
pub(crate) fn text_baseline(center_y: f64, size: f64) -> f64 {
    center_y + size / 3.0
}
