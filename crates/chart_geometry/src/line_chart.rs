//! Line chart
//!
//! Point coordinates from the line engine are relative to the graph's top
//! edge; the chart shifts them below a small top inset so strokes at the
//! maximum are not clipped.

use crate::chart::{accept_layout, format_value, text_baseline, ChartKind, ChartView, IndexListener};
use crate::error::ChartResult;
use crate::geometry::{Point, Rect, Size};
use crate::legend::{layout_legend, EstimatedTextMeasurer};
use crate::line::{layout_custom_legend, layout_series, layout_standard_values, point_at, LineScale};
use crate::model::{LegendLabel, LineSeries, StandardValue};
use crate::render::{Drawable, TextAnchor};
use crate::settings::{ChartSettings, LegendSettings, LineSettings};

/// Multi-series line chart
pub struct LineChart {
    series: Vec<LineSeries>,
    custom_legend: Vec<LegendLabel>,
    standard_values: Vec<StandardValue>,
    settings: LineSettings,
    legend: LegendSettings,
    scale: LineScale,
    size: Size,
    graph: Rect,
    drawable: bool,
    focused: Option<usize>,
    on_point_focus: Option<IndexListener>,
}

impl LineChart {
    pub fn new(settings: &ChartSettings) -> Self {
        Self {
            series: Vec::new(),
            custom_legend: Vec::new(),
            standard_values: settings.line.standard_values.clone(),
            settings: settings.line.clone(),
            legend: settings.legend.clone(),
            scale: LineScale::default(),
            size: Size::default(),
            graph: Rect::default(),
            drawable: false,
            focused: None,
            on_point_focus: None,
        }
    }

    pub fn series(&self) -> &[LineSeries] {
        &self.series
    }

    pub fn scale(&self) -> &LineScale {
        &self.scale
    }

    pub fn standard_values(&self) -> &[StandardValue] {
        &self.standard_values
    }

    pub fn custom_legend(&self) -> &[LegendLabel] {
        &self.custom_legend
    }

    /// Graph area in widget coordinates
    pub fn graph(&self) -> Rect {
        self.graph
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn add_series(&mut self, series: LineSeries) {
        self.series.push(series);
        self.relayout();
    }

    /// Replace all series at once
    pub fn set_series(&mut self, series: Vec<LineSeries>) {
        self.series = series;
        self.relayout();
    }

    pub fn clear(&mut self) {
        self.series.clear();
        self.relayout();
    }

    /// Use these labels under the graph instead of the first series' point labels
    pub fn set_custom_legend(&mut self, labels: Vec<LegendLabel>) {
        self.custom_legend = labels;
        self.relayout();
    }

    pub fn add_standard_value(&mut self, value: StandardValue) {
        self.standard_values.push(value);
        self.relayout();
    }

    pub fn set_standard_values(&mut self, values: Vec<StandardValue>) {
        self.standard_values = values;
        self.relayout();
    }

    pub fn set_settings(&mut self, settings: LineSettings) {
        self.settings = settings;
        self.relayout();
    }

    pub fn set_cubic(&mut self, cubic: bool) {
        self.settings.cubic = cubic;
        self.relayout();
    }

    pub fn set_curve_smoothness(&mut self, smoothness: f64) {
        self.settings.curve_smoothness = smoothness;
        self.relayout();
    }

    pub fn set_dynamic_scaling(&mut self, dynamic: bool) {
        self.settings.dynamic_scaling = dynamic;
        self.relayout();
    }

    pub fn set_scaling_factor(&mut self, factor: f64) {
        self.settings.scaling_factor = factor;
        self.relayout();
    }

    pub fn set_on_point_focus_changed(&mut self, listener: impl FnMut(usize) + 'static) {
        self.on_point_focus = Some(Box::new(listener));
    }

    /// Focus a point of the first series; the listener only hears about changes
    pub fn set_focused(&mut self, index: usize) {
        let count = self.series.first().map_or(0, |s| s.points.len());
        if index >= count || self.focused == Some(index) {
            return;
        }
        self.focused = Some(index);
        tracing::debug!(index, "line focus changed");
        if let Some(listener) = self.on_point_focus.as_mut() {
            listener(index);
        }
    }

    fn relayout(&mut self) {
        let count = self.series.first().map_or(0, |s| s.points.len());
        if self.focused.is_some_and(|i| i >= count) {
            self.focused = None;
        }
        let size = self.size;
        if size.is_empty() {
            return;
        }
        if let Err(e) = self.compute_layout(size) {
            tracing::warn!("line chart layout failed: {}", e);
        }
    }

    fn to_widget(&self, point: Point) -> Point {
        Point::new(self.graph.x + point.x, self.graph.y + point.y)
    }

    fn push_grid(&self, out: &mut Vec<Drawable>) {
        for (i, value) in self.scale.axis_values.into_iter().enumerate() {
            let y = self.graph.y + self.scale.axis_y(i);
            out.push(Drawable::Line {
                from: Point::new(self.graph.x, y),
                to: Point::new(self.graph.right(), y),
                stroke: self.settings.axis_line_color,
                stroke_width: 1.0,
            });
            out.push(Drawable::Text {
                position: Point::new(self.graph.x + self.legend.text_margin / 2.0, y - self.legend.text_margin / 2.0),
                text: format_value(value),
                size: self.legend.axis_text_size,
                color: self.legend.text_color,
                anchor: TextAnchor::Start,
            });
        }

        for standard in &self.standard_values {
            let y = self.graph.y + standard.y;
            out.push(Drawable::Line {
                from: Point::new(self.graph.x, y),
                to: Point::new(self.graph.right(), y),
                stroke: standard.color,
                stroke_width: self.settings.line_stroke / 2.0,
            });
        }
    }

    fn push_legend(&self, out: &mut Vec<Drawable>) {
        let labels: Vec<&LegendLabel> = if self.custom_legend.is_empty() {
            self.series
                .first()
                .map(|s| s.points.iter().map(|p| &p.legend).collect())
                .unwrap_or_default()
        } else {
            self.custom_legend.iter().collect()
        };

        for label in labels.into_iter().filter(|l| l.show_label && !l.ignore) {
            out.push(Drawable::Text {
                position: Point::new(label.label_x, text_baseline(label.bounds.center_y(), self.legend.text_size)),
                text: label.text.clone(),
                size: self.legend.text_size,
                color: self.legend.text_color,
                anchor: TextAnchor::Start,
            });
        }
    }

    fn push_focus(&self, out: &mut Vec<Drawable>) {
        let Some(series) = self.series.first() else {
            return;
        };
        let Some(point) = self.focused.and_then(|i| series.points.get(i)) else {
            return;
        };
        let at = self.to_widget(point.coordinates);
        out.push(Drawable::Line {
            from: Point::new(at.x, self.graph.y),
            to: Point::new(at.x, self.graph.bottom()),
            stroke: series.color,
            stroke_width: 1.0,
        });
        out.push(Drawable::Text {
            position: Point::new(at.x, at.y - self.legend.text_margin),
            text: format_value(point.value),
            size: self.legend.text_size,
            color: series.color,
            anchor: TextAnchor::Middle,
        });
    }
}

impl ChartView for LineChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn compute_layout(&mut self, size: Size) -> ChartResult<()> {
        self.size = size;
        let top = self.settings.line_stroke;
        let usable_height = (size.height - self.legend.legend_height - top).max(0.0);
        self.graph = Rect::new(0.0, top, size.width, usable_height);
        let legend_area = Rect::new(0.0, size.height - self.legend.legend_height, size.width, self.legend.legend_height);

        let config = self.settings.config(!self.custom_legend.is_empty());
        let result = layout_series(&mut self.series, size.width, usable_height, legend_area, &config)
            .map(|scale| self.scale = scale);
        self.drawable = accept_layout(ChartKind::Line, result)?;
        if !self.drawable {
            return Ok(());
        }

        layout_standard_values(&mut self.standard_values, &self.scale);

        let measurer = EstimatedTextMeasurer::new(self.legend.text_size);
        if config.custom_legend {
            layout_custom_legend(&mut self.custom_legend, size.width, legend_area);
            layout_legend(&mut self.custom_legend, 0.0, size.width, &measurer, self.legend.text_margin);
        } else if let Some(first) = self.series.first_mut().filter(|s| s.points.len() > 1) {
            layout_legend(&mut first.points, 0.0, size.width, &measurer, self.legend.text_margin);
        }
        Ok(())
    }

    fn produce_drawables(&self, reveal: f64) -> Vec<Drawable> {
        let mut out = Vec::new();
        if !self.drawable {
            return out;
        }

        self.push_grid(&mut out);
        let baseline = self.scale.baseline_y();
        for series in self.series.iter().filter(|s| !s.path.is_empty()) {
            let path = series
                .path
                .scaled_y(baseline, reveal.clamp(0.0, 1.0))
                .translated(self.graph.x, self.graph.y);
            out.push(Drawable::Path {
                data: path.to_svg_data(),
                stroke: series.color,
                stroke_width: self.settings.line_stroke,
            });
        }
        self.push_legend(&mut out);
        if reveal >= 1.0 {
            self.push_focus(&mut out);
        }
        out
    }

    fn hit_test(&self, point: Point) -> Option<usize> {
        if !self.drawable || point.y < 0.0 || point.y > self.size.height {
            return None;
        }
        self.series.first().and_then(|s| point_at(s, point.x - self.graph.x))
    }

    fn handle_tap(&mut self, point: Point) -> Option<usize> {
        let index = self.hit_test(point)?;
        self.set_focused(index);
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, LinePoint};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn flat_settings() -> ChartSettings {
        let mut settings = ChartSettings::default();
        settings.line.line_stroke = 0.0;
        settings
    }

    fn series(values: &[f64]) -> LineSeries {
        values
            .iter()
            .enumerate()
            .fold(LineSeries::new("Series", Color::rgb(0, 0, 200)), |s, (i, &v)| {
                s.with_point(LinePoint::new(format!("P{i}"), v))
            })
    }

    fn paths(drawables: &[Drawable]) -> Vec<String> {
        drawables
            .iter()
            .filter_map(|d| match d {
                Drawable::Path { data, .. } => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_negative_values_lift_zero_line() {
        let mut chart = LineChart::new(&flat_settings());
        chart.add_series(series(&[1.0, -1.0, 2.0]));
        chart.compute_layout(Size::new(300.0, 330.0)).unwrap();

        let scale = chart.scale();
        assert!(scale.has_negative_values);
        assert_eq!(scale.max_value, 3.0);
        assert!(approx(scale.negative_offset, 100.0));

        let ys: Vec<f64> = chart.series()[0].points.iter().map(|p| p.coordinates.y).collect();
        assert!(approx(ys[0], 100.0));
        assert!(approx(ys[1], 300.0));
        assert!(approx(ys[2], 0.0));
    }

    #[test]
    fn test_gridlines_stay_inside_graph_with_negative_values() {
        let mut chart = LineChart::new(&flat_settings());
        chart.add_series(series(&[-30.0, 10.0, 5.0]));
        chart.compute_layout(Size::new(300.0, 230.0)).unwrap();

        let graph = chart.graph();
        let grid: Vec<(f64, String)> = chart
            .produce_drawables(1.0)
            .windows(2)
            .filter_map(|pair| match pair {
                [Drawable::Line { from, .. }, Drawable::Text { text, .. }] => Some((from.y, text.clone())),
                _ => None,
            })
            .collect();

        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|(y, _)| *y >= graph.y && *y <= graph.bottom()));
        assert!(approx(grid[0].0, 150.0));
        assert!(approx(grid[2].0, 50.0));
        assert_eq!(grid[0].1, "10");
    }

    #[test]
    fn test_full_reveal_path_matches_layout() {
        let mut chart = LineChart::new(&flat_settings());
        chart.add_series(series(&[1.3, -0.7, 2.9, 0.1]));
        chart.compute_layout(Size::new(211.0, 187.3)).unwrap();

        let expected = chart.series()[0].path.to_svg_data();
        assert_eq!(paths(&chart.produce_drawables(1.0))[0], expected);
    }

    #[test]
    fn test_reveal_flattens_onto_baseline() {
        let mut chart = LineChart::new(&flat_settings());
        chart.add_series(series(&[1.0, 2.0]));
        chart.compute_layout(Size::new(200.0, 230.0)).unwrap();

        let hidden = paths(&chart.produce_drawables(0.0));
        assert_eq!(hidden, vec!["M 0 200 L 200 200".to_string()]);
        let full = paths(&chart.produce_drawables(1.0));
        assert_eq!(full, vec!["M 0 100 L 200 0".to_string()]);
    }

    #[test]
    fn test_top_inset_shifts_path() {
        let mut chart = LineChart::new(&ChartSettings::default());
        chart.add_series(series(&[0.0, 1.0]));
        chart.compute_layout(Size::new(100.0, 133.0)).unwrap();

        assert_eq!(chart.graph(), Rect::new(0.0, 3.0, 100.0, 100.0));
        assert_eq!(paths(&chart.produce_drawables(1.0)), vec!["M 0 103 L 100 3".to_string()]);
    }

    #[test]
    fn test_cubic_path_keeps_endpoints() {
        let mut chart = LineChart::new(&flat_settings());
        chart.set_cubic(true);
        chart.add_series(series(&[1.0, 3.0, 2.0, 4.0]));
        chart.compute_layout(Size::new(400.0, 230.0)).unwrap();

        let path = &chart.series()[0].path;
        assert_eq!(path.segments.len(), 3);
        assert_eq!(path.start, chart.series()[0].points[0].coordinates);
        assert_eq!(path.end(), chart.series()[0].points[3].coordinates);
        assert_eq!(path.end().x, 400.0);
    }

    #[test]
    fn test_point_legend_skips_first_and_last() {
        let mut chart = LineChart::new(&flat_settings());
        chart.add_series(series(&[1.0, 2.0, 3.0, 4.0]));
        chart.compute_layout(Size::new(400.0, 230.0)).unwrap();

        let points = &chart.series()[0].points;
        assert!(points[0].legend.ignore && points[3].legend.ignore);
        assert!(points[1].legend.show_label && points[2].legend.show_label);
        assert_eq!(points[1].legend.bounds.y, 200.0);
    }

    #[test]
    fn test_custom_legend_spreads_labels() {
        let mut chart = LineChart::new(&flat_settings());
        chart.add_series(series(&[1.0, 2.0, 3.0]));
        chart.set_custom_legend(vec![LegendLabel::new("Jan"), LegendLabel::new("Feb")]);
        chart.compute_layout(Size::new(400.0, 230.0)).unwrap();

        let labels = chart.custom_legend();
        assert_eq!(labels[1].bounds, Rect::new(200.0, 200.0, 200.0, 30.0));
        assert!(labels.iter().all(|l| l.show_label));
        assert!(chart.series()[0].points.iter().all(|p| !p.legend.show_label));
    }

    #[test]
    fn test_standard_values_positioned() {
        let mut settings = flat_settings();
        settings.line.standard_values.push(StandardValue::new(1.0, Color::rgb(255, 0, 0)));
        let mut chart = LineChart::new(&settings);
        chart.add_series(series(&[0.0, 4.0]));
        chart.compute_layout(Size::new(200.0, 230.0)).unwrap();

        assert!(approx(chart.standard_values()[0].y, 150.0));
    }

    #[test]
    fn test_point_focus_listener() {
        let mut chart = LineChart::new(&flat_settings());
        chart.add_series(series(&[1.0, 2.0, 3.0]));
        chart.compute_layout(Size::new(300.0, 230.0)).unwrap();
        let focus = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&focus);
        chart.set_on_point_focus_changed(move |i| sink.borrow_mut().push(i));

        // Points sit at 0, 133.3 and 300.
        assert_eq!(chart.handle_tap(Point::new(140.0, 50.0)), Some(1));
        assert_eq!(chart.handle_tap(Point::new(120.0, 50.0)), Some(1));
        assert_eq!(chart.handle_tap(Point::new(290.0, 50.0)), Some(2));
        assert_eq!(*focus.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_no_points_draws_nothing() {
        let mut chart = LineChart::new(&ChartSettings::default());
        chart.add_series(LineSeries::new("Empty", Color::GRAY));
        chart.compute_layout(Size::new(300.0, 230.0)).unwrap();

        assert!(chart.produce_drawables(1.0).is_empty());
        assert_eq!(chart.hit_test(Point::new(10.0, 10.0)), None);
    }
}
