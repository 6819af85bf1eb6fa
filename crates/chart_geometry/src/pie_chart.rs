//! Pie and doughnut chart

use crate::chart::{accept_layout, format_value, text_baseline, ChartKind, ChartView, IndexListener};
use crate::error::ChartResult;
use crate::geometry::{Point, Rect, Size};
use crate::model::PieSlice;
use crate::pie::{apply_highlight, layout_pie, reveal_angles, slice_at, PieGeometry};
use crate::render::{Drawable, TextAnchor};
use crate::settings::{ChartSettings, LegendSettings, PieSettings};

/// Pie chart with an optional doughnut cutout showing the focused slice
pub struct PieChart {
    slices: Vec<PieSlice>,
    settings: PieSettings,
    legend: LegendSettings,
    geometry: PieGeometry,
    size: Size,
    drawable: bool,
    focused: Option<usize>,
    on_item_focus: Option<IndexListener>,
}

impl PieChart {
    pub fn new(settings: &ChartSettings) -> Self {
        Self {
            slices: Vec::new(),
            settings: settings.pie.clone(),
            legend: settings.legend.clone(),
            geometry: PieGeometry::default(),
            size: Size::default(),
            drawable: false,
            focused: None,
            on_item_focus: None,
        }
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    pub fn settings(&self) -> &PieSettings {
        &self.settings
    }

    pub fn geometry(&self) -> PieGeometry {
        self.geometry
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn add_slice(&mut self, slice: PieSlice) {
        self.slices.push(slice);
        self.relayout();
    }

    /// Replace all slices at once
    pub fn set_slices(&mut self, slices: Vec<PieSlice>) {
        self.slices = slices;
        self.relayout();
    }

    pub fn clear(&mut self) {
        self.slices.clear();
        self.relayout();
    }

    pub fn set_settings(&mut self, settings: PieSettings) {
        self.settings = settings;
        self.relayout();
    }

    pub fn set_inner_padding(&mut self, percent: f64) {
        self.settings.inner_padding = percent;
        self.relayout();
    }

    pub fn set_inner_padding_outline(&mut self, percent: f64) {
        self.settings.inner_padding_outline = percent;
        self.relayout();
    }

    pub fn set_highlight_strength(&mut self, strength: f64) {
        self.settings.highlight_strength = strength;
        apply_highlight(&mut self.slices, strength);
    }

    pub fn set_open_clockwise(&mut self, clockwise: bool) {
        self.settings.open_clockwise = clockwise;
    }

    pub fn set_on_item_focus_changed(&mut self, listener: impl FnMut(usize) + 'static) {
        self.on_item_focus = Some(Box::new(listener));
    }

    /// Focus a slice; the listener only hears about actual changes
    pub fn set_focused(&mut self, index: usize) {
        if index >= self.slices.len() || self.focused == Some(index) {
            return;
        }
        self.focused = Some(index);
        tracing::debug!(index, "pie focus changed");
        if let Some(listener) = self.on_item_focus.as_mut() {
            listener(index);
        }
    }

    fn relayout(&mut self) {
        if self.focused.is_some_and(|i| i >= self.slices.len()) {
            self.focused = None;
        }
        let size = self.size;
        if size.is_empty() {
            return;
        }
        if let Err(e) = self.compute_layout(size) {
            tracing::warn!("pie chart layout failed: {}", e);
        }
    }

    fn push_inner_text(&self, out: &mut Vec<Drawable>) {
        let Some(slice) = self.focused.and_then(|i| self.slices.get(i)) else {
            return;
        };
        let center = self.geometry.center;
        let value_size = self.legend.text_size * 2.0;
        let text = self
            .settings
            .inner_value_text
            .clone()
            .unwrap_or_else(|| format_value(slice.value));

        out.push(Drawable::Text {
            position: Point::new(center.x, text_baseline(center.y, value_size)),
            text,
            size: value_size,
            color: slice.color,
            anchor: TextAnchor::Middle,
        });
        out.push(Drawable::Text {
            position: Point::new(center.x, text_baseline(center.y + value_size, self.legend.text_size)),
            text: slice.label.clone(),
            size: self.legend.text_size,
            color: self.legend.text_color,
            anchor: TextAnchor::Middle,
        });
    }
}

impl ChartView for PieChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Pie
    }

    fn compute_layout(&mut self, size: Size) -> ChartResult<()> {
        self.size = size;
        self.geometry = PieGeometry::new(
            Rect::from_size(size),
            self.settings.padding,
            self.settings.inner_padding,
            self.settings.inner_padding_outline,
        );

        let total: f64 = self.slices.iter().map(|s| s.value).sum();
        let result = layout_pie(&mut self.slices, total);
        apply_highlight(&mut self.slices, self.settings.highlight_strength);
        self.drawable =
            accept_layout(ChartKind::Pie, result)? && !self.slices.is_empty() && self.geometry.outer_radius > 0.0;
        Ok(())
    }

    fn produce_drawables(&self, reveal: f64) -> Vec<Drawable> {
        let mut out = Vec::new();
        if !self.drawable {
            return out;
        }

        let geometry = &self.geometry;
        for (i, slice) in self.slices.iter().enumerate() {
            let (start_angle, sweep) = reveal_angles(slice, reveal, self.settings.open_clockwise);
            if sweep <= 0.0 {
                continue;
            }
            let fill = if self.focused == Some(i) {
                slice.highlighted_color
            } else {
                slice.color
            };
            out.push(Drawable::Arc {
                center: geometry.center,
                inner_radius: geometry.highlight_radius,
                outer_radius: geometry.outer_radius,
                start_angle,
                sweep,
                fill,
            });
            if geometry.highlight_radius > geometry.inner_radius {
                out.push(Drawable::Arc {
                    center: geometry.center,
                    inner_radius: geometry.inner_radius,
                    outer_radius: geometry.highlight_radius,
                    start_angle,
                    sweep,
                    fill: slice.highlighted_color,
                });
            }
        }

        if geometry.inner_radius > 0.0 && reveal >= 1.0 {
            self.push_inner_text(&mut out);
        }
        out
    }

    fn hit_test(&self, point: Point) -> Option<usize> {
        if !self.drawable {
            return None;
        }
        slice_at(&self.slices, &self.geometry, point, self.settings.open_clockwise)
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
    use crate::model::Color;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample_chart(settings: &ChartSettings) -> PieChart {
        let mut chart = PieChart::new(settings);
        chart.set_slices(
            [15.0, 25.0, 35.0, 25.0]
                .iter()
                .enumerate()
                .map(|(i, &v)| PieSlice::new(format!("Slice {i}"), v, Color::rgb(100, 50, 0)))
                .collect(),
        );
        chart
    }

    fn arcs(drawables: &[Drawable]) -> Vec<(f64, f64, f64)> {
        drawables
            .iter()
            .filter_map(|d| match d {
                Drawable::Arc {
                    inner_radius,
                    start_angle,
                    sweep,
                    ..
                } => Some((*inner_radius, *start_angle, *sweep)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layout_angles_and_geometry() {
        let mut chart = sample_chart(&ChartSettings::default());
        chart.compute_layout(Size::new(200.0, 300.0)).unwrap();

        let angles: Vec<(i32, i32)> = chart.slices().iter().map(|s| (s.start_angle, s.end_angle)).collect();
        assert_eq!(angles, vec![(0, 54), (54, 144), (144, 270), (270, 360)]);
        assert_eq!(chart.geometry().center, Point::new(100.0, 150.0));
        assert_eq!(chart.geometry().outer_radius, 100.0);
        assert_eq!(chart.geometry().inner_radius, 65.0);
        assert_eq!(chart.geometry().highlight_radius, 70.0);
    }

    #[test]
    fn test_doughnut_draws_slice_and_ring() {
        let mut chart = sample_chart(&ChartSettings::default());
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();

        let full = arcs(&chart.produce_drawables(1.0));
        assert_eq!(full.len(), 8);
        assert_eq!(full[0], (70.0, 0.0, 54.0));
        assert_eq!(full[1], (65.0, 0.0, 54.0));
        assert!(arcs(&chart.produce_drawables(0.0)).is_empty());
    }

    #[test]
    fn test_full_pie_has_no_ring() {
        let mut settings = ChartSettings::default();
        settings.pie.inner_padding = 0.0;
        let mut chart = sample_chart(&settings);
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();

        let full = arcs(&chart.produce_drawables(1.0));
        assert_eq!(full.len(), 4);
        assert!(full.iter().all(|(inner, _, _)| *inner == 0.0));
    }

    #[test]
    fn test_counter_clockwise_reveal() {
        let mut settings = ChartSettings::default();
        settings.pie.open_clockwise = false;
        let mut chart = sample_chart(&settings);
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();

        let full = arcs(&chart.produce_drawables(1.0));
        assert_eq!((full[0].1, full[0].2), (306.0, 54.0));
        let half = arcs(&chart.produce_drawables(0.5));
        assert_eq!((half[0].1, half[0].2), (333.0, 27.0));
    }

    #[test]
    fn test_focus_listener_fires_on_change_only() {
        let mut chart = sample_chart(&ChartSettings::default());
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();
        let focus = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&focus);
        chart.set_on_item_focus_changed(move |i| sink.borrow_mut().push(i));

        // On the ring, just below three o'clock: slice 0.
        let point = Point::new(185.0, 105.0);
        assert_eq!(chart.handle_tap(point), Some(0));
        assert_eq!(chart.handle_tap(point), Some(0));
        // The cutout is not part of any slice.
        assert_eq!(chart.handle_tap(Point::new(100.0, 100.0)), None);
        chart.set_focused(2);

        assert_eq!(*focus.borrow(), vec![0, 2]);
        assert_eq!(chart.focused(), Some(2));
    }

    #[test]
    fn test_inner_text_shows_focused_value() {
        let mut chart = sample_chart(&ChartSettings::default());
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();
        chart.set_focused(2);

        let texts: Vec<String> = chart
            .produce_drawables(1.0)
            .into_iter()
            .filter_map(|d| match d {
                Drawable::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["35".to_string(), "Slice 2".to_string()]);
    }

    #[test]
    fn test_highlight_strength_recolors() {
        let mut chart = sample_chart(&ChartSettings::default());
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();
        chart.set_highlight_strength(2.0);

        assert!(chart.slices().iter().all(|s| s.highlighted_color == Color::rgb(200, 100, 0)));
    }

    #[test]
    fn test_zero_total_draws_nothing() {
        let mut chart = PieChart::new(&ChartSettings::default());
        chart.set_slices(vec![PieSlice::new("A", 0.0, Color::GRAY)]);
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();

        assert!(chart.produce_drawables(1.0).is_empty());
        assert_eq!(chart.hit_test(Point::new(190.0, 100.0)), None);
    }

    #[test]
    fn test_clear_drops_focus() {
        let mut chart = sample_chart(&ChartSettings::default());
        chart.compute_layout(Size::new(200.0, 200.0)).unwrap();
        chart.set_focused(3);
        chart.clear();

        assert_eq!(chart.focused(), None);
        assert!(chart.produce_drawables(1.0).is_empty());
    }
}
