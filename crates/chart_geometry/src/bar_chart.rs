//! Bar and stacked bar charts
//!
//! Both charts share the same frame: a graph area the bars grow in, a
//! legend strip along the category axis and a scroll viewport used when
//! the bars need more room than the widget has.

use crate::animation::reveal_rect;
use crate::bar::{bar_at, calculate_bar_dimensions, layout_bars, layout_stacked_bars, BarDimensions};
use crate::chart::{accept_layout, format_value, text_baseline, ChartKind, ChartView, IndexListener};
use crate::error::ChartResult;
use crate::geometry::{Point, Rect, Size};
use crate::legend::{layout_legend, layout_legend_rows, EstimatedTextMeasurer, TextMeasurer};
use crate::model::{Bar, HasLegend, Orientation, StackedBar};
use crate::render::{Drawable, TextAnchor};
use crate::settings::{BarSettings, ChartSettings, LegendSettings};
use crate::viewport::ScrollViewport;
use std::ops::Range;

/// Areas shared by bar and stacked bar layouts, in content coordinates
#[derive(Debug, Clone, Default)]
struct BarFrame {
    size: Size,
    dimensions: BarDimensions,
    graph: Rect,
    legend_area: Rect,
    viewport: ScrollViewport,
    drawable: bool,
}

impl BarFrame {
    /// Resolve the areas for `item_count` bars.
    ///
    /// `widest_label` sizes the legend column of horizontal bars and
    /// `reserve` keeps room past the bars' ends for value text.
    fn arrange(
        &mut self,
        size: Size,
        orientation: Orientation,
        settings: &BarSettings,
        legend: &LegendSettings,
        item_count: usize,
        widest_label: f64,
        reserve: f64,
    ) {
        let config = settings.config();
        let content = match orientation {
            Orientation::Vertical => {
                let dims = calculate_bar_dimensions(&config, item_count, size.width);
                let width = dims.content_size.max(size.width);
                let graph_height = (size.height - legend.legend_height - reserve).max(0.0);
                self.dimensions = dims;
                self.graph = Rect::new(0.0, reserve, width, graph_height);
                self.legend_area = Rect::new(0.0, reserve + graph_height, width, legend.legend_height);
                Size::new(width, size.height)
            }
            Orientation::Horizontal => {
                let dims = calculate_bar_dimensions(&config, item_count, size.height);
                let height = dims.content_size.max(size.height);
                let legend_width = (widest_label + 2.0 * legend.text_margin).min(size.width / 2.0);
                let graph_width = (size.width - legend_width - reserve).max(0.0);
                self.dimensions = dims;
                self.graph = Rect::new(legend_width, 0.0, graph_width, height);
                self.legend_area = Rect::new(0.0, 0.0, legend_width, height);
                Size::new(size.width, height)
            }
        };

        self.size = size;
        self.viewport.set_content_size(content);
        self.viewport.set_viewport_size(size);
    }

    /// Indices of the slots inside the viewport
    fn visible<T: HasLegend>(&self, entries: &[T]) -> Range<usize> {
        let slots: Vec<Rect> = entries.iter().map(|e| e.legend().bounds).collect();
        self.viewport.visible_range(&slots)
    }

    fn scroll_offset(&self) -> Point {
        self.viewport.offset()
    }
}

fn measurer(legend: &LegendSettings) -> EstimatedTextMeasurer {
    EstimatedTextMeasurer::new(legend.text_size)
}

fn widest<'a>(measurer: &impl TextMeasurer, texts: impl Iterator<Item = &'a str>) -> f64 {
    texts.map(|t| measurer.text_width(t)).fold(0.0, f64::max)
}

fn layout_labels<T: HasLegend>(entries: &mut [T], frame: &BarFrame, orientation: Orientation, legend: &LegendSettings) {
    let measurer = measurer(legend);
    match orientation {
        Orientation::Vertical => layout_legend(
            entries,
            frame.legend_area.x,
            frame.legend_area.right(),
            &measurer,
            legend.text_margin,
        ),
        Orientation::Horizontal => layout_legend_rows(entries, &measurer, legend.text_margin),
    }
}

fn push_labels<T: HasLegend>(out: &mut Vec<Drawable>, entries: &[T], offset: Point, legend: &LegendSettings) {
    for label in entries.iter().map(|e| e.legend()).filter(|l| l.show_label && !l.ignore) {
        out.push(Drawable::Text {
            position: Point::new(
                label.label_x - offset.x,
                text_baseline(label.bounds.center_y(), legend.text_size) - offset.y,
            ),
            text: label.text.clone(),
            size: legend.text_size,
            color: legend.text_color,
            anchor: TextAnchor::Start,
        });
    }
}

/// Grow a rectangle from the graph's baseline rather than its own edge
fn scale_from_baseline(rect: Rect, orientation: Orientation, graph: &Rect, fraction: f64) -> Rect {
    if fraction >= 1.0 {
        return rect;
    }
    let fraction = fraction.max(0.0);
    match orientation {
        Orientation::Vertical => {
            let baseline = graph.bottom();
            Rect::new(rect.x, baseline - (baseline - rect.y) * fraction, rect.width, rect.height * fraction)
        }
        Orientation::Horizontal => {
            let baseline = graph.x;
            Rect::new(baseline + (rect.x - baseline) * fraction, rect.y, rect.width * fraction, rect.height)
        }
    }
}

/// Simple bar chart
pub struct BarChart {
    bars: Vec<Bar>,
    orientation: Orientation,
    settings: BarSettings,
    legend: LegendSettings,
    frame: BarFrame,
    on_bar_click: Option<IndexListener>,
}

impl BarChart {
    pub fn new(settings: &ChartSettings) -> Self {
        Self {
            bars: Vec::new(),
            orientation: Orientation::Vertical,
            settings: settings.bar.clone(),
            legend: settings.legend.clone(),
            frame: BarFrame::default(),
            on_bar_click: None,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn settings(&self) -> &BarSettings {
        &self.settings
    }

    pub fn viewport(&self) -> &ScrollViewport {
        &self.frame.viewport
    }

    /// Graph area in content coordinates
    pub fn graph(&self) -> Rect {
        self.frame.graph
    }

    pub fn dimensions(&self) -> BarDimensions {
        self.frame.dimensions
    }

    pub fn add_bar(&mut self, bar: Bar) {
        self.bars.push(bar);
        self.relayout();
    }

    /// Replace all bars at once
    pub fn set_bars(&mut self, bars: Vec<Bar>) {
        self.bars = bars;
        self.relayout();
    }

    pub fn clear(&mut self) {
        self.bars.clear();
        self.relayout();
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.relayout();
    }

    pub fn set_settings(&mut self, settings: BarSettings) {
        self.settings = settings;
        self.relayout();
    }

    pub fn set_legend_settings(&mut self, legend: LegendSettings) {
        self.legend = legend;
        self.relayout();
    }

    pub fn set_bar_width(&mut self, width: f64) {
        self.settings.bar_width = width;
        self.relayout();
    }

    pub fn set_bar_margin(&mut self, margin: f64) {
        self.settings.bar_margin = margin;
        self.relayout();
    }

    pub fn set_fixed_bar_width(&mut self, fixed: bool) {
        self.settings.fixed_bar_width = fixed;
        self.relayout();
    }

    pub fn set_visible_bars(&mut self, count: usize) {
        self.settings.visible_bars = count;
        self.relayout();
    }

    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.settings.scroll_enabled = enabled;
        self.relayout();
    }

    pub fn set_show_values(&mut self, show: bool) {
        self.settings.show_values = show;
        self.relayout();
    }

    pub fn set_on_bar_click(&mut self, listener: impl FnMut(usize) + 'static) {
        self.on_bar_click = Some(Box::new(listener));
    }

    /// Scroll by a drag delta; ignored unless scrolling is enabled
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        if self.settings.scroll_enabled {
            self.frame.viewport.scroll_by(dx, dy);
        }
    }

    fn value_reserve(&self) -> f64 {
        if !self.settings.show_values {
            return 0.0;
        }
        match self.orientation {
            Orientation::Vertical => self.settings.value_text_size + self.legend.text_margin,
            Orientation::Horizontal => {
                let measurer = EstimatedTextMeasurer::new(self.settings.value_text_size);
                let values: Vec<String> = self.bars.iter().map(|b| format_value(b.value)).collect();
                widest(&measurer, values.iter().map(String::as_str)) + self.legend.text_margin
            }
        }
    }

    fn relayout(&mut self) {
        let size = self.frame.size;
        if size.is_empty() {
            return;
        }
        if let Err(e) = self.compute_layout(size) {
            tracing::warn!("bar chart layout failed: {}", e);
        }
    }
}

impl ChartView for BarChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn compute_layout(&mut self, size: Size) -> ChartResult<()> {
        let reserve = self.value_reserve();
        let widest_label = widest(&measurer(&self.legend), self.bars.iter().map(|b| b.legend.text.as_str()));
        self.frame.arrange(
            size,
            self.orientation,
            &self.settings,
            &self.legend,
            self.bars.len(),
            widest_label,
            reserve,
        );

        let result = layout_bars(
            &mut self.bars,
            self.orientation,
            &self.frame.dimensions,
            self.frame.graph,
            self.frame.legend_area,
            self.settings.show_values.then_some(reserve),
        );
        self.frame.drawable = accept_layout(ChartKind::Bar, result)? && !self.bars.is_empty();
        layout_labels(&mut self.bars, &self.frame, self.orientation, &self.legend);
        Ok(())
    }

    fn produce_drawables(&self, reveal: f64) -> Vec<Drawable> {
        let mut out = Vec::new();
        if !self.frame.drawable {
            return out;
        }

        let offset = self.frame.scroll_offset();
        let visible = &self.bars[self.frame.visible(&self.bars)];
        for bar in visible {
            let body = reveal_rect(bar.bounds, self.orientation, reveal).translate(-offset.x, -offset.y);
            out.push(Drawable::Rect {
                bounds: body,
                fill: bar.color,
            });

            if let Some(label) = bar.value_label {
                let size = self.settings.value_text_size;
                let (position, anchor) = match self.orientation {
                    Orientation::Vertical => (
                        Point::new(body.center_x(), text_baseline(body.y - label.height / 2.0, size)),
                        TextAnchor::Middle,
                    ),
                    Orientation::Horizontal => (
                        Point::new(
                            body.right() + self.legend.text_margin / 2.0,
                            text_baseline(body.center_y(), size),
                        ),
                        TextAnchor::Start,
                    ),
                };
                out.push(Drawable::Text {
                    position,
                    text: format_value(bar.value),
                    size,
                    color: self.legend.text_color,
                    anchor,
                });
            }
        }

        push_labels(&mut out, visible, offset, &self.legend);
        out
    }

    fn hit_test(&self, point: Point) -> Option<usize> {
        if !self.frame.drawable {
            return None;
        }
        let point = self.frame.viewport.to_content(point);
        bar_at(self.bars.iter().map(|b| &b.bounds), point, self.orientation, &self.frame.graph)
    }

    fn handle_tap(&mut self, point: Point) -> Option<usize> {
        let index = self.hit_test(point)?;
        tracing::debug!(index, "bar clicked");
        if let Some(listener) = self.on_bar_click.as_mut() {
            listener(index);
        }
        Some(index)
    }
}

/// Stacked bar chart
pub struct StackedBarChart {
    stacks: Vec<StackedBar>,
    orientation: Orientation,
    settings: BarSettings,
    legend: LegendSettings,
    frame: BarFrame,
    on_bar_click: Option<IndexListener>,
}

impl StackedBarChart {
    pub fn new(settings: &ChartSettings) -> Self {
        Self {
            stacks: Vec::new(),
            orientation: Orientation::Vertical,
            settings: settings.bar.clone(),
            legend: settings.legend.clone(),
            frame: BarFrame::default(),
            on_bar_click: None,
        }
    }

    pub fn stacks(&self) -> &[StackedBar] {
        &self.stacks
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn viewport(&self) -> &ScrollViewport {
        &self.frame.viewport
    }

    /// Graph area in content coordinates
    pub fn graph(&self) -> Rect {
        self.frame.graph
    }

    pub fn add_stack(&mut self, stack: StackedBar) {
        self.stacks.push(stack);
        self.relayout();
    }

    /// Replace all stacks at once
    pub fn set_stacks(&mut self, stacks: Vec<StackedBar>) {
        self.stacks = stacks;
        self.relayout();
    }

    pub fn clear(&mut self) {
        self.stacks.clear();
        self.relayout();
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.relayout();
    }

    pub fn set_settings(&mut self, settings: BarSettings) {
        self.settings = settings;
        self.relayout();
    }

    pub fn set_legend_settings(&mut self, legend: LegendSettings) {
        self.legend = legend;
        self.relayout();
    }

    pub fn set_show_values(&mut self, show: bool) {
        self.settings.show_values = show;
        self.relayout();
    }

    pub fn set_on_bar_click(&mut self, listener: impl FnMut(usize) + 'static) {
        self.on_bar_click = Some(Box::new(listener));
    }

    /// Scroll by a drag delta; ignored unless scrolling is enabled
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        if self.settings.scroll_enabled {
            self.frame.viewport.scroll_by(dx, dy);
        }
    }

    fn relayout(&mut self) {
        let size = self.frame.size;
        if size.is_empty() {
            return;
        }
        if let Err(e) = self.compute_layout(size) {
            tracing::warn!("stacked bar chart layout failed: {}", e);
        }
    }
}

impl ChartView for StackedBarChart {
    fn kind(&self) -> ChartKind {
        ChartKind::StackedBar
    }

    fn compute_layout(&mut self, size: Size) -> ChartResult<()> {
        let widest_label = widest(&measurer(&self.legend), self.stacks.iter().map(|s| s.legend.text.as_str()));
        self.frame.arrange(
            size,
            self.orientation,
            &self.settings,
            &self.legend,
            self.stacks.len(),
            widest_label,
            0.0,
        );

        // Segment values sit inside the segment, so nothing is reserved.
        let label_extent = match self.orientation {
            Orientation::Vertical => self.settings.value_text_size + self.legend.text_margin,
            Orientation::Horizontal => {
                let measurer = EstimatedTextMeasurer::new(self.settings.value_text_size);
                let values: Vec<String> = self
                    .stacks
                    .iter()
                    .flat_map(|s| s.segments.iter().map(|seg| format_value(seg.value)))
                    .collect();
                widest(&measurer, values.iter().map(String::as_str)) + self.legend.text_margin
            }
        };

        let result = layout_stacked_bars(
            &mut self.stacks,
            self.orientation,
            &self.frame.dimensions,
            self.frame.graph,
            self.frame.legend_area,
            self.settings.show_values.then_some(label_extent),
        );
        // A single empty stack does not make the whole chart blank.
        let complete = accept_layout(ChartKind::StackedBar, result)?;
        self.frame.drawable = complete || self.stacks.iter().any(|s| s.total() > 0.0);
        layout_labels(&mut self.stacks, &self.frame, self.orientation, &self.legend);
        Ok(())
    }

    fn produce_drawables(&self, reveal: f64) -> Vec<Drawable> {
        let mut out = Vec::new();
        if !self.frame.drawable {
            return out;
        }

        let offset = self.frame.scroll_offset();
        let graph = self.frame.graph;
        let visible = &self.stacks[self.frame.visible(&self.stacks)];
        for stack in visible {
            for segment in &stack.segments {
                let body = scale_from_baseline(segment.bounds, self.orientation, &graph, reveal)
                    .translate(-offset.x, -offset.y);
                out.push(Drawable::Rect {
                    bounds: body,
                    fill: segment.color,
                });

                if reveal >= 1.0 && segment.value_label.is_some() {
                    let size = self.settings.value_text_size;
                    out.push(Drawable::Text {
                        position: Point::new(body.center_x(), text_baseline(body.center_y(), size)),
                        text: format_value(segment.value),
                        size,
                        color: self.legend.text_color,
                        anchor: TextAnchor::Middle,
                    });
                }
            }
        }

        push_labels(&mut out, visible, offset, &self.legend);
        out
    }

    fn hit_test(&self, point: Point) -> Option<usize> {
        if !self.frame.drawable {
            return None;
        }
        let point = self.frame.viewport.to_content(point);
        // Slots keep their full thickness even when a stack sums to zero.
        bar_at(self.stacks.iter().map(|s| &s.legend.bounds), point, self.orientation, &self.frame.graph)
    }

    fn handle_tap(&mut self, point: Point) -> Option<usize> {
        let index = self.hit_test(point)?;
        tracing::debug!(index, "stacked bar clicked");
        if let Some(listener) = self.on_bar_click.as_mut() {
            listener(index);
        }
        Some(index)
    }
}
