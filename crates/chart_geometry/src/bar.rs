//! Bar layout calculations
//!
//! Computes bar sizes and margins (fixed or dynamic width) and the
//! rectangles of simple and stacked bars for either orientation.

use crate::error::{ChartError, ChartResult};
use crate::geometry::{Point, Rect};
use crate::model::{Bar, Orientation, StackedBar};
use serde::{Deserialize, Serialize};

/// Sizing options for a bar layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    /// Keep `bar_width` and derive the margin instead
    pub fixed_bar_width: bool,
    pub bar_width: f64,
    pub bar_margin: f64,
    /// Bars per viewport when scrolling is enabled
    pub visible_bars: usize,
    pub scroll_enabled: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            fixed_bar_width: false,
            bar_width: 32.0,
            bar_margin: 12.0,
            visible_bars: 6,
            scroll_enabled: false,
        }
    }
}

/// Resolved bar sizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BarDimensions {
    /// Bar thickness across the category axis
    pub bar_size: f64,
    /// Gap between neighbouring bars
    pub margin: f64,
    /// Length of the category axis needed for all bars
    pub content_size: f64,
}

impl BarDimensions {
    /// Distance from one bar to the next
    pub fn stride(&self) -> f64 {
        self.bar_size + self.margin
    }
}

/// Resolve bar size and margin for `item_count` bars along `available` pixels.
pub fn calculate_bar_dimensions(config: &BarConfig, item_count: usize, available: f64) -> BarDimensions {
    if item_count == 0 {
        return BarDimensions {
            bar_size: 0.0,
            margin: config.bar_margin,
            content_size: available,
        };
    }

    if !config.fixed_bar_width {
        let bar_size = (available / item_count as f64 - config.bar_margin).max(0.0);
        // Margins alone may overflow once the bars have shrunk to nothing.
        let content_size = if bar_size > 0.0 {
            available
        } else {
            (config.bar_margin * item_count as f64).max(available)
        };
        return BarDimensions {
            bar_size,
            margin: config.bar_margin,
            content_size,
        };
    }

    // The visible count only shapes the margin; all bars are still placed.
    let count = if config.scroll_enabled && config.visible_bars > 0 {
        item_count.min(config.visible_bars)
    } else {
        item_count
    };
    let margin = (available - config.bar_width * count as f64) / count as f64;
    BarDimensions {
        bar_size: config.bar_width,
        margin,
        content_size: (config.bar_width + margin) * item_count as f64,
    }
}

/// Value axis extent of the graph for an orientation
fn value_extent(graph: &Rect, orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Vertical => graph.height,
        Orientation::Horizontal => graph.width,
    }
}

/// Start of the first bar slot along the category axis
fn first_slot(graph: &Rect, orientation: Orientation, dims: &BarDimensions) -> f64 {
    let origin = match orientation {
        Orientation::Vertical => graph.x,
        Orientation::Horizontal => graph.y,
    };
    origin + dims.margin / 2.0
}

/// Bar body growing from the baseline of `graph`, offset `start` along the value axis
fn body_rect(graph: &Rect, orientation: Orientation, pos: f64, size: f64, start: f64, length: f64) -> Rect {
    match orientation {
        Orientation::Vertical => Rect::new(pos, graph.bottom() - start - length, size, length),
        Orientation::Horizontal => Rect::new(graph.x + start, pos, length, size),
    }
}

/// Legend slot of a bar at `pos`
fn legend_rect(legend_area: &Rect, orientation: Orientation, pos: f64, size: f64) -> Rect {
    match orientation {
        Orientation::Vertical => Rect::new(pos, legend_area.y, size, legend_area.height),
        Orientation::Horizontal => Rect::new(legend_area.x, pos, legend_area.width, size),
    }
}

/// Lay out simple bars.
///
/// Bar length is `value / max * extent`. `value_label_extent` reserves room
/// for the value text beyond the bar's end when values are shown.
pub fn layout_bars(
    bars: &mut [Bar],
    orientation: Orientation,
    dims: &BarDimensions,
    graph: Rect,
    legend_area: Rect,
    value_label_extent: Option<f64>,
) -> ChartResult<()> {
    let max_value = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let multiplier = if max_value > 0.0 {
        value_extent(&graph, orientation) / max_value
    } else {
        0.0
    };

    let mut pos = first_slot(&graph, orientation, dims);
    for bar in bars.iter_mut() {
        let length = bar.value.max(0.0) * multiplier;
        bar.bounds = body_rect(&graph, orientation, pos, dims.bar_size, 0.0, length);
        bar.legend.bounds = legend_rect(&legend_area, orientation, pos, dims.bar_size);
        bar.value_label = value_label_extent.map(|extent| match orientation {
            Orientation::Vertical => Rect::new(pos, bar.bounds.y - extent, dims.bar_size, extent),
            Orientation::Horizontal => Rect::new(bar.bounds.right(), pos, extent, dims.bar_size),
        });
        pos += dims.stride();
    }

    if !bars.is_empty() && multiplier == 0.0 {
        return Err(ChartError::DegenerateInput(format!(
            "maximum bar value is {max_value}, bars collapsed to zero length"
        )));
    }
    Ok(())
}

/// Lay out stacked bars.
///
/// Every stack spans the full value extent; a segment's length is its share
/// of the stack sum. Segments stack bottom to top (vertical) or left to
/// right (horizontal) in insertion order.
pub fn layout_stacked_bars(
    stacks: &mut [StackedBar],
    orientation: Orientation,
    dims: &BarDimensions,
    graph: Rect,
    legend_area: Rect,
    value_label_extent: Option<f64>,
) -> ChartResult<()> {
    let extent = value_extent(&graph, orientation);
    let mut degenerate = 0usize;

    let mut pos = first_slot(&graph, orientation, dims);
    for stack in stacks.iter_mut() {
        let sum: f64 = stack.segments.iter().map(|s| s.value.max(0.0)).sum();
        let multiplier = if sum > 0.0 { extent / sum } else { 0.0 };
        if multiplier == 0.0 {
            degenerate += 1;
        }

        let mut bounds = body_rect(&graph, orientation, pos, dims.bar_size, 0.0, 0.0);
        let mut offset = 0.0;
        for segment in stack.segments.iter_mut() {
            let length = segment.value.max(0.0) * multiplier;
            segment.bounds = body_rect(&graph, orientation, pos, dims.bar_size, offset, length);
            segment.value_label = value_label_extent
                .filter(|extent| length >= *extent)
                .map(|extent| match orientation {
                    Orientation::Vertical => Rect::new(
                        pos,
                        segment.bounds.center_y() - extent / 2.0,
                        dims.bar_size,
                        extent,
                    ),
                    Orientation::Horizontal => Rect::new(
                        segment.bounds.center_x() - extent / 2.0,
                        pos,
                        extent,
                        dims.bar_size,
                    ),
                });
            bounds = bounds.union(&segment.bounds);
            offset += length;
        }

        stack.bounds = bounds;
        stack.legend.bounds = legend_rect(&legend_area, orientation, pos, dims.bar_size);
        pos += dims.stride();
    }

    if degenerate > 0 {
        return Err(ChartError::DegenerateInput(format!(
            "{degenerate} stack(s) have a zero sum and were collapsed"
        )));
    }
    Ok(())
}

/// Index of the bar whose slot contains `point`.
///
/// A slot is the bar's column across the whole graph, so taps above a
/// short bar still hit it.
pub fn bar_at<'a, I>(bounds: I, point: Point, orientation: Orientation, graph: &Rect) -> Option<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    bounds.into_iter().position(|rect| match orientation {
        Orientation::Vertical => {
            point.x >= rect.x && point.x <= rect.right() && point.y >= graph.y && point.y <= graph.bottom()
        }
        Orientation::Horizontal => {
            point.y >= rect.y && point.y <= rect.bottom() && point.x >= graph.x && point.x <= graph.right()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BarSegment, Color};

    fn sample_bars() -> Vec<Bar> {
        [2.3, 2.0, 3.3, 1.1, 2.7]
            .iter()
            .enumerate()
            .map(|(i, &v)| Bar::new(format!("Bar {}", i + 1), v, Color::GRAY))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn fixed_config() -> BarConfig {
        BarConfig {
            fixed_bar_width: true,
            bar_width: 32.0,
            bar_margin: 12.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_dynamic_width_fills_available() {
        let dims = calculate_bar_dimensions(&BarConfig::default(), 5, 400.0);

        assert_eq!(dims.bar_size, 68.0);
        assert_eq!(dims.margin, 12.0);
        assert_eq!(dims.stride() * 5.0, 400.0);
    }

    #[test]
    fn test_dynamic_margins_overflowing_extend_content() {
        let config = BarConfig {
            bar_margin: 12.0,
            ..Default::default()
        };
        let dims = calculate_bar_dimensions(&config, 20, 100.0);

        assert_eq!(dims.bar_size, 0.0);
        assert_eq!(dims.content_size, 240.0);
    }

    #[test]
    fn test_fixed_width_distributes_margin() {
        let dims = calculate_bar_dimensions(&fixed_config(), 5, 400.0);

        assert_eq!(dims.bar_size, 32.0);
        assert_eq!(dims.margin, 48.0);
        assert_eq!(dims.content_size, 400.0);
    }

    #[test]
    fn test_fixed_width_scrolling_extends_content() {
        let config = BarConfig {
            scroll_enabled: true,
            visible_bars: 2,
            ..fixed_config()
        };
        let dims = calculate_bar_dimensions(&config, 5, 400.0);

        assert_eq!(dims.margin, 168.0);
        assert_eq!(dims.content_size, 1000.0);
    }

    #[test]
    fn test_fixed_width_sample_scenario() {
        let mut bars = sample_bars();
        let dims = calculate_bar_dimensions(&fixed_config(), bars.len(), 400.0);
        let graph = Rect::new(0.0, 0.0, 400.0, 300.0);
        let legend = Rect::new(0.0, 300.0, 400.0, 30.0);
        layout_bars(&mut bars, Orientation::Vertical, &dims, graph, legend, None).unwrap();

        let lefts: Vec<f64> = bars.iter().map(|b| b.bounds.x).collect();
        assert_eq!(lefts, vec![24.0, 104.0, 184.0, 264.0, 344.0]);
        for pair in bars.windows(2) {
            assert!(pair[0].bounds.right() < pair[1].bounds.x);
        }

        // The tallest bar spans the graph height.
        assert!(approx(bars[2].bounds.y, 0.0));
        assert!(approx(bars[2].bounds.height, 300.0));
        assert!(approx(bars[0].bounds.bottom(), 300.0));
        assert_eq!(bars[0].legend.bounds, Rect::new(24.0, 300.0, 32.0, 30.0));
    }

    #[test]
    fn test_horizontal_bars_grow_right() {
        let mut bars = sample_bars();
        let dims = calculate_bar_dimensions(&BarConfig::default(), bars.len(), 300.0);
        let graph = Rect::new(50.0, 0.0, 330.0, 300.0);
        let legend = Rect::new(0.0, 0.0, 50.0, 300.0);
        layout_bars(&mut bars, Orientation::Horizontal, &dims, graph, legend, Some(20.0)).unwrap();

        assert_eq!(bars[2].bounds.x, 50.0);
        assert!(approx(bars[2].bounds.width, 330.0));
        assert_eq!(bars[0].bounds.y, 6.0);
        assert_eq!(bars[1].bounds.y, 66.0);
        assert_eq!(bars[0].legend.bounds.x, 0.0);
        let label = bars[2].value_label.unwrap();
        assert!(approx(label.x, 380.0));
    }

    #[test]
    fn test_value_labels_above_vertical_bars() {
        let mut bars = sample_bars();
        let dims = calculate_bar_dimensions(&BarConfig::default(), bars.len(), 400.0);
        let graph = Rect::new(0.0, 20.0, 400.0, 280.0);
        layout_bars(&mut bars, Orientation::Vertical, &dims, graph, Rect::default(), Some(20.0)).unwrap();

        let label = bars[2].value_label.unwrap();
        assert!(approx(label.bottom(), bars[2].bounds.y));
        assert!(approx(label.y, 0.0));
    }

    #[test]
    fn test_zero_max_collapses_bars() {
        let mut bars = vec![Bar::new("A", 0.0, Color::GRAY), Bar::new("B", 0.0, Color::GRAY)];
        let dims = calculate_bar_dimensions(&BarConfig::default(), 2, 200.0);
        let result = layout_bars(
            &mut bars,
            Orientation::Vertical,
            &dims,
            Rect::new(0.0, 0.0, 200.0, 100.0),
            Rect::default(),
            None,
        );

        assert!(result.unwrap_err().is_degenerate());
        for bar in &bars {
            assert_eq!(bar.bounds.height, 0.0);
            assert!(bar.bounds.y.is_finite());
        }
    }

    fn sample_stacks() -> Vec<StackedBar> {
        vec![
            StackedBar::new("A")
                .with_segment(BarSegment::new(1.0, Color::GRAY))
                .with_segment(BarSegment::new(3.0, Color::BLACK)),
            StackedBar::new("B")
                .with_segment(BarSegment::new(2.0, Color::GRAY))
                .with_segment(BarSegment::new(2.0, Color::BLACK)),
        ]
    }

    #[test]
    fn test_stacked_segments_fill_stack_bottom_to_top() {
        let mut stacks = sample_stacks();
        let dims = calculate_bar_dimensions(&BarConfig::default(), 2, 200.0);
        let graph = Rect::new(0.0, 0.0, 200.0, 100.0);
        layout_stacked_bars(&mut stacks, Orientation::Vertical, &dims, graph, graph, Some(30.0)).unwrap();

        let a = &stacks[0];
        assert_eq!(a.segments[0].bounds, Rect::new(6.0, 75.0, 88.0, 25.0));
        assert_eq!(a.segments[1].bounds, Rect::new(6.0, 0.0, 88.0, 75.0));
        assert_eq!(a.bounds, Rect::new(6.0, 0.0, 88.0, 100.0));
        // Only the tall segment has room for its value text.
        assert!(a.segments[0].value_label.is_none());
        assert_eq!(a.segments[1].value_label.unwrap().center_y(), 37.5);
        assert_eq!(stacks[1].segments[0].bounds.height, 50.0);
        assert_eq!(stacks[1].legend.bounds.width, 88.0);
    }

    #[test]
    fn test_stacked_horizontal_left_to_right() {
        let mut stacks = sample_stacks();
        let dims = calculate_bar_dimensions(&BarConfig::default(), 2, 100.0);
        let graph = Rect::new(0.0, 0.0, 400.0, 100.0);
        layout_stacked_bars(&mut stacks, Orientation::Horizontal, &dims, graph, graph, None).unwrap();

        let a = &stacks[0];
        assert_eq!(a.segments[0].bounds.x, 0.0);
        assert_eq!(a.segments[0].bounds.width, 100.0);
        assert_eq!(a.segments[1].bounds.x, 100.0);
        assert_eq!(a.bounds.width, 400.0);
    }

    #[test]
    fn test_empty_stack_is_degenerate() {
        let mut stacks = vec![StackedBar::new("Empty")];
        let dims = calculate_bar_dimensions(&BarConfig::default(), 1, 100.0);
        let graph = Rect::new(0.0, 0.0, 100.0, 100.0);
        let result = layout_stacked_bars(&mut stacks, Orientation::Vertical, &dims, graph, graph, None);

        assert!(result.unwrap_err().is_degenerate());
        assert_eq!(stacks[0].bounds.height, 0.0);
    }

    #[test]
    fn test_bar_hit_testing_uses_full_column() {
        let mut bars = sample_bars();
        let dims = calculate_bar_dimensions(&fixed_config(), bars.len(), 400.0);
        let graph = Rect::new(0.0, 0.0, 400.0, 300.0);
        layout_bars(&mut bars, Orientation::Vertical, &dims, graph, graph, None).unwrap();

        let rects: Vec<Rect> = bars.iter().map(|b| b.bounds).collect();
        assert_eq!(bar_at(&rects, Point::new(110.0, 5.0), Orientation::Vertical, &graph), Some(1));
        assert_eq!(bar_at(&rects, Point::new(70.0, 200.0), Orientation::Vertical, &graph), None);
        assert_eq!(bar_at(&rects, Point::new(110.0, 350.0), Orientation::Vertical, &graph), None);
    }
}
