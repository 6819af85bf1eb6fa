//! Legend label layout
//!
//! Decides which legend labels are drawn and where, walking the entries
//! left to right and hiding any label that would collide with the one
//! before it or run off the end of the available span.

use crate::geometry::Rect;
use crate::model::HasLegend;

/// Measures label text for layout
pub trait TextMeasurer {
    /// Width of `text` in pixels
    fn text_width(&self, text: &str) -> f64;

    /// Height of a line of text in pixels
    fn text_height(&self) -> f64 {
        0.0
    }
}

impl<F> TextMeasurer for F
where
    F: Fn(&str) -> f64,
{
    fn text_width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Approximates text extents from the character count and font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasurer {
    pub font_size: f64,
}

impl EstimatedTextMeasurer {
    pub fn new(font_size: f64) -> Self {
        Self { font_size }
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * 0.6
    }

    fn text_height(&self) -> f64 {
        self.font_size
    }
}

/// Lay out legend labels between `start_x` and `end_x`.
///
/// Greedy and single pass: a label hidden here is never reconsidered.
/// Ignored entries are skipped and keep their previous state.
pub fn layout_legend<T, M>(entries: &mut [T], start_x: f64, end_x: f64, measurer: &M, text_margin: f64)
where
    T: HasLegend,
    M: TextMeasurer + ?Sized,
{
    let text_height = measurer.text_height();
    let mut last_x = start_x;

    for entry in entries.iter_mut() {
        let legend = entry.legend_mut();
        if legend.ignore {
            continue;
        }

        let width = measurer.text_width(&legend.text);
        let half = width / 2.0;
        let center_x = legend.bounds.center_x();
        let centered = center_x - half;

        let placement = if last_x == start_x {
            // The first label is always shown, clamped to the start.
            if centered - text_margin < start_x {
                last_x = start_x + width;
                Some(start_x)
            } else {
                last_x = center_x + half;
                Some(centered)
            }
        } else if center_x + half > end_x {
            None
        } else if centered - text_margin < last_x {
            let shifted = last_x + text_margin;
            if shifted < legend.bounds.x {
                last_x = shifted + width;
                Some(shifted)
            } else {
                None
            }
        } else {
            last_x = center_x + half;
            Some(centered)
        };

        match placement {
            Some(x) => {
                legend.show_label = true;
                legend.label_x = x;
                legend.text_bounds = Rect::new(x, legend.bounds.y, width, text_height);
            }
            None => {
                legend.show_label = false;
            }
        }
    }
}

/// Lay out labels that each own a row, as on horizontal bars.
///
/// Rows never collide horizontally, so every label is shown, left aligned
/// inside its bounds and vertically centred.
pub fn layout_legend_rows<T, M>(entries: &mut [T], measurer: &M, text_margin: f64)
where
    T: HasLegend,
    M: TextMeasurer + ?Sized,
{
    let text_height = measurer.text_height();
    for entry in entries.iter_mut() {
        let legend = entry.legend_mut();
        if legend.ignore {
            continue;
        }
        let width = measurer.text_width(&legend.text);
        legend.show_label = true;
        legend.label_x = legend.bounds.x + text_margin;
        legend.text_bounds = Rect::new(
            legend.label_x,
            legend.bounds.center_y() - text_height / 2.0,
            width,
            text_height,
        );
    }
}
