//! Scrollable viewport over chart content
//!
//! Bar charts with scrolling lay their bars out in a content rectangle that
//! can be wider (or taller) than the view. The viewport is the visible
//! window into that content and is kept inside it on every mutation.

use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Visible window into a larger content rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollViewport {
    content: Rect,
    viewport: Rect,
}

impl ScrollViewport {
    /// Create a viewport of `viewport_size` at the content origin
    pub fn new(content_size: Size, viewport_size: Size) -> Self {
        let mut this = Self {
            content: Rect::from_size(content_size),
            viewport: Rect::from_size(viewport_size),
        };
        this.constrain();
        this
    }

    pub fn content(&self) -> Rect {
        self.content
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Translation from content to screen coordinates
    pub fn offset(&self) -> Point {
        Point::new(self.viewport.x - self.content.x, self.viewport.y - self.content.y)
    }

    /// Resize the content, keeping the viewport inside it
    pub fn set_content_size(&mut self, size: Size) {
        self.content.width = size.width;
        self.content.height = size.height;
        self.constrain();
    }

    /// Resize the visible window
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport.width = size.width;
        self.viewport.height = size.height;
        self.constrain();
    }

    /// Move the viewport by a drag delta
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.viewport.x += dx;
        self.viewport.y += dy;
        self.constrain();
    }

    /// Move the viewport's top-left corner to content position (x, y)
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.x = self.content.x + x;
        self.viewport.y = self.content.y + y;
        self.constrain();
    }

    /// Whether there is anything to scroll
    pub fn can_scroll(&self) -> bool {
        self.content.width > self.viewport.width || self.content.height > self.viewport.height
    }

    /// Convert a screen point to content coordinates
    pub fn to_content(&self, point: Point) -> Point {
        let offset = self.offset();
        Point::new(point.x + offset.x, point.y + offset.y)
    }

    /// Indices of the rectangles intersecting the viewport
    ///
    /// Assumes `bounds` are ordered along the scroll axis, as bars are.
    pub fn visible_range(&self, bounds: &[Rect]) -> Range<usize> {
        let window = self.viewport.translate(-self.content.x, -self.content.y);
        let visible = |r: &Rect| r.touches(&window);
        match bounds.iter().position(visible) {
            Some(first) => {
                let count = bounds[first..].iter().take_while(|r| visible(r)).count();
                first..first + count
            }
            None => 0..0,
        }
    }

    /// Clamp the viewport inside the content; a viewport larger than the
    /// content is pinned to the content origin.
    fn constrain(&mut self) {
        let max_x = (self.content.right() - self.viewport.width).max(self.content.x);
        let max_y = (self.content.bottom() - self.viewport.height).max(self.content.y);
        self.viewport.x = self.viewport.x.clamp(self.content.x, max_x);
        self.viewport.y = self.viewport.y.clamp(self.content.y, max_y);
    }
}
