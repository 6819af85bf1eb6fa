//! Drawables and SVG export
//!
//! Charts describe a frame as a list of plain drawables. A host draws them
//! with whatever canvas it has; `drawables_to_svg` is the built-in export.

use crate::geometry::{Point, Rect, Size};
use crate::model::Color;
use serde::{Deserialize, Serialize};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// One primitive of a chart frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Drawable {
    /// A filled rectangle
    Rect { bounds: Rect, fill: Color },
    /// A ring or pie sector; angles in degrees clockwise from three o'clock
    Arc {
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        sweep: f64,
        fill: Color,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Color,
        stroke_width: f64,
    },
    /// A stroked path in SVG path syntax
    Path {
        data: String,
        stroke: Color,
        stroke_width: f64,
    },
    /// Text whose baseline starts (or centres, or ends) at `position`
    Text {
        position: Point,
        text: String,
        size: f64,
        color: Color,
        anchor: TextAnchor,
    },
}

/// Render a frame to an SVG document
pub fn drawables_to_svg(size: Size, drawables: &[Drawable]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        size.width, size.height, size.width, size.height
    );
    svg.push('\n');

    for drawable in drawables {
        if let Some(element) = drawable_to_svg(drawable) {
            svg.push_str(&element);
            svg.push('\n');
        }
    }

    svg.push_str("</svg>");
    svg
}

fn drawable_to_svg(drawable: &Drawable) -> Option<String> {
    match drawable {
        Drawable::Rect { bounds, fill } => {
            if bounds.is_empty() {
                return None;
            }
            Some(format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                fill.to_css()
            ))
        }
        Drawable::Arc {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            sweep,
            fill,
        } => {
            if *sweep <= 0.0 || *outer_radius <= 0.0 {
                return None;
            }
            let path = arc_to_path(*center, *inner_radius, *outer_radius, *start_angle, *sweep);
            Some(format!(r#"<path d="{}" fill="{}"/>"#, path, fill.to_css()))
        }
        Drawable::Line {
            from,
            to,
            stroke,
            stroke_width,
        } => Some(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            stroke.to_css(),
            stroke_width
        )),
        Drawable::Path {
            data,
            stroke,
            stroke_width,
        } => Some(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
            data,
            stroke.to_css(),
            stroke_width
        )),
        Drawable::Text {
            position,
            text,
            size,
            color,
            anchor,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            Some(format!(
                r#"<text x="{}" y="{}" font-size="{}" font-family="sans-serif" fill="{}" text-anchor="{}">{}</text>"#,
                position.x,
                position.y,
                size,
                color.to_css(),
                anchor,
                escape_xml(text)
            ))
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn polar(center: Point, radius: f64, degrees: f64) -> Point {
    let radians = degrees.to_radians();
    Point::new(center.x + radius * radians.cos(), center.y + radius * radians.sin())
}

/// SVG path of a sector. A full circle is split in two half arcs since a
/// single arc with equal endpoints draws nothing.
fn arc_to_path(center: Point, inner_radius: f64, outer_radius: f64, start_angle: f64, sweep: f64) -> String {
    let sweep = sweep.min(360.0);
    if sweep >= 360.0 {
        let mid = start_angle + 180.0;
        let outer_start = polar(center, outer_radius, start_angle);
        let outer_mid = polar(center, outer_radius, mid);
        let mut path = format!(
            "M {} {} A {} {} 0 1 1 {} {} A {} {} 0 1 1 {} {} Z",
            outer_start.x,
            outer_start.y,
            outer_radius,
            outer_radius,
            outer_mid.x,
            outer_mid.y,
            outer_radius,
            outer_radius,
            outer_start.x,
            outer_start.y
        );
        if inner_radius > 0.0 {
            let inner_start = polar(center, inner_radius, start_angle);
            let inner_mid = polar(center, inner_radius, mid);
            path.push_str(&format!(
                " M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
                inner_start.x,
                inner_start.y,
                inner_radius,
                inner_radius,
                inner_mid.x,
                inner_mid.y,
                inner_radius,
                inner_radius,
                inner_start.x,
                inner_start.y
            ));
        }
        return path;
    }

    let end_angle = start_angle + sweep;
    let large_arc = if sweep > 180.0 { 1 } else { 0 };
    let outer_start = polar(center, outer_radius, start_angle);
    let outer_end = polar(center, outer_radius, end_angle);

    if inner_radius > 0.0 {
        let inner_start = polar(center, inner_radius, start_angle);
        let inner_end = polar(center, inner_radius, end_angle);
        format!(
            "M {} {} A {} {} 0 {} 1 {} {} L {} {} A {} {} 0 {} 0 {} {} Z",
            outer_start.x,
            outer_start.y,
            outer_radius,
            outer_radius,
            large_arc,
            outer_end.x,
            outer_end.y,
            inner_end.x,
            inner_end.y,
            inner_radius,
            inner_radius,
            large_arc,
            inner_start.x,
            inner_start.y
        )
    } else {
        format!(
            "M {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
            center.x,
            center.y,
            outer_start.x,
            outer_start.y,
            outer_radius,
            outer_radius,
            large_arc,
            outer_end.x,
            outer_end.y
        )
    }
}
