//! Chart geometry - Layout and reveal animation for animated charts
//!
//! This crate provides support for:
//! - Geometric primitives and a scrollable viewport
//! - A chart data model (bars, stacked bars, pie slices, line series)
//! - Legend label placement with collision avoidance
//! - Bar, pie and line layout engines
//! - A frame-driven reveal animation with cancellation
//! - Chart components producing drawables, and SVG export
//! - JSON settings with defaults

mod geometry;
mod error;
mod model;
mod viewport;
mod legend;
mod bar;
mod pie;
mod line;
mod animation;
mod settings;
mod render;
mod chart;
mod bar_chart;
mod pie_chart;
mod line_chart;

pub use geometry::*;
pub use error::*;
pub use model::*;
pub use viewport::*;
pub use legend::*;
pub use bar::*;
pub use pie::*;
pub use line::*;
pub use animation::*;
pub use settings::*;
pub use render::*;
pub use chart::*;
pub use bar_chart::*;
pub use pie_chart::*;
pub use line_chart::*;
