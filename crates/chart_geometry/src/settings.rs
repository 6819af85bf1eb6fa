//! Chart settings
//!
//! Every tunable of the charts grouped per chart family, with defaults for
//! every field so partial JSON files load. Settings files are optional: a
//! missing file yields the defaults and an unreadable one is logged and
//! replaced by the defaults.

use crate::animation::{Easing, RevealAnimation};
use crate::bar::BarConfig;
use crate::error::{ChartError, ChartResult};
use crate::line::LineConfig;
use crate::model::{Color, StandardValue};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// All chart settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub bar: BarSettings,
    pub pie: PieSettings,
    pub line: LineSettings,
    pub legend: LegendSettings,
    pub animation: AnimationSettings,
}

/// Bar and stacked bar settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSettings {
    pub fixed_bar_width: bool,
    pub bar_width: f64,
    pub bar_margin: f64,
    pub visible_bars: usize,
    pub scroll_enabled: bool,
    /// Draw the value of each bar (or segment, when it fits)
    pub show_values: bool,
    pub value_text_size: f64,
}

impl Default for BarSettings {
    fn default() -> Self {
        Self {
            fixed_bar_width: false,
            bar_width: 32.0,
            bar_margin: 12.0,
            visible_bars: 6,
            scroll_enabled: false,
            show_values: false,
            value_text_size: 12.0,
        }
    }
}

impl BarSettings {
    pub fn config(&self) -> BarConfig {
        BarConfig {
            fixed_bar_width: self.fixed_bar_width,
            bar_width: self.bar_width,
            bar_margin: self.bar_margin,
            visible_bars: self.visible_bars,
            scroll_enabled: self.scroll_enabled,
        }
    }
}

/// Pie settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieSettings {
    /// Doughnut cutout in percent of the radius
    pub inner_padding: f64,
    /// Highlight ring width in percent of the radius
    pub inner_padding_outline: f64,
    pub highlight_strength: f64,
    pub open_clockwise: bool,
    /// Space between the pie and its bounds, in pixels
    pub padding: f64,
    /// Text shown in the cutout instead of the focused slice's value
    pub inner_value_text: Option<String>,
}

impl Default for PieSettings {
    fn default() -> Self {
        Self {
            inner_padding: 65.0,
            inner_padding_outline: 5.0,
            highlight_strength: 1.15,
            open_clockwise: true,
            padding: 0.0,
            inner_value_text: None,
        }
    }
}

/// Line chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSettings {
    pub cubic: bool,
    pub curve_smoothness: f64,
    pub dynamic_scaling: bool,
    pub scaling_factor: f64,
    pub line_stroke: f64,
    pub standard_values: Vec<StandardValue>,
    /// Grid line color of the 25/50/75 percent axis values
    pub axis_line_color: Color,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            cubic: false,
            curve_smoothness: 0.33,
            dynamic_scaling: false,
            scaling_factor: 0.96,
            line_stroke: 3.0,
            standard_values: Vec::new(),
            axis_line_color: Color::rgb(220, 220, 220),
        }
    }
}

impl LineSettings {
    pub fn config(&self, custom_legend: bool) -> LineConfig {
        LineConfig {
            dynamic_scaling: self.dynamic_scaling,
            scaling_factor: self.scaling_factor,
            cubic: self.cubic,
            curve_smoothness: self.curve_smoothness,
            custom_legend,
        }
    }
}

/// Legend and axis text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendSettings {
    pub legend_height: f64,
    pub text_size: f64,
    pub text_margin: f64,
    pub text_color: Color,
    pub axis_text_size: f64,
}

impl Default for LegendSettings {
    fn default() -> Self {
        Self {
            legend_height: 30.0,
            text_size: 12.0,
            text_margin: 10.0,
            text_color: Color::rgb(137, 137, 137),
            axis_text_size: 12.0,
        }
    }
}

/// Reveal animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            easing: Easing::default(),
        }
    }
}

impl AnimationSettings {
    pub fn animation(&self) -> RevealAnimation {
        RevealAnimation::new(Duration::from_millis(self.duration_ms), self.easing)
    }
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> ChartResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ChartError::InvalidConfig(message()))
    }
}

impl ChartSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        let settings: ChartSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match Self::from_json_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Check every value is in range
    pub fn validate(&self) -> ChartResult<()> {
        let bar = &self.bar;
        ensure(bar.bar_width >= 0.0, || format!("bar_width must be >= 0, got {}", bar.bar_width))?;
        ensure(bar.bar_margin >= 0.0, || format!("bar_margin must be >= 0, got {}", bar.bar_margin))?;
        ensure(!bar.scroll_enabled || bar.visible_bars > 0, || {
            "visible_bars must be > 0 when scrolling is enabled".to_string()
        })?;

        let pie = &self.pie;
        ensure((0.0..=100.0).contains(&pie.inner_padding), || {
            format!("inner_padding must be within 0..=100, got {}", pie.inner_padding)
        })?;
        ensure((0.0..=100.0).contains(&pie.inner_padding_outline), || {
            format!("inner_padding_outline must be within 0..=100, got {}", pie.inner_padding_outline)
        })?;
        ensure(pie.highlight_strength > 0.0, || {
            format!("highlight_strength must be > 0, got {}", pie.highlight_strength)
        })?;

        let line = &self.line;
        ensure((0.0..=1.0).contains(&line.curve_smoothness), || {
            format!("curve_smoothness must be within 0..=1, got {}", line.curve_smoothness)
        })?;
        ensure(line.scaling_factor > 0.0 && line.scaling_factor <= 1.0, || {
            format!("scaling_factor must be within (0, 1], got {}", line.scaling_factor)
        })?;

        ensure(self.legend.legend_height >= 0.0, || {
            format!("legend_height must be >= 0, got {}", self.legend.legend_height)
        })?;
        Ok(())
    }
}
