//! Error types for the chart geometry crate

use thiserror::Error;

/// Errors that can occur while laying out charts
#[derive(Error, Debug)]
pub enum ChartError {
    /// The data cannot produce meaningful geometry (zero totals, no points).
    ///
    /// The affected geometry has already been collapsed to zero size when
    /// this is returned.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A setting is outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}

impl ChartError {
    /// Whether this error only signals that there was nothing to draw
    pub fn is_degenerate(&self) -> bool {
        matches!(self, ChartError::DegenerateInput(_))
    }
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
