// ============================================================================
// ERRORS
// ============================================================================

use thiserror::Error;

/// Errors produced while resolving or rendering a gauge.
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("degenerate domain: max ({max}) must be greater than min ({min})")]
    Domain { min: f64, max: f64 },

    #[error("failed to read gauge file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse gauge file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, GaugeError>;
