//! Error types for grid processing.

use raster_common::RasterError;
use thiserror::Error;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// A parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough points to fit a surface.
    #[error("not enough points to interpolate: found {found}, need at least {required}")]
    InsufficientPoints { found: usize, required: usize },

    /// The spline system could not be solved.
    #[error("singular interpolation system: {0}")]
    SingularSystem(String),

    /// The fitted surface cannot be represented at a cell.
    #[error("interpolated surface is not finite at ({x}, {y})")]
    NonFiniteSurface { x: f64, y: f64 },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Grid layout or data error.
    #[error(transparent)]
    Raster(#[from] RasterError),
}

impl GridProcessorError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a SingularSystem error.
    pub fn singular(msg: impl Into<String>) -> Self {
        Self::SingularSystem(msg.into())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
