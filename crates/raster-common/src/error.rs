//! Error types for raster data and resource namespaces.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Primary error type for raster and namespace operations.
#[derive(Debug, Error)]
pub enum RasterError {
    // === Region / Layout Errors ===
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Grid has {actual} cells but region {rows}x{cols} needs {expected}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Region mismatch: {0}")]
    RegionMismatch(String),

    #[error("Cell ({row}, {col}) holds non-finite value {value}")]
    NonFiniteCell { row: usize, col: usize, value: f32 },

    // === Namespace Errors ===
    #[error("Raster map <{0}> not found")]
    RasterNotFound(String),

    #[error("Point set <{0}> not found")]
    PointsNotFound(String),

    #[error("Resource <{0}> already exists")]
    AlreadyExists(String),

    #[error("Invalid resource name: '{0}'")]
    InvalidName(String),

    // === Storage Errors ===
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RasterError {
    /// Create a RegionMismatch error.
    pub fn region_mismatch(msg: impl Into<String>) -> Self {
        Self::RegionMismatch(msg.into())
    }

    /// Create a StorageError.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    /// Whether this error reports a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RasterError::RasterNotFound(_) | RasterError::PointsNotFound(_)
        )
    }
}

impl From<std::io::Error> for RasterError {
    fn from(err: std::io::Error) -> Self {
        RasterError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for RasterError {
    fn from(err: serde_json::Error) -> Self {
        RasterError::SerializationError(format!("JSON error: {}", err))
    }
}
