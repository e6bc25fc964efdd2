//! Error types for the fill pipeline.

use grid_processor::GridProcessorError;
use raster_common::RasterError;
use thiserror::Error;

/// Failure reported by a capability call.
#[derive(Error, Debug)]
pub enum CapabilityError {
    /// The in-process algorithm rejected its input.
    #[error(transparent)]
    Processing(#[from] GridProcessorError),

    /// Reading or writing a mapset resource failed.
    #[error(transparent)]
    Mapset(#[from] RasterError),

    /// Any other failure, e.g. from an external tool.
    #[error("{0}")]
    Failed(String),
}

impl CapabilityError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Result type for capability calls.
pub type CapabilityResult<T> = std::result::Result<T, CapabilityError>;

/// Errors that end a fill run.
#[derive(Error, Debug)]
pub enum FillError {
    /// The input raster does not exist. Nothing was touched.
    #[error("input raster <{0}> does not exist")]
    InputNotFound(String),

    /// The output raster exists and overwriting was not requested.
    #[error("output raster <{0}> already exists (use overwrite to replace it)")]
    OutputExists(String),

    /// Too few boundary points to fit a surface.
    #[error(
        "not enough points to interpolate: found {found}, need at least 2; \
         maybe there are no holes to fill in the current region?"
    )]
    InsufficientPoints { found: usize },

    /// A capability call failed.
    #[error("{step} failed: {source}")]
    Capability {
        step: &'static str,
        #[source]
        source: CapabilityError,
    },

    /// Moving the user mask in or out of the `MASK` slot failed.
    #[error("failed to rename raster <{from}> to <{to}>: {source}")]
    MaskRenameFailure {
        from: String,
        to: String,
        #[source]
        source: RasterError,
    },

    /// Direct mapset access by the pipeline failed.
    #[error(transparent)]
    Mapset(#[from] RasterError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl FillError {
    /// Wrap a capability failure with the step it happened in.
    pub fn capability(step: &'static str, source: impl Into<CapabilityError>) -> Self {
        Self::Capability {
            step,
            source: source.into(),
        }
    }
}

/// Result type for fill operations.
pub type FillResult<T> = std::result::Result<T, FillError>;
