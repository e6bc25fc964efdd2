//! In-process raster algorithms used to fill null areas.
//!
//! This crate provides the four grid operations the fill pipeline needs,
//! all working on in-memory [`Grid`]s that share one region:
//!
//! - **Distance buffer**: classify cells by distance to non-null features
//! - **Vectorize**: turn non-null (optionally masked) cells into points
//! - **Spline interpolation**: regularized spline with tension (RST),
//!   optionally segmented with a quadtree for large point sets
//! - **Patch**: merge grids, earlier grids taking priority
//!
//! # Architecture
//!
//! ```text
//! indicator grid ──► buffer_zones() ──► distance classes
//!                                            │
//! source grid ──► grid_to_points(mask) ◄─────┘ (ring as mask)
//!                        │
//!                        ▼
//!                 interpolate(points) ──► fill grid
//!                                            │
//! source grid ──────────► patch([source, fill]) ──► output
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{interpolate, RstConfig, Segmentation};
//!
//! let fill = interpolate(&points, &region, &RstConfig::default(), Segmentation::Disabled, None)?;
//! ```
//!
//! [`Grid`]: raster_common::Grid

pub mod buffer;
pub mod config;
pub mod error;
pub mod mask;
pub mod patch;
pub mod rst;
pub mod vectorize;

// Re-export commonly used types at crate root
pub use buffer::{buffer_zones, FEATURE_CLASS};
pub use config::{RstConfig, Segmentation};
pub use error::{GridProcessorError, Result};
pub use mask::intersect_masks;
pub use patch::patch;
pub use rst::{interpolate, SplineSurface};
pub use vectorize::grid_to_points;
