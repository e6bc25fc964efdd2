//! Fill null areas of a raster by spline interpolation.
//!
//! The null cells of the input are grown by nominally three cells; the
//! valid cells in that ring become points for a regularized spline with
//! tension, and the interpolated surface is patched into the holes.
//!
//! Rasters live in a [`Mapset`], a namespace shared with other users. A
//! user mask in its `MASK` slot is moved aside for the run, used to
//! restrict the interpolation, and always handed back, whether the run
//! succeeds, fails or panics.
//!
//! # Example
//!
//! ```ignore
//! use fillnulls::{DirectoryMapset, FillNulls, FillNullsConfig, LocalCapabilities};
//!
//! let mut mapset = DirectoryMapset::open("/data/mapset")?;
//! let fill = FillNulls::new(LocalCapabilities::new(), FillNullsConfig::default());
//! let report = fill.run(&mut mapset, "elevation", "elevation_filled")?;
//! println!("filled {} cells", report.filled_cells);
//! ```

pub mod capability;
pub mod config;
pub mod detect;
pub mod error;
pub mod mapset;
pub mod mask;
pub mod pipeline;
pub mod run_id;

// Re-export commonly used types at crate root
pub use capability::{Capabilities, LocalCapabilities, SplineRequest};
pub use config::FillNullsConfig;
pub use error::{CapabilityError, CapabilityResult, FillError, FillResult};
pub use mapset::{DirectoryMapset, Mapset, MemoryMapset, MASK};
pub use mask::MaskTransaction;
pub use pipeline::{FillNulls, FillReport, PipelineState};
pub use run_id::{RunId, TempNames};
