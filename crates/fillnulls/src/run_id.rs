//! Run identifiers and the temporary resource names derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier that keeps one run's temporary resources apart from
/// another's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Identifier with a fixed value, for reproducible names.
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Names of every temporary resource a run may create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempNames {
    /// Null indicator raster.
    pub indicator: String,
    /// Distance buffer raster.
    pub buffer: String,
    /// Interpolated surface raster.
    pub filled: String,
    /// Boundary point set.
    pub points: String,
    /// Where the user's `MASK` is kept during the run.
    pub user_mask: String,
}

impl TempNames {
    pub fn new(run_id: &RunId) -> Self {
        let base = format!("r_fillnulls_{}", run_id);
        Self {
            buffer: format!("{}.buf", base),
            filled: format!("{}_filled", base),
            points: format!("vecttmp_fillnulls_{}", run_id),
            user_mask: format!("usermask_mask.{}", run_id),
            indicator: base,
        }
    }

    /// Temporary rasters, in removal order.
    pub fn rasters(&self) -> [&str; 3] {
        [&self.indicator, &self.buffer, &self.filled]
    }
}
