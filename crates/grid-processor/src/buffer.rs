//! Distance buffers around non-null cells.
//!
//! The input grid's non-null cells are the features. Every other cell is
//! classified by the planar distance from its centre to the nearest
//! feature centre:
//!
//! - class 1: the feature cells themselves
//! - class `k + 2`: within `distances[k]` (distances sorted ascending)
//! - null: farther than the largest distance

use crate::error::{GridProcessorError, Result};
use raster_common::Grid;
use tracing::debug;

/// Distance class written for the feature cells.
pub const FEATURE_CLASS: u8 = 1;

/// Classify every cell of `grid` by distance to its non-null cells.
///
/// Distances are in map units and must be finite and positive. Duplicate
/// distances collapse into one zone.
pub fn buffer_zones(grid: &Grid, distances: &[f64]) -> Result<Grid> {
    let zones = sorted_zones(distances)?;
    let region = *grid.region();
    let max_distance = zones[zones.len() - 1];
    let (ew, ns) = (region.ewres(), region.nsres());
    let reach_cols = (max_distance / ew).floor() as usize;
    let reach_rows = (max_distance / ns).floor() as usize;

    // Squared distance to the nearest feature, only within reach.
    let mut nearest = vec![f64::INFINITY; region.len()];
    let mut features = 0usize;

    for (row, col, _) in grid.iter_valid() {
        features += 1;
        let r0 = row.saturating_sub(reach_rows);
        let r1 = (row + reach_rows).min(region.rows - 1);
        let c0 = col.saturating_sub(reach_cols);
        let c1 = (col + reach_cols).min(region.cols - 1);

        for r in r0..=r1 {
            let dy = (r as f64 - row as f64) * ns;
            for c in c0..=c1 {
                let dx = (c as f64 - col as f64) * ew;
                let d2 = dx * dx + dy * dy;
                let idx = region.flat_index(r, c);
                if d2 < nearest[idx] {
                    nearest[idx] = d2;
                }
            }
        }
    }

    let tolerance = 1e-9 * max_distance;
    let out = Grid::from_fn(region, |row, col| {
        if grid.get(row, col).is_some() {
            return Some(FEATURE_CLASS as f32);
        }
        let d2 = nearest[region.flat_index(row, col)];
        if !d2.is_finite() {
            return None;
        }
        let d = d2.sqrt();
        zones
            .iter()
            .position(|&zone| d <= zone + tolerance)
            .map(|k| (k + 2) as f32)
    });

    debug!(
        features = features,
        zones = zones.len(),
        max_distance = max_distance,
        "Computed distance buffer"
    );

    Ok(out)
}

fn sorted_zones(distances: &[f64]) -> Result<Vec<f64>> {
    if distances.is_empty() {
        return Err(GridProcessorError::invalid_parameter(
            "at least one buffer distance is required",
        ));
    }
    if let Some(bad) = distances.iter().find(|d| !d.is_finite() || **d <= 0.0) {
        return Err(GridProcessorError::invalid_parameter(format!(
            "buffer distance must be finite and > 0, got {}",
            bad
        )));
    }
    let mut zones = distances.to_vec();
    zones.sort_by(|a, b| a.total_cmp(b));
    zones.dedup();
    Ok(zones)
}
