//! The operations the fill pipeline delegates.
//!
//! Each capability reads its inputs from a [`Mapset`] by name and writes
//! its output back under a name chosen by the caller, so the pipeline can
//! run against the in-process algorithms or any other implementation.

use grid_processor::{
    buffer_zones, grid_to_points, interpolate, intersect_masks, patch, RstConfig, Segmentation,
};
use raster_common::Grid;
use tracing::debug;

use crate::error::{CapabilityError, CapabilityResult};
use crate::mapset::Mapset;

/// Parameters of a spline interpolation call.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineRequest<'a> {
    /// Point set to interpolate from.
    pub points: &'a str,
    /// Raster to write the surface to.
    pub output: &'a str,
    pub tension: f64,
    pub smooth: f64,
    /// Raster restricting where the surface is evaluated.
    pub mask_map: Option<&'a str>,
    /// Raster marking the only cells that need a value. Unlike
    /// `mask_map` this narrows evaluation without changing the result
    /// on those cells.
    pub cells: Option<&'a str>,
    pub segmentation: Segmentation,
}

/// Trait for the raster operations used by the fill pipeline.
///
/// Operations documented as mask-aware honour an active `MASK` in the
/// mapset the way the pipeline expects.
pub trait Capabilities {
    /// Classify cells by distance to the non-null cells of `input`.
    ///
    /// # Arguments
    /// * `input` - raster whose non-null cells are the features
    /// * `output` - raster receiving distance classes (1 = feature,
    ///   2 = within `distance`)
    /// * `distance` - buffer distance in map units
    fn buffer(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
        distance: f64,
    ) -> CapabilityResult<()>;

    /// Convert the non-null cells of `input` to points. Mask-aware.
    fn raster_to_points(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
    ) -> CapabilityResult<()>;

    /// Number of points in a point set.
    fn point_count(&self, mapset: &dyn Mapset, points: &str) -> CapabilityResult<usize>;

    /// Fit a spline to a point set and resample it onto the region.
    /// Mask-aware.
    fn spline_fit(&self, mapset: &mut dyn Mapset, request: &SplineRequest<'_>)
        -> CapabilityResult<()>;

    /// Merge rasters, earlier inputs taking priority.
    fn patch(&self, mapset: &mut dyn Mapset, inputs: &[&str], output: &str)
        -> CapabilityResult<()>;
}

/// Capabilities backed by the in-process algorithms of `grid-processor`.
#[derive(Debug, Clone, Default)]
pub struct LocalCapabilities {
    rst: RstConfig,
}

impl LocalCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these segmentation limits; tension and smoothing always come
    /// from the request.
    pub fn with_rst_config(rst: RstConfig) -> Self {
        Self { rst }
    }
}

impl Capabilities for LocalCapabilities {
    fn buffer(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
        distance: f64,
    ) -> CapabilityResult<()> {
        let grid = mapset.read_raster(input)?;
        let zones = buffer_zones(&grid, &[distance])?;
        mapset.write_raster(output, &zones)?;
        Ok(())
    }

    fn raster_to_points(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
    ) -> CapabilityResult<()> {
        let grid = mapset.read_raster(input)?;
        let mask = mapset.active_mask()?;
        let points = grid_to_points(&grid, mask.as_ref())?;
        mapset.write_points(output, &points)?;
        Ok(())
    }

    fn point_count(&self, mapset: &dyn Mapset, points: &str) -> CapabilityResult<usize> {
        Ok(mapset.read_points(points)?.len())
    }

    fn spline_fit(
        &self,
        mapset: &mut dyn Mapset,
        request: &SplineRequest<'_>,
    ) -> CapabilityResult<()> {
        let points = mapset.read_points(request.points)?;
        let active = mapset.active_mask()?;
        let mask_map = request
            .mask_map
            .map(|name| mapset.read_raster(name))
            .transpose()?;
        let cells = request
            .cells
            .map(|name| mapset.read_raster(name))
            .transpose()?;
        let masked = intersect_masks(active.as_ref(), mask_map.as_ref())?;
        let eligible: Option<Grid> = intersect_masks(masked.as_ref(), cells.as_ref())?;

        let config = RstConfig {
            tension: request.tension,
            smooth: request.smooth,
            ..self.rst.clone()
        };
        debug!(
            points = points.len(),
            active_mask = active.is_some(),
            mask_map = ?request.mask_map,
            cells = ?request.cells,
            segmentation = %request.segmentation,
            "Running spline interpolation"
        );
        let surface = interpolate(
            &points,
            &mapset.region(),
            &config,
            request.segmentation,
            eligible.as_ref(),
        )?;
        mapset.write_raster(request.output, &surface)?;
        Ok(())
    }

    fn patch(
        &self,
        mapset: &mut dyn Mapset,
        inputs: &[&str],
        output: &str,
    ) -> CapabilityResult<()> {
        if inputs.is_empty() {
            return Err(CapabilityError::failed("patch needs at least one input"));
        }
        let grids = inputs
            .iter()
            .map(|name| mapset.read_raster(name))
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&Grid> = grids.iter().collect();
        let merged = patch(&refs)?;
        mapset.write_raster(output, &merged)?;
        Ok(())
    }
}
