//! The fill orchestrator.
//!
//! A run moves through a fixed sequence of states:
//!
//! ```text
//! Init ─► MaskSaved ─► RingBuilt ─► MaskInstalled ─► PointsExtracted
//!                                                          │
//!   Done ◄─ Patched ◄─ MaskRestored ◄─ Interpolated ◄──────┘
//! ```
//!
//! Any failure moves the run to `Failed`. Entering `Done` or `Failed`
//! triggers cleanup exactly once: the run's own mask is removed, a parked
//! user mask is renamed back to `MASK`, and every temporary resource is
//! deleted. Cleanup also runs when the run unwinds from a panic.

use std::fmt;

use grid_processor::rst::MIN_POINTS;
use grid_processor::Segmentation;
use raster_common::Grid;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::capability::{Capabilities, SplineRequest};
use crate::config::FillNullsConfig;
use crate::detect::{null_indicator, ring_mask};
use crate::error::{FillError, FillResult};
use crate::mapset::Mapset;
use crate::mask::MaskTransaction;
use crate::run_id::{RunId, TempNames};

/// Progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Init,
    MaskSaved,
    RingBuilt,
    MaskInstalled,
    PointsExtracted,
    Interpolated,
    MaskRestored,
    Patched,
    Done,
    Failed,
}

impl PipelineState {
    /// Whether the run has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Init => "init",
            PipelineState::MaskSaved => "mask_saved",
            PipelineState::RingBuilt => "ring_built",
            PipelineState::MaskInstalled => "mask_installed",
            PipelineState::PointsExtracted => "points_extracted",
            PipelineState::Interpolated => "interpolated",
            PipelineState::MaskRestored => "mask_restored",
            PipelineState::Patched => "patched",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct FillReport {
    pub run_id: RunId,
    pub input: String,
    pub output: String,
    /// Null cells in the input.
    pub null_cells: usize,
    /// Points on the ring around the holes.
    pub boundary_points: usize,
    /// Whether the interpolator segmented the point set.
    pub segmented: bool,
    /// Whether a user mask was present and restricted the interpolation.
    pub used_user_mask: bool,
    /// Input null cells that hold a value in the output.
    pub filled_cells: usize,
    pub final_state: PipelineState,
}

/// Fills the null cells of a raster by spline interpolation from the
/// ring of valid cells around them.
#[derive(Debug)]
pub struct FillNulls<C> {
    capabilities: C,
    config: FillNullsConfig,
    run_id: RunId,
}

impl<C: Capabilities> FillNulls<C> {
    /// Create a fill with a fresh run id.
    pub fn new(capabilities: C, config: FillNullsConfig) -> Self {
        Self {
            capabilities,
            config,
            run_id: RunId::new(),
        }
    }

    /// Use a fixed run id; temporary names are derived from it.
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn config(&self) -> &FillNullsConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &C {
        &self.capabilities
    }

    /// Fill the nulls of `input` into a new raster `output`.
    ///
    /// On success the mapset holds `output` and, if one existed, the
    /// user's `MASK`, in addition to what was there before. On failure
    /// no temporary resource is left behind and a user mask is back in
    /// place.
    pub fn run(&self, mapset: &mut dyn Mapset, input: &str, output: &str) -> FillResult<FillReport> {
        self.config.validate().map_err(FillError::Config)?;
        info!(run_id = %self.run_id, input = %input, output = %output, "Starting fill");

        if !mapset.raster_exists(input) {
            return Err(FillError::InputNotFound(input.to_string()));
        }
        if mapset.raster_exists(output) && !self.config.overwrite {
            return Err(FillError::OutputExists(output.to_string()));
        }

        let source = mapset.read_raster(input)?;
        let mut report = FillReport {
            run_id: self.run_id.clone(),
            input: input.to_string(),
            output: output.to_string(),
            null_cells: source.null_count(),
            boundary_points: 0,
            segmented: false,
            used_user_mask: false,
            filled_cells: 0,
            final_state: PipelineState::Init,
        };

        if report.null_cells == 0 {
            info!(input = %input, "Input has no NULL cells, copying it unchanged");
            mapset.write_raster(output, &source)?;
            report.final_state = PipelineState::Done;
            return Ok(report);
        }

        let mut guard = RunGuard::new(mapset, &self.run_id);
        let outcome = self.execute(&mut guard, &source, input, output, &mut report);
        if let Err(err) = &outcome {
            warn!(
                run_id = %self.run_id,
                state = %guard.state,
                error = %err,
                "Fill failed, removing temporary maps and restoring user mask if needed"
            );
            guard.transition(PipelineState::Failed);
        }
        let cleanup = guard.close();
        report.final_state = guard.state;
        drop(guard);

        match (outcome, cleanup) {
            (Ok(()), Ok(())) => {
                info!(
                    run_id = %self.run_id,
                    output = %output,
                    filled_cells = report.filled_cells,
                    boundary_points = report.boundary_points,
                    segmented = report.segmented,
                    "Filled raster map is: {}",
                    output
                );
                Ok(report)
            }
            (Ok(()), Err(cleanup_err)) => Err(cleanup_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(cleanup_err)) => {
                error!(
                    run_id = %self.run_id,
                    error = %cleanup_err,
                    "Cleanup failed after an earlier error"
                );
                Err(err)
            }
        }
    }

    fn execute(
        &self,
        guard: &mut RunGuard<'_>,
        source: &Grid,
        input: &str,
        output: &str,
        report: &mut FillReport,
    ) -> FillResult<()> {
        let caps = &self.capabilities;
        let names = guard.names.clone();

        guard.mask.begin(guard.mapset)?;
        report.used_user_mask = guard.mask.had_user_mask();
        guard.transition(PipelineState::MaskSaved);

        // Grow the null areas by nominally three cells and interpolate
        // from that ring, so the fill picks up slope and curvature at the
        // edges.
        info!(null_cells = report.null_cells, "Locating and isolating NULL areas");
        guard
            .mapset
            .write_raster(&names.indicator, &null_indicator(source))?;
        let distance = guard.mapset.region().ring_distance();
        caps.buffer(guard.mapset, &names.indicator, &names.buffer, distance)
            .map_err(|e| FillError::capability("buffer", e))?;
        guard.transition(PipelineState::RingBuilt);

        let zones = guard.mapset.read_raster(&names.buffer)?;
        guard.mask.install(guard.mapset, &ring_mask(&zones))?;
        guard.transition(PipelineState::MaskInstalled);

        info!("Creating interpolation points");
        caps.raster_to_points(guard.mapset, input, &names.points)
            .map_err(|e| FillError::capability("raster to points", e))?;
        let count = caps
            .point_count(&*guard.mapset, &names.points)
            .map_err(|e| FillError::capability("point count", e))?;
        report.boundary_points = count;
        guard.transition(PipelineState::PointsExtracted);

        info!(points = count, "Interpolating {} points", count);
        if count < MIN_POINTS {
            return Err(FillError::InsufficientPoints { found: count });
        }

        // The ring mask would confine the surface to the ring itself.
        guard.mask.clear(guard.mapset)?;
        let mask_map = guard.mask.use_aside().map(str::to_owned);
        if mask_map.is_some() {
            info!("Using user mask while interpolating");
        }

        let segmentation = if count > self.config.segment_threshold {
            info!(points = count, "Using segmentation for interpolation");
            Segmentation::Auto
        } else {
            info!(points = count, "Using no segmentation for interpolation as not needed");
            Segmentation::Disabled
        };
        report.segmented = segmentation.is_enabled();

        let request = SplineRequest {
            points: &names.points,
            output: &names.filled,
            tension: self.config.tension,
            smooth: self.config.smooth,
            mask_map: mask_map.as_deref(),
            cells: Some(names.indicator.as_str()),
            segmentation,
        };
        caps.spline_fit(guard.mapset, &request)
            .map_err(|e| FillError::capability("spline interpolation", e))?;
        guard.transition(PipelineState::Interpolated);

        guard.mask.restore(guard.mapset)?;
        guard.transition(PipelineState::MaskRestored);

        info!("Patching fill data into NULL areas");
        caps.patch(guard.mapset, &[input, names.filled.as_str()], output)
            .map_err(|e| FillError::capability("patch", e))?;
        guard.transition(PipelineState::Patched);

        let merged = guard.mapset.read_raster(output)?;
        report.filled_cells = report.null_cells.saturating_sub(merged.null_count());
        guard.transition(PipelineState::Done);
        Ok(())
    }
}

/// Holds the mapset for the length of a run and cleans up after it on
/// every exit path, including unwinding.
struct RunGuard<'m> {
    mapset: &'m mut dyn Mapset,
    names: TempNames,
    mask: MaskTransaction,
    run_id: RunId,
    state: PipelineState,
    closed: bool,
}

impl<'m> RunGuard<'m> {
    fn new(mapset: &'m mut dyn Mapset, run_id: &RunId) -> Self {
        let names = TempNames::new(run_id);
        let mask = MaskTransaction::new(names.user_mask.clone());
        Self {
            mapset,
            names,
            mask,
            run_id: run_id.clone(),
            state: PipelineState::Init,
            closed: false,
        }
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(
            run_id = %self.run_id,
            from = %self.state,
            to = %next,
            "Pipeline state transition"
        );
        self.state = next;
    }

    /// Remove the run's mask and temporaries and hand back the user mask.
    /// Only the first call does anything.
    fn close(&mut self) -> FillResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!(run_id = %self.run_id, state = %self.state, "Cleaning up");

        let mut first_error: Option<FillError> = None;

        if let Err(e) = self.mask.restore(self.mapset) {
            first_error.get_or_insert(e);
        }

        for name in self.names.rasters() {
            if let Err(e) = self.mapset.remove_raster(name) {
                warn!(raster = %name, error = %e, "Failed to remove temporary raster");
                first_error.get_or_insert(e.into());
            }
        }

        if let Err(e) = self.mapset.remove_points(&self.names.points) {
            warn!(points = %self.names.points, error = %e, "Failed to remove temporary points");
            first_error.get_or_insert(e.into());
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if std::thread::panicking() {
            warn!(run_id = %self.run_id, state = %self.state, "Run interrupted, cleaning up");
            self.state = PipelineState::Failed;
        }
        if let Err(e) = self.close() {
            error!(run_id = %self.run_id, error = %e, "Cleanup failed");
        }
    }
}
