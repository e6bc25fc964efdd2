//! Shared helpers for the fill pipeline tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use fillnulls::{
    Capabilities, CapabilityError, CapabilityResult, LocalCapabilities, Mapset, MemoryMapset,
    SplineRequest, MASK,
};
use raster_common::{BoundingBox, Grid, PointSet, RasterError, RasterResult, Region};
use test_utils::region::RegionSpec;

pub fn region_of(spec: RegionSpec) -> Region {
    let (min_x, min_y, max_x, max_y) = spec.bbox();
    Region::new(BoundingBox::new(min_x, min_y, max_x, max_y), spec.rows, spec.cols).unwrap()
}

/// A user mask covering everything but the first column.
pub fn user_mask(region: Region) -> Grid {
    Grid::from_fn(region, |_, col| if col == 0 { None } else { Some(1.0) })
}

/// Resources of a mapset, for before/after comparisons.
pub fn snapshot(mapset: &dyn Mapset) -> (Vec<String>, Vec<String>, Option<Grid>) {
    (
        mapset.raster_names(),
        mapset.point_names(),
        mapset.active_mask().unwrap(),
    )
}

/// Capability step a [`FailingCapabilities`] fails at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Buffer,
    RasterToPoints,
    PointCount,
    SplineFit,
    Patch,
}

pub const ALL_STEPS: [Step; 5] = [
    Step::Buffer,
    Step::RasterToPoints,
    Step::PointCount,
    Step::SplineFit,
    Step::Patch,
];

/// Runs the in-process capabilities but fails (or panics) at one step,
/// after doing that step's work so partial output is left behind.
pub struct FailingCapabilities {
    inner: LocalCapabilities,
    at: Step,
    panic: bool,
}

impl FailingCapabilities {
    pub fn failing_at(at: Step) -> Self {
        Self {
            inner: LocalCapabilities::new(),
            at,
            panic: false,
        }
    }

    pub fn panicking_at(at: Step) -> Self {
        Self {
            inner: LocalCapabilities::new(),
            at,
            panic: true,
        }
    }

    fn check(&self, step: Step) -> CapabilityResult<()> {
        if step != self.at {
            return Ok(());
        }
        if self.panic {
            panic!("injected panic at {:?}", step);
        }
        Err(CapabilityError::failed(format!("injected failure at {:?}", step)))
    }
}

impl Capabilities for FailingCapabilities {
    fn buffer(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
        distance: f64,
    ) -> CapabilityResult<()> {
        self.inner.buffer(mapset, input, output, distance)?;
        self.check(Step::Buffer)
    }

    fn raster_to_points(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
    ) -> CapabilityResult<()> {
        self.inner.raster_to_points(mapset, input, output)?;
        self.check(Step::RasterToPoints)
    }

    fn point_count(&self, mapset: &dyn Mapset, points: &str) -> CapabilityResult<usize> {
        let count = self.inner.point_count(mapset, points)?;
        self.check(Step::PointCount)?;
        Ok(count)
    }

    fn spline_fit(
        &self,
        mapset: &mut dyn Mapset,
        request: &SplineRequest<'_>,
    ) -> CapabilityResult<()> {
        self.inner.spline_fit(mapset, request)?;
        self.check(Step::SplineFit)
    }

    fn patch(
        &self,
        mapset: &mut dyn Mapset,
        inputs: &[&str],
        output: &str,
    ) -> CapabilityResult<()> {
        // Fails before writing, so a failed run never leaves an output.
        self.check(Step::Patch)?;
        self.inner.patch(mapset, inputs, output)
    }
}

/// What a [`RecordingCapabilities`] saw when the spline was requested.
#[derive(Debug, Clone, Default)]
pub struct SplineCall {
    pub mask_active: bool,
    pub mask_map: Option<String>,
    pub cells: Option<String>,
    /// Non-null cells of the surface the spline wrote.
    pub evaluated_cells: usize,
    pub segmented: bool,
    pub tension: f64,
    pub smooth: f64,
}

/// Delegates to the in-process capabilities and records spline calls.
#[derive(Default)]
pub struct RecordingCapabilities {
    inner: LocalCapabilities,
    pub spline_calls: RefCell<Vec<SplineCall>>,
    pub patch_calls: Cell<usize>,
}

impl Capabilities for RecordingCapabilities {
    fn buffer(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
        distance: f64,
    ) -> CapabilityResult<()> {
        self.inner.buffer(mapset, input, output, distance)
    }

    fn raster_to_points(
        &self,
        mapset: &mut dyn Mapset,
        input: &str,
        output: &str,
    ) -> CapabilityResult<()> {
        self.inner.raster_to_points(mapset, input, output)
    }

    fn point_count(&self, mapset: &dyn Mapset, points: &str) -> CapabilityResult<usize> {
        self.inner.point_count(mapset, points)
    }

    fn spline_fit(
        &self,
        mapset: &mut dyn Mapset,
        request: &SplineRequest<'_>,
    ) -> CapabilityResult<()> {
        let mut call = SplineCall {
            mask_active: mapset.raster_exists(MASK),
            mask_map: request.mask_map.map(String::from),
            cells: request.cells.map(String::from),
            evaluated_cells: 0,
            segmented: request.segmentation.is_enabled(),
            tension: request.tension,
            smooth: request.smooth,
        };
        let result = self.inner.spline_fit(mapset, request);
        if result.is_ok() {
            call.evaluated_cells = mapset.read_raster(request.output)?.valid_count();
        }
        self.spline_calls.borrow_mut().push(call);
        result
    }

    fn patch(
        &self,
        mapset: &mut dyn Mapset,
        inputs: &[&str],
        output: &str,
    ) -> CapabilityResult<()> {
        self.patch_calls.set(self.patch_calls.get() + 1);
        self.inner.patch(mapset, inputs, output)
    }
}

/// Mapset operation a [`FlakyMapset`] can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Read,
    Write,
    Remove,
}

/// Memory mapset that fails chosen calls.
///
/// Renames fail by their overall call index (0-based). Reads, writes and
/// removals fail on the n-th call (0-based) for one resource name.
pub struct FlakyMapset {
    pub inner: MemoryMapset,
    failing_renames: Vec<usize>,
    rename_calls: usize,
    faults: Vec<(Op, String, usize)>,
    calls: RefCell<HashMap<(Op, String), usize>>,
}

impl FlakyMapset {
    pub fn new(inner: MemoryMapset, failing_renames: &[usize]) -> Self {
        Self {
            inner,
            failing_renames: failing_renames.to_vec(),
            rename_calls: 0,
            faults: Vec::new(),
            calls: RefCell::new(HashMap::new()),
        }
    }

    /// Also fail the `nth` call of `op` on `name`.
    pub fn failing(mut self, op: Op, name: &str, nth: usize) -> Self {
        self.faults.push((op, name.to_string(), nth));
        self
    }

    fn check(&self, op: Op, name: &str) -> RasterResult<()> {
        let mut calls = self.calls.borrow_mut();
        let count = calls.entry((op, name.to_string())).or_insert(0);
        let call = *count;
        *count += 1;
        let failing = self
            .faults
            .iter()
            .any(|(o, n, nth)| *o == op && n == name && *nth == call);
        if failing {
            return Err(RasterError::storage(format!(
                "injected {:?} failure on {}",
                op, name
            )));
        }
        Ok(())
    }
}

impl Mapset for FlakyMapset {
    fn region(&self) -> Region {
        self.inner.region()
    }

    fn raster_exists(&self, name: &str) -> bool {
        self.inner.raster_exists(name)
    }

    fn read_raster(&self, name: &str) -> RasterResult<Grid> {
        self.check(Op::Read, name)?;
        self.inner.read_raster(name)
    }

    fn write_raster(&mut self, name: &str, grid: &Grid) -> RasterResult<()> {
        self.check(Op::Write, name)?;
        self.inner.write_raster(name, grid)
    }

    fn rename_raster(&mut self, from: &str, to: &str) -> RasterResult<()> {
        let call = self.rename_calls;
        self.rename_calls += 1;
        if self.failing_renames.contains(&call) {
            return Err(RasterError::storage("injected rename failure"));
        }
        self.inner.rename_raster(from, to)
    }

    fn remove_raster(&mut self, name: &str) -> RasterResult<bool> {
        self.check(Op::Remove, name)?;
        self.inner.remove_raster(name)
    }

    fn raster_names(&self) -> Vec<String> {
        self.inner.raster_names()
    }

    fn points_exist(&self, name: &str) -> bool {
        self.inner.points_exist(name)
    }

    fn read_points(&self, name: &str) -> RasterResult<PointSet> {
        self.inner.read_points(name)
    }

    fn write_points(&mut self, name: &str, points: &PointSet) -> RasterResult<()> {
        self.inner.write_points(name, points)
    }

    fn remove_points(&mut self, name: &str) -> RasterResult<bool> {
        self.inner.remove_points(name)
    }

    fn point_names(&self) -> Vec<String> {
        self.inner.point_names()
    }
}
