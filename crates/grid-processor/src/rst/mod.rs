//! Regularized spline with tension (RST) interpolation.
//!
//! Fits a surface `z(x, y) = a₀ + Σ λⱼ R(ρⱼ)` through scattered points,
//! where `R` is the completely regularized spline basis ([`basis`]) and
//! `ρⱼ = (φ·rⱼ/2)²` with `rⱼ` the distance to point `j` measured in units
//! of the mean point spacing. Smoothing is applied on the diagonal of the
//! system matrix.
//!
//! Large point sets are handled by quadtree segmentation ([`segment`]):
//! each leaf is fitted from the points nearest to it and only evaluates
//! the cells it covers.

pub mod basis;
pub mod segment;

use crate::config::{RstConfig, Segmentation};
use crate::error::{GridProcessorError, Result};
use nalgebra::{DMatrix, DVector};
use raster_common::{BoundingBox, Grid, Point, PointSet, Region};
use tracing::{debug, info};

use basis::rst_basis;
use segment::build_segments;

/// Tension at which the shape parameter `φ` is 1.
pub const REFERENCE_TENSION: f64 = 40.0;

/// Minimum number of points a surface can be fitted to.
pub const MIN_POINTS: usize = 2;

/// A fitted spline surface.
#[derive(Debug, Clone)]
pub struct SplineSurface {
    centers: Vec<(f64, f64)>,
    weights: Vec<f64>,
    trend: f64,
    mean: f64,
    scale: f64,
}

impl SplineSurface {
    /// Fit a surface through `points`.
    ///
    /// `dnorm` is the length that distances are normalised by; segments of
    /// one interpolation share it so that neighbouring fits agree.
    pub fn fit(points: &[Point], config: &RstConfig, dnorm: f64) -> Result<Self> {
        let n = points.len();
        if n < MIN_POINTS {
            return Err(GridProcessorError::InsufficientPoints {
                found: n,
                required: MIN_POINTS,
            });
        }
        if !dnorm.is_finite() || dnorm <= 0.0 {
            return Err(GridProcessorError::invalid_parameter(format!(
                "normalisation length must be > 0, got {}",
                dnorm
            )));
        }

        let phi = config.tension / REFERENCE_TENSION;
        let scale = phi / (2.0 * dnorm);
        let mean = points.iter().map(|p| p.value).sum::<f64>() / n as f64;

        let mut a = DMatrix::<f64>::zeros(n + 1, n + 1);
        let mut b = DVector::<f64>::zeros(n + 1);
        for i in 0..n {
            let pi = &points[i];
            for j in (i + 1)..n {
                let r = rst_basis(pi.distance_sq(points[j].x, points[j].y) * scale * scale);
                a[(i, j)] = r;
                a[(j, i)] = r;
            }
            a[(i, i)] = config.smooth;
            a[(i, n)] = 1.0;
            a[(n, i)] = 1.0;
            b[i] = pi.value - mean;
        }

        let solution = a
            .lu()
            .solve(&b)
            .ok_or_else(|| GridProcessorError::singular(format!("{} points", n)))?;
        if solution.iter().any(|v| !v.is_finite()) {
            return Err(GridProcessorError::singular(format!(
                "{} points produced non-finite weights",
                n
            )));
        }

        Ok(Self {
            centers: points.iter().map(|p| (p.x, p.y)).collect(),
            weights: solution.iter().take(n).copied().collect(),
            trend: solution[n],
            mean,
            scale,
        })
    }

    /// Evaluate the surface at a map coordinate.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        let scale_sq = self.scale * self.scale;
        let sum: f64 = self
            .centers
            .iter()
            .zip(&self.weights)
            .map(|(&(cx, cy), w)| {
                let dx = x - cx;
                let dy = y - cy;
                w * rst_basis((dx * dx + dy * dy) * scale_sq)
            })
            .sum();
        self.mean + self.trend + sum
    }

    /// Number of points the surface was fitted to.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Mean point spacing: `sqrt(area / n)` over the points' extent, falling
/// back to the region's extent when the points are collinear.
pub fn normalization_length(points: &PointSet, region: &Region) -> f64 {
    let n = points.len().max(1) as f64;
    let area = BoundingBox::enclosing(points.iter().map(|p| (p.x, p.y)))
        .map(|bbox| bbox.area())
        .filter(|area| *area > 0.0)
        .unwrap_or_else(|| region.bbox.area());
    let dnorm = (area / n).sqrt();
    if dnorm.is_finite() && dnorm > 0.0 {
        dnorm
    } else {
        1.0
    }
}

/// Interpolate `points` onto `region`.
///
/// Cells that are null in `eligible` stay null; without an eligibility
/// grid every cell is evaluated.
pub fn interpolate(
    points: &PointSet,
    region: &Region,
    config: &RstConfig,
    segmentation: Segmentation,
    eligible: Option<&Grid>,
) -> Result<Grid> {
    config
        .validate()
        .map_err(GridProcessorError::ConfigError)?;
    if points.len() < MIN_POINTS {
        return Err(GridProcessorError::InsufficientPoints {
            found: points.len(),
            required: MIN_POINTS,
        });
    }
    if let Some(mask) = eligible {
        mask.ensure_same_region(region)?;
    }

    let dnorm = normalization_length(points, region);
    let is_eligible = |row: usize, col: usize| eligible.map_or(true, |m| !m.is_null(row, col));
    let mut out = Grid::null(*region);

    match segmentation.max_points(config) {
        None => {
            info!(
                points = points.len(),
                tension = config.tension,
                smooth = config.smooth,
                "Fitting global spline"
            );
            let surface = SplineSurface::fit(points.points(), config, dnorm)?;
            fill_cells(&mut out, &surface, (0, region.rows), (0, region.cols), &is_eligible)?;
        }
        Some(max_points) => {
            let leaves = build_segments(points.points(), region, max_points);
            info!(
                points = points.len(),
                segments = leaves.len(),
                segmax = max_points,
                npmin = config.npmin,
                "Fitting segmented spline"
            );
            for leaf in &leaves {
                let rows = leaf.rows(region);
                let cols = leaf.cols(region);
                let has_cells = (rows.0..rows.1)
                    .any(|row| (cols.0..cols.1).any(|col| is_eligible(row, col)));
                if !has_cells {
                    continue;
                }

                let subset: Vec<Point> = leaf
                    .neighbourhood(points.points(), config.npmin)
                    .into_iter()
                    .map(|idx| points.points()[idx])
                    .collect();
                debug!(
                    own = leaf.members.len(),
                    fitted = subset.len(),
                    "Fitting segment"
                );
                let surface = SplineSurface::fit(&subset, config, dnorm)?;
                fill_cells(&mut out, &surface, rows, cols, &is_eligible)?;
            }
        }
    }

    debug!(
        filled = out.valid_count(),
        dnorm = dnorm,
        "Spline interpolation complete"
    );
    Ok(out)
}

fn fill_cells<F>(
    out: &mut Grid,
    surface: &SplineSurface,
    rows: (usize, usize),
    cols: (usize, usize),
    is_eligible: &F,
) -> Result<()>
where
    F: Fn(usize, usize) -> bool,
{
    let region = *out.region();
    for row in rows.0..rows.1 {
        for col in cols.0..cols.1 {
            if !is_eligible(row, col) {
                continue;
            }
            let (x, y) = region.cell_center(row, col);
            let value = surface.value_at(x, y) as f32;
            if !value.is_finite() {
                return Err(GridProcessorError::NonFiniteSurface { x, y });
            }
            out.set(row, col, Some(value));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn region(rows: usize, cols: usize) -> Region {
        Region::with_resolution(0.0, 0.0, 1.0, rows, cols).unwrap()
    }

    fn samples(region: &Region, f: impl Fn(f64, f64) -> f64, step: usize) -> PointSet {
        let mut points = PointSet::default();
        for row in (0..region.rows).step_by(step) {
            for col in (0..region.cols).step_by(step) {
                let (x, y) = region.cell_center(row, col);
                points.push(Point::new(x, y, f(x, y)));
            }
        }
        points
    }

    #[test]
    fn test_constant_field_is_reproduced() {
        let region = region(10, 10);
        let points = samples(&region, |_, _| 42.0, 3);
        let out = interpolate(
            &points,
            &region,
            &RstConfig::default(),
            Segmentation::Disabled,
            None,
        )
        .unwrap();

        assert_eq!(out.null_count(), 0);
        for (_, _, v) in out.iter_valid() {
            assert_approx_eq!(v, 42.0, 1e-4);
        }
    }

    #[test]
    fn test_exact_fit_without_smoothing() {
        let region = region(8, 8);
        let points = samples(&region, |x, y| x * 2.0 - y + 10.0, 2);
        let config = RstConfig::new(40.0, 0.0);
        let surface =
            SplineSurface::fit(points.points(), &config, normalization_length(&points, &region))
                .unwrap();

        for p in points.iter() {
            assert_approx_eq!(surface.value_at(p.x, p.y), p.value, 1e-6);
        }
        assert_eq!(surface.len(), points.len());
    }

    #[test]
    fn test_two_points_are_enough() {
        let region = region(3, 3);
        let points = PointSet::new(vec![Point::new(0.5, 0.5, 1.0), Point::new(2.5, 2.5, 3.0)]);
        let out = interpolate(
            &points,
            &region,
            &RstConfig::default(),
            Segmentation::Disabled,
            None,
        )
        .unwrap();
        let centre = out.get(1, 1).unwrap();
        assert_approx_eq!(centre, 2.0, 1e-4);
    }

    #[test]
    fn test_insufficient_points() {
        let region = region(3, 3);
        let points = PointSet::new(vec![Point::new(0.5, 0.5, 1.0)]);
        let err = interpolate(
            &points,
            &region,
            &RstConfig::default(),
            Segmentation::Disabled,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GridProcessorError::InsufficientPoints {
                found: 1,
                required: 2
            }
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let region = region(3, 3);
        let points = samples(&region, |_, _| 1.0, 1);
        let config = RstConfig::new(-1.0, 0.1);
        let err = interpolate(&points, &region, &config, Segmentation::Disabled, None).unwrap_err();
        assert!(matches!(err, GridProcessorError::ConfigError(_)));
    }

    #[test]
    fn test_eligible_grid_restricts_output() {
        let region = region(5, 5);
        let points = samples(&region, |x, _| x, 2);
        let mut eligible = Grid::null(region);
        eligible.set(2, 2, Some(1.0));
        eligible.set(0, 4, Some(1.0));

        let out = interpolate(
            &points,
            &region,
            &RstConfig::default(),
            Segmentation::Disabled,
            Some(&eligible),
        )
        .unwrap();
        assert_eq!(out.valid_count(), 2);
        assert!(out.get(2, 2).is_some());
        assert!(out.get(0, 4).is_some());
    }

    #[test]
    fn test_surface_beyond_f32_range_is_an_error() {
        let region = region(3, 3);
        let points = PointSet::new(vec![
            Point::new(0.5, 0.5, 1e300),
            Point::new(2.5, 2.5, 1e300),
        ]);
        let err = interpolate(
            &points,
            &region,
            &RstConfig::default(),
            Segmentation::Disabled,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, GridProcessorError::NonFiniteSurface { .. }));
    }

    #[test]
    fn test_duplicate_points_without_smoothing_are_singular() {
        let region = region(3, 3);
        let points = PointSet::new(vec![
            Point::new(0.5, 0.5, 1.0),
            Point::new(0.5, 0.5, 2.0),
            Point::new(2.5, 2.5, 3.0),
        ]);
        let config = RstConfig::new(40.0, 0.0);
        let err =
            interpolate(&points, &region, &config, Segmentation::Disabled, None).unwrap_err();
        assert!(matches!(err, GridProcessorError::SingularSystem(_)));
    }

    #[test]
    fn test_segmented_matches_global_on_smooth_field() {
        let region = region(24, 24);
        let plane = |x: f64, y: f64| 100.0 + 0.5 * x + 0.25 * y;
        let points = samples(&region, plane, 2);
        let mut config = RstConfig::default();
        config.segmax = 20;
        config.npmin = 60;

        let segmented =
            interpolate(&points, &region, &config, Segmentation::Auto, None).unwrap();
        assert_eq!(segmented.null_count(), 0);
        for (row, col, v) in segmented.iter_valid() {
            let (x, y) = region.cell_center(row, col);
            assert_approx_eq!(v, plane(x, y), 1.0);
        }
    }
}
