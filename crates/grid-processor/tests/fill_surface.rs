//! End-to-end use of the grid operations to fill a hole in a surface.

use grid_processor::{
    buffer_zones, grid_to_points, interpolate, patch, RstConfig, Segmentation, FEATURE_CLASS,
};
use raster_common::{BoundingBox, Grid, Region};
use test_utils::region::{RegionSpec, METRIC_30X30, WIDE_40X80};
use test_utils::{assert_in_range, create_plane_grid, create_terrain_grid, punch_hole};

const RING_CLASS: f32 = (FEATURE_CLASS + 1) as f32;

fn region_of(spec: RegionSpec) -> Region {
    let (min_x, min_y, max_x, max_y) = spec.bbox();
    Region::new(BoundingBox::new(min_x, min_y, max_x, max_y), spec.rows, spec.cols).unwrap()
}

/// Indicator of null cells, then the ring mask around them.
fn ring_mask(source: &Grid) -> Grid {
    let indicator = source.map(|v| if v.is_none() { Some(1.0) } else { None });
    let zones = buffer_zones(&indicator, &[source.region().ring_distance()]).unwrap();
    zones.map(|v| v.filter(|class| *class == RING_CLASS).map(|_| 1.0))
}

fn fill(source: &Grid, segmentation: Segmentation) -> (Grid, (f64, f64)) {
    let config = RstConfig {
        npmin: 100,
        ..RstConfig::default()
    };
    let ring = ring_mask(source);
    let points = grid_to_points(source, Some(&ring)).unwrap();
    let range = points.value_range().unwrap();
    let surface = interpolate(
        &points,
        source.region(),
        &config,
        segmentation,
        None,
    )
    .unwrap();
    (patch(&[source, &surface]).unwrap(), range)
}

fn assert_hole_within_ring_range(source: &Grid, filled: &Grid, range: (f64, f64)) {
    let tolerance = 0.1 * (range.1 - range.0) + RstConfig::default().smooth;
    for row in 0..source.rows() {
        for col in 0..source.cols() {
            match source.get(row, col) {
                Some(v) => assert_eq!(filled.get(row, col), Some(v)),
                None => {
                    let v = filled.get(row, col).expect("hole cell filled");
                    assert_in_range!(v, range.0 - tolerance, range.1 + tolerance);
                }
            }
        }
    }
}

#[test]
fn test_ring_is_three_cells_wide() {
    let region = region_of(METRIC_30X30);
    let mut data = create_plane_grid(30, 30, 0.0, 1.0, 1.0);
    punch_hole(&mut data, 30, 10, 10, 4, 4);
    let source = Grid::new(region, data).unwrap();

    let ring = ring_mask(&source);
    // Hole spans rows/cols 10..14; the ring reaches three cells out.
    assert!(ring.is_null(12, 12));
    assert!(!ring.is_null(12, 9));
    assert!(!ring.is_null(12, 7));
    assert!(ring.is_null(12, 6));
    assert!(!ring.is_null(16, 12));
    assert!(ring.is_null(17, 12));
    // Ring corners follow the Euclidean metric: (3, 3) cells is ~42 m.
    assert!(ring.is_null(7, 7));
}

#[test]
fn test_fill_terrain_hole() {
    let region = region_of(METRIC_30X30);
    let mut data = create_terrain_grid(30, 30);
    punch_hole(&mut data, 30, 12, 12, 6, 6);
    let source = Grid::new(region, data).unwrap();

    let (filled, range) = fill(&source, Segmentation::Disabled);
    assert_eq!(filled.null_count(), 0);
    assert_hole_within_ring_range(&source, &filled, range);
}

#[test]
fn test_fill_plane_hole_segmented() {
    let region = region_of(WIDE_40X80);
    let mut data = create_plane_grid(80, 40, 50.0, 0.5, -0.25);
    punch_hole(&mut data, 80, 5, 5, 10, 20);
    punch_hole(&mut data, 80, 20, 50, 12, 20);
    let source = Grid::new(region, data).unwrap();

    let (filled, range) = fill(&source, Segmentation::Auto);
    assert_eq!(filled.null_count(), 0);
    assert_hole_within_ring_range(&source, &filled, range);
}
