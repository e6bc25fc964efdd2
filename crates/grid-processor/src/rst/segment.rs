//! Quadtree segmentation of a point set.
//!
//! The region is split recursively into quadrants until each leaf holds
//! at most `max_points` points. Leaves partition the region's cells, and
//! each leaf is later fitted from the points nearest its centre.

use raster_common::{BoundingBox, Point, Region};

/// Recursion limit for quadtree splitting.
const MAX_DEPTH: usize = 16;

/// One quadtree leaf.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Extent covered by this leaf.
    pub bbox: BoundingBox,
    /// Indices of the points falling inside this leaf.
    pub members: Vec<usize>,
}

impl Segment {
    /// Half-open row range `[start, end)` of the cells whose centres fall
    /// inside this leaf.
    pub fn rows(&self, region: &Region) -> (usize, usize) {
        let top = region.bbox.max_y;
        let ns = region.nsres();
        let start = edge_index((top - self.bbox.max_y) / ns, region.rows);
        let end = edge_index((top - self.bbox.min_y) / ns, region.rows);
        (start, end)
    }

    /// Half-open column range `[start, end)` of the cells whose centres
    /// fall inside this leaf.
    pub fn cols(&self, region: &Region) -> (usize, usize) {
        let left = region.bbox.min_x;
        let ew = region.ewres();
        let start = edge_index((self.bbox.min_x - left) / ew, region.cols);
        let end = edge_index((self.bbox.max_x - left) / ew, region.cols);
        (start, end)
    }

    /// Indices of the `count` points nearest this leaf's centre, merged
    /// with the leaf's own members.
    pub fn neighbourhood(&self, points: &[Point], count: usize) -> Vec<usize> {
        let (cx, cy) = self.bbox.center();
        let mut order: Vec<usize> = (0..points.len()).collect();
        if count < points.len() {
            order.sort_by(|&a, &b| {
                points[a]
                    .distance_sq(cx, cy)
                    .total_cmp(&points[b].distance_sq(cx, cy))
            });
            order.truncate(count);
        }
        order.extend(self.members.iter().copied());
        order.sort_unstable();
        order.dedup();
        order
    }
}

/// Cell boundary index: the first cell whose centre lies at or beyond the
/// given offset (in cells).
fn edge_index(offset: f64, limit: usize) -> usize {
    let idx = (offset - 0.5).ceil();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(limit)
    }
}

/// Split `region` into quadtree leaves holding at most `max_points` points.
///
/// Leaves stop splitting once they are narrower than two cells or the
/// depth limit is reached, so a leaf may exceed `max_points` when points
/// are densely clustered.
pub fn build_segments(points: &[Point], region: &Region, max_points: usize) -> Vec<Segment> {
    let members: Vec<usize> = (0..points.len()).collect();
    let mut leaves = Vec::new();
    split(
        points,
        region,
        region.bbox,
        members,
        max_points.max(1),
        0,
        &mut leaves,
    );
    leaves
}

fn split(
    points: &[Point],
    region: &Region,
    bbox: BoundingBox,
    members: Vec<usize>,
    max_points: usize,
    depth: usize,
    leaves: &mut Vec<Segment>,
) {
    let too_small = bbox.width() < 2.0 * region.ewres() || bbox.height() < 2.0 * region.nsres();
    if members.len() <= max_points || depth >= MAX_DEPTH || too_small {
        leaves.push(Segment { bbox, members });
        return;
    }

    let (cx, cy) = bbox.center();
    let mut quadrants: [Vec<usize>; 4] = Default::default();
    for idx in members {
        let p = &points[idx];
        let west = p.x < cx;
        let north = p.y >= cy;
        let q = match (north, west) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        };
        quadrants[q].push(idx);
    }

    for (quad_bbox, quad_members) in bbox.quadrants().into_iter().zip(quadrants) {
        split(
            points,
            region,
            quad_bbox,
            quad_members,
            max_points,
            depth + 1,
            leaves,
        );
    }
}
