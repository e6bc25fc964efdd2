//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A rectangular extent in map coordinates.
///
/// Coordinates are whatever the region is expressed in (metres for
/// projected locations, degrees for geographic ones). All distance
/// calculations in this workspace treat them as planar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box enclosing all the given coordinates.
    ///
    /// Returns `None` for an empty iterator.
    pub fn enclosing<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = coords.into_iter();
        let (x0, y0) = iter.next()?;
        let mut bbox = Self::new(x0, y0, x0, y0);
        for (x, y) in iter {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        Some(bbox)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Area in squared coordinate units.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Centre point of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Split into four equal quadrants: NW, NE, SW, SE.
    pub fn quadrants(&self) -> [BoundingBox; 4] {
        let (cx, cy) = self.center();
        [
            BoundingBox::new(self.min_x, cy, cx, self.max_y),
            BoundingBox::new(cx, cy, self.max_x, self.max_y),
            BoundingBox::new(self.min_x, self.min_y, cx, cy),
            BoundingBox::new(cx, self.min_y, self.max_x, cy),
        ]
    }
}
