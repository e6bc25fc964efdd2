//! Null detection and the ring mask derived from the distance buffer.

use grid_processor::FEATURE_CLASS;
use raster_common::Grid;

/// Distance class of the first buffer zone, i.e. the ring around holes.
pub const RING_CLASS: f32 = (FEATURE_CLASS + 1) as f32;

/// Indicator of null cells: 1 where `source` is null, null elsewhere.
pub fn null_indicator(source: &Grid) -> Grid {
    source.map(|v| match v {
        None => Some(1.0),
        Some(_) => None,
    })
}

/// Mask that is 1 on ring cells of a distance-class grid and null
/// everywhere else.
pub fn ring_mask(zones: &Grid) -> Grid {
    zones.map(|v| match v {
        Some(class) if class == RING_CLASS => Some(1.0),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::Region;

    fn region() -> Region {
        Region::with_resolution(0.0, 0.0, 1.0, 1, 4).unwrap()
    }

    #[test]
    fn test_indicator_marks_nulls_with_one() {
        let mut source = Grid::filled(region(), 0.0);
        source.set(0, 1, None);
        let indicator = null_indicator(&source);

        assert_eq!(indicator.get(0, 1), Some(1.0));
        // Valid cells, including zero-valued ones, become null rather than 0.
        assert!(indicator.is_null(0, 0));
        assert_eq!(indicator.valid_count(), 1);
    }

    #[test]
    fn test_ring_mask_keeps_class_two_only() {
        let zones = Grid::new(region(), vec![1.0, 2.0, 3.0, f32::NAN]).unwrap();
        let mask = ring_mask(&zones);
        assert!(mask.is_null(0, 0));
        assert_eq!(mask.get(0, 1), Some(1.0));
        assert!(mask.is_null(0, 2));
        assert!(mask.is_null(0, 3));
    }
}
