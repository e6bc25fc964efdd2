//! Common test fixtures for fill-nulls tests.
//!
//! Regions are given as plain tuples so this crate stays free of
//! workspace dependencies.

/// Common region layouts for testing.
pub mod region {
    /// Region layout for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct RegionSpec {
        pub min_x: f64,
        pub min_y: f64,
        pub res: f64,
        pub rows: usize,
        pub cols: usize,
    }

    impl RegionSpec {
        /// Returns the total number of cells.
        pub fn size(&self) -> usize {
            self.rows * self.cols
        }

        /// Returns the extent as (min_x, min_y, max_x, max_y).
        pub fn bbox(&self) -> (f64, f64, f64, f64) {
            (
                self.min_x,
                self.min_y,
                self.min_x + self.res * self.cols as f64,
                self.min_y + self.res * self.rows as f64,
            )
        }
    }

    /// Small 10x10 unit-cell region at the origin.
    pub const UNIT_10X10: RegionSpec = RegionSpec {
        min_x: 0.0,
        min_y: 0.0,
        res: 1.0,
        rows: 10,
        cols: 10,
    };

    /// 30x30 region with 10 m cells in projected coordinates.
    pub const METRIC_30X30: RegionSpec = RegionSpec {
        min_x: 500_000.0,
        min_y: 4_100_000.0,
        res: 10.0,
        rows: 30,
        cols: 30,
    };

    /// Wide region used for segmentation tests (many boundary points).
    pub const WIDE_40X80: RegionSpec = RegionSpec {
        min_x: 0.0,
        min_y: 0.0,
        res: 1.0,
        rows: 40,
        cols: 80,
    };
}

/// Resource names used across tests.
pub mod names {
    pub const INPUT: &str = "elevation";
    pub const OUTPUT: &str = "elevation_filled";
}
