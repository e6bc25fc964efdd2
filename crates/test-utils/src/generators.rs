//! Test data generators for synthetic rasters with holes.
//!
//! All generators return row-major `Vec<f32>` data (row 0 is the north
//! row) with `NaN` marking null cells, ready to be wrapped in a grid.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a tilted plane: `base + dx * col + dy * row`.
pub fn create_plane_grid(width: usize, height: usize, base: f32, dx: f32, dy: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(base + dx * col as f32 + dy * row as f32);
        }
    }
    data
}

/// Creates a smooth terrain-like surface.
///
/// Values range roughly from 100 to 200 with one broad hill, so a hole
/// anywhere in it has a well-defined, gently curved boundary.
pub fn create_terrain_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    let cx = width as f32 * 0.4;
    let cy = height as f32 * 0.6;
    let sigma = (width.max(height) as f32 * 0.35).max(1.0);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            let hill = (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
            data.push(100.0 + 80.0 * hill + 0.5 * col as f32);
        }
    }
    data
}

/// Sets a rectangle of cells to `NaN`.
///
/// The rectangle starts at `(row, col)` and spans `rows` x `cols` cells;
/// parts falling outside the grid are ignored.
pub fn punch_hole(
    data: &mut [f32],
    width: usize,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) {
    let height = data.len() / width.max(1);
    for r in row..(row + rows).min(height) {
        for c in col..(col + cols).min(width) {
            data[r * width + c] = f32::NAN;
        }
    }
}

/// Creates a grid with NaN values at specified positions.
///
/// `nan_positions` are `(col, row)` pairs; every other cell is `fill`.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    fill: f32,
    nan_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = vec![fill; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}

/// Number of `NaN` cells.
pub fn count_nans(data: &[f32]) -> usize {
    data.iter().filter(|v| v.is_nan()).count()
}
