/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It divides the world into square cells of `cell_size` units, allowing
 * near-constant-time neighbor queries instead of linear searches.
 *
 * The grid is rebuilt from scratch every frame from the previous frame's
 * positions. Cell coordinates wrap around the world edges the same way boid
 * positions do, so a query next to the left edge also scans the right-most
 * column.
 *
 * Optimized for performance by:
 * - Storing cells in one flat vector indexed by row * cols + col
 * - Reusing the per-cell vectors between rebuilds (clear keeps capacity)
 * - Writing query results into a caller-owned buffer
 */

use glam::DVec2;
use tracing::debug;

use crate::world::World;

pub struct SpatialGrid {
    cell_size: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
    // Cell index of every boid from the last rebuild
    boid_cells: Vec<usize>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64, world: World) -> Self {
        let cols = ((world.width / cell_size).ceil() as usize).max(1);
        let rows = ((world.height / cell_size).ceil() as usize).max(1);

        debug!(cell_size, cols, rows, "creating spatial grid");

        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            boid_cells: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True if this grid was built for the given cell size and world.
    pub fn fits(&self, cell_size: f64, world: World) -> bool {
        let other = Self::dimensions(cell_size, world);
        self.cell_size == cell_size && (self.cols, self.rows) == other
    }

    fn dimensions(cell_size: f64, world: World) -> (usize, usize) {
        (
            ((world.width / cell_size).ceil() as usize).max(1),
            ((world.height / cell_size).ceil() as usize).max(1),
        )
    }

    // Convert world coordinates to (col, row), clamped into the grid
    #[inline]
    pub fn cell_coords(&self, position: DVec2) -> (usize, usize) {
        let col = (position.x / self.cell_size).floor();
        let row = (position.y / self.cell_size).floor();
        (
            col.clamp(0.0, (self.cols - 1) as f64) as usize,
            row.clamp(0.0, (self.rows - 1) as f64) as usize,
        )
    }

    #[inline]
    pub fn cell_index(&self, position: DVec2) -> usize {
        let (col, row) = self.cell_coords(position);
        row * self.cols + col
    }

    /// Boid indices stored in one cell.
    pub fn cell(&self, cell_index: usize) -> &[usize] {
        &self.cells[cell_index]
    }

    /// Cell a boid was placed in by the last rebuild.
    pub fn cell_of(&self, boid_index: usize) -> Option<usize> {
        self.boid_cells.get(boid_index).copied()
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.boid_cells.clear();
    }

    /// Discard the previous contents and insert every boid by its position.
    pub fn rebuild(&mut self, positions: &[DVec2]) {
        self.clear();
        self.boid_cells.reserve(positions.len());

        for (i, &position) in positions.iter().enumerate() {
            let cell_index = self.cell_index(position);
            self.cells[cell_index].push(i);
            self.boid_cells.push(cell_index);
        }
    }

    /// Append every boid in the 3x3 block of cells centered on `position`.
    pub fn query_3x3(&self, position: DVec2, out: &mut Vec<usize>) {
        self.query(position, 1, out);
    }

    /// Append every boid in the `(2 * reach + 1)` square block of cells
    /// centered on `position`. Each cell is visited once even when the block
    /// is wider than the grid.
    pub fn query(&self, position: DVec2, reach: usize, out: &mut Vec<usize>) {
        let (col, row) = self.cell_coords(position);
        let (col_start, col_count) = wrapped_span(col, reach, self.cols);
        let (row_start, row_count) = wrapped_span(row, reach, self.rows);

        for r in 0..row_count {
            let row_offset = ((row_start + r) % self.rows) * self.cols;
            for c in 0..col_count {
                let cell_index = row_offset + (col_start + c) % self.cols;
                out.extend_from_slice(&self.cells[cell_index]);
            }
        }
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn max_occupancy(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }
}

// First cell and number of cells of a wrapped span of `reach` cells each side of `center`
#[inline]
fn wrapped_span(center: usize, reach: usize, len: usize) -> (usize, usize) {
    let span = 2 * reach + 1;
    if span >= len {
        (0, len)
    } else {
        ((center + len - reach % len) % len, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid {
        SpatialGrid::new(40.0, World::new(800.0, 600.0))
    }

    fn positions() -> Vec<DVec2> {
        vec![
            DVec2::new(5.0, 300.0),
            DVec2::new(795.0, 300.0),
            DVec2::new(400.0, 300.0),
            DVec2::new(39.999, 0.0),
            DVec2::new(40.0, 0.0),
            DVec2::new(799.9, 599.9),
            DVec2::new(400.0, 300.0),
        ]
    }

    #[test]
    fn dimensions_follow_world_and_cell_size() {
        let grid = grid();
        assert_eq!((grid.cols(), grid.rows()), (20, 15));
        assert_eq!(grid.cell_count(), 300);

        let partial = SpatialGrid::new(40.0, World::new(810.0, 600.0));
        assert_eq!(partial.cols(), 21);
        assert!(!partial.fits(40.0, World::new(800.0, 600.0)));
        assert!(grid.fits(40.0, World::new(800.0, 600.0)));
    }

    #[test]
    fn cells_truncate_coordinates() {
        let grid = grid();
        assert_eq!(grid.cell_coords(DVec2::new(39.999, 0.0)), (0, 0));
        assert_eq!(grid.cell_coords(DVec2::new(40.0, 0.0)), (1, 0));
        assert_eq!(grid.cell_coords(DVec2::new(799.9, 599.9)), (19, 14));
        // Out-of-world points land in the edge cell instead of panicking
        assert_eq!(grid.cell_coords(DVec2::new(-3.0, 700.0)), (0, 14));
    }

    #[test]
    fn rebuild_places_every_boid_in_exactly_one_cell() {
        let mut grid = grid();
        let positions = positions();
        grid.rebuild(&positions);

        let mut seen = vec![0usize; positions.len()];
        for cell_index in 0..grid.cell_count() {
            for &i in grid.cell(cell_index) {
                seen[i] += 1;
                assert_eq!(cell_index, grid.cell_index(positions[i]));
                assert_eq!(grid.cell_of(i), Some(cell_index));
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn rebuild_discards_previous_contents() {
        let mut grid = grid();
        grid.rebuild(&positions());
        grid.rebuild(&[DVec2::new(100.0, 100.0)]);

        let total: usize = (0..grid.cell_count()).map(|c| grid.cell(c).len()).sum();
        assert_eq!(total, 1);
        assert_eq!(grid.cell_of(1), None);
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn query_includes_self_and_coincident_boids() {
        let mut grid = grid();
        let positions = positions();
        grid.rebuild(&positions);

        for (i, &position) in positions.iter().enumerate() {
            let mut out = Vec::new();
            grid.query_3x3(position, &mut out);
            assert!(out.contains(&i), "boid {i} missing from its own neighborhood");
        }

        let mut out = Vec::new();
        grid.query_3x3(DVec2::new(400.0, 300.0), &mut out);
        out.sort_unstable();
        assert_eq!(out, vec![2, 6]);
    }

    #[test]
    fn query_wraps_across_world_edges() {
        let mut grid = grid();
        let positions = positions();
        grid.rebuild(&positions);

        let mut out = Vec::new();
        grid.query_3x3(positions[0], &mut out);
        assert!(out.contains(&1), "right-edge boid not found from left edge");

        // Corner cell (19, 14) neighbors the origin cell (0, 0)
        out.clear();
        grid.query_3x3(DVec2::new(1.0, 1.0), &mut out);
        assert!(out.contains(&5));
        assert!(out.contains(&3));
        assert!(out.contains(&4));
    }

    #[test]
    fn query_does_not_duplicate_cells_on_tiny_grids() {
        let mut grid = SpatialGrid::new(40.0, World::new(80.0, 80.0));
        grid.rebuild(&[DVec2::new(10.0, 10.0), DVec2::new(70.0, 70.0)]);

        let mut out = Vec::new();
        grid.query(DVec2::new(10.0, 10.0), 3, &mut out);
        out.sort_unstable();
        assert_eq!(out, vec![0, 1]);
    }

    #[test]
    fn wider_reach_scans_more_cells() {
        let mut grid = grid();
        grid.rebuild(&[DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0)]);

        let mut out = Vec::new();
        grid.query_3x3(DVec2::new(100.0, 100.0), &mut out);
        assert_eq!(out, vec![0]);

        out.clear();
        grid.query(DVec2::new(100.0, 100.0), 3, &mut out);
        out.sort_unstable();
        assert_eq!(out, vec![0, 1]);
    }
}
