//! Spatial indexing for efficient neighbour lookup.

use std::collections::HashMap;

/// Spatial grid for 2D neighbour queries over float coordinates.
///
/// The plane is divided into square cells of at least the search radius,
/// so a 3x3 neighbourhood query covers every candidate within the radius.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<u32>>,
}

impl SpatialGrid {
    /// Creates a new grid with the given cell size.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::MIN_POSITIVE),
            cells: HashMap::new(),
        }
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, u: f32, v: f32) -> (i32, i32) {
        ((u / self.cell_size).floor() as i32, (v / self.cell_size).floor() as i32)
    }

    /// Inserts a value at the given plane coordinates.
    pub fn insert(&mut self, u: f32, v: f32, value: u32) {
        let cell = self.cell(u, v);
        self.cells.entry(cell).or_default().push(value);
    }

    /// Collects the 3x3 cell neighbourhood around a point into `out`.
    pub fn query_neighbourhood(&self, u: f32, v: f32, out: &mut Vec<u32>) {
        out.clear();
        let (cu, cv) = self.cell(u, v);
        for du in -1..=1 {
            for dv in -1..=1 {
                if let Some(values) = self.cells.get(&(cu + du, cv + dv)) {
                    out.extend_from_slice(values);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbourhood_query() {
        let mut grid = SpatialGrid::new(0.5);
        grid.insert(1.0, 1.0, 0);
        grid.insert(1.1, 1.1, 1);
        grid.insert(10.0, 10.0, 2);

        let mut found = Vec::new();
        grid.query_neighbourhood(1.0, 1.0, &mut found);
        assert!(found.contains(&0));
        assert!(found.contains(&1));
        assert!(!found.contains(&2));
    }

    #[test]
    fn test_negative_coordinates() {
        let mut grid = SpatialGrid::new(0.5);
        grid.insert(-0.1, -0.1, 0);
        grid.insert(0.1, 0.1, 1);

        // Straddling the origin still lands in adjacent cells.
        let mut found = Vec::new();
        grid.query_neighbourhood(-0.1, -0.1, &mut found);
        assert!(found.contains(&0));
        assert!(found.contains(&1));
    }

    #[test]
    fn test_clear() {
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(0.0, 0.0, 0);
        grid.clear();
        let mut found = Vec::new();
        grid.query_neighbourhood(0.0, 0.0, &mut found);
        assert!(found.is_empty());
    }
}
