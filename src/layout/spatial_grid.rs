// Spatial hash grid for close-pair queries.
//
// Points are bucketed into square cells of side `cell_size`. With the cell
// size equal to the query radius, every pair within the radius lies in the
// same or an adjacent cell, so only a 3x3 neighborhood is scanned.

use std::collections::HashMap;

use crate::model::PointF;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    /// Cell coordinates -> indices of the points inside.
    cells: HashMap<(i64, i64), Vec<usize>>,
    points: Vec<PointF>,
}

impl SpatialGrid {
    /// A non-positive or non-finite cell size falls back to 1.0.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 1.0 };
        Self {
            cell_size,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn cell_of(&self, p: PointF) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Insert a point, returning its index.
    pub fn insert(&mut self, p: PointF) -> usize {
        let idx = self.points.len();
        self.points.push(p);
        let cell = self.cell_of(p);
        self.cells.entry(cell).or_default().push(idx);
        idx
    }

    /// Indices of inserted points strictly closer than `radius` to `p`.
    /// Exact for `radius <= cell_size`.
    pub fn query(&self, p: PointF, radius: f64) -> Vec<usize> {
        let (cx, cy) = self.cell_of(p);
        let mut out = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend(indices.iter().copied().filter(|&i| self.points[i].distance(&p) < radius));
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// All index pairs `(i, j)`, `i < j`, closer than the cell size.
    pub fn close_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, &p) in self.points.iter().enumerate() {
            for j in self.query(p, self.cell_size) {
                if j > i {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
