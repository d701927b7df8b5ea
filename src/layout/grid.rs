//! Grid packing of identical machines inside a process department.
//!
//! A department with `n` machines is laid out as a `rows x cols` block. The
//! block is chosen to waste as few slots as possible and, among equally
//! wasteful blocks, to be as close to square as possible.

use serde::Serialize;

use super::SizeF;
use crate::model::EquipmentSpec;

/// Rows and columns of a machine block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
}

impl GridConfig {
    pub const EMPTY: GridConfig = GridConfig { rows: 0, cols: 0 };

    pub fn slots(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }

    /// Unused slots when `count` machines are placed in this block.
    pub fn waste(&self, count: u32) -> u64 {
        self.slots().saturating_sub(u64::from(count))
    }

    /// `max(rows, cols) / min(rows, cols)`; infinite for a degenerate block.
    pub fn aspect(&self) -> f64 {
        let lo = self.rows.min(self.cols);
        if lo == 0 {
            return f64::INFINITY;
        }
        f64::from(self.rows.max(self.cols)) / f64::from(lo)
    }
}

/// Pick the block for `count` machines.
///
/// Rows are scanned upward from 1 with `cols = ceil(count / rows)`. The first
/// candidate with the least waste wins; a later candidate with equal waste
/// replaces it only when its aspect ratio is strictly smaller. Since
/// `rows = 1` always has zero waste, the result is the most square
/// zero-waste factorization, preferring fewer rows on ties.
///
/// The scan is linear in `count`; the equipment loader caps counts at
/// `MAX_MACHINES_PER_PROCESS`.
pub fn find_optimal_grid(count: u32) -> GridConfig {
    if count == 0 {
        return GridConfig::EMPTY;
    }

    let mut best = GridConfig { rows: 1, cols: count };
    let mut best_waste = best.waste(count);
    let mut best_aspect = best.aspect();

    for rows in 2..=count {
        let candidate = GridConfig { rows, cols: count.div_ceil(rows) };
        let waste = candidate.waste(count);
        let aspect = candidate.aspect();
        if waste < best_waste || (waste == best_waste && aspect < best_aspect) {
            best = candidate;
            best_waste = waste;
            best_aspect = aspect;
        }
    }
    best
}

/// Outer size of a machine block.
///
/// With a positive `overlap`, neighboring machines share that much clearance
/// along each axis, so `n` machines span `n * unit - (n - 1) * overlap`.
pub fn calculate_area_dimensions(grid: GridConfig, unit_w: f64, unit_h: f64, overlap: f64) -> SizeF {
    let span = |n: u32, unit: f64| -> f64 {
        let n = f64::from(n);
        if overlap > 0.0 {
            if n > 0.0 { n * unit - (n - 1.0) * overlap } else { 0.0 }
        } else {
            n * unit
        }
    };
    SizeF { w: span(grid.cols, unit_w), h: span(grid.rows, unit_h) }
}

/// Packed block of one process's machines.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DepartmentArea {
    pub grid: GridConfig,
    pub size: SizeF,
}

impl DepartmentArea {
    pub fn area(&self) -> f64 {
        self.size.w * self.size.h
    }
}

pub fn department_area(spec: &EquipmentSpec) -> DepartmentArea {
    let grid = find_optimal_grid(spec.count);
    let size = calculate_area_dimensions(grid, spec.unit_width, spec.unit_height, spec.overlap);
    DepartmentArea { grid, size }
}
