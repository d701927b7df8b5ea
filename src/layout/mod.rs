// Flow-based process layout.
//
// Goals:
// - Every one of the 13 processes gets exactly one position
// - Strongly coupled processes end up near each other
// - No two processes closer than the minimum separation, as far as the
//   fixed iteration budget allows
// - Deterministic for a given seed
//
// Submodules:
// - grid: machine block packing per department
// - force_placement: two-force placement heuristic
// - spatial_grid: neighbor queries for separation checks
//
// Output:
// - Layout with positions, placer footprints and department blocks.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{EquipmentTable, FlowMatrix, PointF, ProcessId};

pub mod force_placement;
pub mod grid;
pub(crate) mod spatial_grid;

pub use force_placement::{place_from_initial, place_processes, random_scatter};
pub use grid::{DepartmentArea, GridConfig, calculate_area_dimensions, department_area, find_optimal_grid};

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeF {
    pub w: f64,
    pub h: f64,
}

/// Axis-aligned rectangle, `(x, y)` is the lower corner.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn centered(center: PointF, size: SizeF) -> Self {
        Self {
            x: center.x - size.w / 2.0,
            y: center.y - size.h / 2.0,
            w: size.w,
            h: size.h,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    pub fn union(&self, other: &RectF) -> RectF {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.top().max(other.top());
        RectF { x: x0, y: y0, w: x1 - x0, h: y1 - y0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Seed for the initial scatter.
    pub seed: u64,
    /// Number of force steps (no convergence check).
    pub iterations: usize,
    /// Initial positions are drawn from `[-scatter, scatter)` on both axes.
    pub scatter: f64,
    pub initial_learning_rate: f64,
    /// Multiplied into the learning rate after every step.
    pub learning_rate_decay: f64,
    /// Attraction grows linearly with distance up to this range, then stays at full strength.
    pub attraction_range: f64,
    /// Pairs closer than this repel each other.
    pub min_separation: f64,
    /// Placer footprint is `footprint_base + footprint_per_machine * count` per axis.
    pub footprint_base: f64,
    pub footprint_per_machine: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 100,
            scatter: 50.0,
            initial_learning_rate: 0.5,
            learning_rate_decay: 0.99,
            attraction_range: 20.0,
            min_separation: 15.0,
            footprint_base: 10.0,
            footprint_per_machine: 2.0,
        }
    }
}

impl LayoutConfig {
    pub fn footprint(&self, equipment_count: u32) -> SizeF {
        let side = self.footprint_base + self.footprint_per_machine * f64::from(equipment_count);
        SizeF { w: side, h: side }
    }

    /// Reject settings the placer cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        let positive = [
            ("scatter", self.scatter),
            ("attraction_range", self.attraction_range),
            ("min_separation", self.min_separation),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(crate::Error::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.initial_learning_rate.is_finite() && self.initial_learning_rate >= 0.0) {
            return Err(crate::Error::Config(format!(
                "initial_learning_rate must be non-negative, got {}",
                self.initial_learning_rate
            )));
        }
        if !(self.learning_rate_decay > 0.0 && self.learning_rate_decay <= 1.0) {
            return Err(crate::Error::Config(format!(
                "learning_rate_decay must be in (0, 1], got {}",
                self.learning_rate_decay
            )));
        }
        Ok(())
    }
}

/// A process with its final position and sizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedProcess {
    pub process: ProcessId,
    /// Center of the process on the floor.
    pub position: PointF,
    /// Square footprint used for the diagram.
    pub footprint: SizeF,
    pub equipment_count: u32,
    /// Machine block of the department.
    pub department: DepartmentArea,
}

impl PlacedProcess {
    pub fn bounds(&self) -> RectF {
        RectF::centered(self.position, self.footprint)
    }
}

/// Result of one layout run, one entry per process in alphabet order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub processes: Vec<PlacedProcess>,
}

impl Layout {
    pub fn position(&self, p: ProcessId) -> PointF {
        self.processes[p.index()].position
    }

    /// Union of all footprints; `None` only for an empty layout.
    pub fn bounding_box(&self) -> Option<RectF> {
        self.processes
            .iter()
            .map(PlacedProcess::bounds)
            .reduce(|acc, r| acc.union(&r))
    }
}

/// Run the placer and attach footprints and department blocks.
pub fn layout_processes(flow: &FlowMatrix, equipment: &EquipmentTable, cfg: &LayoutConfig) -> crate::Result<Layout> {
    cfg.validate()?;
    let positions = place_processes(flow, cfg);
    let layout = assemble(positions, equipment, cfg);
    info!(
        seed = cfg.seed,
        iterations = cfg.iterations,
        processes = layout.processes.len(),
        "process layout complete"
    );
    Ok(layout)
}

/// Build a `Layout` from finished positions.
pub fn assemble(
    positions: [PointF; crate::model::PROCESS_COUNT],
    equipment: &EquipmentTable,
    cfg: &LayoutConfig,
) -> Layout {
    let processes = ProcessId::ALL
        .iter()
        .map(|&p| {
            let spec = equipment.get(p);
            PlacedProcess {
                process: p,
                position: positions[p.index()],
                footprint: cfg.footprint(spec.count),
                equipment_count: spec.count,
                department: department_area(spec),
            }
        })
        .collect();
    Layout { processes }
}
