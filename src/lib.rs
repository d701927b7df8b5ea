//! Flow-based process layout for factory floor planning.
//!
//! Loads a 13x13 material-flow matrix and a per-process equipment table,
//! places the processes with a seeded two-force heuristic, packs each
//! department's machines into a grid, and exports locations, flow
//! connections and a summary.

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod output;
mod wasm;

use std::path::Path;

pub use config::Settings;
pub use error::{Error, Result};
pub use layout::{
    GridConfig, Layout, LayoutConfig, PlacedProcess, calculate_area_dimensions, find_optimal_grid,
    layout_processes,
};
pub use model::{EquipmentTable, FlowMatrix, PackingConfig, PointF, ProcessId};
pub use output::LayoutReport;
pub use wasm::layout_json;

/// Lay out already-loaded inputs and build the export report.
pub fn plan(flow: &FlowMatrix, equipment: &EquipmentTable, cfg: &LayoutConfig) -> Result<LayoutReport> {
    let layout = layout_processes(flow, equipment, cfg)?;
    Ok(output::build_report(&layout, flow, cfg))
}

/// Load both CSV inputs from disk and lay them out.
pub fn plan_from_paths(flow_csv: &Path, equipment_csv: &Path, settings: &Settings) -> Result<LayoutReport> {
    let flow = model::read_flow_matrix_path(flow_csv)?;
    let equipment = model::read_equipment_path(equipment_csv, &settings.packing)?;
    plan(&flow, &equipment, &settings.layout)
}
