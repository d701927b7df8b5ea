//! Export types for a finished layout.
//!
//! These rows are written as `Process_Locations.csv` and
//! `Flow_Connections.csv`, and the summary as `Layout_Summary.json`. The
//! combined `LayoutReport` is what the WASM entry point returns.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::layout::spatial_grid::SpatialGrid;
use crate::layout::{Layout, LayoutConfig, RectF};
use crate::model::{FlowMatrix, ProcessId};

pub const PROCESS_LOCATIONS_FILE: &str = "Process_Locations.csv";
pub const FLOW_CONNECTIONS_FILE: &str = "Flow_Connections.csv";
pub const SUMMARY_FILE: &str = "Layout_Summary.json";

/// One row of `Process_Locations.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessLocation {
    pub process: ProcessId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub equipment_count: u32,
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub area_width: f64,
    pub area_height: f64,
}

/// One row of `Flow_Connections.csv`: a directed matrix entry with positive flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowConnection {
    pub from: ProcessId,
    pub to: ProcessId,
    pub flow: f64,
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub process_count: usize,
    pub connection_count: usize,
    pub total_flow: f64,
    pub total_machines: u64,
    /// Union of all placer footprints.
    pub bounding_box: Option<RectF>,
    /// Sum of `flow * distance` over all connections.
    pub flow_weighted_distance: f64,
    /// Smallest center-to-center distance between any two processes.
    pub closest_pair_distance: f64,
    /// Pairs closer than the configured minimum separation.
    pub separation_violations: usize,
    /// Process with the largest total coupling, if there is any flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_process: Option<ProcessId>,
    /// Sum of the packed department blocks.
    pub department_area_total: f64,
}

/// Everything produced for one layout run.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub processes: Vec<ProcessLocation>,
    pub connections: Vec<FlowConnection>,
    pub summary: LayoutSummary,
}

pub fn process_locations(layout: &Layout) -> Vec<ProcessLocation> {
    layout
        .processes
        .iter()
        .map(|p| ProcessLocation {
            process: p.process,
            x: p.position.x,
            y: p.position.y,
            width: p.footprint.w,
            height: p.footprint.h,
            equipment_count: p.equipment_count,
            grid_rows: p.department.grid.rows,
            grid_cols: p.department.grid.cols,
            area_width: p.department.size.w,
            area_height: p.department.size.h,
        })
        .collect()
}

pub fn flow_connections(layout: &Layout, flow: &FlowMatrix) -> Vec<FlowConnection> {
    flow.connections()
        .into_iter()
        .map(|c| {
            let a = layout.position(c.from);
            let b = layout.position(c.to);
            FlowConnection {
                from: c.from,
                to: c.to,
                flow: c.flow,
                from_x: a.x,
                from_y: a.y,
                to_x: b.x,
                to_y: b.y,
                distance: a.distance(&b),
            }
        })
        .collect()
}

pub fn summarize(layout: &Layout, flow: &FlowMatrix, connections: &[FlowConnection], cfg: &LayoutConfig) -> LayoutSummary {
    let mut closest = f64::INFINITY;
    for (i, a) in layout.processes.iter().enumerate() {
        for b in &layout.processes[i + 1..] {
            closest = closest.min(a.position.distance(&b.position));
        }
    }

    let mut grid = SpatialGrid::new(cfg.min_separation);
    for p in &layout.processes {
        grid.insert(p.position);
    }

    let busiest_process = ProcessId::ALL
        .iter()
        .map(|&p| (p, flow.weighted_degree(p)))
        .filter(|&(_, w)| w > 0.0)
        .fold(None, |best: Option<(ProcessId, f64)>, cur| match best {
            Some(b) if b.1 >= cur.1 => Some(b),
            _ => Some(cur),
        })
        .map(|(p, _)| p);

    LayoutSummary {
        process_count: layout.processes.len(),
        connection_count: connections.len(),
        total_flow: flow.total(),
        total_machines: layout.processes.iter().map(|p| u64::from(p.equipment_count)).sum(),
        bounding_box: layout.bounding_box(),
        flow_weighted_distance: connections.iter().map(|c| c.flow * c.distance).sum(),
        closest_pair_distance: closest,
        separation_violations: grid.close_pairs().len(),
        busiest_process,
        department_area_total: layout.processes.iter().map(|p| p.department.area()).sum(),
    }
}

pub fn build_report(layout: &Layout, flow: &FlowMatrix, cfg: &LayoutConfig) -> LayoutReport {
    let processes = process_locations(layout);
    let connections = flow_connections(layout, flow);
    let summary = summarize(layout, flow, &connections, cfg);
    LayoutReport { processes, connections, summary }
}

fn write_rows<W: Write, T: Serialize>(w: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_process_locations<W: Write>(w: W, rows: &[ProcessLocation]) -> Result<()> {
    write_rows(w, rows)
}

pub fn write_flow_connections<W: Write>(w: W, rows: &[FlowConnection]) -> Result<()> {
    write_rows(w, rows)
}

/// Paths of the files written by `write_report`.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub process_locations: PathBuf,
    pub flow_connections: PathBuf,
    pub summary: PathBuf,
}

/// Write the two CSV tables and the JSON summary into `dir`, creating it if needed.
pub fn write_report(dir: &Path, report: &LayoutReport) -> Result<OutputPaths> {
    fs::create_dir_all(dir)?;
    let paths = OutputPaths {
        process_locations: dir.join(PROCESS_LOCATIONS_FILE),
        flow_connections: dir.join(FLOW_CONNECTIONS_FILE),
        summary: dir.join(SUMMARY_FILE),
    };

    write_process_locations(File::create(&paths.process_locations)?, &report.processes)?;
    write_flow_connections(File::create(&paths.flow_connections)?, &report.connections)?;
    let summary = File::create(&paths.summary)?;
    serde_json::to_writer_pretty(summary, &report.summary)?;

    info!(dir = %dir.display(), connections = report.connections.len(), "wrote layout report");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{assemble, SizeF};
    use crate::model::{EquipmentTable, PackingConfig, PointF, PROCESS_COUNT};

    /// Processes on a 30-unit row, A at the origin.
    fn row_layout(counts: u32) -> Layout {
        let mut positions = [PointF::default(); PROCESS_COUNT];
        for (i, p) in positions.iter_mut().enumerate() {
            *p = PointF::new(30.0 * i as f64, 0.0);
        }
        let equipment = EquipmentTable::uniform(counts, &PackingConfig::default());
        assemble(positions, &equipment, &LayoutConfig::default())
    }

    fn sample_flow() -> FlowMatrix {
        let mut flow = FlowMatrix::zeros();
        flow.set(ProcessId::A, ProcessId::C, 10.0);
        flow.set(ProcessId::C, ProcessId::A, 2.0);
        flow.set(ProcessId::D, ProcessId::E, 4.0);
        flow
    }

    #[test]
    fn test_connections_only_positive_entries() {
        let layout = row_layout(1);
        let conns = flow_connections(&layout, &sample_flow());
        assert_eq!(conns.len(), 3);
        assert_eq!((conns[0].from, conns[0].to), (ProcessId::A, ProcessId::C));
        assert_eq!(conns[0].distance, 60.0);
        assert_eq!((conns[0].to_x, conns[0].to_y), (60.0, 0.0));
    }

    #[test]
    fn test_summary() {
        let layout = row_layout(4);
        let flow = sample_flow();
        let report = build_report(&layout, &flow, &LayoutConfig::default());
        let s = &report.summary;

        assert_eq!(s.process_count, 13);
        assert_eq!(s.connection_count, 3);
        assert_eq!(s.total_flow, 16.0);
        assert_eq!(s.total_machines, 52);
        assert_eq!(s.flow_weighted_distance, 10.0 * 60.0 + 2.0 * 60.0 + 4.0 * 30.0);
        assert_eq!(s.closest_pair_distance, 30.0);
        assert_eq!(s.separation_violations, 0);
        assert_eq!(s.busiest_process, Some(ProcessId::A));

        // footprint 18 wide, centers from 0 to 360
        let bbox = s.bounding_box.unwrap();
        assert_eq!((bbox.x, bbox.y, bbox.w, bbox.h), (-9.0, -9.0, 378.0, 18.0));

        // 4 machines pack 2x2 at 14 with overlap 2 -> 26x26
        assert_eq!(report.processes[0].grid_rows, 2);
        assert_eq!(s.department_area_total, 13.0 * 26.0 * 26.0);
    }

    #[test]
    fn test_separation_violations_counted() {
        let mut layout = row_layout(0);
        layout.processes[1].position = PointF::new(5.0, 0.0);
        let s = summarize(&layout, &FlowMatrix::zeros(), &[], &LayoutConfig::default());
        assert_eq!(s.separation_violations, 1);
        assert_eq!(s.closest_pair_distance, 5.0);
        assert_eq!(s.busiest_process, None);
        assert_eq!(layout.processes[0].footprint, SizeF { w: 10.0, h: 10.0 });
    }

    #[test]
    fn test_csv_headers_and_rows() {
        let layout = row_layout(2);
        let mut buf = Vec::new();
        write_process_locations(&mut buf, &process_locations(&layout)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("process,x,y,width,height,equipment_count,grid_rows,grid_cols,area_width,area_height")
        );
        assert_eq!(lines.next(), Some("A,0.0,0.0,14.0,14.0,2,1,2,26.0,14.0"));
        assert_eq!(text.lines().count(), 14);

        let mut buf = Vec::new();
        write_flow_connections(&mut buf, &flow_connections(&layout, &sample_flow())).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("from,to,flow,from_x,from_y,to_x,to_y,distance\n"));
        assert!(text.contains("\nD,E,4.0,90.0,0.0,120.0,0.0,30.0\n"));
    }
}
