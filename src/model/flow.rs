// Material flow between processes.
//
// The matrix is stored as entered (directed, `from -> to`). Layout only cares
// about how strongly two processes are coupled, so most consumers go through
// `adjacency`, which sums both directions.

use super::types::{PROCESS_COUNT, ProcessId};

/// A directed flow entry with a positive volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Connection {
    pub from: ProcessId,
    pub to: ProcessId,
    pub flow: f64,
}

/// Square matrix of weekly flow volumes indexed by `(from, to)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowMatrix {
    values: [[f64; PROCESS_COUNT]; PROCESS_COUNT],
}

impl Default for FlowMatrix {
    fn default() -> Self {
        Self::zeros()
    }
}

impl FlowMatrix {
    pub fn zeros() -> Self {
        Self { values: [[0.0; PROCESS_COUNT]; PROCESS_COUNT] }
    }

    pub fn get(&self, from: ProcessId, to: ProcessId) -> f64 {
        self.values[from.index()][to.index()]
    }

    pub fn set(&mut self, from: ProcessId, to: ProcessId, flow: f64) {
        self.values[from.index()][to.index()] = flow;
    }

    /// Coupling between two processes regardless of direction.
    pub fn adjacency(&self, a: ProcessId, b: ProcessId) -> f64 {
        self.get(a, b) + self.get(b, a)
    }

    /// Largest single entry, 0.0 for an empty matrix.
    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .flat_map(|row| row.iter())
            .fold(0.0_f64, |acc, &v| acc.max(v))
    }

    pub fn total(&self) -> f64 {
        self.values.iter().flat_map(|row| row.iter()).sum()
    }

    /// Copy scaled so the largest entry is 1.0. A zero matrix is returned as is.
    pub fn normalized(&self) -> FlowMatrix {
        let max = self.max();
        if max <= 0.0 {
            return self.clone();
        }
        let mut out = self.clone();
        for row in out.values.iter_mut() {
            for v in row.iter_mut() {
                *v /= max;
            }
        }
        out
    }

    /// All entries with positive flow, row-major in alphabet order.
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        for from in ProcessId::ALL {
            for to in ProcessId::ALL {
                let flow = self.get(from, to);
                if flow > 0.0 {
                    out.push(Connection { from, to, flow });
                }
            }
        }
        out
    }

    /// Neighbors of a process with their bidirectional coupling, strongest first.
    /// Ties keep alphabet order.
    pub fn neighbors(&self, p: ProcessId) -> Vec<(ProcessId, f64)> {
        let mut out: Vec<(ProcessId, f64)> = ProcessId::ALL
            .iter()
            .filter(|&&q| q != p)
            .map(|&q| (q, self.adjacency(p, q)))
            .filter(|&(_, w)| w > 0.0)
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }

    /// Total coupling of a process to every other process.
    pub fn weighted_degree(&self, p: ProcessId) -> f64 {
        self.neighbors(p).iter().map(|(_, w)| w).sum()
    }
}
