use serde::{Deserialize, Serialize};

use super::types::{PROCESS_COUNT, ProcessId};

/// Machines installed for one process and the footprint of a single machine.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSpec {
    pub count: u32,
    pub unit_width: f64,
    pub unit_height: f64,
    /// Shared clearance between neighboring machines, per axis.
    pub overlap: f64,
}

/// Default machine footprint used when the equipment table leaves it out.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackingConfig {
    pub unit_width: f64,
    pub unit_height: f64,
    pub overlap: f64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            unit_width: 14.0,
            unit_height: 14.0,
            overlap: 2.0,
        }
    }
}

impl PackingConfig {
    pub fn spec(&self, count: u32) -> EquipmentSpec {
        EquipmentSpec {
            count,
            unit_width: self.unit_width,
            unit_height: self.unit_height,
            overlap: self.overlap,
        }
    }
}

/// Equipment for every process, in alphabet order.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentTable {
    specs: [EquipmentSpec; PROCESS_COUNT],
}

impl EquipmentTable {
    pub fn new(specs: [EquipmentSpec; PROCESS_COUNT]) -> Self {
        Self { specs }
    }

    /// Same machine count for every process, default footprint.
    #[cfg(test)]
    pub fn uniform(count: u32, packing: &PackingConfig) -> Self {
        Self { specs: [packing.spec(count); PROCESS_COUNT] }
    }

    pub fn get(&self, p: ProcessId) -> &EquipmentSpec {
        &self.specs[p.index()]
    }

    pub fn total_machines(&self) -> u64 {
        self.specs.iter().map(|s| u64::from(s.count)).sum()
    }
}
