mod equipment;
mod flow;
pub(crate) mod load;
mod types;

pub use equipment::{EquipmentSpec, EquipmentTable, PackingConfig};
pub use flow::{Connection, FlowMatrix};
pub use load::{read_equipment, read_equipment_path, read_flow_matrix, read_flow_matrix_path};
pub use types::*;
