//! WASM bindings for floorplan-core.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::Settings;
use crate::model::{read_equipment, read_flow_matrix};
use crate::output::LayoutReport;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

#[derive(Debug, Serialize)]
struct ErrorOutput {
    error: String,
}

fn report(flow_csv: &str, equipment_csv: &str, settings: &Settings) -> crate::Result<LayoutReport> {
    let flow = read_flow_matrix(flow_csv.as_bytes())?;
    let equipment = read_equipment(equipment_csv.as_bytes(), &settings.packing)?;
    crate::plan(&flow, &equipment, &settings.layout)
}

/// Lay out CSV inputs and return the report as JSON.
///
/// Errors come back as `{"error": "..."}` instead of a report.
pub fn layout_json(flow_csv: &str, equipment_csv: &str, settings: &Settings) -> Result<String, String> {
    let result = report(flow_csv, equipment_csv, settings).map_err(|e| e.to_string())?;
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

fn error_json(message: String) -> String {
    serde_json::to_string(&ErrorOutput { error: message })
        .unwrap_or_else(|_| "{\"error\": \"Serialization error\"}".to_string())
}

#[wasm_bindgen]
pub fn layout_processes(flow_csv: &str, equipment_csv: &str) -> String {
    match layout_json(flow_csv, equipment_csv, &Settings::default()) {
        Ok(json) => json,
        Err(e) => {
            console_error(&format!("Error laying out processes: {}", e));
            error_json(e)
        }
    }
}

/// Same as `layout_processes` with a JSON settings document.
#[wasm_bindgen]
pub fn layout_processes_with_settings(flow_csv: &str, equipment_csv: &str, settings_json: &str) -> String {
    let settings = match Settings::from_json(settings_json) {
        Ok(s) => s,
        Err(e) => {
            console_error(&format!("Error reading settings: {}", e));
            return error_json(e.to_string());
        }
    };
    match layout_json(flow_csv, equipment_csv, &settings) {
        Ok(json) => json,
        Err(e) => {
            console_error(&format!("Error laying out processes: {}", e));
            error_json(e)
        }
    }
}
