//! Run settings loaded from an optional JSON file.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```json
//! { "layout": { "seed": 7, "iterations": 200 }, "packing": { "overlap": 0 } }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::LayoutConfig;
use crate::model::PackingConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub packing: PackingConfig,
}

impl Settings {
    pub fn from_json(s: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(s)?;
        settings.layout.validate()?;
        Ok(settings)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let settings: Settings = serde_json::from_reader(reader)?;
        settings.layout.validate()?;
        Ok(settings)
    }

    /// Replace the seed and iteration budget where a value is given,
    /// keeping what the file (or the defaults) said otherwise.
    pub fn with_overrides(mut self, seed: Option<u64>, iterations: Option<usize>) -> Self {
        if let Some(seed) = seed {
            self.layout.seed = seed;
        }
        if let Some(iterations) = iterations {
            self.layout.iterations = iterations;
        }
        self
    }
}
