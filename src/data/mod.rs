//! Reference data: built-in tables and JSON overrides.
//!
//! `DashboardData` bundles everything the dashboard needs to know about the
//! domain. The binary starts from `DashboardData::builtin()`, or from a JSON
//! file with the same shape (see `ocean data`), so the core can be driven by
//! synthetic tables in tests.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ActionCatalog, TrendSpec};
use crate::error::AppError;

pub mod reference;

pub use reference::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub trends: Vec<TrendSpec>,
    pub catalog: ActionCatalog,
    pub populations: Vec<u64>,
    #[serde(default = "default_year")]
    pub default_year: i32,
}

fn default_year() -> i32 {
    DEFAULT_YEAR
}

impl DashboardData {
    pub fn builtin() -> Result<Self, AppError> {
        Ok(Self {
            trends: default_trends()?,
            catalog: default_catalog()?,
            populations: POPULATIONS.to_vec(),
            default_year: DEFAULT_YEAR,
        })
    }

    /// Built-in data, or the JSON file at `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::read_json(path),
            None => Self::builtin(),
        }
    }

    pub fn read_json(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::new(2, format!("Failed to open data JSON '{}': {e}", path.display())))?;
        let data: DashboardData = serde_json::from_reader(file)
            .map_err(|e| AppError::new(2, format!("Invalid data JSON '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), trends = data.trends.len(), "loaded reference data");
        Ok(data)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), AppError> {
        let file = File::create(path)
            .map_err(|e| AppError::new(4, format!("Failed to create data JSON '{}': {e}", path.display())))?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| AppError::new(4, format!("Failed to write data JSON: {e}")))?;
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::new(4, format!("Failed to encode data JSON: {e}")))
    }

    pub fn trend(&self, key: &str) -> Option<&TrendSpec> {
        self.trends.iter().find(|t| t.key == key)
    }

    /// Like `trend`, but a missing key is a configuration error.
    pub fn require_trend(&self, key: &str) -> Result<&TrendSpec, AppError> {
        self.trend(key)
            .ok_or_else(|| AppError::new(2, format!("Reference data has no trend '{key}'.")))
    }
}
