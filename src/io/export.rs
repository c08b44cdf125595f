//! Export trends and scenario totals.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{ActionContribution, Scenario, ScenarioTotals, TrendCurve, TrendSpec};
use crate::error::AppError;

/// Write a trend to CSV: one row per year.
pub fn write_trend_csv(path: &Path, spec: &TrendSpec, curve: &TrendCurve) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let remainder = curve.remainder();

    // Header
    let header = if remainder.is_some() {
        "trend,unit,year,value,remainder"
    } else {
        "trend,unit,year,value"
    };
    writeln!(file, "{header}").map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for (year, value) in curve.points() {
        let written = match remainder.as_ref().and_then(|r| r.value_at(year)) {
            Some(rem) => writeln!(file, "{},{},{year},{value:.10},{rem:.10}", spec.key, spec.unit),
            None => writeln!(file, "{},{},{year},{value:.10}", spec.key, spec.unit),
        };
        written.map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    tracing::info!(path = %path.display(), trend = %spec.key, rows = curve.values.len(), "wrote trend CSV");
    Ok(())
}

#[derive(Debug, Serialize)]
struct ScenarioExport<'a> {
    tool: &'static str,
    scenario: &'a Scenario,
    totals: &'a ScenarioTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    contributions: Option<&'a [ActionContribution]>,
}

/// Write scenario totals (and optionally per-action rows) to JSON.
pub fn write_scenario_json(
    path: &Path,
    scenario: &Scenario,
    totals: &ScenarioTotals,
    contributions: Option<&[ActionContribution]>,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create scenario JSON '{}': {e}", path.display())))?;
    let export = ScenarioExport {
        tool: "ocean",
        scenario,
        totals,
        contributions,
    };
    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::new(4, format!("Failed to write scenario JSON: {e}")))?;

    tracing::info!(path = %path.display(), actions = scenario.selected.len(), "wrote scenario JSON");
    Ok(())
}
