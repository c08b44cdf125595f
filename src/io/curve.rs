//! Read/write trend JSON files.
//!
//! Trend JSON is the "portable" representation of an evaluated trend:
//! - the trend definition it came from (anchors, range, bounds)
//! - the extrapolation policy used
//! - the evaluated year grid (and remainder for percent curves)
//!
//! `ocean plot --curve` reads these back without re-running the estimator.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{TrendCurve, TrendSpec};
use crate::error::AppError;
use crate::trend::Extrapolation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub spec: TrendSpec,
    pub extrapolation: Extrapolation,
    pub grid: TrendGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendGrid {
    pub years: Vec<i32>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remainder: Option<Vec<f64>>,
}

impl TrendFile {
    pub fn new(spec: &TrendSpec, curve: &TrendCurve, extrapolation: Extrapolation) -> Self {
        Self {
            tool: "ocean".to_string(),
            generated_at: Utc::now(),
            spec: spec.clone(),
            extrapolation,
            grid: TrendGrid {
                years: curve.range.years().collect(),
                values: curve.values.clone(),
                remainder: curve.remainder().map(|r| r.values),
            },
        }
    }

    /// Rebuild the evaluated curve stored in the grid.
    pub fn to_curve(&self) -> Result<TrendCurve, AppError> {
        let (Some(&start), Some(&end)) = (self.grid.years.first(), self.grid.years.last()) else {
            return Err(AppError::new(2, "Trend JSON has an empty grid."));
        };
        let range = crate::domain::YearRange::new(start, end)?;
        if range.year_count() != self.grid.years.len() || range.year_count() != self.grid.values.len() {
            return Err(AppError::new(2, "Trend JSON grid is not one value per consecutive year."));
        }
        Ok(TrendCurve {
            kind: self.spec.kind,
            range,
            bounds: self.spec.bounds,
            values: self.grid.values.clone(),
        })
    }
}

/// Write a trend JSON file.
pub fn write_trend_json(
    path: &Path,
    spec: &TrendSpec,
    curve: &TrendCurve,
    extrapolation: Extrapolation,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create trend JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &TrendFile::new(spec, curve, extrapolation))
        .map_err(|e| AppError::new(4, format!("Failed to write trend JSON: {e}")))?;

    tracing::info!(path = %path.display(), trend = %spec.key, "wrote trend JSON");
    Ok(())
}

/// Read a trend JSON file.
pub fn read_trend_json(path: &Path) -> Result<TrendFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open trend JSON '{}': {e}", path.display())))?;
    let trend: TrendFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid trend JSON: {e}")))?;
    Ok(trend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DashboardData, TREND_CORAL};
    use crate::trend::TrendEstimator;

    #[test]
    fn trend_file_restores_curve() {
        let data = DashboardData::builtin().unwrap();
        let spec = data.trend(TREND_CORAL).unwrap();
        let curve = TrendEstimator::default().estimate_spec(spec).unwrap();

        let file = TrendFile::new(spec, &curve, Extrapolation::Reject);
        assert_eq!(file.grid.years.len(), 45);
        assert_eq!(file.grid.remainder.as_ref().unwrap()[44], 16.0);

        let json = serde_json::to_string(&file).unwrap();
        let back: TrendFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_curve().unwrap(), curve);
    }

    #[test]
    fn exported_file_reads_back_bit_for_bit() {
        let data = DashboardData::builtin().unwrap();
        let spec = data.trend(TREND_CORAL).unwrap();
        let curve = TrendEstimator::default().estimate_spec(spec).unwrap();

        let path = std::env::temp_dir().join(format!("ocean-dash-coral-{}.json", std::process::id()));
        write_trend_json(&path, spec, &curve, Extrapolation::Reject).unwrap();
        let file = read_trend_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let back = file.to_curve().unwrap();
        for ((year, a), b) in curve.points().zip(&back.values) {
            assert_eq!(a.to_bits(), b.to_bits(), "year {year}: {a} vs {b}");
        }
        assert_eq!(file.extrapolation, Extrapolation::Reject);
    }

    #[test]
    fn gaps_in_grid_are_rejected() {
        let data = DashboardData::builtin().unwrap();
        let spec = data.trend(TREND_CORAL).unwrap();
        let curve = TrendEstimator::default().estimate_spec(spec).unwrap();
        let mut file = TrendFile::new(spec, &curve, Extrapolation::Reject);
        file.grid.years.remove(3);
        assert!(file.to_curve().is_err());
    }
}
