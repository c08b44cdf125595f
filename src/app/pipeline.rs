//! Shared startup logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! reference data -> validation -> every trend curve evaluated once -> aggregator
//!
//! Any defect in the reference tables surfaces here, before anything is
//! rendered. The CLI and the TUI can then focus on presentation.

use std::collections::BTreeMap;

use crate::data::DashboardData;
use crate::domain::{Scenario, ScenarioTotals, TrendCurve, TrendSpec};
use crate::error::AppError;
use crate::scenario::ScenarioAggregator;
use crate::trend::{Extrapolation, TrendEstimator};

/// Validated reference data with every trend curve precomputed.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub data: DashboardData,
    pub estimator: TrendEstimator,
    pub aggregator: ScenarioAggregator,
    curves: BTreeMap<String, TrendCurve>,
}

impl Dashboard {
    pub fn spec(&self, key: &str) -> Result<&TrendSpec, AppError> {
        self.data.require_trend(key)
    }

    pub fn curve(&self, key: &str) -> Result<&TrendCurve, AppError> {
        self.curves
            .get(key)
            .ok_or_else(|| AppError::new(2, format!("Reference data has no trend '{key}'.")))
    }

    /// Spec and curve for a trend, in reference-data order.
    pub fn trends(&self) -> impl Iterator<Item = (&TrendSpec, &TrendCurve)> {
        self.data
            .trends
            .iter()
            .filter_map(|spec| self.curves.get(&spec.key).map(|c| (spec, c)))
    }

    pub fn aggregate(&self, scenario: &Scenario) -> Result<ScenarioTotals, AppError> {
        Ok(self.aggregator.aggregate(scenario)?)
    }
}

/// Validate `data` and evaluate every trend over its declared range.
pub fn build_dashboard(data: DashboardData, extrapolation: Extrapolation) -> Result<Dashboard, AppError> {
    let estimator = TrendEstimator::new(extrapolation);

    let mut curves = BTreeMap::new();
    for spec in &data.trends {
        let curve = estimator
            .estimate_spec(spec)
            .map_err(|e| AppError::new(2, format!("Trend '{}': {e}", spec.key)))?;
        if curves.insert(spec.key.clone(), curve).is_some() {
            return Err(AppError::new(2, format!("Duplicate trend key '{}'.", spec.key)));
        }
    }

    if data.populations.is_empty() {
        return Err(AppError::new(2, "Reference data defines no population options."));
    }

    let aggregator = ScenarioAggregator::new(data.catalog.clone());
    tracing::info!(
        trends = curves.len(),
        actions = data.catalog.actions().len(),
        metrics = data.catalog.metrics().len(),
        ?extrapolation,
        "reference data validated"
    );

    Ok(Dashboard {
        data,
        estimator,
        aggregator,
        curves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TREND_CORAL, TREND_SEA_LEVEL};
    use crate::domain::{AnchorSeries, YearRange};

    #[test]
    fn builtin_dashboard_builds() {
        let dash = build_dashboard(DashboardData::builtin().unwrap(), Extrapolation::Reject).unwrap();
        assert_eq!(dash.trends().count(), 6);
        assert_eq!(dash.curve(TREND_CORAL).unwrap().value_at(2024), Some(84.0));
        let sea = dash.curve(TREND_SEA_LEVEL).unwrap().value_at(2002).unwrap();
        assert!((sea - 6.8).abs() < 1e-9);
    }

    #[test]
    fn range_outside_anchors_fails_fast() {
        let mut data = DashboardData::builtin().unwrap();
        data.trends[0].range = YearRange::new(1970, 2024).unwrap();
        let err = build_dashboard(data.clone(), Extrapolation::Reject).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("anchor span"), "{err}");

        // The same table is accepted when extrapolation is allowed.
        assert!(build_dashboard(data, Extrapolation::ClampYear).is_ok());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut data = DashboardData::builtin().unwrap();
        let mut dup = data.trends[0].clone();
        dup.anchors = AnchorSeries::from_pairs(&[(1980, 1.0), (2024, 2.0)]).unwrap();
        data.trends.push(dup);
        assert!(build_dashboard(data, Extrapolation::Reject).is_err());
    }
}
