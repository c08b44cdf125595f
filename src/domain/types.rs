//! Shared domain types.
//!
//! These types are value objects: validated on construction (including when
//! deserialized from a reference-data file) so the estimator and aggregator
//! can assume their invariants.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, ScenarioError};

/// A known `(year, value)` pair used to fit a trend curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub year: i32,
    pub value: f64,
}

impl AnchorPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Anchor points sorted by strictly increasing year (at least two).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AnchorPoint>", into = "Vec<AnchorPoint>")]
pub struct AnchorSeries {
    points: Vec<AnchorPoint>,
}

impl AnchorSeries {
    pub fn new(points: Vec<AnchorPoint>) -> Result<Self, EstimateError> {
        if points.len() < 2 {
            return Err(EstimateError::InvalidAnchors(format!(
                "need at least 2 points, got {}",
                points.len()
            )));
        }
        for w in points.windows(2) {
            if w[1].year <= w[0].year {
                return Err(EstimateError::InvalidAnchors(format!(
                    "years must be strictly increasing ({} then {})",
                    w[0].year, w[1].year
                )));
            }
        }
        if let Some(p) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(EstimateError::InvalidAnchors(format!(
                "non-finite value at year {}",
                p.year
            )));
        }
        Ok(Self { points })
    }

    /// Convenience constructor from `(year, value)` tuples.
    pub fn from_pairs(pairs: &[(i32, f64)]) -> Result<Self, EstimateError> {
        Self::new(pairs.iter().map(|&(y, v)| AnchorPoint::new(y, v)).collect())
    }

    pub fn points(&self) -> &[AnchorPoint] {
        &self.points
    }

    pub fn min_year(&self) -> i32 {
        self.points[0].year
    }

    pub fn max_year(&self) -> i32 {
        self.points[self.points.len() - 1].year
    }

    pub fn span(&self) -> YearRange {
        YearRange {
            start: self.min_year(),
            end: self.max_year(),
        }
    }
}

impl TryFrom<Vec<AnchorPoint>> for AnchorSeries {
    type Error = EstimateError;

    fn try_from(points: Vec<AnchorPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<AnchorSeries> for Vec<AnchorPoint> {
    fn from(series: AnchorSeries) -> Self {
        series.points
    }
}

#[derive(Deserialize)]
struct RawYearRange {
    start: i32,
    end: i32,
}

/// Inclusive, non-empty range of integer years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawYearRange")]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, EstimateError> {
        if end < start {
            return Err(EstimateError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of years in the range (never zero).
    pub fn year_count(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1) as usize
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn within(&self, outer: &YearRange) -> bool {
        self.start >= outer.start && self.end <= outer.end
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + use<> {
        self.start..=self.end
    }

    /// Clamp `year` into the range.
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.start, self.end)
    }
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = EstimateError;

    fn try_from(raw: RawYearRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

#[derive(Deserialize)]
struct RawValueBounds {
    low: f64,
    high: f64,
}

/// Closed interval every value of a bounded curve is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValueBounds")]
pub struct ValueBounds {
    low: f64,
    high: f64,
}

impl ValueBounds {
    pub const PERCENT: ValueBounds = ValueBounds { low: 0.0, high: 100.0 };

    pub fn new(low: f64, high: f64) -> Result<Self, EstimateError> {
        if !(low.is_finite() && high.is_finite() && low <= high) {
            return Err(EstimateError::InvalidBounds { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.low, self.high)
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.low && v <= self.high
    }
}

impl TryFrom<RawValueBounds> for ValueBounds {
    type Error = EstimateError;

    fn try_from(raw: RawValueBounds) -> Result<Self, Self::Error> {
        Self::new(raw.low, raw.high)
    }
}

/// Whether a curve is a plain level or a share of a whole (percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Level,
    Percent,
}

/// One value per integer year of `range`, in year order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendCurve {
    pub kind: ValueKind,
    pub range: YearRange,
    pub bounds: Option<ValueBounds>,
    pub values: Vec<f64>,
}

impl TrendCurve {
    pub fn value_at(&self, year: i32) -> Option<f64> {
        if !self.range.contains(year) {
            return None;
        }
        self.values.get((year - self.range.start()) as usize).copied()
    }

    pub fn points(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.range.years().zip(self.values.iter().copied())
    }

    /// Points as `(f64, f64)` pairs, for chart series.
    pub fn series(&self) -> Vec<(f64, f64)> {
        self.points().map(|(y, v)| (f64::from(y), v)).collect()
    }

    /// Complementary `100 - value` curve. Only percent curves have one.
    pub fn remainder(&self) -> Option<TrendCurve> {
        if self.kind != ValueKind::Percent {
            return None;
        }
        Some(TrendCurve {
            kind: ValueKind::Percent,
            range: self.range,
            bounds: self.bounds,
            values: self.values.iter().map(|v| 100.0 - v).collect(),
        })
    }

    /// Smallest value (`+inf` for an empty curve).
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value (`-inf` for an empty curve).
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Named reference trend: anchors plus how to evaluate and label them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSpec {
    pub key: String,
    pub label: String,
    pub unit: String,
    pub kind: ValueKind,
    pub anchors: AnchorSeries,
    pub range: YearRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<ValueBounds>,
    /// Label of the `100 - value` series for percent curves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remainder_label: Option<String>,
    /// Decimal places used when printing a single value.
    #[serde(default = "default_places")]
    pub places: usize,
}

fn default_places() -> usize {
    2
}

/// How a metric total is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum MetricDisplay {
    /// Fixed decimal places.
    Decimal { places: usize },
    /// Truncated to an integer and printed as a magnitude label.
    Magnitude,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub key: String,
    pub label: String,
    pub unit: String,
    pub display: MetricDisplay,
}

/// A named action and its per-unit effect on every catalog metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEffect {
    pub name: String,
    pub effects: BTreeMap<String, f64>,
}

impl ActionEffect {
    pub fn new(name: impl Into<String>, effects: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            effects: effects.iter().map(|&(k, v)| (k.to_string(), v)).collect(),
        }
    }

    pub fn effect(&self, metric: &str) -> f64 {
        self.effects.get(metric).copied().unwrap_or(0.0)
    }
}

#[derive(Deserialize)]
struct RawCatalog {
    metrics: Vec<MetricSpec>,
    actions: Vec<ActionEffect>,
}

/// Closed set of metrics plus the actions defined over them.
///
/// Every action defines exactly the catalog's metric keys with a finite,
/// non-negative effect; action names and metric keys are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct ActionCatalog {
    metrics: Vec<MetricSpec>,
    actions: Vec<ActionEffect>,
}

impl ActionCatalog {
    pub fn new(metrics: Vec<MetricSpec>, actions: Vec<ActionEffect>) -> Result<Self, ScenarioError> {
        if metrics.is_empty() {
            return Err(ScenarioError::InvalidCatalog("no metrics defined".to_string()));
        }
        let mut keys = BTreeSet::new();
        for m in &metrics {
            if !keys.insert(m.key.as_str()) {
                return Err(ScenarioError::InvalidCatalog(format!("duplicate metric '{}'", m.key)));
            }
        }

        let mut names = BTreeSet::new();
        for a in &actions {
            if !names.insert(a.name.as_str()) {
                return Err(ScenarioError::InvalidCatalog(format!("duplicate action '{}'", a.name)));
            }
            for key in &keys {
                match a.effects.get(*key) {
                    None => {
                        return Err(ScenarioError::InvalidCatalog(format!(
                            "action '{}' is missing metric '{key}'",
                            a.name
                        )));
                    }
                    Some(v) if !(v.is_finite() && *v >= 0.0) => {
                        return Err(ScenarioError::InvalidCatalog(format!(
                            "action '{}' has invalid effect {v} for '{key}'",
                            a.name
                        )));
                    }
                    Some(_) => {}
                }
            }
            if let Some(extra) = a.effects.keys().find(|k| !keys.contains(k.as_str())) {
                return Err(ScenarioError::InvalidCatalog(format!(
                    "action '{}' defines unknown metric '{extra}'",
                    a.name
                )));
            }
        }

        Ok(Self { metrics, actions })
    }

    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    pub fn actions(&self) -> &[ActionEffect] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionEffect> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn metric(&self, key: &str) -> Option<&MetricSpec> {
        self.metrics.iter().find(|m| m.key == key)
    }
}

impl TryFrom<RawCatalog> for ActionCatalog {
    type Error = ScenarioError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Self::new(raw.metrics, raw.actions)
    }
}

/// A user query: which actions, multiplied by how many people.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub selected: BTreeSet<String>,
    pub population: u64,
}

impl Scenario {
    pub fn new<I, S>(selected: I, population: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: selected.into_iter().map(Into::into).collect(),
            population,
        }
    }
}

/// Aggregated effect per metric, in catalog metric order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioTotals {
    pub population: u64,
    pub totals: Vec<(String, f64)>,
}

impl ScenarioTotals {
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.totals.iter().find(|(k, _)| k == metric).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.totals.iter().map(|(k, _)| k.as_str())
    }
}

/// One selected action's effect at the scenario's population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionContribution {
    pub action: String,
    pub values: Vec<(String, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(key: &str) -> MetricSpec {
        MetricSpec {
            key: key.to_string(),
            label: key.to_string(),
            unit: String::new(),
            display: MetricDisplay::Decimal { places: 2 },
        }
    }

    #[test]
    fn anchors_reject_short_and_unsorted_input() {
        assert!(matches!(
            AnchorSeries::from_pairs(&[(1980, 1.0)]),
            Err(EstimateError::InvalidAnchors(_))
        ));
        assert!(matches!(
            AnchorSeries::from_pairs(&[(1980, 1.0), (1980, 2.0)]),
            Err(EstimateError::InvalidAnchors(_))
        ));
        assert!(matches!(
            AnchorSeries::from_pairs(&[(1990, 1.0), (1980, 2.0)]),
            Err(EstimateError::InvalidAnchors(_))
        ));
        assert!(matches!(
            AnchorSeries::from_pairs(&[(1980, 1.0), (1990, f64::NAN)]),
            Err(EstimateError::InvalidAnchors(_))
        ));
        let ok = AnchorSeries::from_pairs(&[(1980, 1.0), (1990, 2.0)]).unwrap();
        assert_eq!(ok.span(), YearRange::new(1980, 1990).unwrap());
    }

    #[test]
    fn anchors_validate_when_deserialized() {
        let bad = r#"[{"year":2000,"value":1.0}]"#;
        assert!(serde_json::from_str::<AnchorSeries>(bad).is_err());
        let good = r#"[{"year":2000,"value":1.0},{"year":2001,"value":3.0}]"#;
        let series: AnchorSeries = serde_json::from_str(good).unwrap();
        assert_eq!(series.points().len(), 2);
    }

    #[test]
    fn year_range_rejects_end_before_start() {
        assert_eq!(
            YearRange::new(2000, 1999),
            Err(EstimateError::EmptyRange { start: 2000, end: 1999 })
        );
        let single = YearRange::new(2000, 2000).unwrap();
        assert_eq!(single.year_count(), 1);
        assert_eq!(YearRange::new(1980, 2024).unwrap().year_count(), 45);
    }

    #[test]
    fn bounds_reject_inverted_interval() {
        assert!(ValueBounds::new(10.0, 0.0).is_err());
        assert!(ValueBounds::new(0.0, f64::INFINITY).is_err());
        assert_eq!(ValueBounds::PERCENT.clamp(120.0), 100.0);
    }

    #[test]
    fn remainder_only_for_percent_curves() {
        let range = YearRange::new(2000, 2001).unwrap();
        let level = TrendCurve {
            kind: ValueKind::Level,
            range,
            bounds: None,
            values: vec![1.0, 2.0],
        };
        assert!(level.remainder().is_none());
        assert_eq!((level.min(), level.max()), (1.0, 2.0));

        let pct = TrendCurve { kind: ValueKind::Percent, ..level };
        let rem = pct.remainder().unwrap();
        assert_eq!(rem.values, vec![99.0, 98.0]);
        assert_eq!(pct.value_at(2001), Some(2.0));
        assert_eq!(pct.value_at(2002), None);
    }

    #[test]
    fn catalog_validation() {
        let metrics = vec![metric("a"), metric("b")];
        let ok = ActionCatalog::new(
            metrics.clone(),
            vec![ActionEffect::new("x", &[("a", 1.0), ("b", 0.0)])],
        );
        assert!(ok.is_ok());

        let missing = ActionCatalog::new(metrics.clone(), vec![ActionEffect::new("x", &[("a", 1.0)])]);
        assert!(matches!(missing, Err(ScenarioError::InvalidCatalog(_))));

        let extra = ActionCatalog::new(
            metrics.clone(),
            vec![ActionEffect::new("x", &[("a", 1.0), ("b", 1.0), ("c", 1.0)])],
        );
        assert!(matches!(extra, Err(ScenarioError::InvalidCatalog(_))));

        let negative = ActionCatalog::new(
            metrics.clone(),
            vec![ActionEffect::new("x", &[("a", -1.0), ("b", 1.0)])],
        );
        assert!(matches!(negative, Err(ScenarioError::InvalidCatalog(_))));

        let dup = ActionCatalog::new(
            metrics,
            vec![
                ActionEffect::new("x", &[("a", 1.0), ("b", 1.0)]),
                ActionEffect::new("x", &[("a", 2.0), ("b", 2.0)]),
            ],
        );
        assert!(matches!(dup, Err(ScenarioError::InvalidCatalog(_))));
    }
}
