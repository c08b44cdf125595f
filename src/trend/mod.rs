//! Trend estimation: anchor points -> one value per year.
//!
//! The estimator fits a PCHIP interpolant through the anchors, samples it at
//! every integer year of the requested range and optionally clamps the result.
//! It holds no domain data; anchors and ranges are passed in by the caller.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{AnchorSeries, TrendCurve, TrendSpec, ValueBounds, ValueKind, YearRange};
use crate::error::EstimateError;
use crate::math::{Curve, Pchip};

/// What to do with years outside the anchor span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Extrapolation {
    /// Fail with `OutsideAnchorSpan`.
    #[default]
    Reject,
    /// Evaluate at the nearest anchor year (flat continuation).
    ClampYear,
    /// Continue the end cubic segments; only `bounds` limit the result.
    Extend,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendEstimator {
    extrapolation: Extrapolation,
}

impl TrendEstimator {
    pub fn new(extrapolation: Extrapolation) -> Self {
        Self { extrapolation }
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Evaluate the anchors' interpolant at every year of `range`.
    pub fn estimate(
        &self,
        anchors: &AnchorSeries,
        range: YearRange,
        bounds: Option<ValueBounds>,
    ) -> Result<TrendCurve, EstimateError> {
        self.evaluate(anchors, range, bounds, ValueKind::Level)
    }

    /// Like `estimate`, but bounded to `[0, 100]` and marked as a percentage
    /// so `TrendCurve::remainder` is available.
    pub fn estimate_percent(&self, anchors: &AnchorSeries, range: YearRange) -> Result<TrendCurve, EstimateError> {
        self.evaluate(anchors, range, Some(ValueBounds::PERCENT), ValueKind::Percent)
    }

    /// Evaluate a named reference trend over its own range.
    pub fn estimate_spec(&self, spec: &TrendSpec) -> Result<TrendCurve, EstimateError> {
        self.estimate_spec_over(spec, spec.range)
    }

    /// Evaluate a named reference trend over an explicit range.
    pub fn estimate_spec_over(&self, spec: &TrendSpec, range: YearRange) -> Result<TrendCurve, EstimateError> {
        let bounds = match (spec.kind, spec.bounds) {
            (_, Some(b)) => Some(b),
            (ValueKind::Percent, None) => Some(ValueBounds::PERCENT),
            (ValueKind::Level, None) => None,
        };
        self.evaluate(&spec.anchors, range, bounds, spec.kind)
    }

    fn evaluate(
        &self,
        anchors: &AnchorSeries,
        range: YearRange,
        bounds: Option<ValueBounds>,
        kind: ValueKind,
    ) -> Result<TrendCurve, EstimateError> {
        let span = anchors.span();
        if self.extrapolation == Extrapolation::Reject && !range.within(&span) {
            return Err(EstimateError::OutsideAnchorSpan {
                start: range.start(),
                end: range.end(),
                min: span.start(),
                max: span.end(),
            });
        }

        let xs: Vec<f64> = anchors.points().iter().map(|p| f64::from(p.year)).collect();
        let ys: Vec<f64> = anchors.points().iter().map(|p| p.value).collect();
        let interp = Pchip::new(&xs, &ys)
            .ok_or_else(|| EstimateError::InvalidAnchors("interpolant could not be fitted".to_string()))?;

        let values = range
            .years()
            .map(|year| {
                let year = match self.extrapolation {
                    Extrapolation::ClampYear => span.clamp(year),
                    Extrapolation::Reject | Extrapolation::Extend => year,
                };
                let v = interp.value(f64::from(year));
                match bounds {
                    Some(b) => b.clamp(v),
                    None => v,
                }
            })
            .collect::<Vec<_>>();

        tracing::trace!(
            start = range.start(),
            end = range.end(),
            n = values.len(),
            "evaluated trend curve"
        );

        Ok(TrendCurve {
            kind,
            range,
            bounds,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coral() -> AnchorSeries {
        AnchorSeries::from_pairs(&[(1980, 5.0), (1998, 21.0), (2010, 37.0), (2015, 68.0), (2024, 84.0)]).unwrap()
    }

    fn full_range() -> YearRange {
        YearRange::new(1980, 2024).unwrap()
    }

    #[test]
    fn one_value_per_year() {
        let curve = TrendEstimator::default().estimate(&coral(), full_range(), None).unwrap();
        assert_eq!(curve.values.len(), 45);
        assert_eq!(curve.points().next(), Some((1980, 5.0)));
    }

    #[test]
    fn coral_endpoints_and_remainder() {
        let curve = TrendEstimator::default().estimate_percent(&coral(), full_range()).unwrap();
        assert_eq!(curve.value_at(1980), Some(5.0));
        assert_eq!(curve.value_at(2024), Some(84.0));

        let remain = curve.remainder().unwrap();
        assert_eq!(remain.value_at(2024), Some(16.0));
        for ((_, b), (_, r)) in curve.points().zip(remain.points()) {
            assert!((b + r - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn coral_curve_is_non_decreasing() {
        let curve = TrendEstimator::default().estimate_percent(&coral(), full_range()).unwrap();
        for w in curve.values.windows(2) {
            assert!(w[1] >= w[0], "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn two_anchor_curves_are_linear() {
        let anchors = AnchorSeries::from_pairs(&[(1980, 8.2), (2024, 8.0)]).unwrap();
        let curve = TrendEstimator::default().estimate(&anchors, full_range(), None).unwrap();
        for (i, (_, v)) in curve.points().enumerate() {
            let expected = 8.2 + (8.0 - 8.2) * i as f64 / 44.0;
            assert!((v - expected).abs() < 1e-9, "year index {i}: {v} vs {expected}");
        }
    }

    #[test]
    fn clamps_into_bounds() {
        let anchors = AnchorSeries::from_pairs(&[(2000, -10.0), (2010, 50.0), (2020, 120.0)]).unwrap();
        let bounds = ValueBounds::new(0.0, 100.0).unwrap();
        let range = YearRange::new(2000, 2020).unwrap();
        let curve = TrendEstimator::default().estimate(&anchors, range, Some(bounds)).unwrap();
        assert!(curve.values.iter().all(|v| bounds.contains(*v)));
        assert_eq!(curve.value_at(2000), Some(0.0));
        assert_eq!(curve.value_at(2020), Some(100.0));
    }

    #[test]
    fn reject_policy_refuses_years_outside_anchors() {
        let range = YearRange::new(1975, 2024).unwrap();
        let err = TrendEstimator::default().estimate(&coral(), range, None).unwrap_err();
        assert_eq!(
            err,
            EstimateError::OutsideAnchorSpan {
                start: 1975,
                end: 2024,
                min: 1980,
                max: 2024
            }
        );
    }

    #[test]
    fn clamp_year_policy_repeats_endpoints() {
        let range = YearRange::new(1975, 2030).unwrap();
        let curve = TrendEstimator::new(Extrapolation::ClampYear)
            .estimate(&coral(), range, None)
            .unwrap();
        assert_eq!(curve.value_at(1975), Some(5.0));
        assert_eq!(curve.value_at(2030), Some(84.0));
    }

    #[test]
    fn extend_policy_is_bounded_only_by_bounds() {
        let anchors = AnchorSeries::from_pairs(&[(1980, 0.0), (2024, 44.0)]).unwrap();
        let range = YearRange::new(2020, 2030).unwrap();
        let free = TrendEstimator::new(Extrapolation::Extend)
            .estimate(&anchors, range, None)
            .unwrap();
        assert!((free.value_at(2030).unwrap() - 50.0).abs() < 1e-9);

        let capped = TrendEstimator::new(Extrapolation::Extend)
            .estimate(&anchors, range, Some(ValueBounds::new(0.0, 45.0).unwrap()))
            .unwrap();
        assert_eq!(capped.value_at(2030), Some(45.0));
    }
}
