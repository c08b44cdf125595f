//! Built-in reference tables.
//!
//! All numbers here are illustrative, picked for awareness rather than
//! measured. They are plain data; the estimator and aggregator receive them
//! through `DashboardData`.

use crate::domain::{
    ActionCatalog, ActionEffect, AnchorSeries, MetricDisplay, MetricSpec, TrendSpec, ValueBounds, ValueKind,
    YearRange,
};
use crate::error::AppError;

pub const FIRST_YEAR: i32 = 1980;
pub const LAST_YEAR: i32 = 2024;

/// Year the sliders start on.
pub const DEFAULT_YEAR: i32 = 2000;

pub const POPULATIONS: [u64; 5] = [1, 100, 10_000, 1_000_000, 100_000_000];

pub const TREND_SEA_LEVEL: &str = "sea-level";
pub const TREND_SEA_TEMP: &str = "sea-temp";
pub const TREND_CORAL: &str = "coral";
pub const TREND_PH: &str = "ph";
pub const TREND_TEMP_RISE: &str = "temp-rise";
pub const TREND_HABITAT: &str = "habitat";

pub const CORAL_ANCHORS: [(i32, f64); 5] = [(1980, 5.0), (1998, 21.0), (2010, 37.0), (2015, 68.0), (2024, 84.0)];

pub const METRIC_CO2: &str = "co2";
pub const METRIC_ICE: &str = "ice";
pub const METRIC_SEA_LEVEL: &str = "sea_level";
pub const METRIC_CAR: &str = "car";
pub const METRIC_TREES: &str = "trees";

/// Per-person effect of one occurrence of each action:
/// `(name, co2 kg, ice L, sea level mm, car km, trees)`.
pub const ACTION_TABLE: [(&str, [f64; 5]); 8] = [
    ("bicycle 30 min", [0.3, 0.07, 0.0002, 2.0, 1.0]),
    ("public transit ride", [0.5, 0.1, 0.0003, 5.0, 2.0]),
    ("vegetarian meal", [1.0, 0.2, 0.0005, 10.0, 5.0]),
    ("recycling", [0.2, 0.03, 0.0001, 1.0, 0.5]),
    ("saving electricity", [0.4, 0.05, 0.00015, 1.5, 0.7]),
    ("saving water", [0.1, 0.02, 0.00005, 0.5, 0.2]),
    ("reducing plastic", [0.15, 0.03, 0.00008, 0.7, 0.3]),
    ("beach cleanup", [0.25, 0.04, 0.00012, 1.2, 0.5]),
];

fn trend(
    key: &str,
    label: &str,
    unit: &str,
    kind: ValueKind,
    anchors: &[(i32, f64)],
    bounds: Option<ValueBounds>,
    places: usize,
) -> Result<TrendSpec, AppError> {
    Ok(TrendSpec {
        key: key.to_string(),
        label: label.to_string(),
        unit: unit.to_string(),
        kind,
        anchors: AnchorSeries::from_pairs(anchors)?,
        range: YearRange::new(FIRST_YEAR, LAST_YEAR)?,
        bounds,
        remainder_label: None,
        places,
    })
}

/// Built-in trend tables.
pub fn default_trends() -> Result<Vec<TrendSpec>, AppError> {
    let mut coral = trend(
        TREND_CORAL,
        "Bleached coral",
        "%",
        ValueKind::Percent,
        &CORAL_ANCHORS,
        Some(ValueBounds::PERCENT),
        2,
    )?;
    coral.remainder_label = Some("Remaining coral".to_string());

    Ok(vec![
        trend(
            TREND_SEA_LEVEL,
            "Sea level rise",
            "mm",
            ValueKind::Level,
            &[(FIRST_YEAR, 0.0), (LAST_YEAR, 13.6)],
            None,
            2,
        )?,
        trend(
            TREND_SEA_TEMP,
            "Sea temperature rise",
            "°C",
            ValueKind::Level,
            &[(FIRST_YEAR, 0.0), (LAST_YEAR, 0.78)],
            None,
            2,
        )?,
        coral,
        trend(
            TREND_PH,
            "Ocean pH",
            "pH",
            ValueKind::Level,
            &[(FIRST_YEAR, 8.2), (LAST_YEAR, 8.0)],
            None,
            2,
        )?,
        trend(
            TREND_TEMP_RISE,
            "Water temperature rise",
            "°C",
            ValueKind::Level,
            &[(FIRST_YEAR, 0.0), (LAST_YEAR, 0.78)],
            None,
            2,
        )?,
        trend(
            TREND_HABITAT,
            "Habitat loss",
            "%",
            ValueKind::Level,
            &[(FIRST_YEAR, 0.0), (LAST_YEAR, 30.0)],
            Some(ValueBounds::PERCENT),
            1,
        )?,
    ])
}

/// Built-in action catalog (8 actions × 5 metrics).
pub fn default_catalog() -> Result<ActionCatalog, AppError> {
    let metrics = vec![
        metric(METRIC_CO2, "CO2 saved", "kg", MetricDisplay::Decimal { places: 2 }),
        metric(METRIC_ICE, "Ice preserved", "L", MetricDisplay::Decimal { places: 2 }),
        metric(METRIC_SEA_LEVEL, "Sea level rise avoided", "mm", MetricDisplay::Decimal { places: 6 }),
        metric(METRIC_CAR, "Car travel avoided", "km", MetricDisplay::Magnitude),
        metric(METRIC_TREES, "Trees planted equivalent", "trees", MetricDisplay::Magnitude),
    ];
    let keys = [METRIC_CO2, METRIC_ICE, METRIC_SEA_LEVEL, METRIC_CAR, METRIC_TREES];

    let actions = ACTION_TABLE
        .iter()
        .map(|(name, values)| {
            let effects: Vec<(&str, f64)> = keys.iter().copied().zip(values.iter().copied()).collect();
            ActionEffect::new(*name, &effects)
        })
        .collect();

    Ok(ActionCatalog::new(metrics, actions)?)
}

fn metric(key: &str, label: &str, unit: &str, display: MetricDisplay) -> MetricSpec {
    MetricSpec {
        key: key.to_string(),
        label: label.to_string(),
        unit: unit.to_string(),
        display,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_validate() {
        let trends = default_trends().unwrap();
        assert_eq!(trends.len(), 6);
        assert!(trends.iter().all(|t| t.range.within(&t.anchors.span())));

        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.actions().len(), 8);
        assert_eq!(catalog.metrics().len(), 5);
        assert_eq!(catalog.action("bicycle 30 min").unwrap().effect(METRIC_CO2), 0.3);
    }
}
