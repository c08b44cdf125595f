//! Formatted terminal output: magnitude labels, metric values and tables.
//!
//! We keep formatting code in one place so:
//! - the estimator/aggregator code stays free of presentation concerns
//! - output changes are localized (CLI tables and TUI panels share it)

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{ActionCatalog, ActionContribution, MetricDisplay, MetricSpec, ScenarioTotals, TrendCurve, TrendSpec};

const HUNDRED_MILLION: u64 = 100_000_000;
const TEN_THOUSAND: u64 = 10_000;

/// How large integers are labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    /// Korean myriad units: `억` (10^8) and `만` (10^4), truncated.
    #[default]
    Korean,
    /// All digits with `,` thousands separators.
    Plain,
}

/// Label an integer by magnitude.
///
/// Korean style truncates to the largest unit: `150_000_000 -> "1억"`,
/// `25_000 -> "2만"`, `9_999 -> "9999"`.
pub fn format_magnitude(n: u64, style: NumberStyle) -> String {
    match style {
        NumberStyle::Korean => {
            if n >= HUNDRED_MILLION {
                format!("{}억", n / HUNDRED_MILLION)
            } else if n >= TEN_THOUSAND {
                format!("{}만", n / TEN_THOUSAND)
            } else {
                n.to_string()
            }
        }
        NumberStyle::Plain => group_thousands(n),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a metric total with its unit, e.g. `"30.00 kg"` or `"2만 km"`.
pub fn format_metric(metric: &MetricSpec, value: f64, style: NumberStyle) -> String {
    let number = match metric.display {
        MetricDisplay::Decimal { places } => format!("{value:.places$}"),
        // Negative or non-finite totals cannot come out of a valid catalog;
        // the saturating cast maps them to 0.
        MetricDisplay::Magnitude => format_magnitude(value.trunc() as u64, style),
    };
    if metric.unit.is_empty() {
        number
    } else {
        format!("{number} {}", metric.unit)
    }
}

/// Format a single trend value with the trend's precision and unit.
pub fn format_trend_value(spec: &TrendSpec, value: f64) -> String {
    let places = spec.places;
    match spec.unit.as_str() {
        "" => format!("{value:.places$}"),
        "%" => format!("{value:.places$}%"),
        "pH" => format!("{value:.places$}"),
        unit => format!("{value:.places$} {unit}"),
    }
}

/// Year-by-year table for one trend (plus its remainder if it has one).
pub fn format_trend_table(spec: &TrendSpec, curve: &TrendCurve, highlight: Option<i32>) -> String {
    let remainder = curve.remainder();
    let remainder_label = spec.remainder_label.as_deref().unwrap_or("Remainder");

    let mut out = String::new();
    out.push_str(&format!("=== {} ({}) ===\n", spec.label, spec.unit));

    let header = match &remainder {
        Some(_) => format!("{:<6} {:>14} {:>18}", "year", spec.label, remainder_label),
        None => format!("{:<6} {:>14}", "year", spec.label),
    };
    out.push_str(header.trim_end());
    out.push('\n');
    let rule = match &remainder {
        Some(_) => format!("{:-<6} {:-<14} {:-<18}", "", "", ""),
        None => format!("{:-<6} {:-<14}", "", ""),
    };
    out.push_str(&rule);
    out.push('\n');

    let places = spec.places;
    for (year, value) in curve.points() {
        let marker = if Some(year) == highlight { " <" } else { "" };
        let line = match remainder.as_ref().and_then(|r| r.value_at(year)) {
            Some(rem) => format!("{year:<6} {value:>14.places$} {rem:>18.places$}{marker}"),
            None => format!("{year:<6} {value:>14.places$}{marker}"),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// One-line summary of a trend at a year, e.g. `"2000: Bleached coral 22.49%"`.
pub fn format_trend_at(spec: &TrendSpec, curve: &TrendCurve, year: i32) -> Option<String> {
    let value = curve.value_at(year)?;
    let mut line = format!("{year}: {} {}", spec.label, format_trend_value(spec, value));
    if let (Some(rem), Some(label)) = (curve.remainder(), spec.remainder_label.as_deref()) {
        if let Some(r) = rem.value_at(year) {
            line.push_str(&format!(" | {label} {}", format_trend_value(spec, r)));
        }
    }
    Some(line)
}

/// Totals table for a scenario, one row per catalog metric.
pub fn format_totals_table(catalog: &ActionCatalog, totals: &ScenarioTotals, style: NumberStyle) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Population: {}\n",
        format_magnitude(totals.population, style)
    ));
    out.push_str(&format!("{:<28} {:>20}\n", "metric", "effect"));
    out.push_str(&format!("{:-<28} {:-<20}\n", "", ""));
    for (key, value) in &totals.totals {
        let Some(metric) = catalog.metric(key) else {
            continue;
        };
        out.push_str(&format!(
            "{:<28} {:>20}\n",
            truncate(&metric.label, 28),
            format_metric(metric, *value, style)
        ));
    }
    out
}

/// Per-action breakdown rows.
pub fn format_contributions(catalog: &ActionCatalog, rows: &[ActionContribution], style: NumberStyle) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("- {}\n", row.action));
        for (key, value) in &row.values {
            if let Some(metric) = catalog.metric(key) {
                out.push_str(&format!(
                    "    {:<26} {:>20}\n",
                    truncate(&metric.label, 26),
                    format_metric(metric, *value, style)
                ));
            }
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
