//! Markdown snapshot of the dashboard: every trend at one year plus a scenario.

use std::fmt::Write as _;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::Dashboard;
use crate::domain::Scenario;
use crate::error::AppError;
use crate::report::{NumberStyle, format_magnitude, format_metric, format_trend_value};

/// Render the Markdown report.
pub fn render_markdown_report(
    dash: &Dashboard,
    year: i32,
    scenario: &Scenario,
    style: NumberStyle,
) -> Result<String, AppError> {
    let mut out = String::new();
    writeln!(out, "# Ocean environment snapshot").map_err(render_error)?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339()).map_err(render_error)?;
    writeln!(out, "- year: {year}").map_err(render_error)?;
    writeln!(out, "- extrapolation: {:?}", dash.estimator.extrapolation()).map_err(render_error)?;
    writeln!(out, "\nAll figures are illustrative, not measurements.").map_err(render_error)?;

    writeln!(out, "\n## Trends").map_err(render_error)?;
    writeln!(out, "| trend | value | anchors |").map_err(render_error)?;
    writeln!(out, "| - | - | - |").map_err(render_error)?;
    for (spec, curve) in dash.trends() {
        let value = match curve.value_at(year) {
            Some(v) => {
                let mut cell = format_trend_value(spec, v);
                if let (Some(rem), Some(label)) = (curve.remainder(), spec.remainder_label.as_deref()) {
                    if let Some(r) = rem.value_at(year) {
                        cell.push_str(&format!(" ({label}: {})", format_trend_value(spec, r)));
                    }
                }
                cell
            }
            None => format!("n/a (range {}-{})", curve.range.start(), curve.range.end()),
        };
        let anchors = spec
            .anchors
            .points()
            .iter()
            .map(|p| format!("{}={}", p.year, p.value))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "| {} | {value} | {anchors} |", spec.label).map_err(render_error)?;
    }

    let totals = dash.aggregate(scenario)?;
    let contributions = dash.aggregator.contributions(scenario)?;
    let catalog = dash.aggregator.catalog();

    writeln!(out, "\n## Scenario").map_err(render_error)?;
    writeln!(out, "- population: {}", format_magnitude(scenario.population, style)).map_err(render_error)?;
    if contributions.is_empty() {
        writeln!(out, "- actions: none selected").map_err(render_error)?;
    } else {
        let names: Vec<&str> = contributions.iter().map(|c| c.action.as_str()).collect();
        writeln!(out, "- actions: {}", names.join(", ")).map_err(render_error)?;
    }

    writeln!(out, "\n| metric | total |").map_err(render_error)?;
    writeln!(out, "| - | - |").map_err(render_error)?;
    for (key, value) in &totals.totals {
        if let Some(metric) = catalog.metric(key) {
            writeln!(out, "| {} | {} |", metric.label, format_metric(metric, *value, style)).map_err(render_error)?;
        }
    }

    if !contributions.is_empty() {
        writeln!(out, "\n### Per action").map_err(render_error)?;
        let header: Vec<&str> = catalog.metrics().iter().map(|m| m.label.as_str()).collect();
        writeln!(out, "| action | {} |", header.join(" | ")).map_err(render_error)?;
        writeln!(out, "| - |{}", " - |".repeat(header.len())).map_err(render_error)?;
        for row in &contributions {
            let cells: Vec<String> = row
                .values
                .iter()
                .filter_map(|(k, v)| catalog.metric(k).map(|m| format_metric(m, *v, style)))
                .collect();
            writeln!(out, "| {} | {} |", row.action, cells.join(" | ")).map_err(render_error)?;
        }
    }

    Ok(out)
}

fn render_error(e: std::fmt::Error) -> AppError {
    AppError::new(4, format!("Failed to render report: {e}"))
}

/// Write the report to `path`, or to `reports/ocean_<year>_<timestamp>.md`.
pub fn write_markdown_report(
    path: Option<&Path>,
    dash: &Dashboard,
    year: i32,
    scenario: &Scenario,
    style: NumberStyle,
) -> Result<PathBuf, AppError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let dir = PathBuf::from("reports");
            create_dir_all(&dir).map_err(|e| AppError::new(4, format!("Failed to create report dir: {e}")))?;
            let ts = Local::now().format("%Y%m%d_%H%M%S");
            dir.join(format!("ocean_{year}_{ts}.md"))
        }
    };

    let body = render_markdown_report(dash, year, scenario, style)?;
    write(&path, body).map_err(|e| AppError::new(4, format!("Failed to write report '{}': {e}", path.display())))?;

    tracing::info!(path = %path.display(), year, "wrote markdown report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_dashboard;
    use crate::data::DashboardData;
    use crate::trend::Extrapolation;

    #[test]
    fn report_lists_trends_and_totals() {
        let dash = build_dashboard(DashboardData::builtin().unwrap(), Extrapolation::Reject).unwrap();
        let scenario = Scenario::new(["bicycle 30 min", "recycling"], 10_000);
        let md = render_markdown_report(&dash, 2024, &scenario, NumberStyle::Korean).unwrap();

        assert!(md.contains("| Bleached coral | 84.00% (Remaining coral: 16.00%) |"), "{md}");
        assert!(md.contains("- population: 1만"), "{md}");
        assert!(md.contains("| CO2 saved | 5000.00 kg |"), "{md}");
        assert!(md.contains("### Per action"));
    }

    #[test]
    fn render_failures_are_io_errors() {
        let err = render_error(std::fmt::Error);
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().starts_with("Failed to render report"), "{err}");
    }

    #[test]
    fn unknown_action_fails_the_report() {
        let dash = build_dashboard(DashboardData::builtin().unwrap(), Extrapolation::Reject).unwrap();
        let scenario = Scenario::new(["surfing"], 1);
        let err = render_markdown_report(&dash, 2000, &scenario, NumberStyle::Korean).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
