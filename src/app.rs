//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads and validates the reference data
//! - prints tables/plots or launches the TUI
//! - writes optional exports

use std::collections::BTreeSet;

use clap::Parser;

use crate::cli::{CommonArgs, Command, DataArgs, PlotArgs, ReportArgs, ScenarioArgs, TrendArgs, TuiArgs};
use crate::data::DashboardData;
use crate::domain::{Scenario, YearRange};
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;
pub mod state;

use pipeline::Dashboard;

/// Longest year range `ocean trend --start/--end` will evaluate.
pub const MAX_TREND_YEARS: usize = 10_000;

/// Entry point for the `ocean` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `ocean` and `ocean --year 2010` to behave like `ocean tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Tui(_) => LogTarget::FileOnly,
        _ => LogTarget::Stderr,
    };
    crate::logging::init(target);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Trend(args) => handle_trend(args),
        Command::Scenario(args) => handle_scenario(args),
        Command::Plot(args) => handle_plot(args),
        Command::Data(args) => handle_data(args),
        Command::Report(args) => handle_report(args),
    }
}

/// Load and validate the reference data named by the common flags.
pub fn load_dashboard(common: &CommonArgs) -> Result<Dashboard, AppError> {
    let data = DashboardData::load(common.data.as_deref())?;
    pipeline::build_dashboard(data, common.extrapolation)
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let dash = load_dashboard(&args.common)?;
    crate::tui::run(dash, args.year, args.common.style)
}

fn handle_trend(args: TrendArgs) -> Result<(), AppError> {
    let dash = load_dashboard(&args.common)?;

    let Some(key) = args.key.as_deref() else {
        println!("Available trends:");
        for (spec, curve) in dash.trends() {
            println!(
                "  {:<12} {} ({}) {}-{}",
                spec.key,
                spec.label,
                spec.unit,
                curve.range.start(),
                curve.range.end()
            );
        }
        return Ok(());
    };

    let spec = dash.spec(key)?;
    let curve = match (args.start, args.end) {
        (Some(start), Some(end)) => {
            let range = requested_range(start, end)?;
            dash.estimator.estimate_spec_over(spec, range)?
        }
        _ => dash.curve(key)?.clone(),
    };

    if let Some(year) = args.year {
        match crate::report::format_trend_at(spec, &curve, year) {
            Some(line) => println!("{line}"),
            None => {
                return Err(AppError::new(
                    2,
                    format!(
                        "Year {year} is outside the evaluated range {}-{}.",
                        curve.range.start(),
                        curve.range.end()
                    ),
                ));
            }
        }
    }

    if !args.no_table {
        println!("{}", crate::report::format_trend_table(spec, &curve, args.year));
    }

    if !args.no_plot {
        let plot = crate::plot::render_trend_plot(spec, &curve, args.year, args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_trend_csv(path, spec, &curve)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::curve::write_trend_json(path, spec, &curve, dash.estimator.extrapolation())?;
    }

    Ok(())
}

fn handle_scenario(args: ScenarioArgs) -> Result<(), AppError> {
    let dash = load_dashboard(&args.common)?;
    let style = args.common.style;

    if args.list {
        println!("Actions:");
        for action in dash.aggregator.catalog().actions() {
            println!("  {}", action.name);
        }
        let populations: Vec<String> = dash
            .data
            .populations
            .iter()
            .map(|&p| crate::report::format_magnitude(p, style))
            .collect();
        println!("Populations: {}", populations.join(", "));
        return Ok(());
    }

    let scenario = scenario_from_args(&dash, &args.actions, args.population)?;
    let totals = dash.aggregate(&scenario)?;
    let catalog = dash.aggregator.catalog();

    if scenario.selected.is_empty() {
        println!("No actions selected (use --action NAME, --list to see them).");
    }
    println!("{}", crate::report::format_totals_table(catalog, &totals, style));

    let contributions = if args.breakdown {
        let rows = dash.aggregator.contributions(&scenario)?;
        println!("Per action:");
        println!("{}", crate::report::format_contributions(catalog, &rows, style));
        Some(rows)
    } else {
        None
    };

    if let Some(path) = &args.export {
        crate::io::export::write_scenario_json(path, &scenario, &totals, contributions.as_deref())?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::curve::read_trend_json(&args.curve)?;
    let curve = file.to_curve()?;

    if let Some(year) = args.year {
        if let Some(line) = crate::report::format_trend_at(&file.spec, &curve, year) {
            println!("{line}");
        }
    }

    let plot = crate::plot::render_trend_plot(&file.spec, &curve, args.year, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_data(args: DataArgs) -> Result<(), AppError> {
    let data = DashboardData::load(args.data.as_deref())?;
    // Evaluate everything once so a broken file is reported here, not later.
    let data = pipeline::build_dashboard(data, Default::default())?.data;

    match &args.out {
        Some(path) => {
            data.write_json(path)?;
            tracing::info!(path = %path.display(), "wrote reference data");
        }
        None => println!("{}", data.to_json_string()?),
    }
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let dash = load_dashboard(&args.common)?;
    let year = args.year.unwrap_or(dash.data.default_year);
    let scenario = scenario_from_args(&dash, &args.actions, args.population)?;

    let path = crate::io::report::write_markdown_report(args.out.as_deref(), &dash, year, &scenario, args.common.style)?;
    println!("Wrote report: {}", path.display());
    Ok(())
}

/// Validate a `--start/--end` pair.
fn requested_range(start: i32, end: i32) -> Result<YearRange, AppError> {
    let range = YearRange::new(start, end)?;
    if range.year_count() > MAX_TREND_YEARS {
        return Err(AppError::new(
            2,
            format!(
                "Year range {start}-{end} spans {} years; at most {MAX_TREND_YEARS} are allowed.",
                range.year_count()
            ),
        ));
    }
    Ok(range)
}

/// Build a scenario from CLI input, restricted to the offered population options.
pub fn scenario_from_args(dash: &Dashboard, actions: &[String], population: u64) -> Result<Scenario, AppError> {
    if !dash.data.populations.contains(&population) {
        let options: Vec<String> = dash.data.populations.iter().map(u64::to_string).collect();
        return Err(AppError::new(
            2,
            format!("Population must be one of: {}.", options.join(", ")),
        ));
    }
    let selected: BTreeSet<String> = actions.iter().map(|a| a.trim().to_string()).collect();
    if let Some(unknown) = selected.iter().find(|a| dash.aggregator.catalog().action(a).is_none()) {
        return Err(AppError::new(
            2,
            format!("Unknown action '{unknown}' (see `ocean scenario --list`)."),
        ));
    }
    Ok(Scenario { selected, population })
}

/// Rewrite argv so `ocean` defaults to `ocean tui`.
///
/// Rules:
/// - `ocean`                      -> `ocean tui`
/// - `ocean --year 2010 ...`      -> `ocean tui --year 2010 ...`
/// - `ocean --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "trend" | "scenario" | "plot" | "data" | "report"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
