//! Command-line parsing for the ocean dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimation/aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::report::NumberStyle;
use crate::trend::Extrapolation;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ocean", version, about = "Ocean warming awareness dashboard (illustrative data)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (default).
    Tui(TuiArgs),
    /// Print one trend as a table and ASCII plot, optionally exporting it.
    Trend(TrendArgs),
    /// Compute the effect of a set of actions for a population.
    Scenario(ScenarioArgs),
    /// Plot a previously exported trend JSON.
    Plot(PlotArgs),
    /// Print (or write) the reference tables as JSON, the format `--data` accepts.
    Data(DataArgs),
    /// Write a Markdown snapshot of every trend at one year plus a scenario.
    Report(ReportArgs),
}

/// Options shared by every command that evaluates reference data.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Reference data JSON (defaults to the built-in tables).
    #[arg(long, value_name = "JSON", env = "OCEAN_DATA")]
    pub data: Option<PathBuf>,

    /// What to do with years outside a trend's anchor span.
    #[arg(long, value_enum, default_value_t = Extrapolation::Reject)]
    pub extrapolation: Extrapolation,

    /// How large numbers are labelled.
    #[arg(long, value_enum, default_value_t = NumberStyle::Korean)]
    pub style: NumberStyle,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Initial year of the year sliders.
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Debug, Args, Clone)]
pub struct TrendArgs {
    /// Trend key (e.g. coral, sea-level, ph). Omit to list the available trends.
    pub key: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Highlight one year (and print its value).
    #[arg(short = 'y', long)]
    pub year: Option<i32>,

    /// First year to evaluate (defaults to the trend's range).
    #[arg(long, requires = "end")]
    pub start: Option<i32>,

    /// Last year to evaluate (defaults to the trend's range).
    #[arg(long, requires = "start")]
    pub end: Option<i32>,

    /// Skip the year-by-year table.
    #[arg(long)]
    pub no_table: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 90)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the evaluated years to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export trend definition + evaluated grid to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ScenarioArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Action name (repeatable), e.g. --action "bicycle 30 min".
    #[arg(short = 'a', long = "action", value_name = "NAME")]
    pub actions: Vec<String>,

    /// Number of people taking the actions (one of the population options).
    #[arg(short = 'p', long, default_value_t = 1)]
    pub population: u64,

    /// Also print the effect of each action separately.
    #[arg(long)]
    pub breakdown: bool,

    /// List the available actions and population options, then exit.
    #[arg(long)]
    pub list: bool,

    /// Export totals to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for plotting a saved trend.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Trend JSON file produced by `ocean trend --export-json`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Highlight one year.
    #[arg(short = 'y', long)]
    pub year: Option<i32>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 90)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Validate and print this file instead of the built-in tables.
    #[arg(long, value_name = "JSON", env = "OCEAN_DATA")]
    pub data: Option<PathBuf>,

    /// Write to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output path (defaults to `reports/ocean_<year>_<timestamp>.md`).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Year to report (defaults to the reference data's default year).
    #[arg(short = 'y', long)]
    pub year: Option<i32>,

    /// Action name (repeatable).
    #[arg(short = 'a', long = "action", value_name = "NAME")]
    pub actions: Vec<String>,

    /// Number of people taking the actions.
    #[arg(short = 'p', long, default_value_t = 1)]
    pub population: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_scenario_flags() {
        let cli = Cli::parse_from([
            "ocean",
            "scenario",
            "-a",
            "bicycle 30 min",
            "--action",
            "recycling",
            "-p",
            "100",
            "--style",
            "plain",
        ]);
        let Command::Scenario(args) = cli.command else {
            panic!("expected scenario");
        };
        assert_eq!(args.actions, vec!["bicycle 30 min", "recycling"]);
        assert_eq!(args.population, 100);
        assert_eq!(args.common.style, NumberStyle::Plain);
        assert_eq!(args.common.extrapolation, Extrapolation::Reject);
    }

    #[test]
    fn trend_range_needs_both_ends() {
        assert!(Cli::try_parse_from(["ocean", "trend", "coral", "--start", "1990"]).is_err());
        let cli = Cli::try_parse_from([
            "ocean",
            "trend",
            "coral",
            "--start",
            "1990",
            "--end",
            "2000",
            "--extrapolation",
            "clamp-year",
        ])
        .unwrap();
        let Command::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert_eq!((args.start, args.end), (Some(1990), Some(2000)));
        assert_eq!(args.common.extrapolation, Extrapolation::ClampYear);
    }
}
