//! `ocean-dash` library crate.
//!
//! The binary (`ocean`) is a thin wrapper around this library so that:
//!
//! - trend estimation and scenario aggregation are testable without a terminal
//! - the reference tables can be swapped for a JSON file at startup
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod scenario;
pub mod trend;
pub mod tui;
