//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - trend inputs and outputs (`AnchorSeries`, `YearRange`, `ValueBounds`, `TrendCurve`)
//! - scenario inputs and outputs (`ActionCatalog`, `Scenario`, `ScenarioTotals`)
//! - the view selector (`View`, `Navigation`)

pub mod types;
pub mod view;

pub use types::*;
pub use view::*;
