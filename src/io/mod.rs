//! Input/output helpers.
//!
//! - trend CSV and scenario JSON exports (`export`)
//! - trend JSON read/write (`curve`)
//! - Markdown snapshots (`report`)

pub mod curve;
pub mod export;
pub mod report;

pub use curve::*;
pub use export::*;
pub use report::*;
