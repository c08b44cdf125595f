//! Reporting utilities: magnitude labels, metric values and text tables.

pub mod format;

pub use format::*;
