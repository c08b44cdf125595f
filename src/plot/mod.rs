//! Terminal plotting for CLI output.

pub mod ascii;

pub use ascii::*;
