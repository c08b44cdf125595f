//! Mathematical utilities: monotone cubic interpolation.

pub mod pchip;

pub use pchip::*;
